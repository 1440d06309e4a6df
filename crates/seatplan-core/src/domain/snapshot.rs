//! Snapshot of one layout, and the raw records it is decoded from.

use serde::{Deserialize, Serialize};

use super::{Guest, GuestId, PreferenceKind, SeatingPreference, Table, TableId, TableShape};
use crate::error::ValidationError;

/// Everything the engine needs for one optimization run.
///
/// Constructed fresh per call and passed by value; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub guests: Vec<Guest>,
    pub tables: Vec<Table>,
    pub preferences: Vec<SeatingPreference>,
}

impl Snapshot {
    pub fn new(
        guests: Vec<Guest>,
        tables: Vec<Table>,
        preferences: Vec<SeatingPreference>,
    ) -> Self {
        Snapshot {
            guests,
            tables,
            preferences,
        }
    }

    /// Total number of seats across all tables.
    pub fn total_capacity(&self) -> u64 {
        self.tables.iter().map(|t| u64::from(t.capacity)).sum()
    }
}

/// Guest record as the persistence layer stores it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGuest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "group")]
    pub household: Option<String>,
    #[serde(default)]
    pub plus_one: Option<bool>,
}

/// Table record as the persistence layer stores it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    pub id: String,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Preference record as the persistence layer stores it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPreference {
    pub guest_a: String,
    pub guest_b: String,
    pub kind: String,
    #[serde(default)]
    pub weight: Option<i64>,
}

/// Untyped snapshot straight from storage.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    #[serde(default)]
    pub guests: Vec<RawGuest>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
    #[serde(default)]
    pub preferences: Vec<RawPreference>,
}

impl RawSnapshot {
    /// Parses a raw snapshot from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

impl TryFrom<RawGuest> for Guest {
    type Error = ValidationError;

    fn try_from(raw: RawGuest) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| raw.id.clone());
        Ok(Guest {
            id: GuestId::new(raw.id),
            name,
            household: raw.household.filter(|h| !h.trim().is_empty()),
            plus_one: raw.plus_one.unwrap_or(false),
        })
    }
}

impl TryFrom<RawTable> for Table {
    type Error = ValidationError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let id = TableId::new(raw.id);
        let capacity = match raw.capacity {
            None => return Err(ValidationError::MissingCapacity(id)),
            Some(c) if c <= 0 => {
                return Err(ValidationError::NonPositiveCapacity {
                    table: id,
                    capacity: c,
                })
            }
            Some(c) => u32::try_from(c).unwrap_or(u32::MAX),
        };
        let shape = decode_shape(raw.shape.as_deref(), raw.x, raw.y);
        Ok(Table {
            id,
            capacity,
            shape,
        })
    }
}

fn decode_shape(shape: Option<&str>, x: Option<f64>, y: Option<f64>) -> Option<TableShape> {
    if shape.is_none() && x.is_none() && y.is_none() {
        return None;
    }
    let (x, y) = (x.unwrap_or(0.0), y.unwrap_or(0.0));
    let shape = match shape.map(|s| s.trim().to_ascii_lowercase()) {
        None => TableShape::Round { x, y },
        Some(s) => match s.as_str() {
            "round" | "circle" => TableShape::Round { x, y },
            "rectangle" | "rect" | "banquet" => TableShape::Rectangle { x, y },
            "square" => TableShape::Square { x, y },
            _ => TableShape::Other { name: s, x, y },
        },
    };
    Some(shape)
}

fn decode_preference(index: usize, raw: RawPreference) -> Result<SeatingPreference, ValidationError> {
    let kind: PreferenceKind = raw
        .kind
        .parse()
        .map_err(|kind| ValidationError::UnknownPreferenceKind { index, kind })?;
    let weight = match raw.weight {
        None => 1,
        Some(w) if w <= 0 && !kind.is_hard() => {
            return Err(ValidationError::NonPositiveWeight { index, weight: w })
        }
        Some(w) if w <= 0 => 1,
        Some(w) => u32::try_from(w).unwrap_or(u32::MAX),
    };
    Ok(SeatingPreference {
        first: GuestId::new(raw.guest_a),
        second: GuestId::new(raw.guest_b),
        kind,
        weight,
    })
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = ValidationError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let guests = raw
            .guests
            .into_iter()
            .map(Guest::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let tables = raw
            .tables
            .into_iter()
            .map(Table::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let preferences = raw
            .preferences
            .into_iter()
            .enumerate()
            .map(|(index, p)| decode_preference(index, p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Snapshot {
            guests,
            tables,
            preferences,
        })
    }
}
