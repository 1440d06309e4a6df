use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GuestId;

/// Kind of pairwise seating preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    /// Hard: both guests sit at the same table.
    MustTogether,
    /// Hard: the guests never share a table.
    MustApart,
    /// Soft: reward `weight` when the guests share a table.
    PreferTogether,
    /// Soft: reward `weight` when the guests sit at different tables.
    PreferApart,
}

impl PreferenceKind {
    /// Returns true for `must_together` and `must_apart`.
    pub fn is_hard(self) -> bool {
        matches!(self, PreferenceKind::MustTogether | PreferenceKind::MustApart)
    }

    /// Returns true for kinds that want the pair at the same table.
    pub fn wants_together(self) -> bool {
        matches!(
            self,
            PreferenceKind::MustTogether | PreferenceKind::PreferTogether
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKind::MustTogether => "must_together",
            PreferenceKind::MustApart => "must_apart",
            PreferenceKind::PreferTogether => "prefer_together",
            PreferenceKind::PreferApart => "prefer_apart",
        }
    }
}

impl fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKind {
    type Err = String;

    /// Accepts snake, kebab, camel and upper-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "musttogether" => Ok(PreferenceKind::MustTogether),
            "mustapart" => Ok(PreferenceKind::MustApart),
            "prefertogether" => Ok(PreferenceKind::PreferTogether),
            "preferapart" => Ok(PreferenceKind::PreferApart),
            _ => Err(s.to_owned()),
        }
    }
}

/// An unordered pair of guests with a preference kind.
///
/// `weight` is the priority of soft kinds; hard kinds ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingPreference {
    pub first: GuestId,
    pub second: GuestId,
    pub kind: PreferenceKind,
    pub weight: u32,
}

impl SeatingPreference {
    /// Creates a preference with the default weight of 1.
    pub fn new(first: impl Into<GuestId>, second: impl Into<GuestId>, kind: PreferenceKind) -> Self {
        SeatingPreference {
            first: first.into(),
            second: second.into(),
            kind,
            weight: 1,
        }
    }

    pub fn must_together(first: impl Into<GuestId>, second: impl Into<GuestId>) -> Self {
        Self::new(first, second, PreferenceKind::MustTogether)
    }

    pub fn must_apart(first: impl Into<GuestId>, second: impl Into<GuestId>) -> Self {
        Self::new(first, second, PreferenceKind::MustApart)
    }

    pub fn prefer_together(
        first: impl Into<GuestId>,
        second: impl Into<GuestId>,
        weight: u32,
    ) -> Self {
        Self::new(first, second, PreferenceKind::PreferTogether).with_weight(weight)
    }

    pub fn prefer_apart(first: impl Into<GuestId>, second: impl Into<GuestId>, weight: u32) -> Self {
        Self::new(first, second, PreferenceKind::PreferApart).with_weight(weight)
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Returns true if this preference joins the same two guests as `other`,
    /// in either order.
    pub fn same_pair(&self, other: &SeatingPreference) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}
