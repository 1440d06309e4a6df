//! Assignment of guests to tables and seats.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GuestId, TableId};

/// Where one guest sits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatPlacement {
    pub table: TableId,
    /// Position within the table, in placement order. Unique per table.
    pub seat: u32,
}

/// A mapping from guest to (table, seat).
///
/// Keyed by guest, so a guest appears at most one table. Iteration order is
/// by guest id, which keeps serialized output stable across runs.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, GuestId, TableId};
///
/// let mut plan = Assignment::new();
/// plan.place("ann", "t1", 0);
/// plan.place("bob", "t1", 1);
///
/// assert_eq!(plan.occupancy(&TableId::from("t1")), 2);
/// assert_eq!(plan.table_of(&GuestId::from("bob")), Some(&TableId::from("t1")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    placements: BTreeMap<GuestId, SeatPlacement>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats `guest` at `table`, replacing any earlier placement of that guest.
    ///
    /// Returns the previous placement, if any.
    pub fn place(
        &mut self,
        guest: impl Into<GuestId>,
        table: impl Into<TableId>,
        seat: u32,
    ) -> Option<SeatPlacement> {
        self.placements.insert(
            guest.into(),
            SeatPlacement {
                table: table.into(),
                seat,
            },
        )
    }

    /// Removes a guest from the plan.
    pub fn unseat(&mut self, guest: &GuestId) -> Option<SeatPlacement> {
        self.placements.remove(guest)
    }

    pub fn get(&self, guest: &GuestId) -> Option<&SeatPlacement> {
        self.placements.get(guest)
    }

    pub fn table_of(&self, guest: &GuestId) -> Option<&TableId> {
        self.placements.get(guest).map(|p| &p.table)
    }

    pub fn contains(&self, guest: &GuestId) -> bool {
        self.placements.contains_key(guest)
    }

    /// Number of seated guests.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, GuestId, SeatPlacement> {
        self.placements.iter()
    }

    /// Number of guests seated at `table`.
    pub fn occupancy(&self, table: &TableId) -> usize {
        self.placements.values().filter(|p| &p.table == table).count()
    }

    /// Guests at `table` in seat order; equal seats fall back to guest id order.
    pub fn guests_at(&self, table: &TableId) -> Vec<&GuestId> {
        let mut at: Vec<(&u32, &GuestId)> = self
            .placements
            .iter()
            .filter(|(_, p)| &p.table == table)
            .map(|(g, p)| (&p.seat, g))
            .collect();
        at.sort();
        at.into_iter().map(|(_, g)| g).collect()
    }

    /// Returns true when both guests are seated at the same table.
    pub fn seated_together(&self, a: &GuestId, b: &GuestId) -> bool {
        match (self.table_of(a), self.table_of(b)) {
            (Some(ta), Some(tb)) => ta == tb,
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a GuestId, &'a SeatPlacement);
    type IntoIter = btree_map::Iter<'a, GuestId, SeatPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

impl FromIterator<(GuestId, SeatPlacement)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (GuestId, SeatPlacement)>>(iter: I) -> Self {
        Assignment {
            placements: iter.into_iter().collect(),
        }
    }
}
