//! Plan exporter.
//!
//! Flattens an assignment into the per-guest records the storage layer
//! upserts. Replacing the previous records of a layout is the store's job.

use seatplan_core::{Assignment, GuestId, TableId};
use serde::{Deserialize, Serialize};

/// One guest's seat, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignmentRecord {
    pub guest_id: GuestId,
    pub table_id: TableId,
    /// 1-based position at the table.
    pub seat_number: u32,
}

/// Exports one record per seated guest.
///
/// Records are ordered by table id, then seat. Seat numbers run from 1 at
/// each table in the assignment's seat order (ties by guest id), so exporting
/// an unchanged assignment always yields the same records.
///
/// # Example
///
/// ```
/// use seatplan_core::Assignment;
/// use seatplan_solver::export::export;
///
/// let mut plan = Assignment::new();
/// plan.place("bob", "t1", 7);
/// plan.place("ann", "t1", 2);
///
/// let records = export(&plan);
/// assert_eq!(records[0].guest_id.as_str(), "ann");
/// assert_eq!(records[0].seat_number, 1);
/// assert_eq!(records[1].seat_number, 2);
/// ```
pub fn export(assignment: &Assignment) -> Vec<SeatAssignmentRecord> {
    let mut rows: Vec<(&TableId, u32, &GuestId)> = assignment
        .iter()
        .map(|(guest, placement)| (&placement.table, placement.seat, guest))
        .collect();
    rows.sort();

    let mut records = Vec::with_capacity(rows.len());
    let mut current: Option<&TableId> = None;
    let mut next_seat = 1;
    for (table, _, guest) in rows {
        if current != Some(table) {
            current = Some(table);
            next_seat = 1;
        }
        records.push(SeatAssignmentRecord {
            guest_id: guest.clone(),
            table_id: table.clone(),
            seat_number: next_seat,
        });
        next_seat += 1;
    }
    records
}

/// Rebuilds an assignment from exported records.
///
/// Seats become 0-based again; a guest listed twice keeps its last record.
pub fn import(records: &[SeatAssignmentRecord]) -> Assignment {
    let mut plan = Assignment::new();
    for record in records {
        plan.place(
            record.guest_id.clone(),
            record.table_id.clone(),
            record.seat_number.saturating_sub(1),
        );
    }
    plan
}
