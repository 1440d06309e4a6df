//! Conflict reporter.
//!
//! A read-over of a finished plan that lists every hard violation and every
//! unmet soft preference of notable weight, naming the guests and tables
//! involved so the UI can point at them.
//!
//! Order is stable: hard conflicts first (capacity, must_apart, splits,
//! contradictions), then soft conflicts by descending weight. Hard weights
//! add up to the plan's hard violation count.

use std::fmt;

use seatplan_core::{Assignment, GuestId, TableId};
use seatplan_scoring::ConstraintModel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// More guests than seats at a table.
    OverCapacity,
    /// Blocks that must sit apart share a table.
    MustApartViolated,
    /// A must_together block is spread over several tables.
    BlockSplit,
    /// must_apart between guests that must_together chains bind.
    IntraBlockContradiction,
    /// A soft preference at or above the notable weight is not met.
    SoftPreferenceUnmet,
}

impl ConflictKind {
    pub fn severity(self) -> Severity {
        match self {
            ConflictKind::SoftPreferenceUnmet => Severity::Soft,
            _ => Severity::Hard,
        }
    }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    pub guests: Vec<GuestId>,
    pub tables: Vec<TableId>,
    /// Hard violations it accounts for, or the soft preference's weight.
    pub weight: u64,
    /// Index of the preference behind it, when there is one.
    pub preference: Option<usize>,
}

impl Conflict {
    fn new(kind: ConflictKind, guests: Vec<GuestId>, tables: Vec<TableId>, weight: u64) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            guests,
            tables,
            weight,
            preference: None,
        }
    }

    fn with_preference(mut self, index: usize) -> Self {
        self.preference = Some(index);
        self
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guests = join(&self.guests);
        let tables = join(&self.tables);
        match self.kind {
            ConflictKind::OverCapacity => {
                write!(f, "table {tables} is over capacity by {}", self.weight)
            }
            ConflictKind::MustApartViolated => {
                write!(f, "{guests} must sit apart but share table {tables}")
            }
            ConflictKind::BlockSplit => write!(
                f,
                "{guests} sit away from their group ({} separated, tables {tables})",
                self.weight
            ),
            ConflictKind::IntraBlockContradiction => write!(
                f,
                "{guests} must sit apart yet are linked by must_together preferences"
            ),
            ConflictKind::SoftPreferenceUnmet => {
                write!(f, "preference between {guests} (weight {}) is unmet", self.weight)
            }
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered list of violated constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Conflict> {
        self.conflicts.iter()
    }

    pub fn hard(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts
            .iter()
            .filter(|c| c.severity == Severity::Hard)
    }

    pub fn soft(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts
            .iter()
            .filter(|c| c.severity == Severity::Soft)
    }

    /// Sum of hard conflict weights; equals the plan's hard violation count.
    pub fn hard_total(&self) -> u64 {
        self.hard().map(|c| c.weight).sum()
    }

    /// Returns true when no hard conflict is listed.
    pub fn is_feasible(&self) -> bool {
        self.hard().next().is_none()
    }
}

impl<'a> IntoIterator for &'a ConflictReport {
    type Item = &'a Conflict;
    type IntoIter = std::slice::Iter<'a, Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.iter()
    }
}

/// Derives conflict reports from finished plans.
#[derive(Debug, Clone)]
pub struct ConflictReporter {
    notable_weight: u32,
}

impl ConflictReporter {
    /// Soft preferences below `notable_weight` are left out of reports.
    pub fn new(notable_weight: u32) -> Self {
        Self { notable_weight }
    }

    pub fn notable_weight(&self) -> u32 {
        self.notable_weight
    }

    /// Lists every violation in `assignment`.
    ///
    /// Entries naming unknown guests or tables are ignored.
    pub fn report(&self, model: &ConstraintModel, assignment: &Assignment) -> ConflictReport {
        let view = PlanView::new(model, assignment);
        let mut conflicts = Vec::new();

        for t in 0..model.table_count() {
            let seated = &view.seats[t];
            let capacity = model.capacity(t) as usize;
            if seated.len() > capacity {
                conflicts.push(Conflict::new(
                    ConflictKind::OverCapacity,
                    view.guest_ids(seated),
                    vec![model.table(t).id.clone()],
                    (seated.len() - capacity) as u64,
                ));
            }
        }

        for edge in model.apart_edges() {
            let (x, y) = edge.blocks;
            for t in 0..model.table_count() {
                let at_x = view.members_at(x, t);
                let at_y = view.members_at(y, t);
                if at_x.is_empty() || at_y.is_empty() {
                    continue;
                }
                let mut guests = at_x;
                guests.extend(at_y);
                conflicts.push(
                    Conflict::new(
                        ConflictKind::MustApartViolated,
                        view.guest_ids(&guests),
                        vec![model.table(t).id.clone()],
                        1,
                    )
                    .with_preference(edge.source),
                );
            }
        }

        for block in model.blocks() {
            let mut counts = vec![0u64; model.table_count()];
            for &g in block.members() {
                if let Some(t) = view.table_of[g] {
                    counts[t] += 1;
                }
            }
            let used: Vec<usize> = (0..counts.len()).filter(|&t| counts[t] > 0).collect();
            if used.len() < 2 {
                continue;
            }
            // earliest table wins ties
            let majority = used
                .iter()
                .copied()
                .max_by(|&a, &c| counts[a].cmp(&counts[c]).then(c.cmp(&a)))
                .unwrap_or(used[0]);
            let separated: Vec<usize> = block
                .members()
                .iter()
                .copied()
                .filter(|&g| view.table_of[g].is_some_and(|t| t != majority))
                .collect();
            let mut tables = vec![majority];
            tables.extend(used.iter().copied().filter(|&t| t != majority));
            conflicts.push(Conflict::new(
                ConflictKind::BlockSplit,
                view.guest_ids(&separated),
                view.table_ids(&tables),
                separated.len() as u64,
            ));
        }

        for c in model.contradictions() {
            conflicts.push(
                Conflict::new(
                    ConflictKind::IntraBlockContradiction,
                    view.guest_ids(&[c.first, c.second]),
                    view.tables_of(&[c.first, c.second]),
                    1,
                )
                .with_preference(c.source),
            );
        }

        let mut soft: Vec<Conflict> = model
            .soft_preferences()
            .iter()
            .filter(|p| p.weight >= self.notable_weight)
            .filter(|p| {
                let met = match (view.table_of[p.first], view.table_of[p.second]) {
                    (Some(a), Some(b)) => p.reward(a == b) > 0,
                    _ => false,
                };
                !met
            })
            .map(|p| {
                Conflict::new(
                    ConflictKind::SoftPreferenceUnmet,
                    view.guest_ids(&[p.first, p.second]),
                    view.tables_of(&[p.first, p.second]),
                    u64::from(p.weight),
                )
                .with_preference(p.source)
            })
            .collect();
        // stable: equal weights keep preference order
        soft.sort_by(|a, b| b.weight.cmp(&a.weight));
        conflicts.extend(soft);

        ConflictReport { conflicts }
    }
}

impl Default for ConflictReporter {
    fn default() -> Self {
        Self::new(seatplan_config::ReportConfig::default().notable_weight)
    }
}

/// Index-based view of an assignment.
struct PlanView<'m> {
    model: &'m ConstraintModel,
    table_of: Vec<Option<usize>>,
    /// Guests per table in seat order.
    seats: Vec<Vec<usize>>,
}

impl<'m> PlanView<'m> {
    fn new(model: &'m ConstraintModel, assignment: &Assignment) -> Self {
        let mut table_of = vec![None; model.guest_count()];
        let mut rows: Vec<(usize, u32, usize)> = Vec::with_capacity(assignment.len());
        for (guest, placement) in assignment {
            if let (Some(g), Some(t)) = (
                model.guest_index(guest),
                model.table_index(&placement.table),
            ) {
                table_of[g] = Some(t);
                rows.push((t, placement.seat, g));
            }
        }
        rows.sort_by_key(|&(t, seat, _)| (t, seat));
        let mut seats = vec![Vec::new(); model.table_count()];
        for (t, _, g) in rows {
            seats[t].push(g);
        }
        Self {
            model,
            table_of,
            seats,
        }
    }

    /// Members of `block` at `table`, in seat order.
    fn members_at(&self, block: usize, table: usize) -> Vec<usize> {
        self.seats[table]
            .iter()
            .copied()
            .filter(|&g| self.model.block_of(g) == block)
            .collect()
    }

    fn guest_ids(&self, guests: &[usize]) -> Vec<GuestId> {
        guests
            .iter()
            .map(|&g| self.model.guest(g).id.clone())
            .collect()
    }

    fn table_ids(&self, tables: &[usize]) -> Vec<TableId> {
        tables
            .iter()
            .map(|&t| self.model.table(t).id.clone())
            .collect()
    }

    /// Distinct tables of the given guests, in first-seen order.
    fn tables_of(&self, guests: &[usize]) -> Vec<TableId> {
        let mut tables: Vec<usize> = Vec::new();
        for &g in guests {
            if let Some(t) = self.table_of[g] {
                if !tables.contains(&t) {
                    tables.push(t);
                }
            }
        }
        self.table_ids(&tables)
    }
}

/// Reports conflicts with the default notable weight.
pub fn report(model: &ConstraintModel, assignment: &Assignment) -> ConflictReport {
    ConflictReporter::default().report(model, assignment)
}

#[cfg(test)]
mod tests;
