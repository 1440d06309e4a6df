//! Constraint model: the normalized graph one optimization run works on.
//!
//! Building the model validates the snapshot, assigns dense indices to
//! guests and tables, and union-finds `must_together` edges into blocks.
//! `must_apart` pairs are then re-keyed by block, because an apart constraint
//! applies to every member of both blocks. A `must_apart` pair whose guests
//! land in the same block is an intra-block contradiction: it is recorded,
//! not rejected, and the run still produces a best-effort plan.
//!
//! Block numbering follows the position of each block's first member in the
//! guest list, so identical input always yields identical blocks no matter
//! how the preferences are ordered.

mod union_find;

use std::collections::{BTreeMap, HashMap};

use seatplan_core::{
    Assignment, Guest, GuestId, PreferenceKind, SeatingPreference, Snapshot, Table, TableId,
    ValidationError,
};
use tracing::warn;

use union_find::UnionFind;

/// Guests transitively linked by `must_together`; the unit the builder moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    members: Vec<usize>,
}

impl Block {
    /// Guest indices, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True for blocks of one guest.
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Two blocks that must never share a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApartEdge {
    /// Block indices, `blocks.0 < blocks.1`.
    pub blocks: (usize, usize),
    /// First preference (by input position) that produced this edge.
    pub source: usize,
}

/// A `must_apart` pair inside a single `must_together` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction {
    pub first: usize,
    pub second: usize,
    pub block: usize,
    pub source: usize,
}

/// A soft preference resolved to guest indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftPreference {
    pub first: usize,
    pub second: usize,
    pub kind: PreferenceKind,
    pub weight: u32,
    pub source: usize,
}

impl SoftPreference {
    /// Reward earned given whether the pair shares a table.
    #[inline]
    pub fn reward(&self, same_table: bool) -> u64 {
        if same_table == self.kind.wants_together() {
            u64::from(self.weight)
        } else {
            0
        }
    }
}

/// One end of a soft preference, stored per guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftEdge {
    pub other: usize,
    pub kind: PreferenceKind,
    pub weight: u32,
    /// Index into [`ConstraintModel::soft_preferences`].
    pub preference: usize,
}

impl SoftEdge {
    #[inline]
    pub fn reward(&self, same_table: bool) -> i64 {
        if same_table == self.kind.wants_together() {
            i64::from(self.weight)
        } else {
            0
        }
    }
}

/// Validated, indexed view of one seating snapshot.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    guests: Vec<Guest>,
    tables: Vec<Table>,
    preferences: Vec<SeatingPreference>,
    guest_index: HashMap<GuestId, usize>,
    table_index: HashMap<TableId, usize>,
    blocks: Vec<Block>,
    block_of: Vec<usize>,
    apart_edges: Vec<ApartEdge>,
    apart_of: Vec<Vec<usize>>,
    contradictions: Vec<Contradiction>,
    soft_preferences: Vec<SoftPreference>,
    soft_edges: Vec<Vec<SoftEdge>>,
}

impl ConstraintModel {
    /// Validates the input and builds the model.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, scanning guests, then tables, then
    /// preferences in input order.
    pub fn build(
        guests: Vec<Guest>,
        tables: Vec<Table>,
        preferences: Vec<SeatingPreference>,
    ) -> Result<Self, ValidationError> {
        let mut guest_index = HashMap::with_capacity(guests.len());
        for (i, guest) in guests.iter().enumerate() {
            if guest_index.insert(guest.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateGuest(guest.id.clone()));
            }
        }

        let mut table_index = HashMap::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            if table.capacity == 0 {
                return Err(ValidationError::NonPositiveCapacity {
                    table: table.id.clone(),
                    capacity: 0,
                });
            }
            if table_index.insert(table.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateTable(table.id.clone()));
            }
        }
        if tables.is_empty() && !guests.is_empty() {
            return Err(ValidationError::NoTables {
                guests: guests.len(),
            });
        }

        let resolved = resolve_preferences(&preferences, &guest_index)?;

        let mut uf = UnionFind::new(guests.len());
        for &(a, b, kind, _) in &resolved {
            if kind == PreferenceKind::MustTogether {
                uf.union(a, b);
            }
        }

        let mut root_block: Vec<Option<usize>> = vec![None; guests.len()];
        let mut block_of = vec![0; guests.len()];
        let mut blocks: Vec<Block> = Vec::new();
        for g in 0..guests.len() {
            let root = uf.find(g);
            let b = match root_block[root] {
                Some(b) => b,
                None => {
                    blocks.push(Block {
                        members: Vec::new(),
                    });
                    root_block[root] = Some(blocks.len() - 1);
                    blocks.len() - 1
                }
            };
            blocks[b].members.push(g);
            block_of[g] = b;
        }

        let mut apart_pairs: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        let mut contradictions = Vec::new();
        let mut soft_preferences = Vec::new();
        let mut soft_edges = vec![Vec::new(); guests.len()];
        for (source, &(a, b, kind, weight)) in resolved.iter().enumerate() {
            match kind {
                PreferenceKind::MustTogether => {}
                PreferenceKind::MustApart => {
                    let (x, y) = (block_of[a], block_of[b]);
                    if x == y {
                        warn!(
                            event = "intra_block_contradiction",
                            first = %guests[a].id,
                            second = %guests[b].id,
                            preference = source,
                        );
                        contradictions.push(Contradiction {
                            first: a,
                            second: b,
                            block: x,
                            source,
                        });
                    } else {
                        apart_pairs.entry((x.min(y), x.max(y))).or_insert(source);
                    }
                }
                PreferenceKind::PreferTogether | PreferenceKind::PreferApart => {
                    let preference = soft_preferences.len();
                    soft_preferences.push(SoftPreference {
                        first: a,
                        second: b,
                        kind,
                        weight,
                        source,
                    });
                    soft_edges[a].push(SoftEdge {
                        other: b,
                        kind,
                        weight,
                        preference,
                    });
                    soft_edges[b].push(SoftEdge {
                        other: a,
                        kind,
                        weight,
                        preference,
                    });
                }
            }
        }

        let mut apart_of = vec![Vec::new(); blocks.len()];
        let apart_edges: Vec<ApartEdge> = apart_pairs
            .into_iter()
            .map(|(blocks, source)| {
                apart_of[blocks.0].push(blocks.1);
                apart_of[blocks.1].push(blocks.0);
                ApartEdge { blocks, source }
            })
            .collect();
        for list in &mut apart_of {
            list.sort_unstable();
        }

        Ok(Self {
            guests,
            tables,
            preferences,
            guest_index,
            table_index,
            blocks,
            block_of,
            apart_edges,
            apart_of,
            contradictions,
            soft_preferences,
            soft_edges,
        })
    }

    /// Builds the model from a typed snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, ValidationError> {
        Self::build(snapshot.guests, snapshot.tables, snapshot.preferences)
    }

    /// Checks that a warm-start assignment only names known guests and tables.
    pub fn validate_assignment(&self, assignment: &Assignment) -> Result<(), ValidationError> {
        for (guest, placement) in assignment {
            if !self.guest_index.contains_key(guest) {
                return Err(ValidationError::UnknownAssignedGuest(guest.clone()));
            }
            if !self.table_index.contains_key(&placement.table) {
                return Err(ValidationError::UnknownTable(placement.table.clone()));
            }
        }
        Ok(())
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn guest(&self, index: usize) -> &Guest {
        &self.guests[index]
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, index: usize) -> &Table {
        &self.tables[index]
    }

    /// The preferences as supplied, for naming sources in reports.
    pub fn preferences(&self) -> &[SeatingPreference] {
        &self.preferences
    }

    pub fn guest_index(&self, id: &GuestId) -> Option<usize> {
        self.guest_index.get(id).copied()
    }

    pub fn table_index(&self, id: &TableId) -> Option<usize> {
        self.table_index.get(id).copied()
    }

    #[inline]
    pub fn capacity(&self, table: usize) -> u32 {
        self.tables[table].capacity
    }

    pub fn max_capacity(&self) -> u32 {
        self.tables.iter().map(|t| t.capacity).max().unwrap_or(0)
    }

    pub fn total_capacity(&self) -> u64 {
        self.tables.iter().map(|t| u64::from(t.capacity)).sum()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    #[inline]
    pub fn block_of(&self, guest: usize) -> usize {
        self.block_of[guest]
    }

    /// Blocks that must not share a table with `block`, ascending.
    #[inline]
    pub fn apart_blocks(&self, block: usize) -> &[usize] {
        &self.apart_of[block]
    }

    /// Returns true if the two blocks are constrained apart.
    pub fn is_apart(&self, a: usize, b: usize) -> bool {
        self.apart_of[a].binary_search(&b).is_ok()
    }

    pub fn apart_edges(&self) -> &[ApartEdge] {
        &self.apart_edges
    }

    pub fn contradictions(&self) -> &[Contradiction] {
        &self.contradictions
    }

    pub fn soft_preferences(&self) -> &[SoftPreference] {
        &self.soft_preferences
    }

    #[inline]
    pub fn soft_edges(&self, guest: usize) -> &[SoftEdge] {
        &self.soft_edges[guest]
    }

    /// Upper bound on the soft score: every soft preference satisfied.
    pub fn soft_ceiling(&self) -> u64 {
        self.soft_preferences
            .iter()
            .map(|p| u64::from(p.weight))
            .sum()
    }
}

/// Resolves preference guest ids to indices and rejects malformed entries.
///
/// Returns `(first, second, kind, weight)` per preference, in input order.
fn resolve_preferences(
    preferences: &[SeatingPreference],
    guest_index: &HashMap<GuestId, usize>,
) -> Result<Vec<(usize, usize, PreferenceKind, u32)>, ValidationError> {
    // unordered guest pair -> (first must_together, first must_apart)
    let mut hard_pairs: HashMap<(usize, usize), (Option<usize>, Option<usize>)> = HashMap::new();
    let mut resolved = Vec::with_capacity(preferences.len());

    for (index, pref) in preferences.iter().enumerate() {
        let lookup = |id: &GuestId| {
            guest_index
                .get(id)
                .copied()
                .ok_or_else(|| ValidationError::UnknownGuest {
                    index,
                    guest: id.clone(),
                })
        };
        let a = lookup(&pref.first)?;
        let b = lookup(&pref.second)?;
        if a == b {
            return Err(ValidationError::SelfPreference {
                index,
                guest: pref.first.clone(),
            });
        }
        if !pref.kind.is_hard() && pref.weight == 0 {
            return Err(ValidationError::NonPositiveWeight { index, weight: 0 });
        }

        if pref.kind.is_hard() {
            let entry = hard_pairs.entry((a.min(b), a.max(b))).or_default();
            match pref.kind {
                PreferenceKind::MustTogether => {
                    if let Some(apart) = entry.1 {
                        return Err(ValidationError::ContradictoryPreference {
                            first: pref.first.clone(),
                            second: pref.second.clone(),
                            together: index,
                            apart,
                        });
                    }
                    entry.0.get_or_insert(index);
                }
                _ => {
                    if let Some(together) = entry.0 {
                        return Err(ValidationError::ContradictoryPreference {
                            first: pref.first.clone(),
                            second: pref.second.clone(),
                            together,
                            apart: index,
                        });
                    }
                    entry.1.get_or_insert(index);
                }
            }
        }

        resolved.push((a, b, pref.kind, pref.weight));
    }

    Ok(resolved)
}
