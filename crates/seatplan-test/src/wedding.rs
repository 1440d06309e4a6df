//! Deterministic generator for realistic wedding guest lists.
//!
//! Guests come in households (couples, families, singles). Every household is
//! a must_together group. A few households feud (must_apart), friends on the
//! same side prefer to sit together, and exes prefer to sit apart.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seatplan_core::{Guest, SeatingPreference, Snapshot, Table};

/// Builder for a generated wedding snapshot.
///
/// # Example
///
/// ```
/// use seatplan_test::WeddingBuilder;
///
/// let snapshot = WeddingBuilder::new(40).table_capacity(8).seed(3).build();
/// assert!(snapshot.total_capacity() >= snapshot.guests.len() as u64);
/// ```
#[derive(Debug, Clone)]
pub struct WeddingBuilder {
    households: usize,
    table_capacity: u32,
    spare_tables: usize,
    feuds: usize,
    seed: u64,
}

impl WeddingBuilder {
    pub fn new(households: usize) -> Self {
        Self {
            households,
            table_capacity: 10,
            spare_tables: 1,
            feuds: households / 10,
            seed: 1,
        }
    }

    pub fn table_capacity(mut self, capacity: u32) -> Self {
        self.table_capacity = capacity.max(4);
        self
    }

    pub fn spare_tables(mut self, spare: usize) -> Self {
        self.spare_tables = spare;
        self
    }

    pub fn feuds(mut self, feuds: usize) -> Self {
        self.feuds = feuds;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(&self) -> Snapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut guests = Vec::new();
        let mut preferences = Vec::new();
        let mut heads = Vec::new();

        for h in 0..self.households {
            let size = match rng.random_range(0..10) {
                0..=2 => 1,
                3..=7 => 2,
                8 => 3,
                _ => 4,
            };
            let side = if h % 2 == 0 { "Bride" } else { "Groom" };
            let first = guests.len();
            for m in 0..size {
                let id = format!("h{h}-m{m}");
                guests.push(
                    Guest::new(id.clone(), format!("Guest {h}.{m}"))
                        .with_household(format!("{side} household {h}"))
                        .with_plus_one(m == 1 && size == 2),
                );
                if m > 0 {
                    preferences.push(SeatingPreference::must_together(
                        guests[first].id.clone(),
                        id,
                    ));
                }
            }
            heads.push(first);
        }

        // friends on the same side
        for h in 2..self.households {
            if rng.random_range(0..3) == 0 {
                let a = guests[heads[h]].id.clone();
                let b = guests[heads[h - 2]].id.clone();
                preferences.push(SeatingPreference::prefer_together(a, b, rng.random_range(1..=5)));
            }
        }

        // exes
        for h in 1..self.households {
            if rng.random_range(0..8) == 0 {
                let a = guests[heads[h]].id.clone();
                let b = guests[heads[rng.random_range(0..h)]].id.clone();
                preferences.push(SeatingPreference::prefer_apart(a, b, rng.random_range(1..=3)));
            }
        }

        // feuds between distinct households
        if self.households >= 2 {
            for _ in 0..self.feuds {
                let x = rng.random_range(0..self.households);
                let mut y = rng.random_range(0..self.households);
                if x == y {
                    y = (y + 1) % self.households;
                }
                preferences.push(SeatingPreference::must_apart(
                    guests[heads[x]].id.clone(),
                    guests[heads[y]].id.clone(),
                ));
            }
        }

        let capacity = self.table_capacity as usize;
        let table_count = guests.len().div_ceil(capacity) + self.spare_tables;
        let tables = (0..table_count)
            .map(|t| Table::new(format!("table-{t:02}"), self.table_capacity))
            .collect();

        Snapshot::new(guests, tables, preferences)
    }
}

#[cfg(test)]
mod tests {
    use seatplan_core::PreferenceKind;

    use super::*;

    #[test]
    fn test_same_seed_same_wedding() {
        let a = WeddingBuilder::new(25).feuds(4).seed(17).build();
        let b = WeddingBuilder::new(25).feuds(4).seed(17).build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        for seed in 0..20 {
            let snapshot = WeddingBuilder::new(30).feuds(5).seed(seed).build();
            for h in 0..30 {
                let prefix = format!("h{h}-");
                let size = snapshot
                    .guests
                    .iter()
                    .filter(|g| g.id.as_str().starts_with(&prefix))
                    .count();
                assert!((1..=4).contains(&size), "household {h} has {size} guests");
            }
            for p in &snapshot.preferences {
                match p.kind {
                    PreferenceKind::PreferTogether => assert!((1..=5).contains(&p.weight)),
                    PreferenceKind::PreferApart => assert!((1..=3).contains(&p.weight)),
                    PreferenceKind::MustApart => assert_ne!(p.first, p.second),
                    PreferenceKind::MustTogether => {}
                }
            }
            assert!(snapshot.total_capacity() >= snapshot.guests.len() as u64);
        }
    }
}
