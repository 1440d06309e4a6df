//! Shared test fixtures for seatplan crates.
//!
//! This crate provides snapshot builders for testing. It depends on
//! `seatplan-core` and the seeded `rand_chacha` generator only, so every
//! other crate can use it as a dev-dependency.
//!
//! - [`scenarios`] - small hand-written seating problems with known answers
//! - [`wedding`] - a deterministic generator for realistic guest lists
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! seatplan-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use seatplan_test::scenarios::couples_and_feud;
//! use seatplan_test::wedding::WeddingBuilder;
//! ```

pub mod scenarios;
pub mod wedding;

use seatplan_core::{Guest, Table};

/// Guests named after their ids.
pub fn guests(ids: &[&str]) -> Vec<Guest> {
    ids.iter().map(|id| Guest::new(*id, *id)).collect()
}

/// Tables from `(id, capacity)` pairs.
pub fn tables(specs: &[(&str, u32)]) -> Vec<Table> {
    specs
        .iter()
        .map(|(id, capacity)| Table::new(*id, *capacity))
        .collect()
}

pub use scenarios::{
    contradiction_chain, couples_and_feud, oversized_family, overbooked, soft_only,
    tight_families,
};
pub use wedding::WeddingBuilder;
