use serde::{Deserialize, Serialize};

use super::TableId;

/// A table with a hard upper bound on seated guests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub capacity: u32,
    /// Shape and position on the floor plan. Only the UI cares.
    pub shape: Option<TableShape>,
}

impl Table {
    pub fn new(id: impl Into<TableId>, capacity: u32) -> Self {
        Table {
            id: id.into(),
            capacity,
            shape: None,
        }
    }

    pub fn with_shape(mut self, shape: TableShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Floor-plan geometry of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableShape {
    Round { x: f64, y: f64 },
    Rectangle { x: f64, y: f64 },
    Square { x: f64, y: f64 },
    /// A shape the engine does not know; kept verbatim for the UI.
    Other { name: String, x: f64, y: f64 },
}
