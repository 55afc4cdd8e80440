//! Model definitions
//!
//! A model pairs a grid definition with its execution policy. The rewrite
//! program itself is owned by whichever interpreter factory compiles the
//! model; this layer only carries the fields the execution layer needs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::execution::ExecutionSettings;
use crate::grid::GridDefinition;

/// A fully described model ready to be compiled and executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition<S: Eq + Hash> {
    pub name: String,
    pub grid: GridDefinition<S>,
    pub execution: ExecutionSettings,
    /// Optional symmetry group tag forwarded to the interpreter factory.
    pub symmetry: Option<String>,
    /// Whether generation starts from a seeded origin cell.
    pub origin: bool,
    /// Optional symbol-to-ARGB overrides, consumed only by sinks.
    pub palette_overrides: Option<IndexMap<S, u32>>,
}

impl<S: Eq + Hash> ModelDefinition<S> {
    pub fn new(name: impl Into<String>, grid: GridDefinition<S>, execution: ExecutionSettings) -> Self {
        Self {
            name: name.into(),
            grid,
            execution,
            symmetry: None,
            origin: false,
            palette_overrides: None,
        }
    }

    pub fn with_symmetry(mut self, symmetry: impl Into<String>) -> Self {
        self.symmetry = Some(symmetry.into());
        self
    }

    pub fn with_origin(mut self, origin: bool) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_palette_overrides(mut self, overrides: IndexMap<S, u32>) -> Self {
        self.palette_overrides = Some(overrides);
        self
    }
}
