//! Grid definitions
//!
//! Describes the logical dimensions and alphabet used by a grid before it is
//! compiled into runtime data structures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::error::ModelError;

/// Declarative description of a grid: dimensions plus the symbol alphabet.
///
/// The alphabet order is significant; it becomes the palette index order once
/// the grid is compiled. Unions and the transparency set reference alphabet
/// members by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDefinition<S: Eq + Hash> {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// Ordered alphabet; duplicates are rejected at compile time.
    pub symbols: Vec<S>,
    /// Named union symbols and their members.
    pub unions: IndexMap<S, Vec<S>>,
    /// Symbols treated as transparent by renderers.
    pub transparent: Vec<S>,
    /// Optional symbol reserved for the all-symbols wildcard wave.
    pub wildcard: Option<S>,
}

impl<S: Eq + Hash> GridDefinition<S> {
    /// Create a grid definition with the given dimensions and alphabet.
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        symbols: Vec<S>,
    ) -> Result<Self, ModelError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(ModelError::InvalidDimensions {
                width,
                height,
                depth,
            });
        }

        Ok(Self {
            width,
            height,
            depth,
            symbols,
            unions: IndexMap::new(),
            transparent: Vec::new(),
            wildcard: None,
        })
    }

    /// Attach a union symbol definition.
    pub fn with_union(mut self, symbol: S, members: Vec<S>) -> Self {
        self.unions.insert(symbol, members);
        self
    }

    /// Replace the transparency set.
    pub fn with_transparent(mut self, symbols: Vec<S>) -> Self {
        self.transparent = symbols;
        self
    }

    /// Reserve a wildcard symbol.
    pub fn with_wildcard(mut self, symbol: S) -> Self {
        self.wildcard = Some(symbol);
        self
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }
}

impl GridDefinition<char> {
    /// Character-alphabet convenience mirroring the legacy text workflow:
    /// the alphabet is given as a string and `'*'` is reserved as wildcard.
    pub fn with_charset(
        width: usize,
        height: usize,
        depth: usize,
        charset: &str,
    ) -> Result<Self, ModelError> {
        Ok(Self::new(width, height, depth, charset.chars().collect())?.with_wildcard('*'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimension() {
        let result = GridDefinition::new(0, 4, 1, vec!['A']);
        assert_eq!(
            result.unwrap_err(),
            ModelError::InvalidDimensions {
                width: 0,
                height: 4,
                depth: 1
            }
        );
    }

    #[test]
    fn charset_reserves_wildcard() {
        let grid = GridDefinition::with_charset(5, 3, 1, "BW").unwrap();
        assert_eq!(grid.symbols, vec!['B', 'W']);
        assert_eq!(grid.wildcard, Some('*'));
        assert_eq!(grid.cell_count(), 15);
    }
}
