//! Compiled grids
//!
//! Compiling a grid definition turns the declarative alphabet into an
//! immutable symbol palette tied to the grid's dimensions. The palette is
//! shared read-only by the rewrite engine and by frame projections.

use gridloom_model::GridDefinition;

use crate::error::PaletteError;
use crate::symbols::{Symbol, SymbolTable};

/// A grid ready for execution: dimensions plus the compiled palette.
#[derive(Debug, Clone)]
pub struct CompiledGrid<S: Symbol> {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub palette: SymbolTable<S>,
}

impl<S: Symbol> CompiledGrid<S> {
    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }
}

/// Compile a grid definition into an executable grid.
///
/// Builds the palette from the declarative alphabet, then registers the
/// wildcard, the unions and the transparency set in that order.
pub fn compile_grid<S: Symbol>(
    definition: &GridDefinition<S>,
) -> Result<CompiledGrid<S>, PaletteError> {
    let mut palette = SymbolTable::new(definition.symbols.iter().cloned())?;

    if let Some(wildcard) = &definition.wildcard {
        palette.define_wildcard(wildcard.clone())?;
    }

    for (symbol, members) in &definition.unions {
        palette.define_union(symbol.clone(), members)?;
    }

    if !definition.transparent.is_empty() {
        palette.define_transparent(&definition.transparent)?;
    }

    Ok(CompiledGrid {
        width: definition.width,
        height: definition.height,
        depth: definition.depth,
        palette,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_charset_with_wildcard_and_unions() {
        let definition = GridDefinition::with_charset(8, 8, 1, "BWR")
            .unwrap()
            .with_union('X', vec!['B', 'R'])
            .with_transparent(vec!['W']);

        let grid = compile_grid(&definition).unwrap();
        assert_eq!(grid.cell_count(), 64);
        assert_eq!(grid.palette.cardinality(), 3);
        assert_eq!(grid.palette.mask_of(&'*').unwrap(), 0b111);
        assert_eq!(grid.palette.mask_of(&'X').unwrap(), 0b101);
        assert_eq!(grid.palette.transparent_mask(), 0b010);
    }

    #[test]
    fn union_colliding_with_alphabet_fails_compilation() {
        let definition = GridDefinition::with_charset(4, 4, 1, "BW")
            .unwrap()
            .with_union('B', vec!['W']);

        assert_eq!(
            compile_grid(&definition).unwrap_err(),
            PaletteError::SymbolAlreadyDefined("B".to_string())
        );
    }
}
