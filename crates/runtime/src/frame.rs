//! Generation frames
//!
//! A frame is an immutable snapshot of the grid at one execution step: the
//! raw per-cell palette indices, the legend mapping indices back to symbols,
//! and the cells changed since the previous frame. Frames own their buffers;
//! nothing in a frame aliases engine-mutable state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// A single cell modification performed during a generation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl CellChange {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Snapshot of the grid state produced during execution.
///
/// `state` is row-major with x varying fastest: `index = x + y*width +
/// z*width*height`. `changes` describes the transition into this frame,
/// relative to the immediately preceding frame of the same session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame<S> {
    state: Vec<u8>,
    legend: Vec<S>,
    width: usize,
    height: usize,
    depth: usize,
    step: usize,
    is_final: bool,
    changes: Vec<CellChange>,
}

impl<S> Frame<S> {
    /// Assemble a frame from owned buffers.
    ///
    /// Sessions are the normal producer of frames; this constructor is the
    /// integration surface for engine adapters and tests. `state` must hold
    /// exactly `width * height * depth` cells.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: Vec<u8>,
        legend: Vec<S>,
        width: usize,
        height: usize,
        depth: usize,
        step: usize,
        is_final: bool,
        changes: Vec<CellChange>,
    ) -> Self {
        debug_assert_eq!(state.len(), width * height * depth);
        Self {
            state,
            legend,
            width,
            height,
            depth,
            step,
            is_final,
            changes,
        }
    }

    /// Raw palette indices, one per cell.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Legend mapping palette indices back to symbols, as observed at
    /// capture time.
    pub fn legend(&self) -> &[S] {
        &self.legend
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 0-based sequence number within the run.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Whether this is the last frame the session will emit.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Cells mutated since the previous frame.
    pub fn changes(&self) -> &[CellChange] {
        &self.changes
    }

    /// Flat buffer index of a cell.
    pub fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.width + z * self.width * self.height
    }

    /// Symbol occupying a cell.
    pub fn symbol_at(&self, x: usize, y: usize, z: usize) -> &S {
        &self.legend[self.state[self.cell_index(x, y, z)] as usize]
    }

    /// Apply `transform` to every legend entry, producing a frame over a new
    /// symbol domain. State and changes are copied.
    pub fn project_legend<T>(&self, transform: impl Fn(&S) -> T) -> Frame<T> {
        Frame {
            state: self.state.clone(),
            legend: self.legend.iter().map(transform).collect(),
            width: self.width,
            height: self.height,
            depth: self.depth,
            step: self.step,
            is_final: self.is_final,
            changes: self.changes.clone(),
        }
    }
}

impl<S: Clone> Frame<S> {
    /// Resolve every cell through the legend into a flat symbol buffer.
    pub fn to_flat(&self) -> Vec<S> {
        self.state
            .iter()
            .map(|&index| self.legend[index as usize].clone())
            .collect()
    }

    /// Resolve the frame into rows of symbols. Requires depth == 1.
    pub fn to_grid_2d(&self) -> Result<Vec<Vec<S>>, FrameError> {
        if self.depth != 1 {
            return Err(FrameError::UnsupportedDimensionality {
                operation: "to_grid_2d",
                requirement: "depth == 1",
                depth: self.depth,
            });
        }

        Ok((0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.symbol_at(x, y, 0).clone())
                    .collect()
            })
            .collect())
    }

    /// Resolve the frame into layers of rows of symbols. Requires depth > 1.
    pub fn to_grid_3d(&self) -> Result<Vec<Vec<Vec<S>>>, FrameError> {
        if self.depth <= 1 {
            return Err(FrameError::UnsupportedDimensionality {
                operation: "to_grid_3d",
                requirement: "depth > 1",
                depth: self.depth,
            });
        }

        Ok((0..self.depth)
            .map(|z| {
                (0..self.height)
                    .map(|y| {
                        (0..self.width)
                            .map(|x| self.symbol_at(x, y, z).clone())
                            .collect()
                    })
                    .collect()
            })
            .collect())
    }
}

impl<S: fmt::Display> Frame<S> {
    /// Render each row as a string of symbols. Requires depth == 1.
    pub fn to_row_strings(&self) -> Result<Vec<String>, FrameError> {
        if self.depth != 1 {
            return Err(FrameError::UnsupportedDimensionality {
                operation: "to_row_strings",
                requirement: "depth == 1",
                depth: self.depth,
            });
        }

        Ok((0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.symbol_at(x, y, 0).to_string())
                    .collect()
            })
            .collect())
    }
}
