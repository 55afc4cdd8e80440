//! Execution settings
//!
//! Captures per-model execution parameters sourced from persisted model
//! documents: run count, step caps, seeding and the output geometry hints
//! consumed by sinks.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Validated multi-run execution policy for a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSettings {
    runs: usize,
    steps: Option<usize>,
    emit_gif: bool,
    isometric: bool,
    pixel_size: u32,
    gui_scale: u32,
    seeds: Option<Vec<u64>>,
}

impl ExecutionSettings {
    /// Start building settings; defaults to a single final-only run.
    pub fn builder() -> ExecutionSettingsBuilder {
        ExecutionSettingsBuilder::default()
    }

    /// Single run, final frame only. The common case for library embedding.
    pub fn single_run() -> Self {
        Self {
            runs: 1,
            steps: None,
            emit_gif: false,
            isometric: false,
            pixel_size: 4,
            gui_scale: 0,
            seeds: None,
        }
    }

    /// Number of independent runs to execute.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Optional step cap applied to every run.
    pub fn steps(&self) -> Option<usize> {
        self.steps
    }

    /// Whether intermediate frames should be emitted for animation output.
    pub fn emit_gif(&self) -> bool {
        self.emit_gif
    }

    /// Isometric rendering hint, consumed only by sinks.
    pub fn isometric(&self) -> bool {
        self.isometric
    }

    /// Pixel size rendering hint, consumed only by sinks.
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// GUI scale rendering hint, consumed only by sinks.
    pub fn gui_scale(&self) -> u32 {
        self.gui_scale
    }

    /// Explicit seed list. May be shorter than `runs`; remaining runs fall
    /// back to randomized seeding.
    pub fn seeds(&self) -> Option<&[u64]> {
        self.seeds.as_deref()
    }
}

/// Builder for [`ExecutionSettings`].
#[derive(Debug, Clone)]
pub struct ExecutionSettingsBuilder {
    runs: usize,
    steps: Option<usize>,
    emit_gif: bool,
    isometric: bool,
    pixel_size: u32,
    gui_scale: u32,
    seeds: Option<Vec<u64>>,
}

impl Default for ExecutionSettingsBuilder {
    fn default() -> Self {
        Self {
            runs: 1,
            steps: None,
            emit_gif: false,
            isometric: false,
            pixel_size: 4,
            gui_scale: 0,
            seeds: None,
        }
    }
}

impl ExecutionSettingsBuilder {
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn emit_gif(mut self, emit_gif: bool) -> Self {
        self.emit_gif = emit_gif;
        self
    }

    pub fn isometric(mut self, isometric: bool) -> Self {
        self.isometric = isometric;
        self
    }

    pub fn pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    pub fn gui_scale(mut self, gui_scale: u32) -> Self {
        self.gui_scale = gui_scale;
        self
    }

    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    /// Validate and build the settings.
    pub fn build(self) -> Result<ExecutionSettings, ModelError> {
        if self.runs == 0 {
            return Err(ModelError::InvalidRuns);
        }
        if self.pixel_size == 0 {
            return Err(ModelError::InvalidPixelSize);
        }

        Ok(ExecutionSettings {
            runs: self.runs,
            steps: self.steps,
            emit_gif: self.emit_gif,
            isometric: self.isometric,
            pixel_size: self.pixel_size,
            gui_scale: self.gui_scale,
            seeds: self.seeds,
        })
    }
}
