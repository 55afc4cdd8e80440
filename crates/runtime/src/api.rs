//! In-memory capture
//!
//! Convenience facade for embedders that just want the frames of a single
//! run in memory, without wiring up a sink.

use std::fmt;

use rand::Rng;

use gridloom_model::ModelDefinition;

use crate::error::{FrameError, RunError};
use crate::frame::Frame;
use crate::interpreter::InterpreterFactory;
use crate::session::{GenerationSession, SessionOptions};
use crate::symbols::Symbol;

/// Options for a one-shot in-memory run.
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// Seed for the run; randomized when absent.
    pub seed: Option<u64>,
    /// Capture every intermediate frame instead of just the final one.
    pub capture_intermediate: bool,
    /// Session-level overrides.
    pub session: SessionOptions,
}

impl CaptureOptions {
    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

/// The captured frames of one completed run.
#[derive(Debug, Clone)]
pub struct GenerationOutput<S> {
    frames: Vec<Frame<S>>,
}

impl<S> GenerationOutput<S> {
    /// All captured frames, in emission order.
    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    /// The last captured frame of the run.
    pub fn final_frame(&self) -> &Frame<S> {
        self.frames.last().expect("output contains at least one frame")
    }

    /// Project every frame's legend into another symbol domain.
    pub fn project_legend<T>(&self, transform: impl Fn(&S) -> T) -> GenerationOutput<T> {
        GenerationOutput {
            frames: self
                .frames
                .iter()
                .map(|frame| frame.project_legend(&transform))
                .collect(),
        }
    }
}

impl<S: fmt::Display> GenerationOutput<S> {
    /// Render the final frame as row strings. Requires depth == 1.
    pub fn to_row_strings(&self) -> Result<Vec<String>, FrameError> {
        self.final_frame().to_row_strings()
    }
}

/// Run the model once and capture its frames in memory.
///
/// With `capture_intermediate` unset only the final frame is kept. A run
/// that produces no frames at all is an error here, unlike in the streaming
/// session API.
pub fn capture_run<S: Symbol>(
    model: &ModelDefinition<S>,
    factory: &dyn InterpreterFactory<S>,
    options: CaptureOptions,
) -> Result<GenerationOutput<S>, RunError> {
    let mut frames = Vec::new();
    let capture_all = options.capture_intermediate;

    let mut session = GenerationSession::new(model, factory);
    session.start(options.resolve_seed(), options.session.clone())?;
    session.run_until_complete(
        |frame| {
            if capture_all || frame.is_final() {
                frames.push(frame.clone());
            }
        },
        None,
    )?;
    drop(session);

    if frames.is_empty() {
        return Err(RunError::NoFrames);
    }
    Ok(GenerationOutput { frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridloom_model::{ExecutionSettings, GridDefinition};

    use crate::frame::CellChange;
    use crate::replay::{ReplayFactory, ReplayInterpreter};

    fn model() -> ModelDefinition<char> {
        ModelDefinition::new(
            "capture-test",
            GridDefinition::with_charset(2, 1, 1, "BW").unwrap(),
            ExecutionSettings::single_run(),
        )
    }

    fn factory() -> ReplayFactory<char> {
        ReplayFactory::new(
            ReplayInterpreter::new(2, 1, 1, vec!['B', 'W'])
                .with_step(vec![0, 0], vec![CellChange::new(0, 0, 0)])
                .with_step(vec![0, 1], vec![CellChange::new(1, 0, 0)]),
        )
    }

    #[test]
    fn captures_only_the_final_frame_by_default() {
        let model = model();
        let factory = factory();
        let output = capture_run(
            &model,
            &factory,
            CaptureOptions {
                seed: Some(3),
                session: SessionOptions {
                    emit_intermediate_frames: Some(true),
                    max_steps: None,
                },
                ..CaptureOptions::default()
            },
        )
        .unwrap();

        assert_eq!(output.frames().len(), 1);
        assert!(output.final_frame().is_final());
        assert_eq!(output.to_row_strings().unwrap(), vec!["BW"]);
    }

    #[test]
    fn captures_every_frame_when_asked() {
        let model = model();
        let factory = factory();
        let output = capture_run(
            &model,
            &factory,
            CaptureOptions {
                seed: Some(3),
                capture_intermediate: true,
                session: SessionOptions {
                    emit_intermediate_frames: Some(true),
                    max_steps: None,
                },
            },
        )
        .unwrap();

        assert_eq!(output.frames().len(), 2);
        assert_eq!(output.frames()[0].step(), 0);
    }

    #[test]
    fn empty_run_is_an_error() {
        let model = model();
        let factory = ReplayFactory::new(ReplayInterpreter::new(2, 1, 1, vec!['B', 'W']));
        let result = capture_run(&model, &factory, CaptureOptions::default());
        assert!(matches!(result, Err(RunError::NoFrames)));
    }

    #[test]
    fn projects_all_captured_frames() {
        let model = model();
        let factory = factory();
        let output = capture_run(
            &model,
            &factory,
            CaptureOptions {
                seed: Some(3),
                capture_intermediate: true,
                session: SessionOptions {
                    emit_intermediate_frames: Some(true),
                    max_steps: None,
                },
            },
        )
        .unwrap();

        let projected = output.project_legend(|&c| u32::from(c));
        assert_eq!(projected.final_frame().legend(), &[66, 87]);
    }
}
