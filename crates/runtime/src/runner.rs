//! Engine runner
//!
//! Sequences a model's configured run count: resolves one seed per run,
//! opens a generation session, drains it and forwards every frame to the
//! sink. One session at a time; each is fully drained and released before
//! the next run opens.

use rand::Rng;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use gridloom_model::ModelDefinition;

use crate::error::{RunError, SinkError};
use crate::interpreter::InterpreterFactory;
use crate::session::{CancelFlag, GenerationSession, SessionOptions};
use crate::sink::GenerationSink;
use crate::symbols::Symbol;

/// Immutable metadata about an individual generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    run_index: usize,
    seed: u64,
    emit_intermediates: bool,
    max_steps: Option<usize>,
}

impl RunContext {
    pub fn new(
        run_index: usize,
        seed: u64,
        emit_intermediates: bool,
        max_steps: Option<usize>,
    ) -> Self {
        Self {
            run_index,
            seed,
            emit_intermediates,
            max_steps,
        }
    }

    /// 0-based index of this run within the multi-run execution.
    pub fn run_index(&self) -> usize {
        self.run_index
    }

    /// The seed this run was resolved to.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether intermediate frames are requested for this run.
    pub fn emit_intermediates(&self) -> bool {
        self.emit_intermediates
    }

    /// Optional step cap for this run.
    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }
}

/// Coordinates model execution and frame delivery through a sink.
pub struct EngineRunner<'f, S: Symbol> {
    factory: &'f dyn InterpreterFactory<S>,
}

impl<'f, S: Symbol> EngineRunner<'f, S> {
    pub fn new(factory: &'f dyn InterpreterFactory<S>) -> Self {
        Self { factory }
    }

    /// Execute every configured run of the model, forwarding frames to the
    /// sink.
    ///
    /// Seeds come from the model's explicit seed list where it has an entry
    /// for the run index; remaining runs draw from one shared randomized
    /// source created on first use and kept for the rest of the execution.
    /// A sink failure aborts the remaining runs; the failing run's session
    /// is released before the error surfaces.
    #[instrument(skip_all, fields(model = %model.name, runs = model.execution.runs()))]
    pub fn run(
        &self,
        model: &ModelDefinition<S>,
        sink: &mut dyn GenerationSink<S>,
    ) -> Result<(), RunError> {
        let execution = &model.execution;
        let mut fallback_seeds: Option<ThreadRng> = None;

        for run_index in 0..execution.runs() {
            let seed = match execution.seeds().and_then(|seeds| seeds.get(run_index)) {
                Some(seed) => *seed,
                None => fallback_seeds.get_or_insert_with(rand::rng).random(),
            };

            let context = RunContext::new(run_index, seed, execution.emit_gif(), execution.steps());
            info!(run_index, seed, "run starting");
            sink.begin_run(model, &context)?;

            let mut session = GenerationSession::new(model, self.factory);
            session.start(
                seed,
                SessionOptions {
                    emit_intermediate_frames: Some(context.emit_intermediates()),
                    max_steps: context.max_steps(),
                },
            )?;

            let abort = CancelFlag::new();
            let mut sink_failure: Option<SinkError> = None;
            session.run_until_complete(
                |frame| {
                    if sink_failure.is_some() {
                        return;
                    }
                    if let Err(error) = sink.handle_frame(model, &context, frame) {
                        sink_failure = Some(error);
                        abort.cancel();
                    }
                },
                Some(&abort),
            )?;
            drop(session);

            if let Some(error) = sink_failure {
                return Err(error.into());
            }
            sink.complete_run(model, &context)?;
            info!(run_index, "run complete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridloom_model::{ExecutionSettings, GridDefinition};

    use crate::frame::{CellChange, Frame};
    use crate::replay::{ReplayFactory, ReplayInterpreter};

    #[derive(Debug, PartialEq, Eq)]
    enum SinkEvent {
        Begin { run_index: usize, seed: u64 },
        Frame { run_index: usize, step: usize, is_final: bool },
        Complete { run_index: usize },
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<SinkEvent>,
        fail_on_step: Option<usize>,
    }

    impl GenerationSink<char> for RecordingSink {
        fn begin_run(
            &mut self,
            _model: &ModelDefinition<char>,
            context: &RunContext,
        ) -> Result<(), SinkError> {
            self.events.push(SinkEvent::Begin {
                run_index: context.run_index(),
                seed: context.seed(),
            });
            Ok(())
        }

        fn handle_frame(
            &mut self,
            _model: &ModelDefinition<char>,
            context: &RunContext,
            frame: &Frame<char>,
        ) -> Result<(), SinkError> {
            if self.fail_on_step == Some(frame.step()) {
                return Err(SinkError::other("frame rejected"));
            }
            self.events.push(SinkEvent::Frame {
                run_index: context.run_index(),
                step: frame.step(),
                is_final: frame.is_final(),
            });
            Ok(())
        }

        fn complete_run(
            &mut self,
            _model: &ModelDefinition<char>,
            context: &RunContext,
        ) -> Result<(), SinkError> {
            self.events.push(SinkEvent::Complete {
                run_index: context.run_index(),
            });
            Ok(())
        }
    }

    fn factory() -> ReplayFactory<char> {
        ReplayFactory::new(
            ReplayInterpreter::new(2, 1, 1, vec!['B', 'W'])
                .with_step(vec![0, 0], vec![CellChange::new(0, 0, 0)])
                .with_step(vec![1, 0], vec![CellChange::new(0, 0, 0)]),
        )
    }

    fn model(execution: ExecutionSettings) -> ModelDefinition<char> {
        ModelDefinition::new(
            "runner-test",
            GridDefinition::with_charset(2, 1, 1, "BW").unwrap(),
            execution,
        )
    }

    #[test]
    fn explicit_seeds_are_used_then_randomized_fallback() {
        let execution = ExecutionSettings::builder()
            .runs(3)
            .emit_gif(true)
            .seeds(vec![10, 11])
            .build()
            .unwrap();
        let model = model(execution);
        let factory = factory();
        let mut sink = RecordingSink::default();

        EngineRunner::new(&factory).run(&model, &mut sink).unwrap();

        let begins: Vec<_> = sink
            .events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Begin { run_index, seed } => Some((*run_index, *seed)),
                _ => None,
            })
            .collect();
        assert_eq!(begins.len(), 3);
        assert_eq!(begins[0], (0, 10));
        assert_eq!(begins[1], (1, 11));
        assert_eq!(begins[2].0, 2);
    }

    #[test]
    fn hooks_fire_in_order_for_every_run() {
        let execution = ExecutionSettings::builder()
            .runs(2)
            .emit_gif(true)
            .seeds(vec![1, 2])
            .build()
            .unwrap();
        let model = model(execution);
        let factory = factory();
        let mut sink = RecordingSink::default();

        EngineRunner::new(&factory).run(&model, &mut sink).unwrap();

        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Begin { run_index: 0, seed: 1 },
                SinkEvent::Frame { run_index: 0, step: 0, is_final: false },
                SinkEvent::Frame { run_index: 0, step: 1, is_final: true },
                SinkEvent::Complete { run_index: 0 },
                SinkEvent::Begin { run_index: 1, seed: 2 },
                SinkEvent::Frame { run_index: 1, step: 0, is_final: false },
                SinkEvent::Frame { run_index: 1, step: 1, is_final: true },
                SinkEvent::Complete { run_index: 1 },
            ]
        );
    }

    #[test]
    fn final_only_runs_forward_a_single_frame() {
        let execution = ExecutionSettings::builder()
            .runs(1)
            .seeds(vec![5])
            .build()
            .unwrap();
        let model = model(execution);
        let factory = factory();
        let mut sink = RecordingSink::default();

        EngineRunner::new(&factory).run(&model, &mut sink).unwrap();

        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Begin { run_index: 0, seed: 5 },
                SinkEvent::Frame { run_index: 0, step: 0, is_final: true },
                SinkEvent::Complete { run_index: 0 },
            ]
        );
    }

    #[test]
    fn sink_failure_aborts_remaining_runs() {
        let execution = ExecutionSettings::builder()
            .runs(3)
            .emit_gif(true)
            .seeds(vec![1, 2, 3])
            .build()
            .unwrap();
        let model = model(execution);
        let factory = factory();
        let mut sink = RecordingSink {
            fail_on_step: Some(1),
            ..RecordingSink::default()
        };

        let result = EngineRunner::new(&factory).run(&model, &mut sink);
        assert!(matches!(result, Err(RunError::Sink(_))));

        // First run got its begin and first frame, then the failure aborted
        // everything: no complete hook, no second run.
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Begin { run_index: 0, seed: 1 },
                SinkEvent::Frame { run_index: 0, step: 0, is_final: false },
            ]
        );
    }
}
