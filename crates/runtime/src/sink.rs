//! Generation sinks
//!
//! A sink receives the begin/frame/complete notifications of every run the
//! engine runner executes. Concrete sinks (image writers, voxel exporters,
//! text dumps) live outside this crate.

use gridloom_model::ModelDefinition;

use crate::error::SinkError;
use crate::frame::Frame;
use crate::runner::RunContext;
use crate::symbols::Symbol;

/// Receives generation frames emitted by the engine runner.
///
/// Per run the hooks are called in order: `begin_run`, then `handle_frame`
/// zero or more times, then `complete_run`. A hook failure aborts the
/// remaining run loop after the current session has been released.
pub trait GenerationSink<S: Symbol> {
    /// A new generation run has started.
    fn begin_run(
        &mut self,
        model: &ModelDefinition<S>,
        context: &RunContext,
    ) -> Result<(), SinkError>;

    /// A snapshot of the model's grid state.
    fn handle_frame(
        &mut self,
        model: &ModelDefinition<S>,
        context: &RunContext,
        frame: &Frame<S>,
    ) -> Result<(), SinkError>;

    /// The current generation run has finished.
    fn complete_run(
        &mut self,
        model: &ModelDefinition<S>,
        context: &RunContext,
    ) -> Result<(), SinkError>;
}
