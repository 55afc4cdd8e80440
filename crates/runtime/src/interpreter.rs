//! Interpreter contract
//!
//! The rewrite engine itself lives behind this boundary. The execution layer
//! only ever sees a single-pass pull of raw grid states plus an append-only
//! change log; everything else about pattern matching, search and
//! backtracking is the engine's business.

use gridloom_model::ModelDefinition;

use crate::error::CompileError;
use crate::frame::CellChange;
use crate::symbols::Symbol;

/// Borrowed view of a raw engine state, valid until the next pull.
///
/// Sessions copy out of the view immediately; engines are free to reuse the
/// underlying buffers between pulls.
#[derive(Debug)]
pub struct GridView<'a, S> {
    pub state: &'a [u8],
    pub legend: &'a [S],
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

/// A runnable rewrite engine instance for one model.
///
/// One run at a time: `begin_run` resets the engine and its change log, then
/// `poll_step` is pulled until it returns `None`. Exhaustion signals natural
/// completion; step-budget exhaustion is not an error, just an earlier end of
/// the sequence.
pub trait Interpreter<S: Symbol> {
    /// Reset the engine and open a new lazy run.
    fn begin_run(&mut self, seed: u64, step_budget: usize, emit_intermediates: bool);

    /// Pull the next raw state of the current run.
    fn poll_step(&mut self) -> Option<GridView<'_, S>>;

    /// The run's append-only change log. Entries are never truncated or
    /// reordered once appended; consumers slice it by cursor position.
    fn change_log(&self) -> &[CellChange];
}

/// Compiles model definitions into runnable interpreter instances.
pub trait InterpreterFactory<S: Symbol> {
    fn create_interpreter(
        &self,
        model: &ModelDefinition<S>,
    ) -> Result<Box<dyn Interpreter<S>>, CompileError>;
}
