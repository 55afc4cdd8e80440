//! Replay interpreters
//!
//! A scripted engine that replays a fixed sequence of grid states with their
//! per-step change lists. Useful for exercising sessions, runners and sinks
//! without a real rewrite engine behind them.

use gridloom_model::ModelDefinition;

use crate::error::CompileError;
use crate::frame::CellChange;
use crate::interpreter::{GridView, Interpreter, InterpreterFactory};
use crate::symbols::Symbol;

/// Interpreter that replays a scripted sequence of states.
///
/// In intermediate mode every scripted state is yielded, capped by the step
/// budget. In final-only mode a single pull yields the last state, with the
/// whole change script collapsed into its change set — mirroring how a real
/// engine surfaces only the terminal state.
#[derive(Debug, Clone)]
pub struct ReplayInterpreter<S> {
    width: usize,
    height: usize,
    depth: usize,
    legend: Vec<S>,
    states: Vec<Vec<u8>>,
    step_changes: Vec<Vec<CellChange>>,
    cursor: usize,
    limit: usize,
    emit_intermediates: bool,
    log: Vec<CellChange>,
}

impl<S: Symbol> ReplayInterpreter<S> {
    pub fn new(width: usize, height: usize, depth: usize, legend: Vec<S>) -> Self {
        Self {
            width,
            height,
            depth,
            legend,
            states: Vec::new(),
            step_changes: Vec::new(),
            cursor: 0,
            limit: 0,
            emit_intermediates: true,
            log: Vec::new(),
        }
    }

    /// Append a scripted state and the changes that produce it.
    pub fn with_step(mut self, state: Vec<u8>, changes: Vec<CellChange>) -> Self {
        debug_assert_eq!(state.len(), self.width * self.height * self.depth);
        self.states.push(state);
        self.step_changes.push(changes);
        self
    }

    /// Number of scripted states.
    pub fn script_len(&self) -> usize {
        self.states.len()
    }
}

impl<S: Symbol> Interpreter<S> for ReplayInterpreter<S> {
    fn begin_run(&mut self, _seed: u64, step_budget: usize, emit_intermediates: bool) {
        self.cursor = 0;
        self.log.clear();
        self.limit = self.states.len().min(step_budget);
        self.emit_intermediates = emit_intermediates;
    }

    fn poll_step(&mut self) -> Option<GridView<'_, S>> {
        if self.limit == 0 {
            return None;
        }

        let index = if self.emit_intermediates {
            if self.cursor >= self.limit {
                return None;
            }
            self.log.extend(self.step_changes[self.cursor].iter().copied());
            self.cursor
        } else {
            if self.cursor > 0 {
                return None;
            }
            for changes in &self.step_changes[..self.limit] {
                self.log.extend(changes.iter().copied());
            }
            self.limit - 1
        };
        self.cursor += 1;

        Some(GridView {
            state: &self.states[index],
            legend: &self.legend,
            width: self.width,
            height: self.height,
            depth: self.depth,
        })
    }

    fn change_log(&self) -> &[CellChange] {
        &self.log
    }
}

/// Factory that hands out a fresh replay of the same script for every run.
#[derive(Debug, Clone)]
pub struct ReplayFactory<S> {
    script: ReplayInterpreter<S>,
}

impl<S: Symbol> ReplayFactory<S> {
    pub fn new(script: ReplayInterpreter<S>) -> Self {
        Self { script }
    }
}

impl<S: Symbol> InterpreterFactory<S> for ReplayFactory<S> {
    fn create_interpreter(
        &self,
        _model: &ModelDefinition<S>,
    ) -> Result<Box<dyn Interpreter<S>>, CompileError> {
        Ok(Box::new(self.script.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> ReplayInterpreter<char> {
        ReplayInterpreter::new(2, 1, 1, vec!['B', 'W'])
            .with_step(vec![0, 0], vec![CellChange::new(0, 0, 0), CellChange::new(1, 0, 0)])
            .with_step(vec![1, 0], vec![CellChange::new(0, 0, 0)])
            .with_step(vec![1, 1], vec![CellChange::new(1, 0, 0)])
    }

    #[test]
    fn intermediate_mode_replays_every_state() {
        let mut replay = script();
        replay.begin_run(0, 1_000, true);

        let mut states = Vec::new();
        while let Some(view) = replay.poll_step() {
            states.push(view.state.to_vec());
        }
        assert_eq!(states, vec![vec![0, 0], vec![1, 0], vec![1, 1]]);
        assert_eq!(replay.change_log().len(), 4);
    }

    #[test]
    fn final_only_mode_yields_last_state_once() {
        let mut replay = script();
        replay.begin_run(0, 1_000, false);

        let view = replay.poll_step().unwrap();
        assert_eq!(view.state, &[1, 1]);
        assert!(replay.poll_step().is_none());
        assert_eq!(replay.change_log().len(), 4);
    }

    #[test]
    fn step_budget_truncates_the_replay() {
        let mut replay = script();
        replay.begin_run(0, 2, true);

        assert_eq!(replay.poll_step().unwrap().state, &[0, 0]);
        assert_eq!(replay.poll_step().unwrap().state, &[1, 0]);
        assert!(replay.poll_step().is_none());
        assert_eq!(replay.change_log().len(), 3);
    }

    #[test]
    fn zero_budget_yields_nothing() {
        let mut replay = script();
        replay.begin_run(0, 0, true);
        assert!(replay.poll_step().is_none());
    }
}
