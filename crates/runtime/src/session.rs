//! Generation sessions
//!
//! A session owns one run of a rewrite engine and turns its lazy step
//! sequence into a pull-based frame stream. One buffered lookahead state
//! distinguishes "this is the last frame" from "there may be more"; a
//! monotonic cursor slices the engine's change log into exact per-step
//! change sets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument, trace};

use gridloom_model::ModelDefinition;

use crate::error::SessionError;
use crate::frame::{CellChange, Frame};
use crate::interpreter::{GridView, Interpreter, InterpreterFactory};
use crate::symbols::Symbol;

/// Default step budget when intermediate frames are emitted.
pub const INTERMEDIATE_STEP_BUDGET: usize = 1_000;

/// Default step budget when only the final frame is wanted. These budgets are
/// safety ceilings against non-terminating rewrite programs, not correctness
/// limits.
pub const FINAL_ONLY_STEP_BUDGET: usize = 50_000;

/// Optional settings that influence a single session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Overrides the model's intermediate-frame policy when set.
    pub emit_intermediate_frames: Option<bool>,
    /// Overrides the model's step cap when set.
    pub max_steps: Option<usize>,
}

/// Cooperative cancellation signal, checked at step boundaries.
///
/// Clone to share; cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owned deep copy of the last pulled raw state.
#[derive(Debug)]
struct RawSnapshot<S> {
    state: Vec<u8>,
    legend: Vec<S>,
    width: usize,
    height: usize,
    depth: usize,
}

impl<S: Clone> RawSnapshot<S> {
    fn copy_of(view: &GridView<'_, S>) -> Self {
        Self {
            state: view.state.to_vec(),
            legend: view.legend.to_vec(),
            width: view.width,
            height: view.height,
            depth: view.depth,
        }
    }
}

type LifecycleHook = Box<dyn FnMut()>;
type FrameHook<S> = Box<dyn FnMut(&Frame<S>)>;

/// A resumable, cancellable run of a rewrite engine.
///
/// State machine: `NotStarted → Started → {Completed | Cancelled}`; terminal
/// states are absorbing. Dropping a live session cancels it, so the engine
/// resource is released exactly once on every exit path.
pub struct GenerationSession<'m, S: Symbol> {
    model: &'m ModelDefinition<S>,
    factory: &'m dyn InterpreterFactory<S>,
    interpreter: Option<Box<dyn Interpreter<S>>>,
    lookahead: Option<RawSnapshot<S>>,
    step_index: usize,
    change_cursor: usize,
    started: bool,
    completed: bool,
    cancelled: bool,
    completion_raised: bool,
    frame_hook: Option<FrameHook<S>>,
    completed_hook: Option<LifecycleHook>,
    cancelled_hook: Option<LifecycleHook>,
}

impl<'m, S: Symbol> GenerationSession<'m, S> {
    pub fn new(model: &'m ModelDefinition<S>, factory: &'m dyn InterpreterFactory<S>) -> Self {
        Self {
            model,
            factory,
            interpreter: None,
            lookahead: None,
            step_index: 0,
            change_cursor: 0,
            started: false,
            completed: false,
            cancelled: false,
            completion_raised: false,
            frame_hook: None,
            completed_hook: None,
            cancelled_hook: None,
        }
    }

    /// Hook invoked synchronously for every produced frame.
    pub fn on_frame(&mut self, hook: impl FnMut(&Frame<S>) + 'static) {
        self.frame_hook = Some(Box::new(hook));
    }

    /// Hook invoked when the session reaches a terminal frame. Raised at
    /// most once, never for a cancelled session.
    pub fn on_completed(&mut self, hook: impl FnMut() + 'static) {
        self.completed_hook = Some(Box::new(hook));
    }

    /// Hook invoked when the session is cancelled prior to completion.
    pub fn on_cancelled(&mut self, hook: impl FnMut() + 'static) {
        self.cancelled_hook = Some(Box::new(hook));
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of frames emitted so far.
    pub fn steps_emitted(&self) -> usize {
        self.step_index
    }

    /// Compile the interpreter and prepare the first frame for consumption.
    ///
    /// An engine that yields no states at all completes the session
    /// immediately, with zero frames emitted.
    #[instrument(skip(self, options), fields(model = %self.model.name))]
    pub fn start(&mut self, seed: u64, options: SessionOptions) -> Result<(), SessionError> {
        if self.started {
            return Err(SessionError::AlreadyStarted);
        }

        let mut interpreter = self.factory.create_interpreter(self.model)?;

        let emit_intermediates = options
            .emit_intermediate_frames
            .unwrap_or_else(|| self.model.execution.emit_gif());
        let step_budget = resolve_step_budget(
            options.max_steps.or(self.model.execution.steps()),
            emit_intermediates,
        );

        debug!(step_budget, emit_intermediates, "session starting");
        interpreter.begin_run(seed, step_budget, emit_intermediates);

        self.lookahead = interpreter
            .poll_step()
            .map(|view| RawSnapshot::copy_of(&view));
        self.interpreter = Some(interpreter);
        self.started = true;
        self.step_index = 0;
        self.change_cursor = 0;

        if self.lookahead.is_none() {
            self.complete_session();
        }
        Ok(())
    }

    /// Attempt to advance the session by a single frame.
    ///
    /// Returns `Ok(None)` once the session is terminal. The returned frame's
    /// change set covers exactly the transition into that frame.
    pub fn try_step(&mut self) -> Result<Option<Frame<S>>, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if self.completed || self.cancelled {
            return Ok(None);
        }
        let Some(snapshot) = self.lookahead.take() else {
            return Ok(None);
        };

        let changes = self.slice_changes();
        let is_final = !self.refill_lookahead();

        let frame = Frame::new(
            snapshot.state,
            snapshot.legend,
            snapshot.width,
            snapshot.height,
            snapshot.depth,
            self.step_index,
            is_final,
            changes,
        );
        self.step_index += 1;

        trace!(step = frame.step(), is_final, "frame produced");
        if let Some(hook) = self.frame_hook.as_mut() {
            hook(&frame);
        }
        if is_final {
            self.complete_session();
        }
        Ok(Some(frame))
    }

    /// Drive the session until no further frames are available or the
    /// cancellation flag is observed at a step boundary.
    ///
    /// Observing the flag cancels the session; the work inside a single step
    /// is not interruptible.
    pub fn run_until_complete(
        &mut self,
        mut on_frame: impl FnMut(&Frame<S>),
        cancel: Option<&CancelFlag>,
    ) -> Result<(), SessionError> {
        while !self.completed && !self.cancelled {
            if let Some(flag) = cancel {
                if flag.is_cancelled() {
                    self.cancel();
                    break;
                }
            }
            let Some(frame) = self.try_step()? else {
                break;
            };
            on_frame(&frame);
            if frame.is_final() {
                break;
            }
        }
        Ok(())
    }

    /// Cancel the session and release the engine.
    ///
    /// Idempotent; a no-op before start and after any terminal state. A
    /// cancelled session never raises the completion hook.
    pub fn cancel(&mut self) {
        if self.cancelled || !self.started || self.completed {
            return;
        }

        self.cancelled = true;
        self.completed = true;
        self.release_interpreter();
        debug!(model = %self.model.name, steps = self.step_index, "session cancelled");
        if let Some(hook) = self.cancelled_hook.as_mut() {
            hook();
        }
    }

    /// Copy out the change-log suffix produced since the previous step.
    fn slice_changes(&mut self) -> Vec<CellChange> {
        let Some(interpreter) = self.interpreter.as_ref() else {
            return Vec::new();
        };
        let log = interpreter.change_log();
        let slice = log[self.change_cursor..].to_vec();
        self.change_cursor = log.len();
        slice
    }

    /// Pull the next raw state into the lookahead buffer. Returns whether
    /// the buffer was refilled; an empty pull means the frame being emitted
    /// is the final one.
    fn refill_lookahead(&mut self) -> bool {
        let snapshot = self.interpreter.as_mut().and_then(|interpreter| {
            interpreter
                .poll_step()
                .map(|view| RawSnapshot::copy_of(&view))
        });
        let refilled = snapshot.is_some();
        self.lookahead = snapshot;
        refilled
    }

    fn complete_session(&mut self) {
        self.completed = true;
        self.release_interpreter();
        if !self.completion_raised {
            self.completion_raised = true;
            debug!(model = %self.model.name, steps = self.step_index, "session completed");
            if let Some(hook) = self.completed_hook.as_mut() {
                hook();
            }
        }
    }

    fn release_interpreter(&mut self) {
        self.interpreter = None;
        self.lookahead = None;
    }
}

impl<S: Symbol> Drop for GenerationSession<'_, S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn resolve_step_budget(requested: Option<usize>, emit_intermediates: bool) -> usize {
    match requested {
        Some(steps) => steps,
        None if emit_intermediates => INTERMEDIATE_STEP_BUDGET,
        None => FINAL_ONLY_STEP_BUDGET,
    }
}
