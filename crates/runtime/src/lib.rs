//! Gridloom Runtime
//!
//! Drives rewrite engines to completion: symbol palettes, generation
//! sessions, frame snapshots and the multi-run engine driver.

pub mod api;
pub mod error;
pub mod frame;
pub mod grid;
pub mod interpreter;
pub mod replay;
pub mod runner;
pub mod session;
pub mod sink;
pub mod symbols;

pub use api::{CaptureOptions, GenerationOutput, capture_run};
pub use error::{CompileError, FrameError, PaletteError, RunError, SessionError, SinkError};
pub use frame::{CellChange, Frame};
pub use grid::{CompiledGrid, compile_grid};
pub use interpreter::{GridView, Interpreter, InterpreterFactory};
pub use replay::{ReplayFactory, ReplayInterpreter};
pub use runner::{EngineRunner, RunContext};
pub use session::{CancelFlag, GenerationSession, SessionOptions};
pub use sink::GenerationSink;
pub use symbols::{MAX_SYMBOLS, Symbol, SymbolTable, Wave};
