//! Runtime errors

use thiserror::Error;

/// Errors raised while building or querying a symbol palette.
///
/// All palette errors are construction-time fatal: no partially built table
/// is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("duplicate symbol in alphabet: {0}")]
    DuplicateSymbol(String),

    #[error("alphabet has {0} symbols, wave masks encode at most {max}", max = crate::symbols::MAX_SYMBOLS)]
    AlphabetTooLarge(usize),

    #[error("symbol already defined: {0}")]
    SymbolAlreadyDefined(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

/// Errors raised while materializing a frame view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("unsupported dimensionality: {operation} requires {requirement}, grid depth is {depth}")]
    UnsupportedDimensionality {
        operation: &'static str,
        requirement: &'static str,
        depth: usize,
    },
}

/// Errors raised while compiling a model into an interpreter.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error("model compilation failed: {0}")]
    Model(String),
}

/// Session lifecycle errors. These are programmer errors and are never
/// retried internally.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,

    #[error("session not started")]
    NotStarted,

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Errors surfaced by generation sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// Wrap an arbitrary sink failure message.
    pub fn other(message: impl Into<String>) -> Self {
        SinkError::Other(message.into())
    }
}

/// Errors surfaced by the multi-run driver and the capture facade.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("interpreter produced no frames")]
    NoFrames,
}
