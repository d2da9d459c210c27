// src/editor/error.rs
use crate::input::key::{ParseKeyError, MAX_SEQ_LEN};

/// Errors raised by the commands the engine exposes to the host. Every one
/// is recoverable: the call is dropped and no state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("expected {expected} argument(s), but got {got}")]
    WrongArgCount { expected: usize, got: usize },

    #[error("missing '{0}' argument")]
    MissingArgument(&'static str),

    #[error("was given arguments when expected none")]
    UnexpectedArguments,

    #[error("no mode named '{0}'")]
    UnknownMode(String),

    #[error(transparent)]
    InvalidKey(#[from] ParseKeyError),

    #[error("too many keys to be a sequence in '{0}' (max {max})", max = MAX_SEQ_LEN)]
    SequenceTooLong(String),

    #[error("empty key sequence")]
    EmptySequence,

    #[error("could not split command line '{0}'")]
    MalformedCommand(String),
}
