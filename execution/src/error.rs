use groupclick_types::{economy::Currency, SessionId};
use thiserror::Error;

/// Why an instruction was rejected. State is untouched in every case.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EconomyError {
    /// The player is not in a state that allows the command.
    #[error("{0}")]
    InvalidState(&'static str),
    /// The command itself is malformed (same currency, non-positive amount).
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("insufficient balance: {currency} has {available}, needs {required}")]
    InsufficientBalance {
        currency: Currency,
        required: u64,
        available: u64,
    },
    /// The caller referenced a session that never joined (or already left).
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
    #[error("session already joined: {0}")]
    SessionExists(SessionId),
}
