use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReelError {
    /// Network, server-reported or payload error while asking for an outcome.
    #[error("outcome request failed: {0}")]
    OutcomeFetchFailed(String),
    #[error("prize `{name}` ({value}) is not in the catalog")]
    PrizeNotFound { name: String, value: u32 },
    #[error("invalid user: {0}")]
    InvalidUser(String),
    #[error("pointer landed on `{landed}` but the outcome was `{expected}`")]
    GeometryMismatch { expected: String, landed: String },
    #[error("no attempts left")]
    NoAttemptsLeft,
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("prize catalog is empty")]
    EmptyCatalog,
    #[error("duplicate prize `{0}` in catalog")]
    DuplicatePrize(String),
    #[error("winning index {index} is out of range for a catalog of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("spin session was closed")]
    SessionClosed,
}

impl ReelError {
    /// Identity errors keep the spin control disabled for the rest of the session.
    pub fn disables_session(&self) -> bool {
        matches!(self, ReelError::InvalidUser(_))
    }

    /// Errors the UI swallows silently (the button is already disabled).
    pub fn is_redundant_click(&self) -> bool {
        matches!(self, ReelError::SpinInProgress)
    }
}
