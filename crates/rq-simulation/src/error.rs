use rq_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while driving the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Invalid core model state, such as a degenerate patrol path.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A system failed in a way it could not resolve itself.
    #[error("system error: {0}")]
    System(String),
}
