use rq_simulation::SimError;

/// Alias for `Result<T, SessionError>`.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by external providers.
///
/// Only [`ProviderError::PermissionDenied`] is fatal, and only during
/// startup. Everything else degrades: an unavailable route skips one spawn
/// cycle, a failed data fetch falls back to defaults, and a storage failure
/// loses nothing but persistence.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The platform refused access to the player's location.
    #[error("location permission denied")]
    PermissionDenied,

    /// No patrol route could be produced for the requested area.
    #[error("no patrol route available")]
    RouteUnavailable,

    /// A remote data fetch failed.
    #[error("data fetch failed: {0}")]
    DataFetch(String),

    /// Persistent storage failed.
    #[error("storage failed: {0}")]
    Storage(String),
}

/// Errors that can end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A fatal provider failure during startup.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The simulation itself failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The driver task ended before the session was stopped.
    #[error("session driver ended unexpectedly")]
    DriverGone,
}
