/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when constructing core model state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A patrol path needs at least two waypoints to form a loop.
    #[error("patrol path too short: {0} waypoints, need at least 2")]
    PathTooShort(usize),

    /// The per-segment interpolation count must be positive.
    #[error("micro steps per segment must be at least 1, got {0}")]
    InvalidMicroSteps(u32),
}
