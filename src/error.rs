use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Failures are exclusively parameter-validation issues: every fallible API
/// checks its inputs up front and leaves all state unchanged on rejection.
/// Degenerate numeric cases inside a step (coincident particle centers in the
/// density gradient or the collision resolver) are defined no-op branches and
/// are never surfaced as errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}
