use thiserror::Error;

/// Session-level failures. Per-address probe or resolution timeouts are
/// not errors: they fold into "unreachable" and "no hostname".
#[derive(Debug, Error)]
pub enum ScanError {
    /// The target specification could not be parsed. Raised before any
    /// probing starts.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A session is already active; the request is rejected, the
    /// running session is unaffected.
    #[error("a scan is already running")]
    AlreadyRunning,

    /// Unexpected fault in the worker pool, fatal to the session.
    #[error("internal scan failure: {0}")]
    Internal(String),
}
