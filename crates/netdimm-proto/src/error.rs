// Error kinds for the NetDIMM protocol engine.
//
// Mirrors the four kinds spec'd for the driver: connection failures, reply
// contract violations, caller-side precondition violations, and the one case
// that's handled silently rather than surfaced (an unlisted firmware in the
// boot-ID patch table, which the target policy module simply skips).

use std::io;

/// Failure of a NetDIMM protocol operation.
#[derive(Debug, thiserror::Error)]
pub enum NetDimmError {
    /// TCP connect failed, a read/write timed out, or the stream closed unexpectedly.
    #[error("connection error: {0}")]
    Connection(#[from] io::Error),

    /// A reply's packet id or payload length did not match the request's contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A caller-side precondition was violated before any I/O took place.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, NetDimmError>;
