//! Error types for the placement-group map.

use thiserror::Error;

/// A specialized `Result` type for map operations.
pub type Result<T> = std::result::Result<T, PgMapError>;

/// Errors surfaced by delta application and the codec.
///
/// Anything else that can go wrong (subtracting a snapshot that was never
/// added, concurrent applies) is a bug in the orchestration layer and
/// panics instead of being reported as a recoverable error.
#[derive(Debug, Error)]
pub enum PgMapError {
    /// A delta arrived out of order; the upstream commit layer must
    /// guarantee deltas are presented in strict version order.
    #[error("delta version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// The version the map would accept next.
        expected: u64,
        /// The version the delta carried.
        got: u64,
    },

    /// Encoded input was truncated or structurally invalid.
    #[error("malformed input: {0}")]
    Malformed(String),
}
