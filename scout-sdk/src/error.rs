//! Error taxonomy for SDK operations.

use thiserror::Error;

/// Errors surfaced by SDK clients and servers.
///
/// Connection-time failures propagate synchronously from the initiating
/// call; mid-stream failures only ever surface through
/// [`StreamCursor::last_error`](crate::StreamCursor::last_error). No variant
/// is retried at this layer.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport could not be established; fatal to the call.
    #[error("failed to establish connection: {0}")]
    Connection(#[from] tonic::transport::Error),

    /// The remote side rejected the call at initiation.
    #[error("call failed: {0}")]
    Call(#[from] tonic::Status),

    /// The transport failed mid-stream after the call was established.
    #[error("stream failed: {0}")]
    Stream(tonic::Status),

    /// `current()` was called without a pending item. Caller misuse, not a
    /// transport condition.
    #[error("cursor has no pending item; call advance() first")]
    InvalidCursorState,

    /// A repository identifier failed validation.
    #[error("invalid repository url: {0}")]
    InvalidRepositoryUrl(#[from] scout_proto::ParseRepositoryError),
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
