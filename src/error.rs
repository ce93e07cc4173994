//! Error types for the FSD protocol engine and rendering pipeline.

use thiserror::Error;

/// Errors raised by the line transport (§4.A).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The socket could not be opened.
    #[error("connection failed: {0}")]
    Connect(#[from] std::io::Error),

    /// The peer closed the connection or a read/write failed on an
    /// established socket.
    #[error("connection closed: {0}")]
    Closed(String),

    /// A send was attempted after the transport observed a disconnect.
    #[error("transport is closed")]
    NotConnected,
}

/// Errors raised while decoding a single PDU line (§4.B). These are always
/// recoverable: the offending line is logged and skipped, never fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    /// The line was empty or had no recognizable family marker.
    #[error("unrecognized PDU prefix in line: {0}")]
    UnknownPrefix(String),

    /// The family marker was recognized but the two-letter type code was not.
    #[error("unknown PDU type: {0}")]
    UnknownType(String),

    /// Too few `:`-delimited fields to satisfy the variant's required fields.
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    /// A field parsed to the wrong type (e.g. non-numeric altitude).
    #[error("field '{field}' has invalid value: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Fatal session-level errors (§4.C, §7). These always end in
/// `SessionState::Disconnected`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// The server sent a kill PDU.
    #[error("killed by server: {0}")]
    Killed(String),

    /// The server rejected authentication.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The server's protocol version is not supported.
    #[error("unsupported server version: {0}")]
    UnsupportedVersion(String),

    /// The auth-challenge response deadline (30s) elapsed with no reply.
    #[error("auth challenge response timed out")]
    ChallengeTimeout,
}

/// Top-level error unifying transport, protocol, and session failures for
/// call sites that can hit any of them.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
