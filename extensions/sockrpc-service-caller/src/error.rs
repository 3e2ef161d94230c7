use sockrpc_transport::TransportError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum RpcCallerError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to encode request: {0}")]
    Encode(#[source] io::Error),

    #[error("failed to decode reply: {0}")]
    Decode(#[source] io::Error),

    /// The operation needs a different delivery pattern than the channel was
    /// built with.
    #[error("{operation} needs a {expected} channel, not {actual}")]
    PatternMismatch {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}
