use crate::{SocketAddress, SocketKind};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZeroMQ error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("address already in use: {0}")]
    AddressInUse(SocketAddress),

    #[error("{kind:?} sockets do not support {operation}")]
    UnsupportedOperation {
        kind: SocketKind,
        operation: &'static str,
    },

    /// The socket's owning thread has stopped.
    #[error("socket closed")]
    Closed,
}
