use sockrpc_transport::TransportError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum RpcServiceEndpointError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A handler's result could not be serialized.
    #[error("failed to encode result: {0}")]
    Encode(#[source] io::Error),
}
