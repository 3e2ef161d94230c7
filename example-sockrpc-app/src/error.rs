use sockrpc_service_caller::error::RpcCallerError;
use sockrpc_service_endpoint::error::RpcServiceEndpointError;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Endpoint(#[from] RpcServiceEndpointError),

    #[error(transparent)]
    Caller(#[from] RpcCallerError),

    /// A continuation was dropped or completed without a result.
    #[error("no result for {0}")]
    MissingResult(&'static str),
}
