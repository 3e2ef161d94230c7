use crate::Channel;
use crate::error::RpcCallerError;
use sockrpc_service::RpcMethod;
use tokio::sync::oneshot;

/// Lets a method definition be invoked directly, as in
/// `SayHello::call(&channel, name).await`.
///
/// Implemented for every [`RpcMethod`] whose argument and result can cross
/// tasks.
#[async_trait::async_trait]
pub trait RpcInvoke: RpcMethod + Sized + Send + Sync {
    async fn call(channel: &Channel, input: Self::Input) -> Result<Self::Output, RpcCallerError>;

    fn broadcast(channel: &Channel, input: Self::Input) -> Result<(), RpcCallerError>;

    fn submit(
        channel: &Channel,
        input: Self::Input,
    ) -> Result<oneshot::Receiver<Option<Self::Output>>, RpcCallerError>;
}

#[async_trait::async_trait]
impl<T> RpcInvoke for T
where
    T: RpcMethod + Send + Sync + 'static,
    T::Input: Send + 'static,
    T::Output: Send + 'static,
{
    async fn call(channel: &Channel, input: Self::Input) -> Result<Self::Output, RpcCallerError> {
        channel.call::<T>(input).await
    }

    fn broadcast(channel: &Channel, input: Self::Input) -> Result<(), RpcCallerError> {
        channel.broadcast_message::<T>(input)
    }

    fn submit(
        channel: &Channel,
        input: Self::Input,
    ) -> Result<oneshot::Receiver<Option<Self::Output>>, RpcCallerError> {
        channel.submit::<T>(input)
    }
}
