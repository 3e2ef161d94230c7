use crate::DemoError;
use sockrpc_service_caller::Channel;
use sockrpc_service_endpoint::{Listener, MethodRegistry, Service};
use sockrpc_transport::SocketAddress;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The publishing side of a pub/sub pair: a broadcast channel plus an RPC
/// server on which subscribers send requests such as "report on this
/// location".
pub struct Publisher {
    channel: Arc<Channel>,
    request_address: SocketAddress,
    request_server: JoinHandle<()>,
}

impl Publisher {
    /// Binds the broadcast channel, then serves `request_service` on
    /// `request_address`.
    ///
    /// `request_service` is built from the bound channel, so its handlers can
    /// broadcast too.
    pub async fn bind<S, F>(
        broadcast_address: &SocketAddress,
        request_address: &SocketAddress,
        request_service: F,
    ) -> Result<Self, DemoError>
    where
        S: Service,
        F: FnOnce(Arc<Channel>) -> Arc<S>,
    {
        let channel = Arc::new(Channel::broadcast(broadcast_address).await?);

        let registry = MethodRegistry::builder()
            .register_service(request_service(channel.clone()))
            .build();
        let listener = Listener::rpc_server(request_address, Arc::new(registry)).await?;
        let request_address = listener
            .local_address()
            .cloned()
            .unwrap_or_else(|| request_address.clone());

        Ok(Self {
            channel,
            request_address,
            request_server: listener.start(),
        })
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    pub fn broadcast_address(&self) -> Option<&SocketAddress> {
        self.channel.local_address()
    }

    pub fn request_address(&self) -> &SocketAddress {
        &self.request_address
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.request_server.abort();
    }
}

/// The subscribing side: a subscriber listener running `subscriber_service`
/// for every broadcast, plus an optional call/reply channel to the
/// publisher's request server.
pub struct Subscriber {
    listener: JoinHandle<()>,
    requests: Option<Channel>,
}

impl Subscriber {
    pub async fn connect<S: Service>(
        broadcast_address: &SocketAddress,
        request_address: Option<&SocketAddress>,
        subscriber_service: Arc<S>,
    ) -> Result<Self, DemoError> {
        let registry = MethodRegistry::builder()
            .register_service(subscriber_service)
            .build();
        let listener = Listener::subscriber(broadcast_address, Arc::new(registry)).await?;

        let requests = match request_address {
            Some(address) => Some(Channel::call_reply(address).await?),
            None => None,
        };

        Ok(Self {
            listener: listener.start(),
            requests,
        })
    }

    /// The channel to the publisher's request server, if one was given.
    pub fn requests(&self) -> Option<&Channel> {
        self.requests.as_ref()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
