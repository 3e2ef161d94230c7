//! Call/reply: a client asks a hello server to greet a name.

use crate::DemoError;
use example_sockrpc_service_definition::{MessageString, SayHello};
use sockrpc_service_caller::{Channel, RpcInvoke};
use sockrpc_service_endpoint::{Listener, MethodRegistry, MethodRegistryBuilder, Service};
use sockrpc_transport::SocketAddress;
use std::sync::Arc;

pub struct HelloService;

impl Service for HelloService {
    const NAME: &'static str = "messaging.HelloService";

    fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder) {
        registry.register_fn::<SayHello, _>(|request| {
            tracing::info!("[HelloServer] received from client: {}", request.value);
            MessageString::new(format!("Hello {}", request.value))
        });
    }
}

/// Starts a hello server at `address`, greets `name` through it and returns
/// the greeting.
pub async fn run(address: &SocketAddress, name: &str) -> Result<MessageString, DemoError> {
    let registry = MethodRegistry::builder()
        .register_service(Arc::new(HelloService))
        .build();
    let server = Listener::rpc_server(address, Arc::new(registry)).await?;
    let server_address = server
        .local_address()
        .cloned()
        .unwrap_or_else(|| address.clone());
    let server = server.start();

    let client = Channel::call_reply(&server_address).await?;
    let greeting = SayHello::call(&client, MessageString::new(name)).await;
    tracing::info!("[HelloClient] received from server: {:?}", greeting);

    server.abort();
    Ok(greeting?)
}
