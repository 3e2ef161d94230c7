use crate::MethodRegistryBuilder;
use std::sync::Arc;

/// A group of methods registered together, usually sharing state through
/// `self`.
///
/// ```rust
/// use example_sockrpc_service_definition::{Echo, MessageString};
/// use sockrpc_service_endpoint::{MethodRegistry, MethodRegistryBuilder, Service};
/// use std::sync::Arc;
///
/// struct EchoService {
///     prefix: String,
/// }
///
/// impl Service for EchoService {
///     const NAME: &'static str = "echo.EchoService";
///
///     fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder) {
///         registry.register_fn::<Echo, _>(move |input: MessageString| MessageString {
///             value: format!("{}{}", self.prefix, input.value),
///         });
///     }
/// }
///
/// let registry = MethodRegistry::builder()
///     .register_service(Arc::new(EchoService { prefix: "> ".into() }))
///     .build();
/// assert_eq!(registry.len(), 1);
/// ```
pub trait Service: Send + Sync + 'static {
    /// Fully-qualified service name, e.g. `"hello.HelloService"`.
    const NAME: &'static str;

    fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder);
}
