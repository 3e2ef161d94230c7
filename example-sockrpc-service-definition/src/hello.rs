use crate::MessageString;
use sockrpc_service::rpc_method;

rpc_method!(
    /// Replies `"Hello {name}"`.
    pub SayHello,
    "messaging.HelloService.SayHello",
    MessageString => MessageString
);
