use crate::{MessageCount, MessageString};
use sockrpc_service::rpc_method;

rpc_method!(
    /// Counts the whitespace-separated words of a document.
    pub WordCount,
    "messaging.WordCountService.WordCount",
    MessageString => MessageCount
);

rpc_method!(
    pub StringLength,
    "messaging.StringService.StringLength",
    MessageString => MessageCount
);
