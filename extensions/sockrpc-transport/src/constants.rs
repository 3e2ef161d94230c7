pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_IO_THREADS: usize = 1;

/// Milliseconds a closed socket keeps trying to deliver queued messages.
/// Zero discards them, so dropping a socket never blocks.
pub const SOCKET_LINGER_MS: i32 = 0;

/// Prefix of the in-process endpoint each socket's mailbox is bound to.
pub(crate) const MAILBOX_ENDPOINT_PREFIX: &str = "inproc://sockrpc-mailbox-";

/// First byte of a subscription message seen by a publishing socket.
pub(crate) const SUBSCRIBE_FLAG: u8 = 1;

/// First byte of an unsubscription message seen by a publishing socket.
pub(crate) const UNSUBSCRIBE_FLAG: u8 = 0;
