use once_cell::sync::Lazy;

static CONTEXT: Lazy<zmq::Context> = Lazy::new(zmq::Context::new);

/// The ZeroMQ context every [`Socket`](crate::Socket) in this process is
/// created in.
///
/// `inproc://` endpoints only connect sockets of the same context, so there
/// is exactly one. Raw `zmq` sockets created from it can talk to sockrpc
/// sockets over `inproc://` as well.
pub fn context() -> &'static zmq::Context {
    &CONTEXT
}
