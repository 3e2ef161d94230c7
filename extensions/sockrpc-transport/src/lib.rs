//! ZeroMQ message sockets for the `sockrpc` delivery patterns.
//!
//! A [`Socket`] has a [`SocketKind`] that picks the ZeroMQ socket type and
//! so fixes how messages are routed between peers. It may bind and connect
//! to any number of [`SocketAddress`]es (`tcp://host:port` or
//! `inproc://name`), and speaks ZMTP to any other ZeroMQ peer. Each socket
//! is owned by a single background thread; the async methods only post to
//! that thread's mailbox, so a socket can be shared freely between tasks
//! without any caller-side locking.

pub mod constants;

mod config;
pub use config::EndpointConfig;

mod context;
pub use context::context;

mod error;
pub use error::TransportError;

mod mailbox;

mod peer;
pub use peer::PeerId;

mod socket;
pub use socket::{Delivery, Socket, SocketSender};

mod socket_address;
pub use socket_address::SocketAddress;

mod socket_kind;
pub use socket_kind::SocketKind;

mod socket_owner;
