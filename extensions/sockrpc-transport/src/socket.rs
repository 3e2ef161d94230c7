use crate::mailbox::{Command, Mailbox};
use crate::socket_owner::SocketOwner;
use crate::{PeerId, SocketAddress, SocketKind, TransportError};
use bytes::Bytes;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::{Mutex, oneshot, watch};

/// One message received by a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The requester to reply to. Only set on `Rep` sockets.
    pub peer: Option<PeerId>,
    pub bytes: Bytes,
}

/// Sends through a socket without borrowing it. Cheap to clone; every clone
/// posts to the same owning thread.
#[derive(Clone)]
pub struct SocketSender {
    kind: SocketKind,
    mailbox: Mailbox,
}

impl SocketSender {
    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    pub fn send(&self, bytes: impl Into<Bytes>) -> Result<(), TransportError> {
        post_send(self.kind, &self.mailbox, bytes.into())
    }

    pub fn send_to(&self, peer: PeerId, bytes: impl Into<Bytes>) -> Result<(), TransportError> {
        post_send_to(self.kind, &self.mailbox, peer, bytes.into())
    }
}

/// A ZeroMQ socket of a fixed [`SocketKind`].
///
/// The underlying `zmq::Socket` lives on a dedicated thread; every method
/// here only posts to that thread's mailbox, so a `Socket` can be shared
/// between tasks without caller-side locking. Dropping it closes the socket,
/// unbinds its endpoints and fails any request still waiting.
pub struct Socket {
    kind: SocketKind,
    mailbox: Mailbox,
    inbox: Mutex<UnboundedReceiver<Delivery>>,
    subscribers: watch::Receiver<usize>,
    owner: Option<JoinHandle<()>>,
}

impl Socket {
    pub fn new(kind: SocketKind) -> Result<Self, TransportError> {
        let (mailbox, mailbox_rx) = Mailbox::open()?;
        let (deliveries_tx, deliveries_rx) = mpsc::unbounded_channel();
        let (subscribers_tx, subscribers_rx) = watch::channel(0);

        let owner = SocketOwner::new(kind, mailbox_rx, deliveries_tx, subscribers_tx)?;
        let owner = thread::Builder::new()
            .name(format!("sockrpc-{kind:?}").to_lowercase())
            .spawn(move || owner.run())?;

        Ok(Self {
            kind,
            mailbox,
            inbox: Mutex::new(deliveries_rx),
            subscribers: subscribers_rx,
            owner: Some(owner),
        })
    }

    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    /// Starts accepting connections on `address`.
    ///
    /// Returns the address actually bound, which differs from `address` only
    /// when a TCP port of `0` asked the OS to pick one.
    pub async fn bind(&self, address: &SocketAddress) -> Result<SocketAddress, TransportError> {
        let (reply, bound) = oneshot::channel();
        self.mailbox.post(Command::Bind(address.clone(), reply))?;
        bound.await.map_err(|_| TransportError::Closed)?
    }

    /// Connects to `address`. The connection itself is made, and remade
    /// after failures, in the background; messages sent meanwhile are
    /// queued where the socket kind allows it. An `inproc://` address may
    /// be connected before it is bound.
    pub async fn connect(&self, address: &SocketAddress) -> Result<(), TransportError> {
        let (reply, connected) = oneshot::channel();
        self.mailbox.post(Command::Connect(address.clone(), reply))?;
        connected.await.map_err(|_| TransportError::Closed)?
    }

    /// Queues `bytes` for sending. Only valid on `Pub` and `Push` sockets;
    /// `Req` sockets use [`Socket::request`] and `Rep` sockets reply with
    /// [`Socket::send_to`].
    pub fn send(&self, bytes: impl Into<Bytes>) -> Result<(), TransportError> {
        post_send(self.kind, &self.mailbox, bytes.into())
    }

    /// Sends `bytes` to one specific peer. Only valid on `Rep` sockets.
    pub fn send_to(&self, peer: PeerId, bytes: impl Into<Bytes>) -> Result<(), TransportError> {
        post_send_to(self.kind, &self.mailbox, peer, bytes.into())
    }

    /// Waits for the next message from any peer.
    pub async fn recv(&self) -> Result<Delivery, TransportError> {
        if !self.kind.can_recv() {
            return Err(TransportError::UnsupportedOperation {
                kind: self.kind,
                operation: "recv",
            });
        }
        self.inbox.lock().await.recv().await.ok_or(TransportError::Closed)
    }

    /// Sends a request and waits for its reply. Only valid on `Req` sockets.
    ///
    /// Requests from concurrent callers are sent one at a time, and each
    /// reply is handed to the caller whose request it answers. Dropping the
    /// returned future is safe at any point: a request not yet sent is
    /// skipped, and the reply to one already sent is read and discarded.
    pub async fn request(&self, bytes: impl Into<Bytes>) -> Result<Bytes, TransportError> {
        if self.kind != SocketKind::Req {
            return Err(TransportError::UnsupportedOperation {
                kind: self.kind,
                operation: "request",
            });
        }
        let (reply, answered) = oneshot::channel();
        self.mailbox.post(Command::Request(bytes.into(), reply))?;
        answered.await.map_err(|_| TransportError::Closed)?
    }

    pub fn sender(&self) -> SocketSender {
        SocketSender {
            kind: self.kind,
            mailbox: self.mailbox.clone(),
        }
    }

    /// Subscribers currently connected to a `Pub` socket.
    pub fn subscriber_count(&self) -> Result<usize, TransportError> {
        self.ensure_pub("subscriber_count")?;
        Ok(*self.subscribers.borrow())
    }

    /// Resolves once at least `count` subscribers are connected to a `Pub`
    /// socket. Messages published before a subscriber is counted may never
    /// reach it.
    pub async fn wait_for_subscribers(&self, count: usize) -> Result<(), TransportError> {
        self.ensure_pub("wait_for_subscribers")?;
        let mut subscribers = self.subscribers.clone();
        subscribers
            .wait_for(|connected| *connected >= count)
            .await
            .map(|_| ())
            .map_err(|_| TransportError::Closed)
    }

    fn ensure_pub(&self, operation: &'static str) -> Result<(), TransportError> {
        if self.kind != SocketKind::Pub {
            return Err(TransportError::UnsupportedOperation {
                kind: self.kind,
                operation,
            });
        }
        Ok(())
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        // A thread that already stopped has dropped its mailbox.
        let _ = self.mailbox.post(Command::Close);
        if let Some(owner) = self.owner.take() {
            if owner.join().is_err() {
                tracing::error!("{:?} socket thread panicked", self.kind);
            }
        }
    }
}

fn post_send(kind: SocketKind, mailbox: &Mailbox, bytes: Bytes) -> Result<(), TransportError> {
    if !kind.can_send() {
        return Err(TransportError::UnsupportedOperation {
            kind,
            operation: "send",
        });
    }
    mailbox.post(Command::Send(bytes))
}

fn post_send_to(
    kind: SocketKind,
    mailbox: &Mailbox,
    peer: PeerId,
    bytes: Bytes,
) -> Result<(), TransportError> {
    if kind != SocketKind::Rep {
        return Err(TransportError::UnsupportedOperation {
            kind,
            operation: "send_to",
        });
    }
    mailbox.post(Command::SendTo(peer, bytes))
}
