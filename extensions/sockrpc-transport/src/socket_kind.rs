/// Routing behavior of a [`Socket`](crate::Socket), mapped onto a ZeroMQ
/// socket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketKind {
    /// Sends a request, then receives its reply, strictly alternating.
    /// Requests are spread round-robin across peers.
    Req,
    /// Receives requests from any peer and replies to the peer each request
    /// came from. Replies may be sent in any order.
    Rep,
    /// Fans every message out to all subscribers. Messages sent while no
    /// subscriber is connected are dropped.
    Pub,
    /// Receives every message published by the peers it is connected to.
    Sub,
    /// Distributes messages round-robin across connected peers, queueing them
    /// while none is connected.
    Push,
    /// Fair-queues messages pushed by all of its peers.
    Pull,
}

impl SocketKind {
    /// Kinds that accept [`Socket::send`](crate::Socket::send).
    #[inline]
    pub const fn can_send(self) -> bool {
        matches!(self, SocketKind::Pub | SocketKind::Push)
    }

    /// Kinds that accept [`Socket::recv`](crate::Socket::recv).
    #[inline]
    pub const fn can_recv(self) -> bool {
        matches!(self, SocketKind::Rep | SocketKind::Sub | SocketKind::Pull)
    }

    /// `Rep` is a ROUTER so that replies can be completed out of order,
    /// and `Pub` is an XPUB so that it sees subscriptions arrive. Both stay
    /// wire-compatible with plain REQ and SUB peers.
    pub(crate) fn zmq_type(self) -> zmq::SocketType {
        match self {
            SocketKind::Req => zmq::REQ,
            SocketKind::Rep => zmq::ROUTER,
            SocketKind::Pub => zmq::XPUB,
            SocketKind::Sub => zmq::SUB,
            SocketKind::Push => zmq::PUSH,
            SocketKind::Pull => zmq::PULL,
        }
    }
}
