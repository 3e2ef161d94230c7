use crate::constants::{SOCKET_LINGER_MS, SUBSCRIBE_FLAG, UNSUBSCRIBE_FLAG};
use crate::mailbox::{Command, MailboxReceiver, Reply};
use crate::{Delivery, PeerId, SocketAddress, SocketKind, TransportError, context};
use bytes::Bytes;
use std::collections::VecDeque;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::watch;

/// A message waiting for the socket to accept it.
struct Outgoing {
    frames: Vec<Bytes>,

    /// Set for requests: where the matching reply goes.
    reply: Option<Reply<Bytes>>,
}

/// The thread that exclusively owns one ZeroMQ socket.
///
/// It sleeps in `zmq::poll` until either the socket or the mailbox doorbell
/// is readable (or, while messages are queued, the socket is writable), and
/// never blocks anywhere else. Every send is non-blocking; a message the
/// socket cannot take yet stays queued in arrival order.
pub(crate) struct SocketOwner {
    kind: SocketKind,
    socket: zmq::Socket,
    mailbox: MailboxReceiver,
    deliveries: UnboundedSender<Delivery>,
    subscribers: watch::Sender<usize>,
    outgoing: VecDeque<Outgoing>,

    // Req only: the request on the wire. The reply is read and routed here
    // even when the caller has stopped waiting, so it can never be mistaken
    // for the reply to a later request.
    in_flight: Option<Reply<Bytes>>,

    bound: Vec<String>,
}

impl SocketOwner {
    pub fn new(
        kind: SocketKind,
        mailbox: MailboxReceiver,
        deliveries: UnboundedSender<Delivery>,
        subscribers: watch::Sender<usize>,
    ) -> Result<Self, TransportError> {
        let socket = context().socket(kind.zmq_type())?;
        socket.set_linger(SOCKET_LINGER_MS)?;
        match kind {
            SocketKind::Sub => socket.set_subscribe(b"")?,
            SocketKind::Pub => socket.set_xpub_verbose(true)?,
            _ => {}
        }

        Ok(Self {
            kind,
            socket,
            mailbox,
            deliveries,
            subscribers,
            outgoing: VecDeque::new(),
            in_flight: None,
            bound: Vec::new(),
        })
    }

    pub fn run(mut self) {
        loop {
            let (commands_ready, socket_ready) = match self.poll() {
                Ok(ready) => ready,
                Err(zmq::Error::EINTR) => continue,
                Err(err) => {
                    tracing::error!("{:?} socket stopped polling: {}", self.kind, err);
                    break;
                }
            };

            if commands_ready {
                self.mailbox.drain_doorbell();
                if !self.handle_commands() {
                    break;
                }
            }
            if socket_ready {
                self.receive_all();
            }
            self.flush();
        }

        self.shutdown();
    }

    fn poll(&self) -> Result<(bool, bool), zmq::Error> {
        let mut events = zmq::PollEvents::empty();
        if self.wants_input() {
            events |= zmq::POLLIN;
        }
        if self.wants_output() {
            events |= zmq::POLLOUT;
        }

        let mut items = [
            self.mailbox.doorbell.as_poll_item(zmq::POLLIN),
            self.socket.as_poll_item(events),
        ];
        zmq::poll(&mut items, -1)?;

        Ok((items[0].is_readable(), items[1].is_readable()))
    }

    fn wants_input(&self) -> bool {
        match self.kind {
            SocketKind::Req => self.in_flight.is_some(),
            SocketKind::Push => false,
            // A Pub socket reads subscriptions.
            SocketKind::Rep | SocketKind::Pub | SocketKind::Sub | SocketKind::Pull => true,
        }
    }

    fn wants_output(&self) -> bool {
        !self.outgoing.is_empty() && !self.awaiting_reply()
    }

    fn awaiting_reply(&self) -> bool {
        self.kind == SocketKind::Req && self.in_flight.is_some()
    }

    /// Applies every queued command. Returns `false` once the socket should
    /// close.
    fn handle_commands(&mut self) -> bool {
        loop {
            let command = match self.mailbox.commands.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            };

            match command {
                Command::Bind(address, reply) => {
                    let _ = reply.send(self.bind(&address));
                }
                Command::Connect(address, reply) => {
                    let _ = reply.send(self.connect(&address));
                }
                Command::Send(bytes) => self.outgoing.push_back(Outgoing {
                    frames: vec![bytes],
                    reply: None,
                }),
                Command::SendTo(peer, bytes) => {
                    let mut frames = peer.envelope().to_vec();
                    frames.push(bytes);
                    self.outgoing.push_back(Outgoing {
                        frames,
                        reply: None,
                    });
                }
                Command::Request(bytes, reply) => self.outgoing.push_back(Outgoing {
                    frames: vec![bytes],
                    reply: Some(reply),
                }),
                Command::Close => return false,
            }
        }
    }

    fn bind(&mut self, address: &SocketAddress) -> Result<SocketAddress, TransportError> {
        self.socket.set_ipv6(address.is_ipv6())?;
        let endpoint = address.endpoint();
        self.socket.bind(&endpoint).map_err(|err| match err {
            zmq::Error::EADDRINUSE => TransportError::AddressInUse(address.clone()),
            err => TransportError::Zmq(err),
        })?;

        // The last endpoint carries the port the OS picked for a wildcard.
        let bound = self.socket.get_last_endpoint()?.unwrap_or(endpoint);
        tracing::debug!("{:?} socket bound to {}", self.kind, bound);
        self.bound.push(bound.clone());
        bound.parse()
    }

    fn connect(&mut self, address: &SocketAddress) -> Result<(), TransportError> {
        self.socket.set_ipv6(address.is_ipv6())?;
        self.socket.connect(&address.endpoint())?;
        tracing::debug!("{:?} socket connecting to {}", self.kind, address);
        Ok(())
    }

    /// Sends queued messages until the socket pushes back.
    fn flush(&mut self) {
        while let Some(next) = self.outgoing.front() {
            if self.awaiting_reply() {
                return;
            }
            if next.reply.as_ref().is_some_and(|reply| reply.is_closed()) {
                tracing::trace!("dropping request abandoned before it was sent");
                self.outgoing.pop_front();
                continue;
            }

            let sent = self
                .socket
                .send_multipart(next.frames.iter().map(|frame| &frame[..]), zmq::DONTWAIT);
            match sent {
                Ok(()) => {
                    if let Some(message) = self.outgoing.pop_front() {
                        self.in_flight = message.reply;
                    }
                }
                Err(zmq::Error::EAGAIN) => return,
                Err(err) => {
                    tracing::warn!("{:?} socket dropped a message: {}", self.kind, err);
                    if let Some(Outgoing {
                        reply: Some(reply), ..
                    }) = self.outgoing.pop_front()
                    {
                        let _ = reply.send(Err(err.into()));
                    }
                }
            }
        }
    }

    fn receive_all(&mut self) {
        loop {
            // A Req socket has exactly one message to read per request.
            if self.kind == SocketKind::Req && self.in_flight.is_none() {
                return;
            }
            match self.socket.recv_multipart(zmq::DONTWAIT) {
                Ok(frames) => self.handle_incoming(frames.into_iter().map(Bytes::from).collect()),
                Err(zmq::Error::EAGAIN) => return,
                Err(err) => {
                    tracing::warn!("{:?} socket receive failed: {}", self.kind, err);
                    return;
                }
            }
        }
    }

    fn handle_incoming(&mut self, mut frames: Vec<Bytes>) {
        match self.kind {
            SocketKind::Req => {
                let reply = frames.pop().unwrap_or_default();
                if let Some(waiting) = self.in_flight.take() {
                    if waiting.send(Ok(reply)).is_err() {
                        tracing::debug!("discarding the reply to an abandoned request");
                    }
                }
            }
            SocketKind::Rep => {
                let Some(bytes) = frames.pop() else {
                    return;
                };
                if frames.is_empty() {
                    tracing::warn!("dropping a request without a routing envelope");
                    return;
                }
                self.deliver(Delivery {
                    peer: Some(PeerId::new(frames)),
                    bytes,
                });
            }
            SocketKind::Sub | SocketKind::Pull => {
                if frames.len() > 1 {
                    tracing::trace!("keeping the last of {} frames", frames.len());
                }
                if let Some(bytes) = frames.pop() {
                    self.deliver(Delivery { peer: None, bytes });
                }
            }
            SocketKind::Pub => self.track_subscription(&frames),
            SocketKind::Push => {}
        }
    }

    /// Counts subscribers from the subscription messages an XPUB socket
    /// reads. Only the departure of the last subscriber is reported, as a
    /// single unsubscription, so the count resets to zero then.
    fn track_subscription(&self, frames: &[Bytes]) {
        match frames.first().and_then(|frame| frame.first()) {
            Some(&SUBSCRIBE_FLAG) => {
                self.subscribers.send_modify(|count| *count += 1);
            }
            Some(&UNSUBSCRIBE_FLAG) => {
                self.subscribers.send_replace(0);
            }
            _ => {}
        }
    }

    fn deliver(&self, delivery: Delivery) {
        if self.deliveries.send(delivery).is_err() {
            tracing::trace!("{:?} socket inbox closed", self.kind);
        }
    }

    fn shutdown(self) {
        for endpoint in &self.bound {
            if let Err(err) = self.socket.unbind(endpoint) {
                tracing::debug!("failed to unbind {}: {}", endpoint, err);
            }
        }
        tracing::debug!("{:?} socket closed", self.kind);
    }
}
