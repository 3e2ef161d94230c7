use crate::error::RpcServiceEndpointError;
use crate::responder::ReplyRoute;
use crate::{DispatchOutcome, MethodRegistry};
use sockrpc::frame::{FrameCodec, FrameKind};
use sockrpc_transport::{Delivery, Socket, SocketAddress, SocketKind, SocketSender, TransportError};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Which receive loop a [`Listener`] runs, and so which frame layout it
/// expects and where handler results go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    /// Answers call/reply requests on a bound `Rep` socket.
    RpcServer,

    /// Receives broadcasts on a `Sub` socket; results are discarded.
    Subscriber,

    /// Pulls tasks and pushes `correlationId ‖ result` to a collector.
    Worker,
}

impl ListenerKind {
    pub const fn request_frame_kind(self) -> FrameKind {
        match self {
            ListenerKind::RpcServer | ListenerKind::Subscriber => FrameKind::RpcRequest,
            ListenerKind::Worker => FrameKind::TaskRequest,
        }
    }
}

/// The receive side of an endpoint: one socket, one registry, one loop that
/// handles frames strictly in arrival order.
pub struct Listener {
    kind: ListenerKind,
    socket: Socket,
    reply_sender: Option<SocketSender>,
    local_address: Option<SocketAddress>,
    registry: Arc<MethodRegistry>,

    // Keeps the worker's connection to the collector open.
    _result_socket: Option<Socket>,
}

impl Listener {
    /// Binds a `Rep` socket at `address`.
    pub async fn rpc_server(
        address: &SocketAddress,
        registry: Arc<MethodRegistry>,
    ) -> Result<Self, RpcServiceEndpointError> {
        let socket = Socket::new(SocketKind::Rep)?;
        let bound = socket.bind(address).await?;
        tracing::debug!("RPC server listening on {} with {} methods", bound, registry.len());

        Ok(Self {
            kind: ListenerKind::RpcServer,
            reply_sender: Some(socket.sender()),
            socket,
            local_address: Some(bound),
            registry,
            _result_socket: None,
        })
    }

    /// Connects a `Sub` socket to a broadcaster at `address`.
    pub async fn subscriber(
        address: &SocketAddress,
        registry: Arc<MethodRegistry>,
    ) -> Result<Self, RpcServiceEndpointError> {
        let socket = Socket::new(SocketKind::Sub)?;
        socket.connect(address).await?;

        Ok(Self {
            kind: ListenerKind::Subscriber,
            socket,
            reply_sender: None,
            local_address: None,
            registry,
            _result_socket: None,
        })
    }

    /// Joins a task queue: pulls tasks from `task_address` and pushes
    /// results to the collector at `result_address`.
    pub async fn worker(
        task_address: &SocketAddress,
        result_address: &SocketAddress,
        registry: Arc<MethodRegistry>,
    ) -> Result<Self, RpcServiceEndpointError> {
        let results = Socket::new(SocketKind::Push)?;
        results.connect(result_address).await?;

        let socket = Socket::new(SocketKind::Pull)?;
        socket.connect(task_address).await?;

        Ok(Self {
            kind: ListenerKind::Worker,
            socket,
            reply_sender: Some(results.sender()),
            local_address: None,
            registry,
            _result_socket: Some(results),
        })
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// The address an RPC server actually bound (with the OS-assigned port
    /// if it asked for port 0).
    pub fn local_address(&self) -> Option<&SocketAddress> {
        self.local_address.as_ref()
    }

    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    pub fn socket(&self) -> &Socket {
        &self.socket
    }

    /// Handles exactly one received frame.
    ///
    /// The handler runs before this returns; whatever it does with its
    /// [`Responder`](crate::Responder) only enqueues. Nothing that arrives
    /// here can make the listener stop.
    pub fn dispatch(&self, delivery: Delivery) -> DispatchOutcome {
        let frame = match FrameCodec::decode(self.kind.request_frame_kind(), &delivery.bytes) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!("dropping malformed {:?} frame: {}", self.kind, err);
                return DispatchOutcome::MalformedFrame;
            }
        };

        // Both request layouts carry an op-code.
        let op_code = frame.op_code().unwrap_or_default();

        let Some(method) = self.registry.get(op_code) else {
            tracing::trace!("dropping frame with unknown op-code {:#010x}", op_code);
            return DispatchOutcome::UnknownOpCode(op_code);
        };

        let route = match (self.kind, &self.reply_sender, frame.correlation_id()) {
            (ListenerKind::RpcServer, Some(sender), _) => match delivery.peer {
                Some(peer) => ReplyRoute::Peer {
                    sender: sender.clone(),
                    peer,
                },
                None => {
                    tracing::warn!("request without a peer to answer; discarding its result");
                    ReplyRoute::Discard
                }
            },
            (ListenerKind::Worker, Some(sender), Some(correlation_id)) => ReplyRoute::Collector {
                sender: sender.clone(),
                correlation_id,
            },
            _ => ReplyRoute::Discard,
        };

        match method.invoke(frame.payload(), route) {
            Ok(()) => DispatchOutcome::Handled,
            Err(err) => {
                tracing::warn!(
                    "dropping malformed {} payload: {}",
                    method.descriptor().full_name,
                    err
                );
                DispatchOutcome::MalformedPayload(op_code)
            }
        }
    }

    /// Receives and dispatches frames until the socket closes.
    pub async fn run(&self) -> Result<(), RpcServiceEndpointError> {
        loop {
            let delivery = match self.socket.recv().await {
                Ok(delivery) => delivery,
                Err(TransportError::Closed) => return Ok(()),
                Err(err) => return Err(err.into()),
            };
            self.dispatch(delivery);
        }
    }

    /// Runs the receive loop on its own task. Aborting the returned handle
    /// stops the loop and closes the listener's sockets.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(err) = self.run().await {
                tracing::error!("{:?} listener stopped: {}", self.kind, err);
            }
        })
    }
}
