use crate::error::RpcCallerError;
use crate::{CorrelationTable, TaskQueueConfig, TaskResultCollector};
use sockrpc::frame::{Frame, FrameCodec};
use sockrpc_service::RpcMethod;
use sockrpc_transport::{Socket, SocketAddress, SocketKind};
use tokio::sync::oneshot;

const TASK_SUBMIT: &str = "task submit";

/// What a [`Channel`] does after handing a frame to its socket.
#[derive(Clone)]
pub enum DeliveryPattern {
    /// Wait on the same socket for the single reply.
    CallReply,

    /// Fire and forget to every subscriber.
    Broadcast,

    /// Register a continuation under a correlation id and return at once;
    /// the collector completes it when the worker's result arrives.
    TaskSubmit { correlation: CorrelationTable },
}

impl DeliveryPattern {
    pub fn name(&self) -> &'static str {
        match self {
            DeliveryPattern::CallReply => "call/reply",
            DeliveryPattern::Broadcast => "broadcast",
            DeliveryPattern::TaskSubmit { .. } => TASK_SUBMIT,
        }
    }

    /// The socket kind that carries this pattern's requests.
    pub fn socket_kind(&self) -> SocketKind {
        match self {
            DeliveryPattern::CallReply => SocketKind::Req,
            DeliveryPattern::Broadcast => SocketKind::Pub,
            DeliveryPattern::TaskSubmit { .. } => SocketKind::Push,
        }
    }
}

/// The send side of an endpoint: one socket and the delivery pattern that
/// decides how requests on it are framed and completed.
pub struct Channel {
    socket: Socket,
    pattern: DeliveryPattern,
    local_address: Option<SocketAddress>,
    collector: Option<TaskResultCollector>,
}

impl Channel {
    /// Connects a call/reply channel to an RPC server at `address`.
    pub async fn call_reply(address: &SocketAddress) -> Result<Self, RpcCallerError> {
        let pattern = DeliveryPattern::CallReply;
        let socket = Socket::new(pattern.socket_kind())?;
        socket.connect(address).await?;

        Ok(Self {
            socket,
            pattern,
            local_address: None,
            collector: None,
        })
    }

    /// Binds a broadcast channel at `address` for subscribers to connect to.
    pub async fn broadcast(address: &SocketAddress) -> Result<Self, RpcCallerError> {
        let pattern = DeliveryPattern::Broadcast;
        let socket = Socket::new(pattern.socket_kind())?;
        let bound = socket.bind(address).await?;
        tracing::debug!("broadcasting on {}", bound);

        Ok(Self {
            socket,
            pattern,
            local_address: Some(bound),
            collector: None,
        })
    }

    /// Binds the task distribution socket at `task_address` and a result
    /// collector at `result_address`. Workers connect to both.
    pub async fn task_submit(
        task_address: &SocketAddress,
        result_address: &SocketAddress,
        config: TaskQueueConfig,
    ) -> Result<Self, RpcCallerError> {
        let correlation = CorrelationTable::new();
        let collector =
            TaskResultCollector::bind(result_address, correlation.clone(), config.expiry).await?;

        let pattern = DeliveryPattern::TaskSubmit { correlation };
        let socket = Socket::new(pattern.socket_kind())?;
        let bound = socket.bind(task_address).await?;
        tracing::debug!(
            "submitting tasks on {}, results on {}",
            bound,
            collector.local_address()
        );

        Ok(Self {
            socket,
            pattern,
            local_address: Some(bound),
            collector: Some(collector),
        })
    }

    pub fn pattern(&self) -> &DeliveryPattern {
        &self.pattern
    }

    /// The address a broadcast or task channel actually bound.
    pub fn local_address(&self) -> Option<&SocketAddress> {
        self.local_address.as_ref()
    }

    /// The address a task channel's collector actually bound.
    pub fn result_address(&self) -> Option<&SocketAddress> {
        self.collector.as_ref().map(TaskResultCollector::local_address)
    }

    /// Subscribers connected to a broadcast channel.
    pub fn subscriber_count(&self) -> Result<usize, RpcCallerError> {
        Ok(self.socket.subscriber_count()?)
    }

    /// Resolves once `count` subscribers are connected to a broadcast
    /// channel. Broadcasts sent before a subscriber is counted are lost.
    pub async fn wait_for_subscribers(&self, count: usize) -> Result<(), RpcCallerError> {
        Ok(self.socket.wait_for_subscribers(count).await?)
    }

    /// Task submissions still waiting for their result. Always zero for
    /// other patterns.
    pub fn pending_count(&self) -> usize {
        match &self.pattern {
            DeliveryPattern::TaskSubmit { correlation } => correlation.len(),
            _ => 0,
        }
    }

    /// Invokes `M` with `input` according to the channel's delivery pattern
    /// and hands the outcome to `done`.
    ///
    /// - Call/reply: waits for the reply, then calls `done(Some(output))`.
    ///   Any transport or codec failure calls `done(None)` instead.
    /// - Broadcast: calls `done(None)` once the frame is enqueued, or once
    ///   enqueueing it has failed.
    /// - Task submit: returns as soon as the task is enqueued; `done` runs
    ///   on the collector's task when the result arrives.
    ///
    /// Never fails. Errors that cannot reach `done` are logged; a task that
    /// could not be sent stays pending (and is only ever completed by expiry,
    /// if configured).
    pub async fn invoke<M, F>(&self, input: M::Input, done: F)
    where
        M: RpcMethod + 'static,
        F: FnOnce(Option<M::Output>) + Send + 'static,
    {
        match &self.pattern {
            DeliveryPattern::CallReply => match self.request::<M>(input).await {
                Ok(output) => done(Some(output)),
                Err(err) => {
                    tracing::warn!("{} call failed: {}", M::FULL_NAME, err);
                    done(None);
                }
            },
            DeliveryPattern::Broadcast => {
                if let Err(err) = self.publish::<M>(input) {
                    tracing::error!("{} broadcast failed: {}", M::FULL_NAME, err);
                }
                done(None);
            }
            DeliveryPattern::TaskSubmit { correlation } => {
                let payload = match M::encode_request(input) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::warn!("failed to encode {} task: {}", M::FULL_NAME, err);
                        done(None);
                        return;
                    }
                };
                let correlation_id = correlation.register::<M, F>(done);
                if let Err(err) = self.push_task::<M>(correlation_id, &payload) {
                    tracing::error!(
                        "{} task {} could not be sent and stays pending: {}",
                        M::FULL_NAME,
                        correlation_id,
                        err
                    );
                }
            }
        }
    }

    /// Calls `M` on the connected server and waits for its result.
    ///
    /// Concurrent calls on one channel are served one at a time. Dropping
    /// the returned future abandons the call without affecting later ones.
    pub async fn call<M>(&self, input: M::Input) -> Result<M::Output, RpcCallerError>
    where
        M: RpcMethod,
    {
        if !matches!(self.pattern, DeliveryPattern::CallReply) {
            return Err(self.mismatch("call", DeliveryPattern::CallReply.name()));
        }
        self.request::<M>(input).await
    }

    /// Broadcasts `M` with `input` to every connected subscriber.
    pub fn broadcast_message<M>(&self, input: M::Input) -> Result<(), RpcCallerError>
    where
        M: RpcMethod,
    {
        if !matches!(self.pattern, DeliveryPattern::Broadcast) {
            return Err(self.mismatch("broadcast_message", DeliveryPattern::Broadcast.name()));
        }
        self.publish::<M>(input)
    }

    /// Submits `M` with `input` to the worker pool. The returned receiver
    /// yields the result, or `None` if it failed to decode or expired.
    pub fn submit<M>(
        &self,
        input: M::Input,
    ) -> Result<oneshot::Receiver<Option<M::Output>>, RpcCallerError>
    where
        M: RpcMethod + 'static,
        M::Output: Send + 'static,
    {
        let DeliveryPattern::TaskSubmit { correlation } = &self.pattern else {
            return Err(self.mismatch("submit", TASK_SUBMIT));
        };

        let payload = M::encode_request(input).map_err(RpcCallerError::Encode)?;
        let (result_tx, result_rx) = oneshot::channel();
        let correlation_id = correlation.register::<M, _>(move |output| {
            let _ = result_tx.send(output);
        });

        if let Err(err) = self.push_task::<M>(correlation_id, &payload) {
            correlation.discard(correlation_id);
            return Err(err);
        }

        Ok(result_rx)
    }

    async fn request<M: RpcMethod>(&self, input: M::Input) -> Result<M::Output, RpcCallerError> {
        let payload = M::encode_request(input).map_err(RpcCallerError::Encode)?;
        let frame = FrameCodec::encode(&Frame::RpcRequest {
            op_code: M::OP_CODE,
            payload: &payload,
        });

        let reply = self.socket.request(frame).await?;
        tracing::trace!("{} reply of {} bytes", M::FULL_NAME, reply.len());

        // A reply is the bare result payload.
        M::decode_response(&reply).map_err(RpcCallerError::Decode)
    }

    fn publish<M: RpcMethod>(&self, input: M::Input) -> Result<(), RpcCallerError> {
        let payload = M::encode_request(input).map_err(RpcCallerError::Encode)?;
        let frame = FrameCodec::encode(&Frame::RpcRequest {
            op_code: M::OP_CODE,
            payload: &payload,
        });
        Ok(self.socket.send(frame)?)
    }

    fn push_task<M: RpcMethod>(
        &self,
        correlation_id: u64,
        payload: &[u8],
    ) -> Result<(), RpcCallerError> {
        let frame = FrameCodec::encode(&Frame::TaskRequest {
            op_code: M::OP_CODE,
            correlation_id,
            payload,
        });
        Ok(self.socket.send(frame)?)
    }

    fn mismatch(&self, operation: &'static str, expected: &'static str) -> RpcCallerError {
        RpcCallerError::PatternMismatch {
            operation,
            expected,
            actual: self.pattern.name(),
        }
    }
}
