use crate::error::RpcServiceEndpointError;
use sockrpc::frame::{Frame, FrameCodec};
use sockrpc_transport::{PeerId, SocketSender};
use std::io;

/// Where a handler's result goes, fixed by the kind of listener that
/// received the request.
pub(crate) enum ReplyRoute {
    /// Raw result payload back to the requesting peer of a `Rep` socket.
    Peer { sender: SocketSender, peer: PeerId },

    /// `correlationId ‖ result` pushed to the submitter's collector.
    Collector {
        sender: SocketSender,
        correlation_id: u64,
    },

    /// Broadcast receivers have nobody to answer.
    Discard,
}

/// Completion callback handed to a method handler together with its
/// argument.
///
/// It may be moved to another task and completed later. Dropping it without
/// calling [`Responder::respond`] sends nothing; on an RPC server that leaves
/// the caller waiting.
pub struct Responder<O> {
    route: ReplyRoute,
    encode: fn(O) -> Result<Vec<u8>, io::Error>,
}

impl<O> Responder<O> {
    pub(crate) fn new(route: ReplyRoute, encode: fn(O) -> Result<Vec<u8>, io::Error>) -> Self {
        Self { route, encode }
    }

    /// Serializes `output` and sends it the way the receiving listener
    /// replies. Only enqueues; never waits on the network.
    pub fn respond(self, output: O) -> Result<(), RpcServiceEndpointError> {
        let payload = (self.encode)(output).map_err(RpcServiceEndpointError::Encode)?;

        match self.route {
            ReplyRoute::Peer { sender, peer } => {
                sender.send_to(peer, FrameCodec::encode(&Frame::RpcReply { payload: &payload }))?;
            }
            ReplyRoute::Collector {
                sender,
                correlation_id,
            } => {
                sender.send(FrameCodec::encode(&Frame::TaskResult {
                    correlation_id,
                    payload: &payload,
                }))?;
            }
            ReplyRoute::Discard => {
                tracing::trace!("discarding {} byte result of a broadcast", payload.len());
            }
        }

        Ok(())
    }

    /// True when [`Responder::respond`] would send nothing.
    pub fn is_discarding(&self) -> bool {
        matches!(self.route, ReplyRoute::Discard)
    }
}
