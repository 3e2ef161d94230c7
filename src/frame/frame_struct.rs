use crate::frame::FrameKind;
use crate::opcode::OpCode;

/// A single message as it travels on the wire.
///
/// Frames borrow their payload: encoding copies it once into the outgoing
/// buffer, and decoding hands back a sub-slice of the received buffer so the
/// argument or result can be deserialized in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Call/Reply and Broadcast request.
    RpcRequest { op_code: OpCode, payload: &'a [u8] },

    /// Call/Reply response. Which request it answers is implied by the
    /// request/reply socket, so it carries no header at all.
    RpcReply { payload: &'a [u8] },

    /// Task submitted to a worker pool.
    TaskRequest {
        op_code: OpCode,
        correlation_id: u64,
        payload: &'a [u8],
    },

    /// Task outcome pushed from a worker to the submitter's collector.
    TaskResult { correlation_id: u64, payload: &'a [u8] },
}

impl<'a> Frame<'a> {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::RpcRequest { .. } => FrameKind::RpcRequest,
            Frame::RpcReply { .. } => FrameKind::RpcReply,
            Frame::TaskRequest { .. } => FrameKind::TaskRequest,
            Frame::TaskResult { .. } => FrameKind::TaskResult,
        }
    }

    pub fn op_code(&self) -> Option<OpCode> {
        match *self {
            Frame::RpcRequest { op_code, .. } | Frame::TaskRequest { op_code, .. } => {
                Some(op_code)
            }
            _ => None,
        }
    }

    pub fn correlation_id(&self) -> Option<u64> {
        match *self {
            Frame::TaskRequest { correlation_id, .. }
            | Frame::TaskResult { correlation_id, .. } => Some(correlation_id),
            _ => None,
        }
    }

    /// The serialized argument or result carried by the frame.
    pub fn payload(&self) -> &'a [u8] {
        match *self {
            Frame::RpcRequest { payload, .. }
            | Frame::RpcReply { payload }
            | Frame::TaskRequest { payload, .. }
            | Frame::TaskResult { payload, .. } => payload,
        }
    }
}
