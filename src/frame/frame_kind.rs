use crate::constants::{
    RPC_REPLY_HEADER_SIZE, RPC_REQUEST_HEADER_SIZE, TASK_REQUEST_HEADER_SIZE,
    TASK_RESULT_HEADER_SIZE,
};

/// The four frame layouts that travel on the wire.
///
/// The wire carries no discriminator: a socket role only ever receives one
/// layout, so the reader always knows which one to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `opcode(8) ‖ payload`
    RpcRequest,
    /// `payload`
    RpcReply,
    /// `opcode(8) ‖ correlationId(8) ‖ payload`
    TaskRequest,
    /// `correlationId(8) ‖ payload`
    TaskResult,
}

impl FrameKind {
    /// Number of header bytes preceding the payload.
    #[inline]
    pub const fn header_size(self) -> usize {
        match self {
            FrameKind::RpcRequest => RPC_REQUEST_HEADER_SIZE,
            FrameKind::RpcReply => RPC_REPLY_HEADER_SIZE,
            FrameKind::TaskRequest => TASK_REQUEST_HEADER_SIZE,
            FrameKind::TaskResult => TASK_RESULT_HEADER_SIZE,
        }
    }

    #[inline]
    pub const fn carries_op_code(self) -> bool {
        matches!(self, FrameKind::RpcRequest | FrameKind::TaskRequest)
    }

    #[inline]
    pub const fn carries_correlation_id(self) -> bool {
        matches!(self, FrameKind::TaskRequest | FrameKind::TaskResult)
    }
}
