use crate::{
    constants::{
        FRAME_OPCODE_OFFSET, TASK_REQUEST_CORRELATION_ID_OFFSET,
        TASK_RESULT_CORRELATION_ID_OFFSET, WIRE_INT_SIZE,
    },
    frame::{Frame, FrameDecodeError, FrameKind},
};

/// Encodes and decodes the four wire layouts.
///
/// All header integers are 8-byte big-endian. There are no magic bytes and
/// no version field; a deployment mixing incompatible method sets simply
/// sees unknown op-codes.
pub struct FrameCodec;

impl FrameCodec {
    /// Serializes a frame into a freshly allocated buffer.
    pub fn encode(frame: &Frame) -> Vec<u8> {
        let payload = frame.payload();
        let mut buf = Vec::with_capacity(frame.kind().header_size() + payload.len());

        if let Some(op_code) = frame.op_code() {
            buf.extend_from_slice(&op_code.to_be_bytes());
        }
        if let Some(correlation_id) = frame.correlation_id() {
            buf.extend_from_slice(&correlation_id.to_be_bytes());
        }
        buf.extend_from_slice(payload);

        buf
    }

    /// Parses `buf` as a frame of the given layout.
    ///
    /// The returned frame borrows its payload from `buf`. An empty payload is
    /// valid; a buffer shorter than the layout's header is not.
    pub fn decode(kind: FrameKind, buf: &[u8]) -> Result<Frame<'_>, FrameDecodeError> {
        let header_size = kind.header_size();
        if buf.len() < header_size {
            return Err(FrameDecodeError::IncompleteHeader {
                kind,
                expected: header_size,
                actual: buf.len(),
            });
        }

        let payload = &buf[header_size..];

        let frame = match kind {
            FrameKind::RpcRequest => Frame::RpcRequest {
                op_code: read_wire_int(buf, FRAME_OPCODE_OFFSET),
                payload,
            },
            FrameKind::RpcReply => Frame::RpcReply { payload },
            FrameKind::TaskRequest => Frame::TaskRequest {
                op_code: read_wire_int(buf, FRAME_OPCODE_OFFSET),
                correlation_id: read_wire_int(buf, TASK_REQUEST_CORRELATION_ID_OFFSET),
                payload,
            },
            FrameKind::TaskResult => Frame::TaskResult {
                correlation_id: read_wire_int(buf, TASK_RESULT_CORRELATION_ID_OFFSET),
                payload,
            },
        };

        Ok(frame)
    }
}

/// Reads one big-endian wire integer. Callers have already checked that
/// `buf` covers the whole header.
#[inline]
fn read_wire_int(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; WIRE_INT_SIZE];
    bytes.copy_from_slice(&buf[offset..offset + WIRE_INT_SIZE]);
    u64::from_be_bytes(bytes)
}
