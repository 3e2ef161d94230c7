// Wire layout constants. Every integer on the wire is a big-endian u64.

/// Size in bytes of one wire integer (op-code or correlation ID).
pub const WIRE_INT_SIZE: usize = 8;

/// Byte offset of the op-code in RPC and task request frames.
pub const FRAME_OPCODE_OFFSET: usize = 0;

/// Byte offset of the correlation ID in a task request frame.
/// It directly follows the op-code.
pub const TASK_REQUEST_CORRELATION_ID_OFFSET: usize = FRAME_OPCODE_OFFSET + WIRE_INT_SIZE;

/// Byte offset of the correlation ID in a task result frame.
/// Task results carry no op-code, so the ID leads the frame.
pub const TASK_RESULT_CORRELATION_ID_OFFSET: usize = 0;

/// Fixed header size of an RPC request frame: `opcode(8)`.
pub const RPC_REQUEST_HEADER_SIZE: usize = WIRE_INT_SIZE;

/// RPC replies are the bare serialized result; pairing is left to the transport.
pub const RPC_REPLY_HEADER_SIZE: usize = 0;

/// Fixed header size of a task request frame: `opcode(8) ‖ correlationId(8)`.
pub const TASK_REQUEST_HEADER_SIZE: usize = 2 * WIRE_INT_SIZE;

/// Fixed header size of a task result frame: `correlationId(8)`.
pub const TASK_RESULT_HEADER_SIZE: usize = WIRE_INT_SIZE;

/// Seed fed to the op-code hash. Client and server must agree on it, so it
/// is never configurable.
pub const OPCODE_HASH_SEED: u32 = 0x3141_5926;
