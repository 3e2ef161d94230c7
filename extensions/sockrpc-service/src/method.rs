use sockrpc::{OpCode, op_code};
use std::io;

/// A remotely invocable method: its fully-qualified name, argument and
/// result types, and how both are serialized.
///
/// The op-code is derived from [`RpcMethod::FULL_NAME`], so a caller and a
/// listener built from the same definition agree on it without any
/// handshake.
pub trait RpcMethod {
    /// Fully-qualified name, e.g. `"hello.HelloService.SayHello"`.
    const FULL_NAME: &'static str;

    const OP_CODE: OpCode = op_code(Self::FULL_NAME);

    /// The argument type carried in request frames.
    type Input;

    /// The result type carried in reply and task-result frames.
    type Output;

    fn encode_request(input: Self::Input) -> Result<Vec<u8>, io::Error>;

    /// Decodes a request payload (the frame bytes after the header).
    fn decode_request(bytes: &[u8]) -> Result<Self::Input, io::Error>;

    fn encode_response(output: Self::Output) -> Result<Vec<u8>, io::Error>;

    /// Decodes a result payload.
    fn decode_response(bytes: &[u8]) -> Result<Self::Output, io::Error>;
}
