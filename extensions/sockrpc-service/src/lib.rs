mod codec;
pub use codec::{decode, encode};

mod macros;

mod method;
pub use method::RpcMethod;

mod method_descriptor;
pub use method_descriptor::MethodDescriptor;

pub use sockrpc::{OpCode, op_code, rpc_op_code};
