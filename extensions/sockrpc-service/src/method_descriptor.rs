use crate::RpcMethod;
use sockrpc::OpCode;
use std::any::type_name;
use std::fmt;

/// Identity and signature of a registered method, as logged and reported by
/// listeners. Two descriptors are the same method when their full names
/// match.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    pub full_name: &'static str,
    pub op_code: OpCode,
    pub input_type: &'static str,
    pub output_type: &'static str,
}

impl MethodDescriptor {
    pub fn of<M: RpcMethod>() -> Self {
        Self {
            full_name: M::FULL_NAME,
            op_code: M::OP_CODE,
            input_type: type_name::<M::Input>(),
            output_type: type_name::<M::Output>(),
        }
    }
}

impl PartialEq for MethodDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for MethodDescriptor {}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) -> {} [op-code {:#010x}]",
            self.full_name, self.input_type, self.output_type, self.op_code
        )
    }
}
