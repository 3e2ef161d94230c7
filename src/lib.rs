pub mod constants;
pub mod frame;
pub mod opcode;
pub mod utils;

pub use opcode::{OpCode, op_code};
