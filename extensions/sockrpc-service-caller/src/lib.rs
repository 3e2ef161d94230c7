mod channel;
pub use channel::{Channel, DeliveryPattern};

mod collector;
pub use collector::TaskResultCollector;

pub mod constants;

mod correlation_table;
pub use correlation_table::CorrelationTable;

pub mod error;

mod rpc_invoke;
pub use rpc_invoke::RpcInvoke;

mod task_queue_config;
pub use task_queue_config::TaskQueueConfig;
