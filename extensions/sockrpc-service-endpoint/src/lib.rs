mod dispatch_outcome;
pub use dispatch_outcome::DispatchOutcome;

pub mod error;

mod listener;
pub use listener::{Listener, ListenerKind};

mod method_registry;
pub use method_registry::{MethodRegistry, MethodRegistryBuilder, RegisteredMethod};

mod responder;
pub use responder::Responder;

mod service;
pub use service::Service;
