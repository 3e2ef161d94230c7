mod error;
pub use error::DemoError;

pub mod hello;

mod pubsub;
pub use pubsub::{Publisher, Subscriber};

pub mod weather;

pub mod word_count;
