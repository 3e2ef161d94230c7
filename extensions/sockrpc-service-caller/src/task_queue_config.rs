use std::time::Duration;

/// Options for a task-submitting [`Channel`](crate::Channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQueueConfig {
    /// How long a submitted task may wait for its result before it is
    /// completed with `None`.
    ///
    /// `None` (the default) never expires anything: a task whose result
    /// never arrives stays in the correlation table for the life of the
    /// channel.
    pub expiry: Option<Duration>,
}

impl TaskQueueConfig {
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }
}
