/// What [`Listener::dispatch`](crate::Listener::dispatch) did with one frame.
///
/// Only `Handled` reaches a handler. Every other outcome drops the frame and
/// leaves the listener ready for the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,

    /// No method is registered under the frame's op-code.
    UnknownOpCode(u64),

    /// The frame is shorter than its header.
    MalformedFrame,

    /// The payload did not decode as the method's argument type.
    MalformedPayload(u64),
}
