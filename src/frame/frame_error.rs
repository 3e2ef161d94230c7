use crate::frame::FrameKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameDecodeError {
    /// The buffer ended before the fixed header of the expected layout did.
    #[error("incomplete {kind:?} header: expected at least {expected} bytes, got {actual}")]
    IncompleteHeader {
        kind: FrameKind,
        expected: usize,
        actual: usize,
    },
}
