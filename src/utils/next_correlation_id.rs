use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide correlation ID counter. The first ID handed out is 1, so a
/// zero on the wire never names a live call.
static GLOBAL_CORRELATION_ID_COUNTER: Lazy<AtomicU64> = Lazy::new(|| AtomicU64::new(1));

/// Returns the next correlation ID.
///
/// IDs increase monotonically and are never reused within the lifetime of
/// the process, even across independent submitters.
#[inline]
pub fn next_correlation_id() -> u64 {
    GLOBAL_CORRELATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
