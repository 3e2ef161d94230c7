use sockrpc::utils::next_correlation_id;
use sockrpc_service::RpcMethod;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Completes a pending call: `Some(bytes)` is a result payload to decode,
/// `None` means the call is being given up on.
type Completion = Box<dyn FnOnce(Option<&[u8]>) + Send>;

struct PendingCall {
    method: &'static str,
    registered_at: Instant,
    complete: Completion,
}

/// Pending task submissions, keyed by correlation id.
///
/// Submitters register and the result collector resolves, each from its own
/// task. Continuations always run after the table lock is released, so a
/// continuation may itself submit more work.
#[derive(Clone, Default)]
pub struct CorrelationTable {
    pending: Arc<Mutex<HashMap<u64, PendingCall>>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `done` under a fresh correlation id and returns the id.
    ///
    /// Ids come from the process-wide counter, so they are unique across
    /// every table in the process and never reused.
    pub fn register<M, F>(&self, done: F) -> u64
    where
        M: RpcMethod + 'static,
        F: FnOnce(Option<M::Output>) + Send + 'static,
    {
        let correlation_id = next_correlation_id();

        let complete: Completion = Box::new(move |payload: Option<&[u8]>| {
            let output = payload.and_then(|bytes| match M::decode_response(bytes) {
                Ok(output) => Some(output),
                Err(err) => {
                    tracing::warn!(
                        "failed to decode {} result {}: {}",
                        M::FULL_NAME,
                        correlation_id,
                        err
                    );
                    None
                }
            });
            done(output);
        });

        self.lock().insert(
            correlation_id,
            PendingCall {
                method: M::FULL_NAME,
                registered_at: Instant::now(),
                complete,
            },
        );

        correlation_id
    }

    /// Removes the call registered under `correlation_id` and completes it
    /// with `payload`.
    ///
    /// Returns `false` for an unknown or already resolved id; the payload is
    /// dropped.
    pub fn resolve(&self, correlation_id: u64, payload: &[u8]) -> bool {
        let pending = self.lock().remove(&correlation_id);

        match pending {
            Some(call) => {
                (call.complete)(Some(payload));
                true
            }
            None => {
                tracing::trace!("no pending call for correlation id {}", correlation_id);
                false
            }
        }
    }

    /// Removes a pending call without completing it.
    pub fn discard(&self, correlation_id: u64) -> bool {
        self.lock().remove(&correlation_id).is_some()
    }

    /// Completes every call older than `horizon` with `None`. Returns how
    /// many were evicted.
    pub fn evict_expired(&self, horizon: Duration) -> usize {
        let expired: Vec<(u64, PendingCall)> = {
            let mut pending = self.lock();
            let ids: Vec<u64> = pending
                .iter()
                .filter(|(_, call)| call.registered_at.elapsed() >= horizon)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| pending.remove(&id).map(|call| (id, call)))
                .collect()
        };

        let evicted = expired.len();
        for (correlation_id, call) in expired {
            tracing::warn!(
                "{} call {} expired after {:?} without a result",
                call.method,
                correlation_id,
                horizon
            );
            (call.complete)(None);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking continuation never runs under the lock, so a poisoned
    // map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, PendingCall>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
