use crate::CorrelationTable;
use crate::constants::{EXPIRY_SWEEPS_PER_HORIZON, MIN_EXPIRY_SWEEP_INTERVAL_MS};
use crate::error::RpcCallerError;
use sockrpc::frame::{FrameCodec, FrameKind};
use sockrpc_transport::{Socket, SocketAddress, SocketKind, TransportError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

/// The pull side of a task queue: receives `correlationId ‖ result` frames
/// from workers and resolves them against a [`CorrelationTable`].
///
/// Runs on its own task until dropped.
pub struct TaskResultCollector {
    local_address: SocketAddress,
    task: JoinHandle<()>,
}

impl TaskResultCollector {
    /// Binds a `Pull` socket at `address` and starts collecting.
    ///
    /// With an `expiry`, calls still pending after that long are completed
    /// with `None` by a periodic sweep.
    pub async fn bind(
        address: &SocketAddress,
        table: CorrelationTable,
        expiry: Option<Duration>,
    ) -> Result<Self, RpcCallerError> {
        let socket = Socket::new(SocketKind::Pull)?;
        let local_address = socket.bind(address).await?;
        tracing::debug!("collecting task results on {}", local_address);

        let task = tokio::spawn(collect(socket, table, expiry));

        Ok(Self {
            local_address,
            task,
        })
    }

    pub fn local_address(&self) -> &SocketAddress {
        &self.local_address
    }
}

impl Drop for TaskResultCollector {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn collect(socket: Socket, table: CorrelationTable, expiry: Option<Duration>) {
    let mut sweep = expiry.map(|horizon| (horizon, sweep_interval(horizon)));

    loop {
        tokio::select! {
            received = socket.recv() => match received {
                Ok(delivery) => resolve_result(&table, &delivery.bytes),
                Err(TransportError::Closed) => break,
                Err(err) => {
                    tracing::error!("task result collector stopped: {}", err);
                    break;
                }
            },
            horizon = next_sweep(&mut sweep) => {
                table.evict_expired(horizon);
            }
        }
    }
}

fn resolve_result(table: &CorrelationTable, bytes: &[u8]) {
    match FrameCodec::decode(FrameKind::TaskResult, bytes) {
        Ok(frame) => {
            // TaskResult frames always carry a correlation id.
            let correlation_id = frame.correlation_id().unwrap_or_default();
            table.resolve(correlation_id, frame.payload());
        }
        Err(err) => tracing::warn!("dropping task result: {}", err),
    }
}

fn sweep_interval(horizon: Duration) -> Interval {
    let period = (horizon / EXPIRY_SWEEPS_PER_HORIZON)
        .max(Duration::from_millis(MIN_EXPIRY_SWEEP_INTERVAL_MS));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Resolves with the expiry horizon at every sweep tick, or never when
/// expiry is disabled.
async fn next_sweep(sweep: &mut Option<(Duration, Interval)>) -> Duration {
    match sweep {
        Some((horizon, interval)) => {
            interval.tick().await;
            *horizon
        }
        None => std::future::pending().await,
    }
}
