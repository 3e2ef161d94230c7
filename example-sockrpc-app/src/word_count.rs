//! Task queue: a master hands documents to a pool of workers, which count
//! their words and push the counts back.

use crate::DemoError;
use example_sockrpc_service_definition::{MessageCount, MessageString, WordCount};
use rand::Rng;
use sockrpc_service_caller::{Channel, TaskQueueConfig};
use sockrpc_service_endpoint::{Listener, MethodRegistry, MethodRegistryBuilder, Service};
use sockrpc_transport::SocketAddress;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_WORKER_COUNT: usize = 10;

pub struct WordCountService {
    node_id: usize,
}

impl WordCountService {
    pub fn new(node_id: usize) -> Self {
        Self { node_id }
    }
}

impl Service for WordCountService {
    const NAME: &'static str = "messaging.WordCountService";

    fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder) {
        registry.register_fn::<WordCount, _>(move |document| {
            tracing::debug!("work performed by node {}", self.node_id);
            MessageCount {
                count: count_words(&document.value),
            }
        });
    }
}

pub fn count_words(document: &str) -> u64 {
    document.split_whitespace().count() as u64
}

/// A lowercase word of 3 to 10 letters.
pub fn random_word(rng: &mut impl Rng) -> String {
    let length = rng.random_range(3..=10);
    (0..length)
        .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
        .collect()
}

/// Up to 25 random words separated by spaces.
pub fn random_document(rng: &mut impl Rng) -> String {
    let words = rng.random_range(0..26);
    (0..words)
        .map(|_| random_word(rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Starts `worker_count` workers, connected to a word-count channel bound at
/// the given addresses.
pub async fn start_workers(
    task_address: &SocketAddress,
    result_address: &SocketAddress,
    worker_count: usize,
) -> Result<Vec<JoinHandle<()>>, DemoError> {
    let mut workers = Vec::with_capacity(worker_count);
    for node_id in 0..worker_count {
        let registry = MethodRegistry::builder()
            .register_service(Arc::new(WordCountService::new(node_id)))
            .build();
        let worker = Listener::worker(task_address, result_address, Arc::new(registry)).await?;
        workers.push(worker.start());
    }
    Ok(workers)
}

/// Submits `documents` to a pool of `worker_count` workers and returns the
/// total number of words they counted.
pub async fn run(
    task_address: &SocketAddress,
    result_address: &SocketAddress,
    documents: &[String],
    worker_count: usize,
) -> Result<u64, DemoError> {
    let master = Channel::task_submit(task_address, result_address, TaskQueueConfig::default()).await?;
    let (Some(bound_tasks), Some(bound_results)) = (master.local_address(), master.result_address())
    else {
        return Err(DemoError::MissingResult("task queue addresses"));
    };
    let workers = start_workers(bound_tasks, bound_results, worker_count).await?;

    let total = Arc::new(AtomicU64::new(0));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    for document in documents {
        tracing::debug!("sending document: {:?}", document);
        let total = total.clone();
        let done_tx = done_tx.clone();
        master
            .invoke::<WordCount, _>(MessageString::new(document.as_str()), move |count| {
                if let Some(count) = count {
                    let sum = total.fetch_add(count.count, Ordering::Relaxed) + count.count;
                    tracing::info!("current count: {}", sum);
                }
                let _ = done_tx.send(count.is_some());
            })
            .await;
    }
    drop(done_tx);

    let mut completed = 0;
    while let Some(resolved) = done_rx.recv().await {
        if !resolved {
            return Err(DemoError::MissingResult("word count"));
        }
        completed += 1;
        if completed == documents.len() {
            break;
        }
    }

    workers.iter().for_each(JoinHandle::abort);
    Ok(total.load(Ordering::Relaxed))
}
