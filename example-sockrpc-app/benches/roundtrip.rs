use criterion::{Criterion, criterion_group, criterion_main};
use example_sockrpc_app::word_count;
use example_sockrpc_service_definition::{Echo, MessageString, WordCount};
use futures::{StreamExt, stream::FuturesUnordered};
use sockrpc_service_caller::{Channel, RpcInvoke, TaskQueueConfig};
use sockrpc_service_endpoint::{Listener, MethodRegistry};
use sockrpc_transport::SocketAddress;
use std::{hint::black_box, sync::Arc};
use tokio::runtime::Runtime;

fn bench_roundtrip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    // Set up server, client and task queue once
    let (client, tasks, _server, _workers) = rt.block_on(async {
        let registry = MethodRegistry::builder()
            .register_fn::<Echo, _>(|input| input)
            .build();
        let listener = Listener::rpc_server(&SocketAddress::tcp("127.0.0.1", 0), Arc::new(registry))
            .await
            .unwrap();
        let address = listener.local_address().cloned().unwrap();
        let server = listener.start();
        let client = Channel::call_reply(&address).await.unwrap();

        let tasks = Channel::task_submit(
            &SocketAddress::inproc("bench-word-count-tasks"),
            &SocketAddress::inproc("bench-word-count-results"),
            TaskQueueConfig::default(),
        )
        .await
        .unwrap();
        let workers = word_count::start_workers(
            tasks.local_address().unwrap(),
            tasks.result_address().unwrap(),
            4,
        )
        .await
        .unwrap();

        (client, tasks, server, workers)
    });

    c.bench_function("echo_call_reply_tcp_batch_10", |b| {
        b.to_async(&rt).iter(|| async {
            let mut calls = FuturesUnordered::new();

            // Calls on one channel are served one at a time.
            for _ in 0..10 {
                calls.push(Echo::call(&client, MessageString::new("ping")));
            }

            let mut results = Vec::with_capacity(10);
            while let Some(res) = calls.next().await {
                results.push(res.unwrap());
            }

            black_box(results);
        });
    });

    c.bench_function("echo_call_reply_tcp_single", |b| {
        b.to_async(&rt).iter(|| async {
            let res = Echo::call(&client, MessageString::new("ping")).await;
            black_box(res.unwrap());
        });
    });

    c.bench_function("word_count_task_queue_batch_10", |b| {
        b.to_async(&rt).iter(|| async {
            let mut pending = FuturesUnordered::new();
            for _ in 0..10 {
                pending.push(WordCount::submit(&tasks, MessageString::new("one two three")).unwrap());
            }

            while let Some(res) = pending.next().await {
                black_box(res.unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
