use bytes::Bytes;
use sockrpc_transport::{Socket, SocketAddress, SocketKind, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

async fn recv_bytes(socket: &Socket) -> Bytes {
    timeout(WAIT, socket.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("socket closed")
        .bytes
}

/// Replies to every request with its bytes, after `delay` for requests
/// equal to `b"slow"`. Each reply is sent from its own task so slow and
/// fast requests complete out of order.
fn spawn_echo(rep: Socket, delay: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let rep = Arc::new(rep);
        while let Ok(delivery) = rep.recv().await {
            let rep = rep.clone();
            tokio::spawn(async move {
                if delivery.bytes.as_ref() == b"slow" {
                    sleep(delay).await;
                }
                let peer = delivery.peer.expect("rep deliveries carry a peer");
                let _ = rep.send_to(peer, delivery.bytes);
            });
        }
    })
}

#[tokio::test]
async fn test_inproc_request_reply() {
    let address = SocketAddress::inproc("socket-tests-req-rep");
    let rep = Socket::new(SocketKind::Rep).unwrap();
    rep.bind(&address).await.unwrap();

    let req = Socket::new(SocketKind::Req).unwrap();
    req.connect(&address).await.unwrap();

    let server = tokio::spawn(async move {
        let delivery = rep.recv().await.unwrap();
        let mut reply = delivery.bytes.to_vec();
        reply.reverse();
        rep.send_to(delivery.peer.unwrap(), reply).unwrap();
        rep
    });

    let reply = timeout(WAIT, req.request(&b"abc"[..])).await.unwrap().unwrap();
    assert_eq!(reply, Bytes::from_static(b"cba"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_inproc_connect_before_bind() {
    let address = SocketAddress::inproc("socket-tests-late-bind");
    let push = Socket::new(SocketKind::Push).unwrap();
    push.connect(&address).await.unwrap();
    push.send(&b"waiting"[..]).unwrap();

    let pull = Socket::new(SocketKind::Pull).unwrap();
    pull.bind(&address).await.unwrap();

    assert_eq!(recv_bytes(&pull).await, Bytes::from_static(b"waiting"));
}

#[tokio::test]
async fn test_abandoned_request_reply_is_not_handed_to_the_next_request() {
    let address = SocketAddress::inproc("socket-tests-abandoned-request");
    let rep = Socket::new(SocketKind::Rep).unwrap();
    rep.bind(&address).await.unwrap();
    let _server = spawn_echo(rep, Duration::from_millis(200));

    let req = Socket::new(SocketKind::Req).unwrap();
    req.connect(&address).await.unwrap();

    let abandoned = timeout(Duration::from_millis(50), req.request(&b"slow"[..])).await;
    assert!(abandoned.is_err(), "the slow request should have timed out");

    // Let the late reply arrive before the next request goes out.
    sleep(Duration::from_millis(300)).await;
    let reply = timeout(WAIT, req.request(&b"fast"[..])).await.unwrap().unwrap();
    assert_eq!(reply, Bytes::from_static(b"fast"));
}

#[tokio::test]
async fn test_request_queued_behind_an_abandoned_one_gets_its_own_reply() {
    let address = SocketAddress::inproc("socket-tests-queued-request");
    let rep = Socket::new(SocketKind::Rep).unwrap();
    rep.bind(&address).await.unwrap();
    let _server = spawn_echo(rep, Duration::from_millis(200));

    let req = Socket::new(SocketKind::Req).unwrap();
    req.connect(&address).await.unwrap();

    let abandoned = timeout(Duration::from_millis(50), req.request(&b"slow"[..])).await;
    assert!(abandoned.is_err());

    // Sent right away, so it waits for the abandoned reply to be drained.
    let reply = timeout(WAIT, req.request(&b"fast"[..])).await.unwrap().unwrap();
    assert_eq!(reply, Bytes::from_static(b"fast"));
}

#[tokio::test]
async fn test_concurrent_requests_each_get_their_own_reply() {
    let address = SocketAddress::inproc("socket-tests-concurrent-requests");
    let rep = Socket::new(SocketKind::Rep).unwrap();
    rep.bind(&address).await.unwrap();
    let _server = spawn_echo(rep, Duration::ZERO);

    let req = Arc::new(Socket::new(SocketKind::Req).unwrap());
    req.connect(&address).await.unwrap();

    let mut calls = Vec::new();
    for n in 0..8u8 {
        let req = req.clone();
        calls.push(tokio::spawn(async move {
            (n, req.request(vec![n]).await.unwrap())
        }));
    }
    for call in calls {
        let (n, reply) = timeout(WAIT, call).await.unwrap().unwrap();
        assert_eq!(reply.as_ref(), &[n]);
    }
}

#[tokio::test]
async fn test_pub_fans_out_to_every_subscriber() {
    let address = SocketAddress::inproc("socket-tests-fan-out");
    let publisher = Socket::new(SocketKind::Pub).unwrap();
    publisher.bind(&address).await.unwrap();

    let first = Socket::new(SocketKind::Sub).unwrap();
    let second = Socket::new(SocketKind::Sub).unwrap();
    first.connect(&address).await.unwrap();
    second.connect(&address).await.unwrap();

    timeout(WAIT, publisher.wait_for_subscribers(2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(publisher.subscriber_count().unwrap(), 2);
    publisher.send(&b"X"[..]).unwrap();

    assert_eq!(recv_bytes(&first).await, Bytes::from_static(b"X"));
    assert_eq!(recv_bytes(&second).await, Bytes::from_static(b"X"));
}

#[tokio::test]
async fn test_pub_drops_messages_sent_before_any_subscriber() {
    let address = SocketAddress::inproc("socket-tests-slow-joiner");
    let publisher = Socket::new(SocketKind::Pub).unwrap();
    publisher.bind(&address).await.unwrap();
    publisher.send(&b"lost"[..]).unwrap();

    let subscriber = Socket::new(SocketKind::Sub).unwrap();
    subscriber.connect(&address).await.unwrap();
    timeout(WAIT, publisher.wait_for_subscribers(1))
        .await
        .unwrap()
        .unwrap();
    publisher.send(&b"kept"[..]).unwrap();

    assert_eq!(recv_bytes(&subscriber).await, Bytes::from_static(b"kept"));
}

#[tokio::test]
async fn test_push_queues_until_a_worker_connects() {
    let address = SocketAddress::inproc("socket-tests-push-queue");
    let push = Socket::new(SocketKind::Push).unwrap();
    push.bind(&address).await.unwrap();
    push.send(&b"early"[..]).unwrap();

    let pull = Socket::new(SocketKind::Pull).unwrap();
    pull.connect(&address).await.unwrap();

    assert_eq!(recv_bytes(&pull).await, Bytes::from_static(b"early"));
}

#[tokio::test]
async fn test_push_distributes_across_workers() {
    let address = SocketAddress::inproc("socket-tests-push-round-robin");
    let push = Socket::new(SocketKind::Push).unwrap();
    push.bind(&address).await.unwrap();

    let first = Socket::new(SocketKind::Pull).unwrap();
    let second = Socket::new(SocketKind::Pull).unwrap();
    first.connect(&address).await.unwrap();
    second.connect(&address).await.unwrap();

    for n in 0..4u8 {
        push.send(vec![n]).unwrap();
    }

    let mut first_got = vec![recv_bytes(&first).await, recv_bytes(&first).await];
    let mut second_got = vec![recv_bytes(&second).await, recv_bytes(&second).await];
    first_got.sort();
    second_got.sort();
    assert_ne!(first_got, second_got);
}

#[tokio::test]
async fn test_pull_fair_queues_from_many_pushers() {
    let address = SocketAddress::inproc("socket-tests-fan-in");
    let pull = Socket::new(SocketKind::Pull).unwrap();
    pull.bind(&address).await.unwrap();

    let mut pushers = Vec::new();
    for n in 0..3u8 {
        let push = Socket::new(SocketKind::Push).unwrap();
        push.connect(&address).await.unwrap();
        push.send(vec![n]).unwrap();
        pushers.push(push);
    }

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(recv_bytes(&pull).await[0]);
    }
    received.sort();
    assert_eq!(received, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_tcp_request_reply_on_os_assigned_port() {
    let rep = Socket::new(SocketKind::Rep).unwrap();
    let bound = rep.bind(&SocketAddress::tcp("127.0.0.1", 0)).await.unwrap();
    match &bound {
        SocketAddress::Tcp { port, .. } => assert_ne!(*port, 0),
        other => panic!("unexpected address {other}"),
    }
    let _server = spawn_echo(rep, Duration::ZERO);

    let req = Socket::new(SocketKind::Req).unwrap();
    req.connect(&bound).await.unwrap();

    let large = vec![7u8; 256 * 1024];
    let small = timeout(WAIT, req.request(&b"ping"[..])).await.unwrap().unwrap();
    let echoed = timeout(WAIT, req.request(large.clone())).await.unwrap().unwrap();

    assert_eq!(small, Bytes::from_static(b"ping"));
    assert_eq!(echoed.to_vec(), large);
}

#[tokio::test]
async fn test_tcp_request_connected_before_the_server_binds() {
    // Reserve a port, then free it for the server.
    let bound = {
        let placeholder = Socket::new(SocketKind::Rep).unwrap();
        placeholder
            .bind(&SocketAddress::tcp("127.0.0.1", 0))
            .await
            .unwrap()
    };

    let req = Socket::new(SocketKind::Req).unwrap();
    req.connect(&bound).await.unwrap();
    let pending = tokio::spawn(async move { req.request(&b"early"[..]).await });

    sleep(Duration::from_millis(100)).await;
    let rep = Socket::new(SocketKind::Rep).unwrap();
    rep.bind(&bound).await.unwrap();
    let _server = spawn_echo(rep, Duration::ZERO);

    let reply = timeout(WAIT, pending).await.unwrap().unwrap().unwrap();
    assert_eq!(reply, Bytes::from_static(b"early"));
}

#[tokio::test]
async fn test_tcp_pub_sub() {
    let publisher = Socket::new(SocketKind::Pub).unwrap();
    let bound = publisher
        .bind(&SocketAddress::tcp("127.0.0.1", 0))
        .await
        .unwrap();

    let subscriber = Socket::new(SocketKind::Sub).unwrap();
    subscriber.connect(&bound).await.unwrap();
    timeout(WAIT, publisher.wait_for_subscribers(1))
        .await
        .unwrap()
        .unwrap();

    publisher.send(&b"weather"[..]).unwrap();
    assert_eq!(recv_bytes(&subscriber).await, Bytes::from_static(b"weather"));
}

#[tokio::test]
async fn test_subscriber_count_resets_when_the_last_subscriber_leaves() {
    let address = SocketAddress::inproc("socket-tests-subscriber-count");
    let publisher = Socket::new(SocketKind::Pub).unwrap();
    publisher.bind(&address).await.unwrap();

    let subscriber = Socket::new(SocketKind::Sub).unwrap();
    subscriber.connect(&address).await.unwrap();
    timeout(WAIT, publisher.wait_for_subscribers(1))
        .await
        .unwrap()
        .unwrap();

    drop(subscriber);
    timeout(WAIT, async {
        while publisher.subscriber_count().unwrap() != 0 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_binding_a_bound_inproc_name_fails_until_released() {
    let address = SocketAddress::inproc("socket-tests-in-use");
    let first = Socket::new(SocketKind::Rep).unwrap();
    first.bind(&address).await.unwrap();

    let second = Socket::new(SocketKind::Rep).unwrap();
    let err = second.bind(&address).await.unwrap_err();
    assert!(matches!(err, TransportError::AddressInUse(_)));

    drop(first);
    second.bind(&address).await.unwrap();
}

#[tokio::test]
async fn test_binding_a_bound_tcp_port_fails() {
    let first = Socket::new(SocketKind::Pull).unwrap();
    let bound = first.bind(&SocketAddress::tcp("127.0.0.1", 0)).await.unwrap();

    let second = Socket::new(SocketKind::Pull).unwrap();
    let err = second.bind(&bound).await.unwrap_err();
    assert!(matches!(err, TransportError::AddressInUse(address) if address == bound));
}

#[tokio::test]
async fn test_kind_restrictions() {
    let sub = Socket::new(SocketKind::Sub).unwrap();
    assert!(matches!(
        sub.send(&b"x"[..]),
        Err(TransportError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        sub.subscriber_count(),
        Err(TransportError::UnsupportedOperation { .. })
    ));

    let publisher = Socket::new(SocketKind::Pub).unwrap();
    assert!(matches!(
        publisher.recv().await,
        Err(TransportError::UnsupportedOperation { .. })
    ));

    let push = Socket::new(SocketKind::Push).unwrap();
    assert!(matches!(
        push.request(&b"x"[..]).await,
        Err(TransportError::UnsupportedOperation { .. })
    ));

    let req = Socket::new(SocketKind::Req).unwrap();
    assert!(matches!(
        req.send(&b"x"[..]),
        Err(TransportError::UnsupportedOperation { .. })
    ));
}

#[tokio::test]
async fn test_sender_clone_routes_through_socket() {
    let address = SocketAddress::inproc("socket-tests-sender");
    let push = Socket::new(SocketKind::Push).unwrap();
    push.bind(&address).await.unwrap();
    let pull = Socket::new(SocketKind::Pull).unwrap();
    pull.connect(&address).await.unwrap();

    let sender = push.sender();
    tokio::spawn(async move { sender.send(&b"from task"[..]).unwrap() })
        .await
        .unwrap();

    assert_eq!(recv_bytes(&pull).await, Bytes::from_static(b"from task"));
}

#[tokio::test]
async fn test_plain_zmq_req_talks_to_rep_socket_over_tcp() {
    let rep = Socket::new(SocketKind::Rep).unwrap();
    let bound = rep.bind(&SocketAddress::tcp("127.0.0.1", 0)).await.unwrap();
    let _server = spawn_echo(rep, Duration::ZERO);

    // A separate context: the only thing shared is the TCP connection.
    let endpoint = bound.to_string();
    let reply = tokio::task::spawn_blocking(move || {
        let context = zmq::Context::new();
        let req = context.socket(zmq::REQ).unwrap();
        req.set_linger(0).unwrap();
        req.set_rcvtimeo(5_000).unwrap();
        req.connect(&endpoint).unwrap();
        req.send(&b"over the wire"[..], 0).unwrap();
        req.recv_bytes(0).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(reply, b"over the wire");
}

#[tokio::test]
async fn test_plain_zmq_pub_reaches_sub_socket_over_inproc() {
    let address = SocketAddress::inproc("socket-tests-plain-pub");
    let subscriber = Socket::new(SocketKind::Sub).unwrap();
    subscriber.connect(&address).await.unwrap();

    let publisher = sockrpc_transport::context().socket(zmq::PUB).unwrap();
    publisher.set_linger(0).unwrap();
    publisher.bind(&address.to_string()).unwrap();

    // Plain PUB has no subscriber count; resend until the subscription lands.
    let received = timeout(WAIT, async {
        loop {
            publisher.send(&b"tick"[..], zmq::DONTWAIT).unwrap();
            if let Ok(Ok(delivery)) =
                timeout(Duration::from_millis(20), subscriber.recv()).await
            {
                return delivery.bytes;
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(received, Bytes::from_static(b"tick"));
}
