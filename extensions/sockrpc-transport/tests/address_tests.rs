use sockrpc_transport::{EndpointConfig, SocketAddress, TransportError};

#[test]
fn test_parse_tcp_address() {
    let address: SocketAddress = "tcp://localhost:5556".parse().unwrap();
    assert_eq!(address, SocketAddress::tcp("localhost", 5556));
    assert_eq!(address.to_string(), "tcp://localhost:5556");
}

#[test]
fn test_parse_inproc_address() {
    let address: SocketAddress = "inproc://weather".parse().unwrap();
    assert_eq!(address, SocketAddress::inproc("weather"));
    assert_eq!(address.to_string(), "inproc://weather");
}

#[test]
fn test_parse_rejects_malformed_addresses() {
    for raw in [
        "",
        "weather",
        "udp://localhost:1",
        "tcp://localhost",
        "tcp://localhost:notaport",
        "tcp://:5555",
        "inproc://",
    ] {
        let result = raw.parse::<SocketAddress>();
        assert!(
            matches!(result, Err(TransportError::InvalidAddress(_))),
            "{raw:?} should not parse"
        );
    }
}

#[test]
fn test_endpoint_config_defaults_and_setters() {
    let config = EndpointConfig::default();
    assert_eq!(config.address(), SocketAddress::tcp("127.0.0.1", 5555));
    assert_eq!(config.io_threads, 1);

    let config = EndpointConfig::new("0.0.0.0", 1, 1)
        .with_port(6000)
        .with_io_threads(4);
    assert_eq!(config.address().to_string(), "tcp://0.0.0.0:6000");
    assert_eq!(config.io_threads, 4);
}

#[test]
fn test_build_runtime_with_zero_threads_still_runs() {
    let runtime = EndpointConfig::default()
        .with_io_threads(0)
        .build_runtime()
        .unwrap();
    assert_eq!(runtime.block_on(async { 40 + 2 }), 42);
}

#[test]
fn test_parse_bracketed_ipv6_address() {
    let address: SocketAddress = "tcp://[::1]:5555".parse().unwrap();
    assert_eq!(address, SocketAddress::tcp("::1", 5555));
    assert!(address.is_ipv6());
    assert_eq!(address.to_string(), "tcp://[::1]:5555");

    let address: SocketAddress = "tcp://[fe80::1:2]:7".parse().unwrap();
    assert_eq!(address, SocketAddress::tcp("fe80::1:2", 7));
}

#[test]
fn test_parse_rejects_malformed_ipv6_addresses() {
    for raw in ["tcp://::1:5555", "tcp://[::1:5555", "tcp://[]:5555"] {
        let result = raw.parse::<SocketAddress>();
        assert!(
            matches!(result, Err(TransportError::InvalidAddress(_))),
            "{raw:?} should not parse"
        );
    }
}
