use crate::SocketAddress;
use crate::constants::{DEFAULT_HOST, DEFAULT_IO_THREADS, DEFAULT_PORT};
use std::io;
use tokio::runtime::{Builder, Runtime};

/// Per-endpoint configuration: the `(host, port, io_threads)` tuple every
/// channel and listener is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,

    /// Worker threads for the runtime built by [`EndpointConfig::build_runtime`].
    pub io_threads: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            io_threads: DEFAULT_IO_THREADS,
        }
    }
}

impl EndpointConfig {
    pub fn new(host: impl Into<String>, port: u16, io_threads: usize) -> Self {
        Self {
            host: host.into(),
            port,
            io_threads,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_io_threads(mut self, io_threads: usize) -> Self {
        self.io_threads = io_threads;
        self
    }

    /// The TCP address this endpoint binds or connects to.
    pub fn address(&self) -> SocketAddress {
        SocketAddress::tcp(self.host.clone(), self.port)
    }

    /// Builds a multi-threaded Tokio runtime with `io_threads` workers
    /// (at least one) to drive sockets created under this configuration.
    pub fn build_runtime(&self) -> io::Result<Runtime> {
        Builder::new_multi_thread()
            .worker_threads(self.io_threads.max(1))
            .thread_name("sockrpc-io")
            .enable_all()
            .build()
    }
}
