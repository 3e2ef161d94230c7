use crate::TransportError;
use std::fmt;
use std::str::FromStr;

const TCP_SCHEME: &str = "tcp://";
const INPROC_SCHEME: &str = "inproc://";

/// Where a socket binds or connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SocketAddress {
    /// A TCP endpoint. `host` is stored without brackets, even for IPv6.
    /// Binding to port 0 picks an ephemeral port; the address returned by
    /// [`Socket::bind`](crate::Socket::bind) carries the actual one.
    Tcp { host: String, port: u16 },

    /// A process-local endpoint identified by name.
    InProc(String),
}

impl SocketAddress {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        SocketAddress::Tcp {
            host: host.into(),
            port,
        }
    }

    pub fn inproc(name: impl Into<String>) -> Self {
        SocketAddress::InProc(name.into())
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, SocketAddress::Tcp { host, .. } if host.contains(':'))
    }

    /// The ZeroMQ endpoint string. Port 0 becomes the `*` wildcard.
    pub(crate) fn endpoint(&self) -> String {
        match self {
            SocketAddress::Tcp { port: 0, .. } => {
                format!("{TCP_SCHEME}{}:*", self.bracketed_host())
            }
            _ => self.to_string(),
        }
    }

    fn bracketed_host(&self) -> String {
        match self {
            SocketAddress::Tcp { host, .. } if self.is_ipv6() => format!("[{host}]"),
            SocketAddress::Tcp { host, .. } => host.clone(),
            SocketAddress::InProc(name) => name.clone(),
        }
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketAddress::Tcp { port, .. } => {
                write!(f, "{TCP_SCHEME}{}:{port}", self.bracketed_host())
            }
            SocketAddress::InProc(name) => write!(f, "{INPROC_SCHEME}{name}"),
        }
    }
}

impl FromStr for SocketAddress {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransportError::InvalidAddress(s.to_string());

        if let Some(rest) = s.strip_prefix(TCP_SCHEME) {
            let (host, port) = rest.rsplit_once(':').ok_or_else(invalid)?;
            let host = match host.strip_prefix('[') {
                Some(bracketed) => bracketed.strip_suffix(']').ok_or_else(invalid)?,
                None if host.contains(':') => return Err(invalid()),
                None => host,
            };
            if host.is_empty() {
                return Err(invalid());
            }
            let port = port.parse::<u16>().map_err(|_| invalid())?;
            return Ok(SocketAddress::tcp(host, port));
        }

        if let Some(name) = s.strip_prefix(INPROC_SCHEME) {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(SocketAddress::inproc(name));
        }

        Err(invalid())
    }
}
