use bytes::Bytes;
use std::fmt;

/// Identifies the requester behind a message received on a `Rep` socket,
/// so the reply can be routed back to it.
///
/// Holds the routing envelope ZeroMQ put in front of the request: the
/// requester's identity plus whatever delimiter frames its socket added.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId {
    envelope: Vec<Bytes>,
}

impl PeerId {
    pub(crate) fn new(envelope: Vec<Bytes>) -> Self {
        Self { envelope }
    }

    pub(crate) fn envelope(&self) -> &[Bytes] {
        &self.envelope
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("peer-")?;
        match self.envelope.first() {
            Some(identity) => identity.iter().try_for_each(|b| write!(f, "{b:02x}")),
            None => f.write_str("anonymous"),
        }
    }
}
