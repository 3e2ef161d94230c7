use crate::constants::{MAILBOX_ENDPOINT_PREFIX, SOCKET_LINGER_MS};
use crate::{PeerId, SocketAddress, TransportError, context};
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

static NEXT_MAILBOX_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) type Reply<T> = oneshot::Sender<Result<T, TransportError>>;

/// Everything a socket's owning thread is asked to do.
pub(crate) enum Command {
    Bind(SocketAddress, Reply<SocketAddress>),
    Connect(SocketAddress, Reply<()>),
    Send(Bytes),
    SendTo(PeerId, Bytes),
    Request(Bytes, Reply<Bytes>),
    Close,
}

/// The posting side of a socket's mailbox.
///
/// A command is queued on a channel, then a zero-length "doorbell" message
/// wakes the owning thread out of `zmq::poll`. The doorbell is a PUSH socket
/// shared by every handle; its lock only ever covers a non-blocking
/// in-process send, never the network socket.
#[derive(Clone)]
pub(crate) struct Mailbox {
    commands: UnboundedSender<Command>,
    doorbell: Arc<Mutex<zmq::Socket>>,
}

/// The owning thread's side: the queued commands and the PULL socket the
/// doorbell rings on.
pub(crate) struct MailboxReceiver {
    pub commands: UnboundedReceiver<Command>,
    pub doorbell: zmq::Socket,
}

impl Mailbox {
    pub fn open() -> Result<(Mailbox, MailboxReceiver), TransportError> {
        let endpoint = format!(
            "{MAILBOX_ENDPOINT_PREFIX}{}",
            NEXT_MAILBOX_ID.fetch_add(1, Ordering::Relaxed)
        );

        let receiver = context().socket(zmq::PULL)?;
        receiver.set_linger(SOCKET_LINGER_MS)?;
        receiver.bind(&endpoint)?;

        let doorbell = context().socket(zmq::PUSH)?;
        doorbell.set_linger(SOCKET_LINGER_MS)?;
        doorbell.connect(&endpoint)?;

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        Ok((
            Mailbox {
                commands: commands_tx,
                doorbell: Arc::new(Mutex::new(doorbell)),
            },
            MailboxReceiver {
                commands: commands_rx,
                doorbell: receiver,
            },
        ))
    }

    pub fn post(&self, command: Command) -> Result<(), TransportError> {
        self.commands
            .send(command)
            .map_err(|_| TransportError::Closed)?;

        // A full doorbell queue already guarantees a wake-up.
        match self.lock_doorbell().send(&b""[..], zmq::DONTWAIT) {
            Ok(()) | Err(zmq::Error::EAGAIN) => Ok(()),
            Err(err) => {
                tracing::debug!("mailbox doorbell failed: {}", err);
                Err(TransportError::Closed)
            }
        }
    }

    // Only a non-blocking send happens under the lock, so a poisoned
    // doorbell is still usable.
    fn lock_doorbell(&self) -> MutexGuard<'_, zmq::Socket> {
        match self.doorbell.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MailboxReceiver {
    /// Empties the doorbell without blocking.
    pub fn drain_doorbell(&self) {
        while self.doorbell.recv_bytes(zmq::DONTWAIT).is_ok() {}
    }
}
