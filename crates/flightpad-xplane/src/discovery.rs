//! Simulator discovery via BECN UDP broadcasts.
//!
//! Running simulator instances advertise themselves by broadcasting BECN
//! frames to UDP port 49707. [`BeaconListener`] passively listens on that
//! port and maintains a deduplicated, insertion-ordered set of discovered
//! instances. Listening is a plain Idle → Listening → Idle machine;
//! the discovered set survives stop/start and is only emptied by an
//! explicit [`clear`](BeaconListener::clear).
//!
//! The endpoint is taken from the beacon payload (4 raw IP bytes plus a
//! big-endian port), not from the datagram's source address; see the
//! decoder in [`crate::codec`]. Anything that does not decode as a beacon
//! is expected broadcast noise and is dropped silently.

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::{broadcast, Mutex};

use flightpad_core::error::{Error, Result};
use flightpad_core::events::ClientEvent;

use crate::codec::{self, Frame};

/// UDP port simulator instances broadcast discovery beacons on.
pub const DISCOVERY_PORT: u16 = 49707;

/// Broadcast channel capacity for discovery event subscribers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A simulator instance seen on the local network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscoveredInstance {
    /// Address the instance advertised.
    pub ip: Ipv4Addr,
    /// Command port the instance advertised.
    pub port: u16,
}

impl std::fmt::Display for DiscoveredInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Passive listener for simulator discovery beacons.
pub struct BeaconListener {
    /// Discovered instances, unique by (ip, port), in first-seen order.
    discovered: Arc<Mutex<Vec<DiscoveredInstance>>>,
    /// Background receive task while Listening.
    listener: Mutex<Option<tokio::task::JoinHandle<()>>>,
    /// Event broadcast channel sender.
    event_tx: broadcast::Sender<ClientEvent>,
}

impl Default for BeaconListener {
    fn default() -> Self {
        Self::new()
    }
}

impl BeaconListener {
    /// Create a listener in the Idle state with an empty discovered set.
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            discovered: Arc::new(Mutex::new(Vec::new())),
            listener: Mutex::new(None),
            event_tx,
        }
    }

    /// Start listening for beacons on the standard discovery port.
    ///
    /// Idempotent: if already Listening this is a no-op. A bind failure is
    /// reported once and leaves the listener Idle; there is no retry.
    pub async fn start_listening(&self) -> Result<()> {
        self.start_listening_on(DISCOVERY_PORT).await
    }

    /// Start listening on a specific port.
    ///
    /// This variant lets tests feed mock beacons over loopback on an
    /// unprivileged port.
    pub async fn start_listening_on(&self, port: u16) -> Result<()> {
        let mut listener = self.listener.lock().await;
        if listener.is_some() {
            return Ok(());
        }

        let bind_addr = format!("0.0.0.0:{}", port);
        let socket = UdpSocket::bind(&bind_addr).await.map_err(|e| {
            tracing::error!(addr = %bind_addr, error = %e, "Failed to bind beacon listener");
            Error::Transport(format!("failed to bind beacon listener on {}: {}", bind_addr, e))
        })?;

        tracing::debug!(port = port, "Listening for simulator beacons");

        let discovered = Arc::clone(&self.discovered);
        let event_tx = self.event_tx.clone();
        *listener = Some(tokio::spawn(async move {
            beacon_loop(socket, discovered, event_tx).await;
        }));

        Ok(())
    }

    /// Stop listening and return to Idle.
    ///
    /// Idempotent and safe to call concurrently with an in-flight receive;
    /// no further beacons are processed afterwards. The discovered set is
    /// retained.
    pub async fn stop_listening(&self) {
        let mut listener = self.listener.lock().await;
        if let Some(task) = listener.take() {
            task.abort();
            tracing::debug!("Beacon listener stopped");
        }
    }

    /// Whether the listener is currently in the Listening state.
    pub async fn is_listening(&self) -> bool {
        self.listener.lock().await.is_some()
    }

    /// Snapshot of the discovered instances, in first-seen order.
    pub async fn instances(&self) -> Vec<DiscoveredInstance> {
        self.discovered.lock().await.clone()
    }

    /// Explicitly empty the discovered set.
    pub async fn clear(&self) {
        self.discovered.lock().await.clear();
    }

    /// Subscribe to [`ClientEvent::InstanceDiscovered`] notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.event_tx.subscribe()
    }
}

/// Receive loop: decode each datagram and record first sightings.
async fn beacon_loop(
    socket: UdpSocket,
    discovered: Arc<Mutex<Vec<DiscoveredInstance>>>,
    event_tx: broadcast::Sender<ClientEvent>,
) {
    let mut buf = [0u8; 1024];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((n, _src)) => match codec::decode(&buf[..n]) {
                Some(Frame::Beacon { ip, port }) => {
                    let instance = DiscoveredInstance { ip, port };
                    let mut set = discovered.lock().await;
                    if !set.contains(&instance) {
                        tracing::debug!(instance = %instance, "Discovered simulator instance");
                        set.push(instance);
                        let _ = event_tx.send(ClientEvent::InstanceDiscovered { ip, port });
                    }
                }
                _ => {
                    // Not a beacon -- expected noise on a broadcast port.
                    tracing::trace!(len = n, "Ignoring non-beacon datagram");
                }
            },
            Err(e) => {
                tracing::trace!(error = %e, "Beacon recv error");
            }
        }
    }
}
