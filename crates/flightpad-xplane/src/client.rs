//! UDP session client for a simulator instance.
//!
//! [`SimulatorClient`] owns one outbound/inbound UDP association to a
//! chosen host, exposes the high-level control operations (axes, throttle,
//! the toggle controls) by delegating to [`crate::codec`], and runs the
//! liveness state machine.
//!
//! Every control operation is pure fire-and-forget: encode, send, done.
//! No acknowledgment is awaited and nothing is retried -- the transport is
//! unreliable UDP and the design accepts that. Liveness is derived purely
//! from inbound traffic: a background receive loop timestamps every
//! datagram that arrives (whatever its content), and an independent
//! periodic task recomputes the connected flag from the elapsed time since
//! that timestamp. A send never sets the flag.
//!
//! There is no automatic reconnect: a transport failure is logged once and
//! leaves the client inert until the caller decides to `connect` again.

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;

use flightpad_core::config::ControlConfig;
use flightpad_core::error::{Error, Result};
use flightpad_core::events::ClientEvent;

use crate::codec::{self, INDEX_AXES, INDEX_THROTTLE, INDEX_TRIM_FLAP_SPEEDBRAKE};

/// Default liveness window: no inbound traffic for this long means
/// disconnected.
const DEFAULT_LIVENESS_WINDOW: Duration = Duration::from_secs(5);

/// Default period of the liveness re-evaluation task.
const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_secs(1);

/// Broadcast channel capacity for ClientEvent subscribers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timing options for the liveness state machine.
///
/// The defaults match the simulator's beacon cadence; tests shrink them to
/// keep runtimes short.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Maximum allowed gap since the last inbound datagram.
    pub liveness_window: Duration,
    /// How often the connected flag is recomputed.
    pub liveness_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            liveness_window: DEFAULT_LIVENESS_WINDOW,
            liveness_interval: DEFAULT_LIVENESS_INTERVAL,
        }
    }
}

/// Client for one UDP control session with a simulator instance.
///
/// Safe to share across tasks; all mutable state sits behind `Arc`ed
/// interior mutability.
pub struct SimulatorClient {
    /// The consolidated control configuration, replaceable as one value.
    config: Arc<Mutex<ControlConfig>>,

    /// Current UDP association; `None` while disconnected/inert.
    socket: Arc<Mutex<Option<Arc<UdpSocket>>>>,

    /// When the last inbound datagram arrived. `None` is "distant past":
    /// freshly connected sessions stay disconnected until traffic arrives.
    last_inbound: Arc<Mutex<Option<Instant>>>,

    /// Derived liveness flag (atomic for lock-free reads).
    connected: Arc<AtomicBool>,

    /// Event broadcast channel sender.
    event_tx: broadcast::Sender<ClientEvent>,

    /// Background receive task.
    recv_task: Mutex<Option<tokio::task::JoinHandle<()>>>,

    /// Periodic liveness-evaluation task.
    liveness_task: Mutex<Option<tokio::task::JoinHandle<()>>>,

    /// Serializes connect/teardown so two establish sequences can never
    /// interleave and orphan each other's tasks.
    session_guard: Mutex<()>,

    /// Liveness timing.
    options: SessionOptions,
}

impl SimulatorClient {
    /// Create a disconnected client with the given configuration.
    pub fn new(config: ControlConfig) -> Self {
        Self::with_options(config, SessionOptions::default())
    }

    /// Create a disconnected client with custom liveness timing.
    pub fn with_options(config: ControlConfig, options: SessionOptions) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(Mutex::new(config)),
            socket: Arc::new(Mutex::new(None)),
            last_inbound: Arc::new(Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(false)),
            event_tx,
            recv_task: Mutex::new(None),
            liveness_task: Mutex::new(None),
            session_guard: Mutex::new(()),
            options,
        }
    }

    /// Establish the UDP association to `host:port`.
    ///
    /// Any prior association is torn down first -- its socket and both of
    /// its timers go away before the new ones exist, so old and new
    /// liveness timers never overlap. Concurrent calls serialize, so the
    /// later caller tears down whatever the earlier one established. The
    /// liveness clock restarts from the distant past: the session reads as
    /// disconnected until the first inbound datagram.
    ///
    /// A host that does not parse, or a socket that cannot be created, is
    /// reported once and leaves the client inert; reconnecting is the
    /// caller's policy.
    pub async fn connect(&self, host: &str, port: u16) -> Result<()> {
        let _session = self.session_guard.lock().await;
        self.teardown().await;

        let ip: IpAddr = host.parse().map_err(|_| {
            tracing::warn!(host = %host, "Host does not parse; client stays inert");
            Error::InvalidParameter(format!("unparseable host: {host}"))
        })?;

        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create session socket");
            Error::Transport(format!("failed to create session socket: {}", e))
        })?;
        socket.connect((ip, port)).await.map_err(|e| {
            tracing::error!(addr = %ip, port = port, error = %e, "Failed to associate session socket");
            Error::Transport(format!("failed to associate with {}:{}: {}", ip, port, e))
        })?;
        let socket = Arc::new(socket);

        {
            let mut last = self.last_inbound.lock().await;
            *last = None;
        }
        {
            let mut slot = self.socket.lock().await;
            *slot = Some(Arc::clone(&socket));
        }

        // Receive loop: any inbound datagram, whatever its content, is the
        // liveness signal.
        {
            let last_inbound = Arc::clone(&self.last_inbound);
            let mut recv_task = self.recv_task.lock().await;
            if let Some(old) = recv_task.replace(tokio::spawn(async move {
                recv_loop(socket, last_inbound).await;
            })) {
                old.abort();
            }
        }

        // Liveness evaluation on its own fixed period, independent of the
        // receive loop.
        {
            let socket = Arc::clone(&self.socket);
            let last_inbound = Arc::clone(&self.last_inbound);
            let connected = Arc::clone(&self.connected);
            let event_tx = self.event_tx.clone();
            let window = self.options.liveness_window;
            let interval = self.options.liveness_interval;
            let mut liveness_task = self.liveness_task.lock().await;
            if let Some(old) = liveness_task.replace(tokio::spawn(async move {
                liveness_loop(socket, last_inbound, connected, event_tx, window, interval).await;
            })) {
                old.abort();
            }
        }

        tracing::debug!(addr = %ip, port = port, "Session established");
        Ok(())
    }

    /// Tear down the session.
    ///
    /// Idempotent: safe to call repeatedly, from any state, and
    /// concurrently with in-flight callbacks; no callback fires after this
    /// returns.
    pub async fn disconnect(&self) {
        let _session = self.session_guard.lock().await;
        self.teardown().await;
        tracing::debug!("Session torn down");
    }

    async fn teardown(&self) {
        {
            let mut task = self.recv_task.lock().await;
            if let Some(t) = task.take() {
                t.abort();
            }
        }
        {
            let mut task = self.liveness_task.lock().await;
            if let Some(t) = task.take() {
                t.abort();
            }
        }
        {
            let mut slot = self.socket.lock().await;
            *slot = None;
        }
        if self.connected.swap(false, Ordering::SeqCst) {
            let _ = self.event_tx.send(ClientEvent::Disconnected);
        }
    }

    /// Whether the liveness monitor currently judges the session alive.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Subscribe to liveness transition events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> ControlConfig {
        self.config.lock().await.clone()
    }

    /// Replace the configuration as one value.
    pub async fn set_config(&self, config: ControlConfig) {
        let mut cfg = self.config.lock().await;
        *cfg = config;
    }

    // -- Control operations (fire-and-forget) ------------------------------

    /// Send the three primary flight-control axes.
    pub async fn send_axes(&self, pitch: f32, roll: f32, yaw: f32) -> Result<()> {
        self.send_frame(codec::encode_data(INDEX_AXES, &[pitch, roll, yaw]))
            .await
    }

    /// Send throttle, duplicated across the first four engines.
    pub async fn send_throttle(&self, value: f32) -> Result<()> {
        self.send_frame(codec::encode_data(
            INDEX_THROTTLE,
            &[value, value, value, value],
        ))
        .await
    }

    /// Write the parking-brake dataref (1.0 set, 0.0 released).
    pub async fn send_brakes(&self, on: bool) -> Result<()> {
        let dataref = self.config.lock().await.bindings.brakes_dataref.clone();
        self.send_frame(codec::encode_dref(bool_value(on), &dataref))
            .await
    }

    /// Write the gear-handle dataref (1.0 down, 0.0 up).
    pub async fn send_gear(&self, down: bool) -> Result<()> {
        let dataref = self.config.lock().await.bindings.gear_dataref.clone();
        self.send_frame(codec::encode_dref(bool_value(down), &dataref))
            .await
    }

    /// Trigger the reverse-thrust toggle command.
    ///
    /// The simulator side is a toggle; the flag only records the caller's
    /// intended state for symmetry with the other controls.
    pub async fn send_reversers(&self, _deployed: bool) -> Result<()> {
        let command = self
            .config
            .lock()
            .await
            .bindings
            .reverse_thrust_command
            .clone();
        self.send_frame(codec::encode_cmnd(&command)).await
    }

    /// Write the autothrottle dataref: 0.0 engages the servo, -1.0
    /// disengages it (the simulator's convention).
    pub async fn send_autothrottle(&self, engaged: bool) -> Result<()> {
        let dataref = self
            .config
            .lock()
            .await
            .bindings
            .autothrottle_dataref
            .clone();
        let value = if engaged { 0.0 } else { -1.0 };
        self.send_frame(codec::encode_dref(value, &dataref)).await
    }

    /// Trigger the autopilot servos toggle command.
    pub async fn send_autopilot(&self, _engaged: bool) -> Result<()> {
        let command = self.config.lock().await.bindings.autopilot_command.clone();
        self.send_frame(codec::encode_cmnd(&command)).await
    }

    /// Write the flap handle ratio.
    pub async fn send_flaps(&self, ratio: f32) -> Result<()> {
        let dataref = self.config.lock().await.bindings.flaps_dataref.clone();
        self.send_frame(codec::encode_dref(ratio, &dataref)).await
    }

    /// Write the speedbrake handle ratio.
    pub async fn send_speedbrakes(&self, ratio: f32) -> Result<()> {
        let dataref = self
            .config
            .lock()
            .await
            .bindings
            .speedbrakes_dataref
            .clone();
        self.send_frame(codec::encode_dref(ratio, &dataref)).await
    }

    /// Write elevator trim.
    pub async fn send_trim(&self, value: f32) -> Result<()> {
        let dataref = self.config.lock().await.bindings.trim_dataref.clone();
        self.send_frame(codec::encode_dref(value, &dataref)).await
    }

    /// Write speedbrakes and flaps together through the indexed
    /// trim/flap/speedbrake record.
    pub async fn send_speedbrakes_and_flaps(&self, speedbrakes: f32, flaps: f32) -> Result<()> {
        self.send_frame(codec::encode_data(
            INDEX_TRIM_FLAP_SPEEDBRAKE,
            &[0.0, flaps, 0.0, speedbrakes],
        ))
        .await
    }

    /// Send a liveness probe.
    ///
    /// Does not block for a reply; any response lands in the receive loop
    /// like every other inbound datagram.
    pub async fn ping(&self) -> Result<()> {
        self.send_frame(codec::encode_ping()).await
    }

    /// Request an indexed value group from the simulator.
    ///
    /// The reply, if any, arrives asynchronously through the receive loop.
    pub async fn request_value(&self, index: i32) -> Result<()> {
        self.send_frame(codec::encode_dreq(index)).await
    }

    /// Send an encoded frame over the current association.
    ///
    /// With no endpoint established this is a silent no-op: an unresolved
    /// or unconfigured host is a caller input-validation concern, not a
    /// session fault.
    async fn send_frame(&self, frame: Vec<u8>) -> Result<()> {
        let socket = {
            let slot = self.socket.lock().await;
            slot.as_ref().map(Arc::clone)
        };
        match socket {
            Some(socket) => {
                socket
                    .send(&frame)
                    .await
                    .map_err(|e| Error::Transport(format!("failed to send frame: {}", e)))?;
                Ok(())
            }
            None => {
                tracing::trace!(len = frame.len(), "No session endpoint; dropping frame");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Background loops
// ---------------------------------------------------------------------------

/// Timestamp every inbound datagram and re-arm. The content is irrelevant
/// here: any traffic counts as liveness.
async fn recv_loop(socket: Arc<UdpSocket>, last_inbound: Arc<Mutex<Option<Instant>>>) {
    let mut buf = [0u8; 1024];
    loop {
        match socket.recv(&mut buf).await {
            Ok(n) => {
                tracing::trace!(len = n, "Inbound datagram");
                let mut last = last_inbound.lock().await;
                *last = Some(Instant::now());
            }
            Err(e) => {
                // Transient for UDP (e.g. a port-unreachable bounce);
                // keep receiving.
                tracing::trace!(error = %e, "Session recv error");
            }
        }
    }
}

/// Recompute the connected flag on a fixed period and emit transition
/// events.
async fn liveness_loop(
    socket: Arc<Mutex<Option<Arc<UdpSocket>>>>,
    last_inbound: Arc<Mutex<Option<Instant>>>,
    connected: Arc<AtomicBool>,
    event_tx: broadcast::Sender<ClientEvent>,
    window: Duration,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        let usable = socket.lock().await.is_some();
        let fresh = {
            let last = last_inbound.lock().await;
            last.map(|t| t.elapsed() < window).unwrap_or(false)
        };
        let alive = usable && fresh;

        let was = connected.swap(alive, Ordering::SeqCst);
        if alive != was {
            tracing::debug!(connected = alive, "Liveness transition");
            let _ = event_tx.send(if alive {
                ClientEvent::Connected
            } else {
                ClientEvent::Disconnected
            });
        }
    }
}

/// 1.0 / 0.0 encoding for boolean dataref writes.
fn bool_value(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
