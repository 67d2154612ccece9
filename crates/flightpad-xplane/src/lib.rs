//! X-Plane UDP protocol backend for flightpad.
//!
//! This crate implements the engine behind a handheld remote control for
//! the X-Plane flight simulator. It provides:
//!
//! - **Packet codec** ([`codec`]) -- bit-exact encoding and decoding of
//!   the simulator's binary UDP frames (DATA, DREF0, CMND, DREQ, PING,
//!   BECN), pure functions with no I/O.
//! - **Beacon discovery** ([`discovery`]) -- passive listener for BECN
//!   broadcasts on UDP port 49707, maintaining a deduplicated set of
//!   simulator instances on the LAN.
//! - **Session client** ([`client`]) -- one UDP association per
//!   simulator, fire-and-forget control operations, and the
//!   traffic-driven liveness state machine.
//! - **Attitude calibration** ([`attitude`]) -- converts raw device
//!   orientation into zero-referenced, clamped control axes via
//!   quaternion composition against a calibrated reference frame.
//!
//! # Architecture
//!
//! The UI layer samples [`AttitudeCalibrator`](attitude::AttitudeCalibrator)
//! and its own widgets on a transmit timer, pushes values through
//! [`SimulatorClient`](client::SimulatorClient), and subscribes to
//! [`ClientEvent`](flightpad_core::ClientEvent)s for liveness and
//! discovery updates. Everything here is cooperative async I/O: sends
//! never block, receives are task-driven, and teardown aborts the owning
//! task so no callback outlives its component.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use flightpad_core::ControlConfig;
//! use flightpad_xplane::client::SimulatorClient;
//! use flightpad_xplane::discovery::BeaconListener;
//!
//! # async fn example() -> flightpad_core::Result<()> {
//! let listener = BeaconListener::new();
//! listener.start_listening().await?;
//! tokio::time::sleep(Duration::from_secs(3)).await;
//!
//! if let Some(instance) = listener.instances().await.first() {
//!     let client = SimulatorClient::new(ControlConfig::default());
//!     client.connect(&instance.ip.to_string(), instance.port).await?;
//!     client.send_axes(0.0, 0.0, 0.0).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod attitude;
pub mod client;
pub mod codec;
pub mod discovery;

pub use attitude::{AttitudeCalibrator, AttitudeSample, AttitudeSource, ControlAxes};
pub use client::{SessionOptions, SimulatorClient};
pub use codec::Frame;
pub use discovery::{BeaconListener, DiscoveredInstance, DISCOVERY_PORT};
