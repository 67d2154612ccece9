//! # flightpad -- remote flight controls over UDP
//!
//! `flightpad` turns device-orientation samples and UI gestures into
//! X-Plane UDP control packets. It discovers simulator instances through
//! their broadcast beacons, maintains a liveness-monitored session to a
//! chosen host, and converts calibrated device attitude into normalized
//! control axes.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use flightpad::{BeaconListener, ControlConfig, SimulatorClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Find simulators on the LAN.
//!     let listener = BeaconListener::new();
//!     listener.start_listening().await?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     listener.stop_listening().await;
//!
//!     let Some(instance) = listener.instances().await.first().copied() else {
//!         println!("no simulator found");
//!         return Ok(());
//!     };
//!
//!     // Fly.
//!     let client = SimulatorClient::new(ControlConfig::default());
//!     client.connect(&instance.ip.to_string(), instance.port).await?;
//!     client.send_throttle(0.6).await?;
//!     client.send_axes(0.0, -0.1, 0.0).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate               | Purpose                                          |
//! |----------------------|--------------------------------------------------|
//! | `flightpad-core`     | Configuration, events, errors                    |
//! | `flightpad-xplane`   | Protocol engine: codec, discovery, session, attitude |
//! | **`flightpad`**      | This facade crate -- re-exports everything       |
//!
//! The visible interface (sliders, buttons, orientation-lock handling)
//! and settings persistence are deliberately outside this library; they
//! consume it through [`SimulatorClient`], [`AttitudeCalibrator`] and the
//! [`ClientEvent`] subscription.

pub use flightpad_core::{
    AxisTuning, ClientEvent, ControlBindings, ControlConfig, ControlToggles, Error, Result,
};
pub use flightpad_xplane::{
    attitude, client, codec, discovery, AttitudeCalibrator, AttitudeSample, AttitudeSource,
    BeaconListener, ControlAxes, DiscoveredInstance, Frame, SessionOptions, SimulatorClient,
    DISCOVERY_PORT,
};
