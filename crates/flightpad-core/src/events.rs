//! Asynchronous client event types.
//!
//! Events are emitted by the session client and the beacon listener
//! through a `tokio::sync::broadcast` channel when observable state
//! changes. UI layers subscribe to these instead of polling. Delivery is
//! best-effort through a bounded channel; slow consumers may miss events.

use std::net::Ipv4Addr;

/// An event emitted when the engine's observable state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The liveness monitor judged the session connected: inbound traffic
    /// arrived within the liveness window.
    Connected,

    /// The liveness monitor judged the session disconnected: the liveness
    /// window elapsed with no inbound traffic, or the session was torn
    /// down.
    Disconnected,

    /// A simulator instance not seen before announced itself via a
    /// discovery beacon.
    InstanceDiscovered {
        /// Address embedded in the beacon payload.
        ip: Ipv4Addr,
        /// Command port embedded in the beacon payload.
        port: u16,
    },
}
