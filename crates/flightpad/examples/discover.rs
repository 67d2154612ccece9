//! Simulator LAN discovery example.
//!
//! Listens for X-Plane BECN broadcasts for a few seconds and prints every
//! simulator instance heard, deduplicated by endpoint.
//!
//! # Requirements
//!
//! - A running X-Plane instance on the same LAN
//! - UDP port 49707 accessible (not blocked by a firewall)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p flightpad --example discover
//! ```

use std::time::Duration;

use flightpad::BeaconListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Listening for simulator beacons (5 seconds)...\n");

    let listener = BeaconListener::new();
    listener.start_listening().await?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    listener.stop_listening().await;

    let instances = listener.instances().await;
    if instances.is_empty() {
        println!("No simulator instances heard.");
        println!("\nTroubleshooting:");
        println!("  - Verify the simulator is running and on the same subnet");
        println!("  - Check that UDP port 49707 is not blocked by a firewall");
        return Ok(());
    }

    println!("Found {} instance(s):\n", instances.len());
    for (i, instance) in instances.iter().enumerate() {
        println!("  [{}] {}", i + 1, instance);
    }

    Ok(())
}
