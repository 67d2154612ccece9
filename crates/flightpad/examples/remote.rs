//! Minimal remote-control session example.
//!
//! Connects to a simulator, calibrates a synthetic attitude source, and
//! streams axes and throttle at the configured transmit rate for ten
//! seconds while reporting liveness transitions. On a real device the
//! [`AttitudeSource`] implementation would wrap the platform's motion
//! sensor; here a slow scripted sweep stands in for it.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p flightpad --example remote -- 192.168.1.19 49000
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flightpad::{
    AttitudeCalibrator, AttitudeSample, AttitudeSource, ClientEvent, ControlConfig,
    SimulatorClient,
};

/// Sweeps the "device" slowly around its roll axis.
struct SweepSensor {
    started: std::time::Instant,
}

#[async_trait]
impl AttitudeSource for SweepSensor {
    async fn sample(&self) -> Option<AttitudeSample> {
        let t = self.started.elapsed().as_secs_f32();
        Some(AttitudeSample {
            pitch: 0.0,
            roll: (t * 0.5).sin() * 0.3,
            yaw: 0.0,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args.next().as_deref().unwrap_or("49000").parse()?;

    let config = ControlConfig::for_target(host.clone(), port);
    let transmit_period = Duration::from_millis(1000 / config.transmit_rate_hz.max(1) as u64);
    let tuning = config.axes.clone();

    let client = SimulatorClient::new(config);
    client.connect(&host, port).await?;

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ClientEvent::Connected => println!("link up"),
                ClientEvent::Disconnected => println!("link down"),
                _ => {}
            }
        }
    });

    let calibrator = AttitudeCalibrator::new(Arc::new(SweepSensor {
        started: std::time::Instant::now(),
    }));
    calibrator.start_updates(Duration::from_millis(50)).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    calibrator
        .calibrate(tuning.max_pitch_deg, tuning.max_roll_deg, tuning.max_yaw_deg)
        .await;
    println!("calibrated; streaming to {}:{} for 10 seconds", host, port);

    let mut ticker = tokio::time::interval(transmit_period);
    for tick in 0..(10_000 / transmit_period.as_millis().max(1)) {
        ticker.tick().await;
        let axes = calibrator.axes().await;
        client.send_axes(axes.pitch, axes.roll, axes.yaw).await?;
        client.send_throttle(0.6).await?;
        if tick % 10 == 0 {
            client.ping().await?;
        }
    }

    calibrator.stop_updates().await;
    client.disconnect().await;
    Ok(())
}
