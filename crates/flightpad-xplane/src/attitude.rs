//! Attitude calibration: raw device orientation to control axes.
//!
//! The calibrator samples a device attitude sensor on a fixed period,
//! holds the latest raw attitude, and converts it on demand into a
//! zero-referenced, axis-scaled, clamped [`ControlAxes`] vector. The
//! reference frame is captured by an explicit [`calibrate`] call and the
//! relative attitude is computed by true rotation composition
//! (`reference.inverse() * current` as unit quaternions), not per-axis
//! angle subtraction -- attitude is not commutative and naive subtraction
//! misbehaves once two axes interact.
//!
//! Axis convention (device held landscape, documented baseline):
//! control pitch reads the device roll angle, control roll the device yaw
//! angle, control yaw the device pitch angle; roll and yaw are negated,
//! pitch is not. Caller-level inversion toggles live in
//! [`flightpad_core::AxisTuning`], not here.
//!
//! [`calibrate`]: AttitudeCalibrator::calibrate

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nalgebra::UnitQuaternion;
use tokio::sync::Mutex;

/// One raw attitude sample from the device sensor, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    /// Rotation about the device's lateral axis.
    pub pitch: f32,
    /// Rotation about the device's longitudinal axis.
    pub roll: f32,
    /// Rotation about the device's vertical axis.
    pub yaw: f32,
}

/// Normalized control axes, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlAxes {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

/// The device-orientation sensor feed.
///
/// Implementations wrap whatever the host platform provides. Returning
/// `None` means the sensor is unavailable; the calibrator treats that as
/// the documented degraded mode (axes stay at their last value, zero if
/// never calibrated) and never surfaces it as an error.
#[async_trait]
pub trait AttitudeSource: Send + Sync {
    /// Read the current device attitude, if the sensor is available.
    async fn sample(&self) -> Option<AttitudeSample>;
}

/// Captured reference frame plus the scale limits active with it.
///
/// Replaced atomically as one value so axes are never computed against a
/// half-updated reference.
#[derive(Debug, Clone, Copy)]
struct Reference {
    attitude: UnitQuaternion<f32>,
    max_pitch_deg: f32,
    max_roll_deg: f32,
    max_yaw_deg: f32,
}

#[derive(Debug)]
struct CalibratorState {
    /// Latest raw attitude, as a rotation.
    current: UnitQuaternion<f32>,
    /// Active reference frame; `None` until the first calibration.
    reference: Option<Reference>,
}

impl Default for CalibratorState {
    fn default() -> Self {
        Self {
            current: UnitQuaternion::identity(),
            reference: None,
        }
    }
}

/// Converts raw sensor attitude into normalized control axes.
pub struct AttitudeCalibrator {
    source: Arc<dyn AttitudeSource>,
    state: Arc<Mutex<CalibratorState>>,
    sampler: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl AttitudeCalibrator {
    /// Create a calibrator reading from the given sensor feed.
    pub fn new(source: Arc<dyn AttitudeSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CalibratorState::default())),
            sampler: Mutex::new(None),
        }
    }

    /// Begin sampling the sensor at the given period.
    ///
    /// Each sample overwrites the current raw attitude. Ticks where the
    /// sensor is unavailable are skipped silently. Calling this again
    /// replaces the running sampling task.
    pub async fn start_updates(&self, interval: Duration) {
        let mut sampler = self.sampler.lock().await;
        if let Some(task) = sampler.take() {
            task.abort();
        }

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        *sampler = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Some(sample) = source.sample().await {
                    let mut s = state.lock().await;
                    s.current = quaternion_of(sample);
                }
            }
        }));

        tracing::debug!(period_ms = interval.as_millis() as u64, "Attitude sampling started");
    }

    /// Halt sampling.
    ///
    /// Subsequent [`axes`](Self::axes) calls keep returning the value
    /// derived from the last-held sample: frozen, not reset.
    pub async fn stop_updates(&self) {
        let mut sampler = self.sampler.lock().await;
        if let Some(task) = sampler.take() {
            task.abort();
            tracing::debug!("Attitude sampling stopped");
        }
    }

    /// Capture the current raw attitude as the new reference frame,
    /// together with the per-axis scale limits (degrees of device rotation
    /// for full deflection).
    ///
    /// Callable repeatedly; each call fully replaces the prior reference.
    pub async fn calibrate(&self, max_pitch_deg: f32, max_roll_deg: f32, max_yaw_deg: f32) {
        let mut s = self.state.lock().await;
        s.reference = Some(Reference {
            attitude: s.current,
            max_pitch_deg,
            max_roll_deg,
            max_yaw_deg,
        });
        tracing::debug!(
            max_pitch_deg,
            max_roll_deg,
            max_yaw_deg,
            "Attitude reference captured"
        );
    }

    /// Compute the control axes from the current attitude and the active
    /// reference frame.
    ///
    /// Before any calibration this is `{0, 0, 0}`. The clamp is mandatory:
    /// the device can physically exceed the nominal ±90° range, and axes
    /// must stay inside the documented control range regardless.
    pub async fn axes(&self) -> ControlAxes {
        let s = self.state.lock().await;
        let Some(reference) = s.reference else {
            return ControlAxes::default();
        };

        let relative = reference.attitude.inverse() * s.current;
        let (device_roll, device_pitch, device_yaw) = relative.euler_angles();

        ControlAxes {
            pitch: scaled(device_roll, reference.max_pitch_deg),
            roll: -scaled(device_yaw, reference.max_roll_deg),
            yaw: -scaled(device_pitch, reference.max_yaw_deg),
        }
    }
}

/// Build the rotation a sample describes. nalgebra's Euler order is
/// (roll, pitch, yaw) about the x, y, z axes.
fn quaternion_of(sample: AttitudeSample) -> UnitQuaternion<f32> {
    UnitQuaternion::from_euler_angles(sample.roll, sample.pitch, sample.yaw)
}

/// Normalize a relative angle by the axis limit and clamp to [-1, 1].
fn scaled(angle_rad: f32, max_deg: f32) -> f32 {
    (angle_rad.to_degrees() / max_deg).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    /// Sensor stub whose reading can be swapped from the test body.
    struct ScriptedSensor {
        reading: std::sync::Mutex<Option<AttitudeSample>>,
    }

    impl ScriptedSensor {
        fn new(reading: Option<AttitudeSample>) -> Arc<Self> {
            Arc::new(Self {
                reading: std::sync::Mutex::new(reading),
            })
        }

        fn set(&self, reading: Option<AttitudeSample>) {
            *self.reading.lock().unwrap() = reading;
        }
    }

    #[async_trait]
    impl AttitudeSource for ScriptedSensor {
        async fn sample(&self) -> Option<AttitudeSample> {
            *self.reading.lock().unwrap()
        }
    }

    fn sample_deg(pitch: f32, roll: f32, yaw: f32) -> AttitudeSample {
        AttitudeSample {
            pitch: pitch.to_radians(),
            roll: roll.to_radians(),
            yaw: yaw.to_radians(),
        }
    }

    /// Push a sample directly into the calibrator, bypassing the sampling
    /// task, for deterministic tests.
    async fn ingest(cal: &AttitudeCalibrator, sample: AttitudeSample) {
        let mut s = cal.state.lock().await;
        s.current = quaternion_of(sample);
    }

    #[tokio::test]
    async fn axes_are_zero_before_calibration() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, sample_deg(30.0, -45.0, 10.0)).await;
        assert_eq!(cal.axes().await, ControlAxes::default());
    }

    #[tokio::test]
    async fn level_reference_gives_zero_axes() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, sample_deg(12.0, 3.0, -8.0)).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        let axes = cal.axes().await;
        assert!(axes.pitch.abs() < EPS);
        assert!(axes.roll.abs() < EPS);
        assert!(axes.yaw.abs() < EPS);
    }

    #[tokio::test]
    async fn device_roll_drives_pitch_positively() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, AttitudeSample::default()).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        ingest(&cal, sample_deg(0.0, 45.0, 0.0)).await;
        let axes = cal.axes().await;
        assert!((axes.pitch - 0.5).abs() < EPS);
        assert!(axes.roll.abs() < EPS);
        assert!(axes.yaw.abs() < EPS);
    }

    #[tokio::test]
    async fn device_yaw_drives_roll_negated() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, AttitudeSample::default()).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        ingest(&cal, sample_deg(0.0, 0.0, 30.0)).await;
        let axes = cal.axes().await;
        assert!((axes.roll - (-30.0 / 90.0)).abs() < EPS);
    }

    #[tokio::test]
    async fn device_pitch_drives_yaw_negated() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, AttitudeSample::default()).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        ingest(&cal, sample_deg(18.0, 0.0, 0.0)).await;
        let axes = cal.axes().await;
        assert!((axes.yaw - (-18.0 / 90.0)).abs() < EPS);
    }

    #[tokio::test]
    async fn axes_clamp_outside_nominal_range() {
        for max_deg in [1.0f32, 10.0, 45.0, 90.0] {
            let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
            ingest(&cal, AttitudeSample::default()).await;
            cal.calibrate(max_deg, max_deg, max_deg).await;

            // Well past the nominal range; the device can physically do this.
            ingest(&cal, sample_deg(0.0, 160.0, 0.0)).await;
            let axes = cal.axes().await;
            assert!(
                (-1.0..=1.0).contains(&axes.pitch),
                "pitch {} out of range at limit {}",
                axes.pitch,
                max_deg
            );
            assert!((-1.0..=1.0).contains(&axes.roll));
            assert!((-1.0..=1.0).contains(&axes.yaw));
        }
    }

    #[tokio::test]
    async fn tighter_limit_saturates_sooner() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        ingest(&cal, AttitudeSample::default()).await;
        cal.calibrate(30.0, 90.0, 90.0).await;

        ingest(&cal, sample_deg(0.0, 45.0, 0.0)).await;
        let axes = cal.axes().await;
        assert!((axes.pitch - 1.0).abs() < EPS, "45° past a 30° limit saturates");
    }

    #[tokio::test]
    async fn recalibration_replaces_the_reference() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));

        ingest(&cal, sample_deg(0.0, 10.0, 0.0)).await;
        cal.calibrate(90.0, 90.0, 90.0).await;
        ingest(&cal, sample_deg(0.0, 40.0, 0.0)).await;
        let first = cal.axes().await;

        // Re-reference at the new attitude; the same later sample now
        // reads differently because the reference was replaced.
        cal.calibrate(90.0, 90.0, 90.0).await;
        let rezeroed = cal.axes().await;
        assert!(rezeroed.pitch.abs() < EPS);
        assert!((first.pitch - 30.0 / 90.0).abs() < EPS);
    }

    #[tokio::test]
    async fn reference_composition_is_rotational() {
        // current = reference ∘ delta must read back exactly delta,
        // which naive per-axis subtraction does not give once two axes
        // are involved.
        let reference = UnitQuaternion::from_euler_angles(
            0.3f32, // roll
            0.5,    // pitch
            -0.7,   // yaw
        );
        let delta = UnitQuaternion::from_euler_angles(0.2f32, 0.0, 0.0);

        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        {
            let mut s = cal.state.lock().await;
            s.current = reference;
        }
        cal.calibrate(90.0, 90.0, 90.0).await;
        {
            let mut s = cal.state.lock().await;
            s.current = reference * delta;
        }

        let axes = cal.axes().await;
        let expected_pitch = 0.2f32.to_degrees() / 90.0;
        assert!((axes.pitch - expected_pitch).abs() < EPS);
        assert!(axes.roll.abs() < EPS);
        assert!(axes.yaw.abs() < EPS);
    }

    #[tokio::test]
    async fn sampling_task_feeds_axes() {
        let sensor = ScriptedSensor::new(Some(AttitudeSample::default()));
        let cal = AttitudeCalibrator::new(Arc::clone(&sensor) as Arc<dyn AttitudeSource>);
        cal.start_updates(Duration::from_millis(5)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        sensor.set(Some(sample_deg(0.0, 45.0, 0.0)));
        tokio::time::sleep(Duration::from_millis(30)).await;

        let axes = cal.axes().await;
        assert!((axes.pitch - 0.5).abs() < 1e-3);

        cal.stop_updates().await;
    }

    #[tokio::test]
    async fn stop_updates_freezes_axes() {
        let sensor = ScriptedSensor::new(Some(AttitudeSample::default()));
        let cal = AttitudeCalibrator::new(Arc::clone(&sensor) as Arc<dyn AttitudeSource>);
        cal.start_updates(Duration::from_millis(5)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        cal.calibrate(90.0, 90.0, 90.0).await;

        sensor.set(Some(sample_deg(0.0, 27.0, 0.0)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        cal.stop_updates().await;
        let frozen = cal.axes().await;

        // Sensor keeps moving, but nothing samples it any more.
        sensor.set(Some(sample_deg(0.0, -80.0, 0.0)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cal.axes().await, frozen);
    }

    #[tokio::test]
    async fn unavailable_sensor_degrades_to_zero() {
        let cal = AttitudeCalibrator::new(ScriptedSensor::new(None));
        cal.start_updates(Duration::from_millis(5)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cal.axes().await, ControlAxes::default());
        cal.stop_updates().await;
        // Stopping twice is a no-op.
        cal.stop_updates().await;
    }
}
