//! The consolidated control configuration.
//!
//! Every knob the UI layer owns -- axis tuning, per-control enable flags,
//! dataref and command bindings, and the target endpoint -- lives in one
//! explicit [`ControlConfig`] value passed into the session client at
//! construction and replaced wholesale through a single setter. The
//! protocol engine itself carries no hidden mutable settings.
//!
//! On-disk persistence of this struct is the caller's concern; the engine
//! only reads it.

/// Orientation-to-axis tuning: inversion flags and per-axis angle limits.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTuning {
    /// Invert the pitch axis after calibration.
    pub invert_pitch: bool,
    /// Invert the roll axis after calibration.
    pub invert_roll: bool,
    /// Invert the yaw axis after calibration.
    pub invert_yaw: bool,
    /// Whether orientation yaw feeds the rudder at all.
    pub yaw_enabled: bool,
    /// Device rotation (degrees) that maps to full pitch deflection.
    pub max_pitch_deg: f32,
    /// Device rotation (degrees) that maps to full roll deflection.
    pub max_roll_deg: f32,
    /// Device rotation (degrees) that maps to full yaw deflection.
    pub max_yaw_deg: f32,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            invert_pitch: true,
            invert_roll: false,
            invert_yaw: false,
            yaw_enabled: true,
            max_pitch_deg: 90.0,
            max_roll_deg: 90.0,
            max_yaw_deg: 90.0,
        }
    }
}

/// Dataref and command bindings for the toggle-style controls.
///
/// Different aircraft respond to different addresses, so every binding is
/// overridable; the defaults target the stock simulator systems.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBindings {
    /// Dataref written 1.0/0.0 by the gear toggle.
    pub gear_dataref: String,
    /// Dataref written 1.0/0.0 by the parking-brake toggle.
    pub brakes_dataref: String,
    /// Dataref receiving the flap handle ratio.
    pub flaps_dataref: String,
    /// Dataref receiving the speedbrake handle ratio.
    pub speedbrakes_dataref: String,
    /// Dataref receiving elevator trim.
    pub trim_dataref: String,
    /// Dataref for the autothrottle servo (0.0 engaged, -1.0 off).
    pub autothrottle_dataref: String,
    /// Command triggered by the autopilot toggle.
    pub autopilot_command: String,
    /// Command triggered by the reverse-thrust toggle.
    pub reverse_thrust_command: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            gear_dataref: "sim/cockpit2/controls/gear_handle_down".into(),
            brakes_dataref: "sim/flightmodel/controls/parkbrake".into(),
            flaps_dataref: "sim/cockpit2/controls/flap_ratio".into(),
            speedbrakes_dataref: "sim/cockpit2/controls/speedbrake_ratio".into(),
            trim_dataref: "sim/cockpit2/controls/elevator_trim".into(),
            autothrottle_dataref: "sim/cockpit2/autopilot/autothrottle_enabled".into(),
            autopilot_command: "sim/autopilot/servos_toggle".into(),
            reverse_thrust_command: "sim/engines/thrust_reverse_toggle".into(),
        }
    }
}

/// Per-control enable flags consumed by the UI layer.
///
/// The engine carries these so one config object describes the whole
/// control surface; it does not gate sends on them (a disabled control
/// simply never gets called).
#[derive(Debug, Clone, PartialEq)]
pub struct ControlToggles {
    pub controls: bool,
    pub throttle: bool,
    pub reverse_thrust: bool,
    pub brakes: bool,
    pub gear: bool,
    pub autothrottle: bool,
    pub autopilot: bool,
    pub flaps: bool,
    pub speedbrakes: bool,
    pub trim: bool,
}

impl Default for ControlToggles {
    fn default() -> Self {
        Self {
            controls: true,
            throttle: true,
            reverse_thrust: true,
            brakes: true,
            gear: true,
            autothrottle: true,
            autopilot: true,
            flaps: true,
            speedbrakes: true,
            trim: true,
        }
    }
}

/// The complete remote-control configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    /// Target simulator host. Empty until the user picks one (typically
    /// from beacon discovery).
    pub host: String,
    /// Target simulator command port.
    pub port: u16,
    /// Axes/throttle transmit rate, in packets per second.
    pub transmit_rate_hz: u32,
    /// Orientation-to-axis tuning.
    pub axes: AxisTuning,
    /// Dataref/command bindings for the toggle controls.
    pub bindings: ControlBindings,
    /// Which controls the UI exposes.
    pub enabled: ControlToggles,
    /// Number of detents on the flap handle (standard Airbus config: 4).
    pub flaps_notches: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 49000,
            transmit_rate_hz: 10,
            axes: AxisTuning::default(),
            bindings: ControlBindings::default(),
            enabled: ControlToggles::default(),
            flaps_notches: 4,
        }
    }
}

impl ControlConfig {
    /// A config with library defaults and the given target endpoint.
    pub fn for_target(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }
}
