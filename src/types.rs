//! Core data model shared by the codec, registry, and motion engine (§3).

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// A unique, short ASCII identifier for a pilot or ATC station.
///
/// Stored upper-cased; the registry and codec both treat callsigns as an
/// opaque, case-insensitive key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Callsign(String);

impl Callsign {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Callsign(raw.as_ref().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Callsign {
    fn from(s: &str) -> Self {
        Callsign::new(s)
    }
}

impl From<String> for Callsign {
    fn from(s: String) -> Self {
        Callsign::new(s)
    }
}

/// A VHF aviation-band frequency in kHz ([118000, 136975], admitting 8.33kHz
/// spacing as well as the legacy 25kHz step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Frequency(u32);

impl Frequency {
    pub const MIN_KHZ: u32 = 118_000;
    pub const MAX_KHZ: u32 = 136_975;

    pub fn from_khz(khz: u32) -> Result<Self, ProtocolError> {
        if (Self::MIN_KHZ..=Self::MAX_KHZ).contains(&khz) {
            Ok(Frequency(khz))
        } else {
            Err(ProtocolError::InvalidField {
                field: "frequency",
                value: khz.to_string(),
            })
        }
    }

    pub fn khz(&self) -> u32 {
        self.0
    }

    /// Standard `XXX.YYY` MHz display form.
    pub fn mhz(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.mhz())
    }
}

/// A geodetic position fix (§3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, (-180, 180].
    pub longitude: f64,
    /// True altitude, feet MSL.
    pub altitude_true: f64,
    /// Altitude above ground level, feet, when reported.
    pub altitude_agl: Option<f64>,
}

impl PositionFix {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.altitude_true.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && self.longitude > -180.0
            && self.longitude <= 180.0
    }
}

/// Pitch/bank/heading attitude, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    /// Pitch, ±90°, nose up positive.
    pub pitch: f64,
    /// Bank/roll, ±180°.
    pub bank: f64,
    /// True heading, [0, 360).
    pub heading: f64,
}

impl Attitude {
    pub const ZERO: Attitude = Attitude {
        pitch: 0.0,
        bank: 0.0,
        heading: 0.0,
    };
}

/// A position fix plus attitude plus nose-wheel steering angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: PositionFix,
    pub attitude: Attitude,
    /// Nose-wheel steering angle, degrees.
    pub nose_wheel_angle: f64,
}

/// Body-relative velocity triple per the FSD wire convention (§3): pitch-rate
/// and bank-rate are negated on ingest relative to the raw wire values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityTriple {
    /// Longitudinal (forward) velocity, m/s.
    pub longitudinal: f64,
    /// Vertical velocity, m/s, positive up.
    pub vertical: f64,
    /// Lateral velocity, m/s.
    pub lateral: f64,
}

/// Angular velocity triple, rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularVelocityTriple {
    pub pitch_rate: f64,
    pub heading_rate: f64,
    pub bank_rate: f64,
}

impl AngularVelocityTriple {
    pub fn is_zero(&self) -> bool {
        self.pitch_rate == 0.0 && self.heading_rate == 0.0 && self.bank_rate == 0.0
    }
}

/// Per-remote-aircraft configuration flags (§3). Continuous flap position is
/// carried separately as a ratio in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFlags {
    pub on_ground: bool,
    pub gear_down: bool,
    pub spoilers_deployed: bool,
    pub strobes_on: bool,
    pub landing_lights_on: bool,
    pub taxi_lights_on: bool,
    pub beacon_on: bool,
    pub nav_lights_on: bool,
    pub engines_running: bool,
    pub engines_reversing: bool,
    pub flaps_ratio: f64,
}

impl Default for ConfigFlags {
    fn default() -> Self {
        ConfigFlags {
            on_ground: false,
            gear_down: false,
            spoilers_deployed: false,
            strobes_on: false,
            landing_lights_on: false,
            taxi_lights_on: false,
            beacon_on: false,
            nav_lights_on: false,
            engines_running: false,
            engines_reversing: false,
            flaps_ratio: 0.0,
        }
    }
}

impl ConfigFlags {
    /// Merges `delta` into `self`; every field of `delta` that differs from
    /// the type's default is interpreted as "present" and overwrites the
    /// corresponding field in `self`. This matches the wire protocol's
    /// delta-update semantics (§4.E `apply_config`): receivers conflate
    /// "absent" with "default" because the JSON payload omits unset keys
    /// before it ever reaches this merge.
    pub fn merge_from(&mut self, delta: ConfigFlagsDelta) {
        if let Some(v) = delta.on_ground {
            self.on_ground = v;
        }
        if let Some(v) = delta.gear_down {
            self.gear_down = v;
        }
        if let Some(v) = delta.spoilers_deployed {
            self.spoilers_deployed = v;
        }
        if let Some(v) = delta.strobes_on {
            self.strobes_on = v;
        }
        if let Some(v) = delta.landing_lights_on {
            self.landing_lights_on = v;
        }
        if let Some(v) = delta.taxi_lights_on {
            self.taxi_lights_on = v;
        }
        if let Some(v) = delta.beacon_on {
            self.beacon_on = v;
        }
        if let Some(v) = delta.nav_lights_on {
            self.nav_lights_on = v;
        }
        if let Some(v) = delta.engines_running {
            self.engines_running = v;
        }
        if let Some(v) = delta.engines_reversing {
            self.engines_reversing = v;
        }
        if let Some(v) = delta.flaps_ratio {
            self.flaps_ratio = v.clamp(0.0, 1.0);
        }
    }
}

/// A partial update to [`ConfigFlags`]: every field absent means "retain
/// previous value". This is the type the aircraft-configuration PDU's JSON
/// payload deserializes into (§3 invariants, §4.E `apply_config`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigFlagsDelta {
    pub on_ground: Option<bool>,
    pub gear_down: Option<bool>,
    pub spoilers_deployed: Option<bool>,
    pub strobes_on: Option<bool>,
    pub landing_lights_on: Option<bool>,
    pub taxi_lights_on: Option<bool>,
    pub beacon_on: Option<bool>,
    pub nav_lights_on: Option<bool>,
    pub engines_running: Option<bool>,
    pub engines_reversing: Option<bool>,
    pub flaps_ratio: Option<f64>,
}

/// Doc 8643 engine/airframe classification, used to select surface-animation
/// duration tables (§4.F, glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Doc8643Class {
    Helicopter,
    PistonProp,
    TurboProp,
    Jet,
    Glider,
    Unknown,
}

impl FromStr for Doc8643Class {
    type Err = ProtocolError;

    /// Parses the single-letter engine-type component of a Doc 8643
    /// classification string (e.g. the `J` in `L2J`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "H" => Ok(Doc8643Class::Helicopter),
            "P" => Ok(Doc8643Class::PistonProp),
            "T" => Ok(Doc8643Class::TurboProp),
            "J" => Ok(Doc8643Class::Jet),
            "G" => Ok(Doc8643Class::Glider),
            _ => Ok(Doc8643Class::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callsign_uppercases_and_compares_equal() {
        assert_eq!(Callsign::new("pilot1"), Callsign::new("PILOT1"));
    }

    #[test]
    fn frequency_rejects_out_of_band() {
        assert!(Frequency::from_khz(100_000).is_err());
        assert!(Frequency::from_khz(121_500).is_ok());
    }

    #[test]
    fn position_fix_rejects_nan_and_out_of_range() {
        let mut p = PositionFix {
            latitude: 37.0,
            longitude: -122.0,
            altitude_true: 1000.0,
            altitude_agl: None,
        };
        assert!(p.is_valid());
        p.latitude = f64::NAN;
        assert!(!p.is_valid());
        p.latitude = 91.0;
        assert!(!p.is_valid());
    }

    #[test]
    fn config_flags_delta_merge_retains_absent_fields() {
        let mut flags = ConfigFlags {
            gear_down: true,
            flaps_ratio: 0.5,
            ..Default::default()
        };
        let delta = ConfigFlagsDelta {
            spoilers_deployed: Some(true),
            ..Default::default()
        };
        flags.merge_from(delta);
        assert!(flags.gear_down);
        assert!(flags.spoilers_deployed);
        assert_eq!(flags.flaps_ratio, 0.5);
    }
}
