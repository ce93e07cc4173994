//! Aircraft registry (§4.E): the single owning map from callsign to remote
//! aircraft record, and the only structure shared between the network
//! thread (writer of queued events) and the simulator thread (reader and
//! sole mutator of records, §5).

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use log::info;

use crate::motion::geo;
use crate::types::{AngularVelocityTriple, Callsign, ConfigFlags, ConfigFlagsDelta, Pose, PositionFix, VelocityTriple};
#[cfg(test)]
use crate::types::Attitude;

/// How long a record may go without any update before stale eviction (§3).
pub const STALE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a velocity update may be missing before angular velocity is
/// force-zeroed and predicted attitude snapped to ground truth (§3, §4.F
/// step 1).
pub const VELOCITY_GAP_TIMEOUT: Duration = Duration::from_millis(500);

/// Static identity fields for a remote aircraft, set on add and by plane-info
/// responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub icao_type: String,
    pub airline: Option<String>,
    pub livery: Option<String>,
}

/// One sample in the rolling terrain-probe history (§4.F step 4).
#[derive(Debug, Clone, Copy)]
pub struct TerrainSample {
    pub at: Instant,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_ft: f64,
}

/// Current/target animated surface ratios, each in [0, 1] (§3 invariant).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub gear_current: f64,
    pub gear_target: f64,
    pub flaps_current: f64,
    pub flaps_target: f64,
    pub spoilers_current: f64,
    pub spoilers_target: f64,
    pub reversers_current: f64,
    pub reversers_target: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        SurfaceState {
            gear_current: 0.0,
            gear_target: 0.0,
            flaps_current: 0.0,
            flaps_target: 0.0,
            spoilers_current: 0.0,
            spoilers_target: 0.0,
            reversers_current: 0.0,
            reversers_target: 0.0,
        }
    }
}

/// Terrain-probe cache and ground-clamp smoothing state (§4.F step 4).
#[derive(Debug, Clone)]
pub struct GroundClampState {
    pub local_elevation_ft: Option<f64>,
    pub target_offset_ft: f64,
    pub current_offset_ft: f64,
    /// Magnitude of the offset change captured at the moment the target last
    /// moved; persisted so the smoothing rate stays constant across frames
    /// between target changes (§4.F step 4, `TerrainOffsetMagnitude`).
    pub offset_magnitude_ft: f64,
    pub history: VecDeque<TerrainSample>,
}

impl Default for GroundClampState {
    fn default() -> Self {
        GroundClampState {
            local_elevation_ft: None,
            target_offset_ft: 0.0,
            current_offset_ft: 0.0,
            offset_magnitude_ft: 0.0,
            history: VecDeque::new(),
        }
    }
}

/// A remote aircraft's complete record (§3). The registry is its sole owner;
/// every other component borrows it by callsign for the duration of one call.
#[derive(Debug, Clone)]
pub struct RemoteAircraft {
    pub callsign: Callsign,
    pub identity: Identity,

    pub ground_truth: Pose,
    pub predicted: Pose,

    pub linear_velocity: VelocityTriple,
    pub angular_velocity: AngularVelocityTriple,

    pub error_velocity: VelocityTriple,
    pub error_angular_velocity: AngularVelocityTriple,
    pub apply_error_until: Option<Instant>,

    pub config: ConfigFlags,
    pub surfaces: SurfaceState,
    pub ground: GroundClampState,

    pub wheel_rpm: f64,
    pub wheel_angle_deg: f64,
    pub engine_rpm: f64,
    pub engine_angle_deg: f64,

    pub first_render: bool,

    pub last_updated: Instant,
    pub last_velocity_update: Instant,
    pub previous_surface_update: Instant,
}

impl RemoteAircraft {
    fn new(callsign: Callsign, initial_pose: Pose, now: Instant) -> Self {
        RemoteAircraft {
            callsign,
            identity: Identity::default(),
            ground_truth: initial_pose,
            predicted: initial_pose,
            linear_velocity: VelocityTriple::default(),
            angular_velocity: AngularVelocityTriple::default(),
            error_velocity: VelocityTriple::default(),
            error_angular_velocity: AngularVelocityTriple::default(),
            apply_error_until: None,
            config: ConfigFlags::default(),
            surfaces: SurfaceState::default(),
            ground: GroundClampState::default(),
            wheel_rpm: 0.0,
            wheel_angle_deg: 0.0,
            engine_rpm: 0.0,
            engine_angle_deg: 0.0,
            first_render: true,
            last_updated: now,
            last_velocity_update: now,
            previous_surface_update: now,
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_updated = now;
    }
}

/// The keyed map from callsign to remote aircraft record (§4.E).
#[derive(Debug, Default)]
pub struct AircraftRegistry {
    aircraft: HashMap<Callsign, RemoteAircraft>,
}

impl AircraftRegistry {
    pub fn new() -> Self {
        AircraftRegistry::default()
    }

    /// Creates a record if absent; if present, replaces it (a duplicate add
    /// is a re-introduction, §4.E).
    pub fn add(&mut self, callsign: Callsign, identity: Identity, initial_pose: Pose, now: Instant) {
        let mut record = RemoteAircraft::new(callsign.clone(), initial_pose, now);
        record.identity = identity;
        self.aircraft.insert(callsign, record);
    }

    /// Deletes a record; idempotent.
    pub fn remove(&mut self, callsign: &Callsign) {
        self.aircraft.remove(callsign);
    }

    /// Drops every record (§7: "the registry is flushed" on disconnect).
    pub fn clear(&mut self) {
        self.aircraft.clear();
    }

    pub fn get(&self, callsign: &Callsign) -> Option<&RemoteAircraft> {
        self.aircraft.get(callsign)
    }

    pub fn get_mut(&mut self, callsign: &Callsign) -> Option<&mut RemoteAircraft> {
        self.aircraft.get_mut(callsign)
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteAircraft> {
        self.aircraft.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RemoteAircraft> {
        self.aircraft.values_mut()
    }

    /// Sets ground-truth pose from a slow-position report; creates the
    /// record if absent (§4.E).
    pub fn apply_slow_position(&mut self, callsign: &Callsign, pose: Pose, flags: ConfigFlagsDelta, now: Instant) {
        let record = self
            .aircraft
            .entry(callsign.clone())
            .or_insert_with(|| RemoteAircraft::new(callsign.clone(), pose, now));
        record.ground_truth = pose;
        record.config.merge_from(flags);
        record.touch(now);
    }

    /// Sets ground-truth pose plus velocity fields from a fast-position
    /// report; creates the record if absent. Refreshes the error-blend
    /// window (§4.F step 3) and zeroes stale angular velocity first if the
    /// velocity-update gap exceeded [`VELOCITY_GAP_TIMEOUT`] (§4.E, §4.F
    /// step 1).
    pub fn apply_fast_position(
        &mut self,
        callsign: &Callsign,
        pose: Pose,
        linear_v: VelocityTriple,
        angular_v: AngularVelocityTriple,
        now: Instant,
    ) {
        let is_new = !self.aircraft.contains_key(callsign);
        let record = self
            .aircraft
            .entry(callsign.clone())
            .or_insert_with(|| RemoteAircraft::new(callsign.clone(), pose, now));

        if !is_new && now.saturating_duration_since(record.last_velocity_update) > VELOCITY_GAP_TIMEOUT {
            record.angular_velocity = AngularVelocityTriple::default();
            record.error_angular_velocity = AngularVelocityTriple::default();
        }

        let predicted_before = record.predicted;
        record.ground_truth = pose;
        record.linear_velocity = linear_v;
        record.angular_velocity = angular_v;
        record.last_velocity_update = now;
        record.touch(now);

        if is_new {
            record.predicted = pose;
            record.first_render = true;
        } else {
            refresh_error_vectors(record, predicted_before, pose, now);
        }
    }

    /// Merges a partial configuration update; absent flags retain their
    /// previous value (§4.E).
    pub fn apply_config(&mut self, callsign: &Callsign, delta: ConfigFlagsDelta, now: Instant) {
        if let Some(record) = self.aircraft.get_mut(callsign) {
            record.config.merge_from(delta);
            record.touch(now);
        }
    }

    /// Evicts any record whose `last_updated` is older than
    /// [`STALE_TIMEOUT`] (§3, §8 "Stale eviction").
    pub fn sweep_stale(&mut self, now: Instant) {
        let stale: Vec<Callsign> = self
            .aircraft
            .iter()
            .filter(|(_, record)| now.saturating_duration_since(record.last_updated) > STALE_TIMEOUT)
            .map(|(callsign, _)| callsign.clone())
            .collect();

        for callsign in stale {
            self.aircraft.remove(&callsign);
            info!("evicted stale aircraft {callsign}");
        }
    }
}

/// §4.F step 3: computes `(ground_truth - predicted) / 2` as a positional
/// and rotational error velocity and opens a 2 s blend window.
fn refresh_error_vectors(record: &mut RemoteAircraft, predicted_before: Pose, ground_truth: Pose, now: Instant) {
    let lat_err = (ground_truth.position.latitude - predicted_before.position.latitude) / 2.0;
    let lon_err = (ground_truth.position.longitude - predicted_before.position.longitude) / 2.0;
    let alt_err = (ground_truth.position.altitude_true - predicted_before.position.altitude_true) / 2.0;

    // `linear_velocity` is in m/s (lat/lon) and ft/s (alt); the residual above
    // is in degrees and feet, so it must be converted before storage, the
    // inverse of `extrapolate_pose`'s meters_to_deg/METERS_TO_FEET conversions.
    record.error_velocity = VelocityTriple {
        longitudinal: geo::deg_to_meters(lat_err),
        vertical: alt_err * geo::METERS_PER_FOOT,
        lateral: geo::deg_to_meters(lon_err) * geo::longitude_scaling_factor(predicted_before.position.latitude),
    };

    let pitch_err = (ground_truth.attitude.pitch - predicted_before.attitude.pitch) / 2.0;
    let heading_err = (ground_truth.attitude.heading - predicted_before.attitude.heading) / 2.0;
    let bank_err = (ground_truth.attitude.bank - predicted_before.attitude.bank) / 2.0;
    record.error_angular_velocity = AngularVelocityTriple {
        pitch_rate: pitch_err.to_radians(),
        heading_rate: heading_err.to_radians(),
        bank_rate: bank_err.to_radians(),
    };

    record.apply_error_until = Some(now + Duration::from_secs(2));
}

#[cfg(test)]
fn default_pose() -> Pose {
    Pose {
        position: PositionFix {
            latitude: 0.0,
            longitude: 0.0,
            altitude_true: 0.0,
            altitude_agl: None,
        },
        attitude: Attitude::ZERO,
        nose_wheel_angle: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_at(lat: f64, lon: f64, alt: f64) -> Pose {
        Pose {
            position: PositionFix {
                latitude: lat,
                longitude: lon,
                altitude_true: alt,
                altitude_agl: None,
            },
            ..default_pose()
        }
    }

    #[test]
    fn add_then_add_again_leaves_one_record_with_new_identity() {
        let mut registry = AircraftRegistry::new();
        let now = Instant::now();
        let callsign = Callsign::new("N1");

        registry.add(callsign.clone(), Identity::default(), pose_at(1.0, 1.0, 0.0), now);
        registry.add(
            callsign.clone(),
            Identity {
                icao_type: "B738".to_string(),
                ..Identity::default()
            },
            pose_at(2.0, 2.0, 0.0),
            now,
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&callsign).unwrap().identity.icao_type, "B738");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("N1");
        registry.add(callsign.clone(), Identity::default(), pose_at(1.0, 1.0, 0.0), Instant::now());
        registry.remove(&callsign);
        registry.remove(&callsign);
        assert!(registry.is_empty());
    }

    #[test]
    fn sweep_stale_evicts_after_timeout() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("N1");
        let t0 = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(1.0, 1.0, 0.0), t0);

        registry.sweep_stale(t0 + Duration::from_secs(10));
        assert_eq!(registry.len(), 1);

        registry.sweep_stale(t0 + Duration::from_secs(31));
        assert!(registry.get(&callsign).is_none());
    }

    #[test]
    fn apply_config_merges_and_retains_absent_fields() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("N1");
        let now = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(1.0, 1.0, 0.0), now);

        registry.apply_config(
            &callsign,
            ConfigFlagsDelta {
                gear_down: Some(true),
                ..Default::default()
            },
            now,
        );
        registry.apply_config(
            &callsign,
            ConfigFlagsDelta {
                spoilers_deployed: Some(true),
                ..Default::default()
            },
            now,
        );

        let record = registry.get(&callsign).unwrap();
        assert!(record.config.gear_down);
        assert!(record.config.spoilers_deployed);
    }

    #[test]
    fn apply_fast_position_opens_error_blend_window_on_subsequent_update() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("N1");
        let t0 = Instant::now();

        registry.apply_fast_position(&callsign, pose_at(37.0, -122.0, 1000.0), VelocityTriple::default(), AngularVelocityTriple::default(), t0);
        assert!(registry.get(&callsign).unwrap().apply_error_until.is_none());

        let t1 = t0 + Duration::from_millis(200);
        registry.apply_fast_position(&callsign, pose_at(37.001, -122.0, 1000.0), VelocityTriple::default(), AngularVelocityTriple::default(), t1);

        let record = registry.get(&callsign).unwrap();
        assert!(record.apply_error_until.is_some());
        assert!(record.error_velocity.longitudinal > 0.0);
    }

    #[test]
    fn apply_fast_position_zeroes_angular_velocity_after_gap() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("N1");
        let t0 = Instant::now();
        let spin = AngularVelocityTriple {
            pitch_rate: 0.0,
            heading_rate: 1.0,
            bank_rate: 0.0,
        };
        registry.apply_fast_position(&callsign, pose_at(37.0, -122.0, 1000.0), VelocityTriple::default(), spin, t0);

        let t1 = t0 + Duration::from_millis(600);
        registry.apply_fast_position(&callsign, pose_at(37.0, -122.0, 1000.0), VelocityTriple::default(), spin, t1);

        // the gap forced a reset before this call's own angular velocity was applied
        let record = registry.get(&callsign).unwrap();
        assert_eq!(record.angular_velocity.heading_rate, 1.0);
    }
}
