//! Per-frame motion and surface-animation engine (§4.F), the remote-aircraft
//! rendering pipeline's core. Runs once per simulator frame over every
//! record in the [`crate::registry::AircraftRegistry`], in the seven steps
//! documented on [`MotionEngine::step`].
//!
//! Grounded throughout on `original_source/plugin/src/NetworkAircraft.cpp`
//! (`ExtrapolatePosition`, `RecordTerrainElevationHistory`,
//! `UpdateErrorVectors`, `PerformGroundClamping`, `UpdatePosition`) and
//! `GeoCalc.hpp`.

pub mod flight_model;
pub mod geo;
pub mod quaternion;
pub mod vector3;

use std::time::{Duration, Instant};

use crate::registry::{AircraftRegistry, GroundClampState, RemoteAircraft, SurfaceState as ConfigSurfaceState, TerrainSample};
use crate::types::{ConfigFlags, Pose};
use flight_model::{durations_for, WakeCategory};
use quaternion::Quaternion;

/// How long a velocity update may be missing before rotational state is
/// frozen (§4.F step 1). Mirrors [`crate::registry::VELOCITY_GAP_TIMEOUT`].
const VELOCITY_GAP_TIMEOUT: Duration = Duration::from_millis(500);

/// Terrain samples older than this are dropped from the rolling history
/// (§4.F step 4, "roughly the error-blend window"). The original's exact
/// `TERRAIN_ELEVATION_DATA_USABLE_AGE` constant is not present in the
/// retrieved sources; this value is an implementer's choice recorded in
/// DESIGN.md.
const TERRAIN_USABLE_AGE: Duration = Duration::from_secs(2);

/// Terrain samples are only recorded while at or below this AGL (ft); above
/// it the probe is too noisy relative to aircraft altitude to be useful.
/// Invented value, recorded in DESIGN.md.
const MAX_USABLE_ALTITUDE_AGL_FT: f64 = 1000.0;

/// Maximum slope (degrees) between the oldest and newest usable terrain
/// sample for the local terrain to be considered flat enough to clamp
/// against. Invented value, recorded in DESIGN.md.
const TERRAIN_MAX_SLOPE_DEG: f64 = 5.0;

const MIN_AGL_FOR_CLIMBOUT_FT: f64 = 50.0;
const TERRAIN_OFFSET_WINDOW_LANDING_S: f64 = 2.0;
const TERRAIN_OFFSET_WINDOW_CLIMBOUT_S: f64 = 10.0;
const MIN_TERRAIN_OFFSET_MAGNITUDE_FT: f64 = 0.1;

const TIRE_RADIUS_M: f64 = 3.2;
const ENGINE_RUNNING_RPM: f64 = 1200.0;
const REVERSER_DURATION_MS: f64 = 1500.0;

const METERS_TO_FEET: f64 = 1.0 / geo::METERS_PER_FOOT;

/// Opaque handle into the host simulator's fixed-size traffic-display slot
/// table, an arena index rather than a pointer (§9 "Object identity without
/// pointers").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcasSlot(pub usize);

/// Terrain elevation source, provided by the host simulator (§6, §4.x
/// Collaborators). Assumed cheap enough to call once per aircraft per frame
/// below 18,000 ft; the engine never calls it above that altitude.
pub trait TerrainProbe {
    fn probe(&self, latitude: f64, longitude: f64) -> Option<f64>;
}

/// The per-aircraft render output the host consumes each frame (§4.F step
/// 7 "Emit"). Built from a [`RemoteAircraft`] record by
/// [`RemoteAircraft::render_state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftRenderState {
    pub pose: Pose,
    pub config: ConfigFlags,
    pub surfaces: ConfigSurfaceState,
    pub wheel_rpm: f64,
    pub wheel_angle_deg: f64,
    pub engine_rpm: f64,
    pub engine_angle_deg: f64,
    pub prop_angle_deg: f64,
    pub thrust_ratio: f64,
}

impl RemoteAircraft {
    pub fn render_state(&self) -> AircraftRenderState {
        AircraftRenderState {
            pose: self.predicted,
            config: self.config,
            surfaces: self.surfaces,
            wheel_rpm: self.wheel_rpm,
            wheel_angle_deg: self.wheel_angle_deg,
            engine_rpm: self.engine_rpm,
            engine_angle_deg: self.engine_angle_deg,
            prop_angle_deg: self.engine_angle_deg,
            thrust_ratio: if self.config.engines_running { 1.0 } else { 0.0 },
        }
    }
}

/// Contract a host simulator must provide for remote-aircraft rendering
/// (§6). Not implemented by this crate; the host owns TCAS slot allocation
/// and the actual draw call.
///
/// A `register_flight_loop(cb)`-style callback that invokes
/// [`MotionEngine::step`] once per rendered frame is likewise part of the
/// contract but intentionally not defined as a trait method here: the host
/// owns the call site and the scheduling mechanism (a plugin flight loop, a
/// game engine tick, a timer thread) is entirely its concern.
pub trait HostSimulator {
    fn enumerate_tcas_slots(&self) -> Vec<TcasSlot>;
    fn write_slot(&mut self, slot: TcasSlot, state: &AircraftRenderState);
}

/// Stateless per-frame driver for the motion and surface-animation pipeline.
/// Holds no aircraft data of its own (§3 "Ownership"); every call borrows
/// the registry it's given.
#[derive(Debug, Default, Clone, Copy)]
pub struct MotionEngine;

impl MotionEngine {
    pub fn new() -> Self {
        MotionEngine
    }

    /// Advances every record in `registry` by one frame of length `dt`
    /// seconds, in the seven steps of §4.F:
    ///
    /// 1. angular-velocity gating,
    /// 2. pose extrapolation (quaternion slerp + Euler reconstruction),
    /// 3. error-vector consumption (refresh itself happens in
    ///    [`AircraftRegistry::apply_fast_position`], not here),
    /// 4. terrain sampling and ground clamping,
    /// 5. surface animation,
    /// 6. wheel/engine kinematics,
    /// 7. emission (left in place on the record; read via
    ///    [`RemoteAircraft::render_state`]).
    pub fn step(&mut self, registry: &mut AircraftRegistry, dt: f64, now: Instant, terrain: &dyn TerrainProbe) {
        for record in registry.iter_mut() {
            step_one(record, dt, now, terrain);
        }
    }
}

fn step_one(record: &mut RemoteAircraft, dt: f64, now: Instant, terrain: &dyn TerrainProbe) {
    gate_angular_velocity(record, now);

    if record.first_render {
        record.predicted = record.ground_truth;
    } else {
        extrapolate_pose(record, dt, now);
    }

    ground_clamp(record, now, dt, terrain);
    animate_surfaces(record, now, dt);
    update_kinematics(record, dt);

    record.first_render = false;
}

/// §4.F step 1.
fn gate_angular_velocity(record: &mut RemoteAircraft, now: Instant) {
    if now.saturating_duration_since(record.last_velocity_update) > VELOCITY_GAP_TIMEOUT {
        record.angular_velocity = Default::default();
        record.error_angular_velocity = Default::default();
        record.predicted.attitude = record.ground_truth.attitude;
    }
}

/// §4.F step 2.
fn extrapolate_pose(record: &mut RemoteAircraft, dt: f64, now: Instant) {
    let blend_active = record.apply_error_until.map(|until| now < until).unwrap_or(false);

    let v_longitudinal = record.linear_velocity.longitudinal + if blend_active { record.error_velocity.longitudinal } else { 0.0 };
    let v_vertical = record.linear_velocity.vertical + if blend_active { record.error_velocity.vertical } else { 0.0 };
    let v_lateral = record.linear_velocity.lateral + if blend_active { record.error_velocity.lateral } else { 0.0 };

    let pitch_rate = record.angular_velocity.pitch_rate + if blend_active { record.error_angular_velocity.pitch_rate } else { 0.0 };
    let heading_rate = record.angular_velocity.heading_rate + if blend_active { record.error_angular_velocity.heading_rate } else { 0.0 };
    let bank_rate = record.angular_velocity.bank_rate + if blend_active { record.error_angular_velocity.bank_rate } else { 0.0 };

    let lat_change = geo::meters_to_deg(v_longitudinal * dt);
    let new_lat = geo::normalize_degrees(record.predicted.position.latitude + lat_change, -90.0, 90.0);

    let lon_change = geo::meters_to_deg(v_lateral * dt) / geo::longitude_scaling_factor(record.predicted.position.latitude);
    let new_lon = geo::normalize_degrees(record.predicted.position.longitude + lon_change, -180.0, 180.0);

    let alt_change = v_vertical * dt * METERS_TO_FEET;
    let new_alt = record.predicted.position.altitude_true + alt_change;

    let (pitch, heading, bank) = if pitch_rate == 0.0 && heading_rate == 0.0 && bank_rate == 0.0 {
        (record.predicted.attitude.pitch, record.predicted.attitude.heading, record.predicted.attitude.bank)
    } else {
        let current = Quaternion::from_euler(
            record.predicted.attitude.pitch.to_radians(),
            record.predicted.attitude.heading.to_radians(),
            record.predicted.attitude.bank.to_radians(),
        );
        let rotation = Quaternion::from_euler(pitch_rate, heading_rate, bank_rate);
        let t = dt.min(1.0);
        let slerped = Quaternion::IDENTITY.slerp(rotation, t);
        let result = current.compose(slerped);
        let euler = result.to_euler();
        (euler.x.to_degrees(), euler.y.to_degrees(), euler.z.to_degrees())
    };

    record.predicted.position.latitude = new_lat;
    record.predicted.position.longitude = new_lon;
    record.predicted.position.altitude_true = new_alt;
    record.predicted.attitude.pitch = pitch;
    record.predicted.attitude.heading = heading;
    record.predicted.attitude.bank = bank;
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Planar distance in feet between two terrain samples, a flat-earth
/// approximation adequate over the short baselines the usable-age window
/// admits (a handful of seconds of aircraft travel).
fn sample_distance_ft(a: &TerrainSample, b: &TerrainSample) -> f64 {
    let dlat_ft = geo::deg_to_feet(b.latitude - a.latitude);
    let mid_lat = (a.latitude + b.latitude) / 2.0;
    let dlon_ft = geo::deg_to_feet(b.longitude - a.longitude) * geo::longitude_scaling_factor(mid_lat);
    (dlat_ft * dlat_ft + dlon_ft * dlon_ft).sqrt()
}

fn terrain_history_is_usable(history: &std::collections::VecDeque<TerrainSample>) -> bool {
    if history.len() < 2 {
        return false;
    }
    let first = history.front().unwrap();
    let last = history.back().unwrap();
    if last.at.saturating_duration_since(first.at) < TERRAIN_USABLE_AGE {
        return false;
    }
    let distance = sample_distance_ft(first, last);
    if distance < 1.0 {
        return true;
    }
    let elevation_delta = (last.elevation_ft - first.elevation_ft).abs();
    let slope = (elevation_delta / distance).atan().to_degrees();
    slope <= TERRAIN_MAX_SLOPE_DEG
}

/// §4.F step 4.
fn ground_clamp(record: &mut RemoteAircraft, now: Instant, _dt: f64, terrain: &dyn TerrainProbe) {
    let local_elevation = if record.predicted.position.altitude_true < 18_000.0 {
        terrain.probe(record.predicted.position.latitude, record.predicted.position.longitude)
    } else {
        None
    };
    record.ground.local_elevation_ft = local_elevation;

    let local_elev = match local_elevation {
        Some(e) => e,
        None => return,
    };

    while record
        .ground
        .history
        .front()
        .map(|s| now.saturating_duration_since(s.at) > TERRAIN_USABLE_AGE)
        .unwrap_or(false)
    {
        record.ground.history.pop_front();
    }

    let agl = record
        .ground_truth
        .position
        .altitude_agl
        .unwrap_or(record.predicted.position.altitude_true - local_elev);

    if agl <= MAX_USABLE_ALTITUDE_AGL_FT {
        record.ground.history.push_back(TerrainSample {
            at: now,
            latitude: record.ground_truth.position.latitude,
            longitude: record.ground_truth.position.longitude,
            elevation_ft: local_elev,
        });
    }

    let usable = terrain_history_is_usable(&record.ground.history);
    let on_ground = record.config.on_ground;

    if !usable && !on_ground && record.ground.target_offset_ft == 0.0 && record.ground.current_offset_ft == 0.0 {
        floor_at_local_elevation(record, local_elev);
        return;
    }

    let new_target_offset = if usable || on_ground {
        let remote_terrain_elevation = record.ground_truth.position.altitude_true - agl;
        let mut target = round2(local_elev - remote_terrain_elevation);
        if on_ground && record.ground_truth.position.altitude_true + target > local_elev {
            target += local_elev - (record.ground_truth.position.altitude_true + target);
        }
        target
    } else {
        0.0
    };

    if new_target_offset != record.ground.target_offset_ft {
        record.ground.target_offset_ft = new_target_offset;
        record.ground.offset_magnitude_ft = (new_target_offset - record.ground.current_offset_ft).abs().max(MIN_TERRAIN_OFFSET_MAGNITUDE_FT);
    }

    if record.ground.current_offset_ft != record.ground.target_offset_ft {
        if record.first_render {
            record.ground.current_offset_ft = record.ground.target_offset_ft;
        } else {
            let climbout = !on_ground && agl >= MIN_AGL_FOR_CLIMBOUT_FT && record.ground.target_offset_ft == 0.0;
            let window = if climbout { TERRAIN_OFFSET_WINDOW_CLIMBOUT_S } else { TERRAIN_OFFSET_WINDOW_LANDING_S };
            let frame_rate = if _dt > 0.0 { 1.0 / _dt } else { 1.0 };
            let step = record.ground.offset_magnitude_ft / (frame_rate * window);
            let remaining = (record.ground.target_offset_ft - record.ground.current_offset_ft).abs();
            if step >= remaining {
                record.ground.current_offset_ft = record.ground.target_offset_ft;
            } else {
                record.ground.current_offset_ft += if record.ground.target_offset_ft > record.ground.current_offset_ft { step } else { -step };
            }
        }
    }

    record.predicted.position.altitude_true += record.ground.current_offset_ft;
    floor_at_local_elevation(record, local_elev);
}

fn floor_at_local_elevation(record: &mut RemoteAircraft, local_elev: f64) {
    if record.predicted.position.altitude_true < local_elev {
        record.predicted.position.altitude_true = local_elev;
    }
}

/// §4.F step 5.
fn animate_surfaces(record: &mut RemoteAircraft, now: Instant, dt: f64) {
    let gear_target = if record.config.on_ground || record.config.gear_down { 1.0 } else { 0.0 };
    let spoiler_target = if record.config.spoilers_deployed { 1.0 } else { 0.0 };
    let reverser_target = if record.config.engines_reversing { 1.0 } else { 0.0 };
    let flaps_target = record.config.flaps_ratio;

    record.surfaces.gear_target = gear_target;
    record.surfaces.spoilers_target = spoiler_target;
    record.surfaces.reversers_target = reverser_target;
    record.surfaces.flaps_target = flaps_target;

    if record.first_render {
        record.surfaces.gear_current = gear_target;
        record.surfaces.spoilers_current = spoiler_target;
        record.surfaces.reversers_current = reverser_target;
        record.surfaces.flaps_current = flaps_target;
        record.previous_surface_update = now;
        return;
    }

    let wtc = WakeCategory::Medium;
    let durations = durations_for(wtc, record_engine_class(record), &record.identity.icao_type);
    let diff_ms = now.saturating_duration_since(record.previous_surface_update).as_secs_f64() * 1000.0;

    interpolate(&mut record.surfaces.gear_current, gear_target, diff_ms, durations.gear_duration_ms);
    interpolate(&mut record.surfaces.flaps_current, flaps_target, diff_ms, durations.flaps_duration_ms);
    interpolate(&mut record.surfaces.spoilers_current, spoiler_target, diff_ms, durations.spoilers_duration_ms);
    interpolate(&mut record.surfaces.reversers_current, reverser_target, diff_ms, REVERSER_DURATION_MS);

    record.previous_surface_update = now;
    let _ = dt;
}

fn record_engine_class(record: &RemoteAircraft) -> crate::types::Doc8643Class {
    record
        .identity
        .icao_type
        .chars()
        .last()
        .and_then(|c| c.to_string().parse().ok())
        .unwrap_or(crate::types::Doc8643Class::Unknown)
}

fn interpolate(surface: &mut f64, target: f64, diff_ms: f64, move_time_ms: f64) {
    let f = *surface - target;
    if f.abs() > f64::EPSILON && move_time_ms > 0.0 {
        let remaining = target - *surface;
        let step = diff_ms / move_time_ms;
        *surface += step.copysign(remaining);
        *surface = surface.clamp(0.0, 1.0);
    }
}

/// §4.F step 6, visual only.
fn update_kinematics(record: &mut RemoteAircraft, dt: f64) {
    if record.config.on_ground {
        record.wheel_rpm = (60.0 / (2.0 * std::f64::consts::PI * TIRE_RADIUS_M)) * record.linear_velocity.longitudinal.abs();
        let rpm_deg = rpm_to_degrees(record.wheel_rpm, dt);
        record.wheel_angle_deg = (record.wheel_angle_deg + rpm_deg) % 360.0;
    } else {
        record.wheel_rpm = 0.0;
    }

    if record.config.engines_running {
        record.engine_rpm = ENGINE_RUNNING_RPM;
        let rpm_deg = rpm_to_degrees(record.engine_rpm, dt);
        record.engine_angle_deg = (record.engine_angle_deg + rpm_deg) % 360.0;
    } else {
        record.engine_rpm = 0.0;
        record.engine_angle_deg = 0.0;
    }
}

fn rpm_to_degrees(rpm: f64, dt: f64) -> f64 {
    rpm / 60.0 * dt * 360.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Identity;
    use crate::types::{AngularVelocityTriple, Attitude, Callsign, PositionFix, VelocityTriple};
    use approx::assert_abs_diff_eq;

    struct FlatTerrain(f64);
    impl TerrainProbe for FlatTerrain {
        fn probe(&self, _lat: f64, _lon: f64) -> Option<f64> {
            Some(self.0)
        }
    }

    struct NoTerrain;
    impl TerrainProbe for NoTerrain {
        fn probe(&self, _lat: f64, _lon: f64) -> Option<f64> {
            None
        }
    }

    fn pose_at(lat: f64, lon: f64, alt: f64) -> Pose {
        Pose {
            position: PositionFix {
                latitude: lat,
                longitude: lon,
                altitude_true: alt,
                altitude_agl: None,
            },
            attitude: Attitude::ZERO,
            nose_wheel_angle: 0.0,
        }
    }

    #[test]
    fn angular_velocity_decays_to_ground_truth_after_gap() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();

        let spin = AngularVelocityTriple {
            pitch_rate: 0.1,
            heading_rate: 0.2,
            bank_rate: -0.1,
        };
        registry.apply_fast_position(&callsign, pose_at(37.0, -122.0, 1000.0), VelocityTriple::default(), spin, t0);

        let mut engine = MotionEngine::new();
        let terrain = NoTerrain;
        // consume the first-render snap, then let the spin carry predicted attitude
        // away from ground truth for a couple of frames before the gap opens
        engine.step(&mut registry, 0.0, t0, &terrain);
        engine.step(&mut registry, 0.1, t0 + Duration::from_millis(100), &terrain);
        engine.step(&mut registry, 0.1, t0 + Duration::from_millis(200), &terrain);

        let diverged = registry.get(&callsign).unwrap().predicted.attitude.heading;
        assert!((diverged - 0.0_f64).abs() > 1e-6, "expected spin to move heading away from ground truth, got {diverged}");

        let t1 = t0 + Duration::from_millis(600);
        engine.step(&mut registry, 0.05, t1, &terrain);

        let record = registry.get(&callsign).unwrap();
        assert_abs_diff_eq!(record.predicted.attitude.heading, record.ground_truth.attitude.heading, epsilon = 1e-9);
        assert_abs_diff_eq!(record.predicted.attitude.pitch, record.ground_truth.attitude.pitch, epsilon = 1e-9);
    }

    #[test]
    fn extrapolation_advances_position_along_velocity() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(37.6189, -122.3750, 10000.0), t0);

        // first fast position establishes ground truth and velocity, no blend opens (is_new)
        let v = VelocityTriple {
            longitudinal: 50.0,
            vertical: 0.0,
            lateral: 0.0,
        };
        registry.apply_fast_position(&callsign, pose_at(37.6189, -122.3750, 10000.0), v, AngularVelocityTriple::default(), t0);

        let mut engine = MotionEngine::new();
        let terrain = NoTerrain;
        // consume the first-render snap so the ten frames below carry the full 0.5s of motion
        engine.step(&mut registry, 0.0, t0, &terrain);

        let mut now = t0;
        for _ in 0..10 {
            now += Duration::from_millis(50);
            engine.step(&mut registry, 0.05, now, &terrain);
        }

        let record = registry.get(&callsign).unwrap();
        let expected_lat = 37.6189 + geo::meters_to_deg(25.0);
        assert_abs_diff_eq!(record.predicted.position.latitude, expected_lat, epsilon = 1e-7);
        assert_abs_diff_eq!(record.predicted.position.longitude, -122.3750, epsilon = 1e-7);
        assert_abs_diff_eq!(record.predicted.position.altitude_true, 10000.0, epsilon = 1e-6);
    }

    #[test]
    fn error_blend_converges_within_one_meter_by_two_seconds() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();
        registry.apply_fast_position(&callsign, pose_at(37.0, -122.0, 1000.0), VelocityTriple::default(), AngularVelocityTriple::default(), t0);

        let mut engine = MotionEngine::new();
        let terrain = NoTerrain;
        // consume the first-render snap before the ground truth moves
        engine.step(&mut registry, 0.0, t0, &terrain);

        let t1 = t0 + Duration::from_millis(500);
        // new ground truth ~50m further north than predicted (predicted has not moved)
        let delta_deg = geo::meters_to_deg(50.0);
        registry.apply_fast_position(&callsign, pose_at(37.0 + delta_deg, -122.0, 1000.0), VelocityTriple::default(), AngularVelocityTriple::default(), t1);

        let mut now = t1;
        for _ in 0..40 {
            now += Duration::from_millis(50);
            engine.step(&mut registry, 0.05, now, &terrain);
        }

        let record = registry.get(&callsign).unwrap();
        let residual_deg = (record.predicted.position.latitude - (37.0 + delta_deg)).abs();
        let residual_m = geo::deg_to_meters(residual_deg);
        assert!(residual_m < 1.0, "residual was {residual_m} m");
    }

    #[test]
    fn ground_clamp_floors_altitude_exactly_at_local_elevation() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(37.0, -122.0, 950.0), t0);

        let mut engine = MotionEngine::new();
        let terrain = FlatTerrain(1000.0);
        engine.step(&mut registry, 0.05, t0, &terrain);

        let record = registry.get(&callsign).unwrap();
        assert_abs_diff_eq!(record.predicted.position.altitude_true, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn surfaces_snap_to_target_on_first_render() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(37.0, -122.0, 1000.0), t0);
        registry.apply_config(
            &callsign,
            crate::types::ConfigFlagsDelta {
                gear_down: Some(true),
                ..Default::default()
            },
            t0,
        );

        let mut engine = MotionEngine::new();
        let terrain = NoTerrain;
        engine.step(&mut registry, 0.05, t0, &terrain);

        let record = registry.get(&callsign).unwrap();
        assert_abs_diff_eq!(record.surfaces.gear_current, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn kinematics_stay_zero_when_engines_off_and_airborne() {
        let mut registry = AircraftRegistry::new();
        let callsign = Callsign::new("PILOT");
        let t0 = Instant::now();
        registry.add(callsign.clone(), Identity::default(), pose_at(37.0, -122.0, 5000.0), t0);

        let mut engine = MotionEngine::new();
        let terrain = NoTerrain;
        engine.step(&mut registry, 0.05, t0, &terrain);

        let record = registry.get(&callsign).unwrap();
        assert_eq!(record.wheel_rpm, 0.0);
        assert_eq!(record.engine_rpm, 0.0);
    }
}
