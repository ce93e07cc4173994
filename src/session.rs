//! Session state machine (§4.C): connected / identified / authenticated /
//! active states, the periodic auth-challenge loop, and outbound PDU
//! scheduling.
//!
//! Grounded on `original_source/src/fsd/FsdSession.h/.cpp` (state flags,
//! `m_serverAuthChallengeInterval`/`m_serverAuthChallengeResponseWindow`
//! constants, the `$DI`→`$ID` handshake) reexpressed as a Rust enum state
//! machine per DESIGN NOTES §9 ("Exception-style error flow": unify error
//! flow behind `Result`; "Polymorphic PDUs": a tagged variant, no virtual
//! `Serialize`).

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::auth::{AuthState, ChallengeResponder};
use crate::config::Configuration;
use crate::connection::{Connection, NetworkEvent};
use crate::error::{SessionError, TransportError};
use crate::pdu::{
    AddPilot, AircraftConfigPdu, AuthChallenge, AuthResponse, ClientIdentification, ClientQuery, ClientQueryKind,
    ClientQueryResponse, DeletePilot, FastPilotPosition, Heartbeat, NetworkRating, Pdu, PilotPosition,
    PlaneInfoResponse, ProtocolRevision, SimulatorType, TextOrRadioMessage,
};
use crate::registry::{AircraftRegistry, Identity};
use crate::statistics::{Statistics, StatisticsEngine};
use crate::transport::LineTransport;
use crate::types::{AngularVelocityTriple, Attitude, Callsign, ConfigFlags, ConfigFlagsDelta, Pose, PositionFix, VelocityTriple};

/// xPilot's assigned VATSIM client id, sent as the hex field on `$ID`
/// (matches spec.md §8 scenario 1's literal `d8f2`).
const CLIENT_ID: u16 = 0xd8f2;
const CLIENT_NAME: &str = "xpilot";
const CLIENT_MAJOR_VERSION: u16 = 2;
const CLIENT_MINOR_VERSION: u16 = 0;

const SLOW_POSITION_PERIOD: Duration = Duration::from_secs(5);
const FAST_POSITION_PERIOD: Duration = Duration::from_millis(200);
const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);
/// Server-initiated auth challenges arrive no more often than this (§4.C).
const CHALLENGE_SERVER_PERIOD: Duration = Duration::from_secs(60);
/// A challenge response must be confirmed (by any further server traffic)
/// within this window or the connection is treated as dead (§4.C).
const CHALLENGE_RESPONSE_DEADLINE: Duration = Duration::from_secs(30);
/// Below this, a velocity component is considered in the deadband and fast
/// position broadcasting is suspended (§4.C "while any velocity component
/// exceeds a small deadband"). Invented threshold, recorded in DESIGN.md.
const VELOCITY_DEADBAND: f64 = 0.05;

/// Connected / identified / authenticated / observing / flying states (§3,
/// §4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    SocketOpen,
    ServerIdentified,
    Authenticated,
    Active,
}

/// Events surfaced to the host/UI collaborator (§7 "the user observes at
/// most: a connected-state flip, a reason string, and any pre-disconnect
/// text messages").
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    Disconnected { reason: String },
    TextMessage { from: String, to: String, body: String },
    RadioMessage { from: String, frequencies_khz: Vec<u32>, body: String },
}

/// Error codes treated as session-fatal rather than logged-and-skipped
/// (§7). The wire does not document a canonical code list in the retrieved
/// sources; this is an implementer's choice recorded in DESIGN.md, covering
/// the two cases spec.md names by name ("unknown server id, auth
/// rejected").
const FATAL_ERROR_CODES: &[&str] = &["001", "006", "007", "010"];

/// The FSD session state machine (§4.C). Owns the socket (via
/// [`LineTransport`]/[`Connection`]) and the auth-challenge state; borrows
/// the [`AircraftRegistry`] for the duration of a single [`Session::poll`]
/// call rather than owning it (§3 "Ownership").
pub struct Session<R: ChallengeResponder> {
    config: Configuration,
    responder: R,
    state: SessionState,

    write: Option<LineTransport>,
    connection: Option<Connection>,

    auth_state: AuthState,
    challenge_deadline: Option<Instant>,
    challenge_counter: u64,

    own_pose: Pose,
    own_velocity: VelocityTriple,
    own_angular_velocity: AngularVelocityTriple,
    own_config: ConfigFlags,
    own_config_dumped: bool,
    last_sent_config: ConfigFlags,

    last_slow_position_sent: Option<Instant>,
    last_fast_position_sent: Option<Instant>,
    last_heartbeat_sent: Option<Instant>,
    last_challenge_issued: Option<Instant>,

    stats: Arc<StatisticsEngine>,
}

impl<R: ChallengeResponder> Session<R> {
    pub fn new(config: Configuration, responder: R) -> Self {
        Session {
            config,
            responder,
            state: SessionState::Disconnected,
            write: None,
            connection: None,
            auth_state: AuthState::default(),
            challenge_deadline: None,
            challenge_counter: 0,
            own_pose: default_pose(),
            own_velocity: VelocityTriple::default(),
            own_angular_velocity: AngularVelocityTriple::default(),
            own_config: ConfigFlags::default(),
            own_config_dumped: false,
            last_sent_config: ConfigFlags::default(),
            last_slow_position_sent: None,
            last_fast_position_sent: None,
            last_heartbeat_sent: None,
            last_challenge_issued: None,
            stats: StatisticsEngine::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn own_callsign(&self) -> &str {
        &self.config.callsign
    }

    /// Current send/receive/error counters (§7 observability). Cheap to
    /// call every frame; backed by atomics shared with the network thread.
    pub fn statistics(&self) -> Statistics {
        self.stats.snapshot()
    }

    /// The host updates its own aircraft's pose/velocity/config once per
    /// frame before calling [`Session::poll`]; the outbound scheduler reads
    /// these fields to build slow/fast-position and config PDUs.
    pub fn update_own_state(&mut self, pose: Pose, velocity: VelocityTriple, angular_velocity: AngularVelocityTriple, config: ConfigFlags) {
        self.own_pose = pose;
        self.own_velocity = velocity;
        self.own_angular_velocity = angular_velocity;
        self.own_config = config;
    }

    /// `connect()` (§4.C `Disconnected -> SocketOpen`). Opens the TCP
    /// socket, spawns the network thread over a cloned read half, and
    /// resets session-local timers.
    pub fn connect(&mut self, now: Instant) -> Result<(), TransportError> {
        let addr = format!("{}:{}", self.config.server_address, self.config.server_port);
        let write = LineTransport::connect(&addr, self.config.connect_timeout)?;
        let read_half = write.try_clone()?;

        self.write = Some(write);
        self.connection = Some(Connection::spawn(read_half, Arc::clone(&self.stats)));
        self.state = SessionState::SocketOpen;
        self.auth_state = AuthState::default();
        self.challenge_deadline = None;
        self.own_config_dumped = false;
        self.last_slow_position_sent = None;
        self.last_fast_position_sent = None;
        self.last_heartbeat_sent = Some(now);
        self.last_challenge_issued = None;
        info!("connecting to {addr}");
        Ok(())
    }

    /// Sends `#AP`/`#AA` and transitions `ServerIdentified -> Authenticated`
    /// (§4.C). The host calls this once it has a server identification and
    /// is ready to log on; no-op (returns `Ok`) outside `ServerIdentified`.
    pub fn add_pilot(&mut self) -> Result<(), TransportError> {
        if self.state != SessionState::ServerIdentified {
            return Ok(());
        }
        let pdu = AddPilot {
            callsign: self.config.callsign.clone(),
            user_id: self.config.vatsim_id.clone(),
            password: self.config.vatsim_password.clone(),
            rating: NetworkRating::PilotOrS1,
            protocol_revision: ProtocolRevision::Vatsim2022,
            sim_type: SimulatorType::XPlane,
            real_name: self.config.callsign.clone(),
        };
        self.send(&pdu)?;
        self.state = SessionState::Authenticated;
        info!("authenticated as {}", self.config.callsign);
        Ok(())
    }

    /// Drains queued network events, dispatches each to the registry and
    /// this session's own state, evaluates the challenge-response deadline,
    /// and runs the outbound scheduler. Called once per simulator frame
    /// (§5).
    pub fn poll(&mut self, registry: &mut AircraftRegistry, now: Instant) -> Vec<SessionEvent> {
        let mut out = Vec::new();

        let events = match &self.connection {
            Some(connection) => connection.drain(),
            None => Vec::new(),
        };

        for event in events {
            match event {
                NetworkEvent::Pdu(pdu) => self.handle_pdu(pdu, registry, now, &mut out),
                NetworkEvent::ProtocolError(_) => {
                    // Already logged by the network thread; non-fatal (§7).
                }
                NetworkEvent::Disconnected(reason) => {
                    self.fail(reason.to_string(), registry, &mut out);
                }
            }
        }

        if self.state == SessionState::Active {
            if let Some(deadline) = self.challenge_deadline {
                if now >= deadline {
                    self.fail(SessionError::ChallengeTimeout.to_string(), registry, &mut out);
                }
            }
        }

        if self.state != SessionState::Disconnected {
            if let Err(e) = self.run_scheduler(now) {
                self.fail(e.to_string(), registry, &mut out);
            }
        }

        out
    }

    /// `disconnect()`: closes the socket (which unblocks the network
    /// thread's `recv`, §5), drops the connection, flushes the registry
    /// (§7 "the registry is flushed"), and halts outbound sending.
    pub fn disconnect(&mut self, registry: &mut AircraftRegistry) {
        if let Some(write) = &self.write {
            write.shutdown();
        }
        self.write = None;
        self.connection = None;
        self.state = SessionState::Disconnected;
        registry.clear();
    }

    fn fail(&mut self, reason: String, registry: &mut AircraftRegistry, out: &mut Vec<SessionEvent>) {
        warn!("session failed: {reason}");
        self.disconnect(registry);
        out.push(SessionEvent::Disconnected { reason });
        out.push(SessionEvent::StateChanged(SessionState::Disconnected));
    }

    fn handle_pdu(&mut self, pdu: Pdu, registry: &mut AircraftRegistry, now: Instant, out: &mut Vec<SessionEvent>) {
        // Any traffic from the server is proof of life; a pending
        // challenge-response deadline is satisfied by it (§4.C).
        self.challenge_deadline = None;

        match pdu {
            Pdu::ServerIdentification(server_id) => {
                if self.state == SessionState::SocketOpen {
                    self.auth_state = AuthState::initial(&server_id.initial_challenge_key);
                    let (response, next_state) =
                        self.responder
                            .respond(&server_id.initial_challenge_key, CLIENT_ID, &self.config.vatsim_password, &self.auth_state);
                    self.auth_state = next_state;

                    let ident = ClientIdentification {
                        callsign: self.config.callsign.clone(),
                        client_id: CLIENT_ID,
                        client_name: CLIENT_NAME.to_string(),
                        major_version: CLIENT_MAJOR_VERSION,
                        minor_version: CLIENT_MINOR_VERSION,
                        user_id: self.config.vatsim_id.clone(),
                        system_uid: self.config.vatsim_id.clone(),
                        initial_challenge_response: response,
                    };
                    if self.send(&ident).is_ok() {
                        self.state = SessionState::ServerIdentified;
                        out.push(SessionEvent::StateChanged(SessionState::ServerIdentified));
                    }
                }
            }
            Pdu::AddPilot(add) => {
                if add.callsign != self.config.callsign {
                    let identity = Identity::default();
                    registry.add(Callsign::new(&add.callsign), identity, default_pose(), now);
                }
            }
            Pdu::AddAtc(_) => {
                // ATC rendering is out of this crate's scope (§1); no-op.
            }
            Pdu::DeletePilot(DeletePilot { callsign, .. }) => {
                registry.remove(&Callsign::new(&callsign));
            }
            Pdu::DeleteAtc(_) => {}
            Pdu::PilotPosition(p) => {
                let pose = Pose {
                    position: PositionFix {
                        latitude: p.latitude,
                        longitude: p.longitude,
                        altitude_true: p.true_altitude,
                        altitude_agl: None,
                    },
                    attitude: Attitude {
                        pitch: p.pitch,
                        bank: p.bank,
                        heading: p.heading,
                    },
                    nose_wheel_angle: 0.0,
                };
                if pose.position.latitude.is_finite() && pose.position.longitude.is_finite() {
                    let delta = ConfigFlagsDelta {
                        on_ground: Some(p.on_ground),
                        ..Default::default()
                    };
                    registry.apply_slow_position(&Callsign::new(&p.callsign), pose, delta, now);
                }
            }
            Pdu::FastPilotPosition(p) => self.apply_fast_position(p, registry, now),
            Pdu::AtcPosition(_) | Pdu::AtcSecondaryVisCentre(_) => {
                // ATC positions do not feed the aircraft-rendering pipeline.
            }
            Pdu::TextOrRadioMessage(TextOrRadioMessage::Text { from, to, body }) => {
                out.push(SessionEvent::TextMessage { from, to, body });
            }
            Pdu::TextOrRadioMessage(TextOrRadioMessage::Radio { from, frequencies_khz, body }) => {
                out.push(SessionEvent::RadioMessage { from, frequencies_khz, body });
            }
            Pdu::Heartbeat(_) => {}
            Pdu::PlaneInfoRequest(req) => {
                if req.to == self.config.callsign {
                    let response = PlaneInfoResponse {
                        from: self.config.callsign.clone(),
                        to: req.from,
                        icao_type: self.config.aircraft_type.clone(),
                        airline: None,
                        livery: None,
                    };
                    let _ = self.send(&response);
                }
            }
            Pdu::PlaneInfoResponse(resp) => {
                if let Some(record) = registry.get_mut(&Callsign::new(&resp.from)) {
                    record.identity.icao_type = resp.icao_type;
                    record.identity.airline = resp.airline;
                    record.identity.livery = resp.livery;
                }
            }
            Pdu::AircraftConfig(cfg) => {
                registry.apply_config(&Callsign::new(&cfg.from), cfg.config, now);
            }
            Pdu::AuthChallenge(challenge) => {
                if challenge.to == self.config.callsign {
                    let (response, next_state) =
                        self.responder
                            .respond(&challenge.challenge, CLIENT_ID, &self.config.vatsim_password, &self.auth_state);
                    self.auth_state = next_state;
                    let reply = AuthResponse {
                        from: self.config.callsign.clone(),
                        to: challenge.from,
                        response,
                    };
                    if self.send(&reply).is_ok() {
                        self.challenge_deadline = Some(now + CHALLENGE_RESPONSE_DEADLINE);
                    }
                }
            }
            Pdu::AuthResponse(_) => {
                // A reciprocal response to a challenge we issued (§4.C
                // "challenge the server"); its mere arrival already cleared
                // the deadline above.
            }
            Pdu::ClientQuery(query) => self.handle_client_query(query, out),
            Pdu::ClientQueryResponse(_) => {}
            Pdu::Kill(kill) => {
                self.fail(SessionError::Killed(kill.reason).to_string(), registry, out);
            }
            Pdu::Error(err) => {
                if FATAL_ERROR_CODES.contains(&err.code.as_str()) {
                    let reason = if err.code == "006" {
                        SessionError::UnsupportedVersion(err.message).to_string()
                    } else {
                        SessionError::AuthRejected(err.message).to_string()
                    };
                    self.fail(reason, registry, out);
                } else {
                    warn!("server error {}: {}", err.code, err.message);
                }
            }
        }
    }

    fn apply_fast_position(&mut self, p: FastPilotPosition, registry: &mut AircraftRegistry, now: Instant) {
        let pose = Pose {
            position: PositionFix {
                latitude: p.latitude,
                longitude: p.longitude,
                altitude_true: p.true_altitude,
                altitude_agl: Some(p.altitude_agl),
            },
            attitude: Attitude {
                pitch: p.pitch,
                bank: p.bank,
                heading: p.heading,
            },
            nose_wheel_angle: p.nose_wheel_angle.unwrap_or(0.0),
        };
        if !pose.position.latitude.is_finite() || !pose.position.longitude.is_finite() {
            return;
        }
        let linear_v = VelocityTriple {
            longitudinal: p.velocity_longitudinal,
            vertical: p.velocity_vertical,
            lateral: p.velocity_lateral,
        };
        let angular_v = AngularVelocityTriple {
            pitch_rate: p.velocity_pitch_rate,
            heading_rate: p.velocity_heading_rate,
            bank_rate: p.velocity_bank_rate,
        };
        registry.apply_fast_position(&Callsign::new(&p.callsign), pose, linear_v, angular_v, now);
    }

    fn handle_client_query(&mut self, query: ClientQuery, _out: &mut [SessionEvent]) {
        if query.to != self.config.callsign {
            return;
        }
        match query.kind {
            ClientQueryKind::RealName => {
                let response = ClientQueryResponse {
                    from: self.config.callsign.clone(),
                    to: query.from,
                    kind: ClientQueryKind::RealName,
                    payload: vec![self.config.callsign.clone(), String::new(), "0".to_string()],
                };
                let _ = self.send(&response);
            }
            ClientQueryKind::Capabilities => {
                let response = ClientQueryResponse {
                    from: self.config.callsign.clone(),
                    to: query.from,
                    kind: ClientQueryKind::Capabilities,
                    payload: vec!["VERSION=1".to_string()],
                };
                let _ = self.send(&response);
            }
            _ => debug!("ignoring client query {:?} from {}", query.kind, query.from),
        }
    }

    fn run_scheduler(&mut self, now: Instant) -> Result<(), TransportError> {
        if self.state == SessionState::Authenticated {
            self.send_slow_position(now)?;
            self.last_slow_position_sent = Some(now);
            self.state = SessionState::Active;
            info!("session active for {}", self.config.callsign);
            return Ok(());
        }

        if self.state != SessionState::Active {
            return Ok(());
        }

        if self.last_slow_position_sent.map_or(true, |t| now.duration_since(t) >= SLOW_POSITION_PERIOD) {
            self.send_slow_position(now)?;
            self.last_slow_position_sent = Some(now);
        }

        if self.own_velocity_active() {
            if self.last_fast_position_sent.map_or(true, |t| now.duration_since(t) >= FAST_POSITION_PERIOD) {
                self.send_fast_position(now)?;
                self.last_fast_position_sent = Some(now);
            }
        } else {
            self.last_fast_position_sent = None;
        }

        if self.last_heartbeat_sent.map_or(true, |t| now.duration_since(t) >= HEARTBEAT_PERIOD) {
            let heartbeat = Heartbeat {
                callsign: self.config.callsign.clone(),
                target: "SERVER".to_string(),
            };
            self.send(&heartbeat)?;
            self.last_heartbeat_sent = Some(now);
        }

        if !self.own_config_dumped {
            self.send_config(self.own_config)?;
            self.own_config_dumped = true;
            self.last_sent_config = self.own_config;
        } else if self.own_config != self.last_sent_config {
            self.send_config(self.own_config)?;
            self.last_sent_config = self.own_config;
        }

        if self.config.challenge_server
            && self
                .last_challenge_issued
                .map_or(true, |t| now.duration_since(t) >= CHALLENGE_SERVER_PERIOD)
        {
            self.issue_challenge(now)?;
        }

        Ok(())
    }

    fn own_velocity_active(&self) -> bool {
        self.own_velocity.longitudinal.abs() > VELOCITY_DEADBAND
            || self.own_velocity.vertical.abs() > VELOCITY_DEADBAND
            || self.own_velocity.lateral.abs() > VELOCITY_DEADBAND
            || !self.own_angular_velocity.is_zero()
    }

    fn send_slow_position(&mut self, _now: Instant) -> Result<(), TransportError> {
        let pdu = PilotPosition {
            callsign: self.config.callsign.clone(),
            transponder_mode: crate::pdu::TransponderMode::ModeC,
            transponder_code: 1200,
            rating: NetworkRating::PilotOrS1,
            latitude: self.own_pose.position.latitude,
            longitude: self.own_pose.position.longitude,
            true_altitude: self.own_pose.position.altitude_true,
            ground_speed: 0,
            pitch: self.own_pose.attitude.pitch,
            bank: self.own_pose.attitude.bank,
            heading: self.own_pose.attitude.heading,
            on_ground: self.own_config.on_ground,
        };
        self.send(&pdu)
    }

    fn send_fast_position(&mut self, _now: Instant) -> Result<(), TransportError> {
        let pdu = FastPilotPosition {
            callsign: self.config.callsign.clone(),
            latitude: self.own_pose.position.latitude,
            longitude: self.own_pose.position.longitude,
            true_altitude: self.own_pose.position.altitude_true,
            altitude_agl: self.own_pose.position.altitude_agl.unwrap_or(0.0),
            pitch: self.own_pose.attitude.pitch,
            bank: self.own_pose.attitude.bank,
            heading: self.own_pose.attitude.heading,
            on_ground: self.own_config.on_ground,
            velocity_longitudinal: self.own_velocity.longitudinal,
            velocity_vertical: self.own_velocity.vertical,
            velocity_lateral: self.own_velocity.lateral,
            velocity_pitch_rate: self.own_angular_velocity.pitch_rate,
            velocity_heading_rate: self.own_angular_velocity.heading_rate,
            velocity_bank_rate: self.own_angular_velocity.bank_rate,
            nose_wheel_angle: Some(self.own_pose.nose_wheel_angle),
        };
        self.send(&pdu)
    }

    fn send_config(&mut self, config: ConfigFlags) -> Result<(), TransportError> {
        let pdu = AircraftConfigPdu {
            from: self.config.callsign.clone(),
            to: "SERVER".to_string(),
            config: ConfigFlagsDelta {
                on_ground: Some(config.on_ground),
                gear_down: Some(config.gear_down),
                spoilers_deployed: Some(config.spoilers_deployed),
                strobes_on: Some(config.strobes_on),
                landing_lights_on: Some(config.landing_lights_on),
                taxi_lights_on: Some(config.taxi_lights_on),
                beacon_on: Some(config.beacon_on),
                nav_lights_on: Some(config.nav_lights_on),
                engines_running: Some(config.engines_running),
                engines_reversing: Some(config.engines_reversing),
                flaps_ratio: Some(config.flaps_ratio),
            },
        };
        self.send(&pdu)
    }

    /// Issues a reciprocal challenge to the server when configured to do so
    /// (§4.C "If configured as 'challenge the server' ..."). The challenge
    /// string itself carries no cryptographic weight on this side — only
    /// the server's response is verified against our own [`ChallengeResponder`]
    /// — so a monotonically incrementing counter is a sufficient nonce.
    fn issue_challenge(&mut self, now: Instant) -> Result<(), TransportError> {
        self.challenge_counter += 1;
        let challenge = AuthChallenge {
            from: self.config.callsign.clone(),
            to: "SERVER".to_string(),
            challenge: format!("{:08x}", self.challenge_counter),
        };
        self.send(&challenge)?;
        self.last_challenge_issued = Some(now);
        Ok(())
    }

    fn send<T: std::fmt::Display>(&mut self, pdu: &T) -> Result<(), TransportError> {
        match &mut self.write {
            Some(write) => {
                write.write_line(&pdu.to_string())?;
                self.stats.increment_sent();
                Ok(())
            }
            None => Err(TransportError::NotConnected),
        }
    }
}

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
    use crate::auth::StubChallengeResponder;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn test_config(port: u16) -> Configuration {
        Configuration {
            server_address: "127.0.0.1".to_string(),
            server_port: port,
            vatsim_id: "1215759".to_string(),
            vatsim_password: "password".to_string(),
            callsign: "N123AB".to_string(),
            ..Configuration::default()
        }
    }

    #[test]
    fn happy_path_handshake_reaches_server_identified() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (sock, _) = listener.accept().unwrap();
            let mut writer = sock.try_clone().unwrap();
            let mut reader = BufReader::new(sock);
            writer.write_all(b"$DISERVER:CLIENT:VATSIM FSD V3.40:9b06821a\r\n").unwrap();

            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line
        });

        let mut session = Session::new(test_config(port), StubChallengeResponder);
        session.connect(Instant::now()).unwrap();

        let mut registry = AircraftRegistry::new();
        let deadline = Instant::now() + Duration::from_secs(2);
        while session.state() != SessionState::ServerIdentified && Instant::now() < deadline {
            session.poll(&mut registry, Instant::now());
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(session.state(), SessionState::ServerIdentified);
        let received_ident = server.join().unwrap();
        assert!(received_ident.starts_with("$IDN123AB:SERVER:d8f2:xpilot:2:0:1215759:1215759:"));
    }

    #[test]
    fn kill_pdu_transitions_to_disconnected_and_flushes_registry() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(b"$!!SERVER:requested by supervisor\r\n").unwrap();
            thread::sleep(Duration::from_millis(50));
        });

        let mut session = Session::new(test_config(port), StubChallengeResponder);
        session.connect(Instant::now()).unwrap();

        let mut registry = AircraftRegistry::new();
        registry.add(
            Callsign::new("N1"),
            Identity::default(),
            default_pose(),
            Instant::now(),
        );

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut events = Vec::new();
        while session.state() != SessionState::Disconnected && Instant::now() < deadline {
            events.extend(session.poll(&mut registry, Instant::now()));
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(registry.is_empty());
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Disconnected { .. })));

        server.join().unwrap();
    }

    #[test]
    fn add_pilot_is_a_noop_outside_server_identified() {
        let mut session = Session::new(test_config(0), StubChallengeResponder);
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.add_pilot().is_ok());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    /// Regression: the network thread's `read_line` blocks on its own
    /// `try_clone`-produced handle, so disconnecting must `shutdown` the
    /// socket (not merely drop the write-side handle) or the join below
    /// would hang for as long as the peer stays silent (§5).
    #[test]
    fn disconnect_unblocks_network_thread_promptly_even_with_silent_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (_sock, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(5));
        });

        let mut session = Session::new(test_config(port), StubChallengeResponder);
        session.connect(Instant::now()).unwrap();

        let mut registry = AircraftRegistry::new();
        session.poll(&mut registry, Instant::now());

        let start = Instant::now();
        session.disconnect(&mut registry);
        drop(session);
        assert!(start.elapsed() < Duration::from_secs(1), "disconnect should not block on a silent peer");

        let _ = server;
    }
}
