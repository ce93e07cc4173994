//! xpilot-core: the FSD network protocol engine and remote-aircraft
//! rendering pipeline underneath xPilot, VATSIM's X-Plane pilot client.
//!
//! This crate owns everything between the TCP socket and the host
//! simulator's draw call:
//!
//! * [`pdu`] — the FSD wire format: PDU parsing/encoding (§2, §6, §8).
//! * [`transport`]/[`connection`] — the Latin-1 line transport and the
//!   background network thread that decodes it (§5).
//! * [`auth`] — the pluggable challenge/response trait (§4.D).
//! * [`session`] — the connection state machine and outbound PDU scheduler
//!   (§4.C).
//! * [`registry`] — the `Callsign -> RemoteAircraft` store (§4.E).
//! * [`motion`] — the per-frame extrapolation/ground-clamp/surface-animation
//!   pipeline that turns registry state into drawable aircraft (§4.F).
//! * [`statistics`] — send/receive/error counters for diagnosing a
//!   misbehaving session (§7).
//!
//! A host (the X-Plane plugin, or any other simulator integration) owns a
//! [`session::Session`] and an [`registry::AircraftRegistry`], calls
//! [`session::Session::poll`] once per frame to drain network traffic into
//! the registry, then calls [`motion::MotionEngine::step`] to advance every
//! remote aircraft's rendered pose.

pub mod auth;
pub mod config;
pub mod connection;
pub mod error;
pub mod motion;
pub mod pdu;
pub mod registry;
pub mod session;
pub mod statistics;
pub mod transport;
pub mod types;

pub use auth::{AuthState, ChallengeResponder, StubChallengeResponder};
pub use config::Configuration;
pub use error::{CoreError, ProtocolError, SessionError, TransportError};
pub use motion::{HostSimulator, MotionEngine, TcasSlot, TerrainProbe};
pub use registry::{AircraftRegistry, RemoteAircraft};
pub use session::{Session, SessionEvent, SessionState};
pub use statistics::{Statistics, StatisticsEngine};
pub use types::{Attitude, Callsign, ConfigFlags, Frequency, Pose, PositionFix};
