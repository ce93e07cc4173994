//! A tiny, argument-free smoke-test harness analogous to the teacher's
//! `realflight_bridge_proxy` binary: connect a `Session` to a fixed local
//! FSD-compatible address, poll it for a handful of seconds, and print
//! every state change and a final statistics snapshot.
//!
//! This is not a pilot-client UI. It has no flags; point an FSD-speaking
//! server at `127.0.0.1:6809` (or edit the constants below) before running.

use std::time::{Duration, Instant};

use log::info;

use xpilot_core::auth::StubChallengeResponder;
use xpilot_core::config::Configuration;
use xpilot_core::registry::AircraftRegistry;
use xpilot_core::session::{Session, SessionState};

const RUN_FOR: Duration = Duration::from_secs(15);
const FRAME_PERIOD: Duration = Duration::from_millis(50);

fn main() {
    env_logger::init();

    let config = Configuration {
        server_address: "127.0.0.1".to_string(),
        server_port: 6809,
        vatsim_id: "0000000".to_string(),
        vatsim_password: "demo".to_string(),
        callsign: "N1DEMO".to_string(),
        ..Configuration::default()
    };

    let mut session = Session::new(config, StubChallengeResponder);
    let mut registry = AircraftRegistry::new();

    if let Err(e) = session.connect(Instant::now()) {
        eprintln!("failed to connect: {e}");
        std::process::exit(1);
    }

    let mut last_state = session.state();
    info!("connecting as {}", session.own_callsign());

    let deadline = Instant::now() + RUN_FOR;
    while Instant::now() < deadline {
        let now = Instant::now();
        let events = session.poll(&mut registry, now);
        for event in &events {
            info!("event: {event:?}");
        }

        if session.state() != last_state {
            println!("state: {:?} -> {:?}", last_state, session.state());
            last_state = session.state();
        }

        if last_state == SessionState::ServerIdentified {
            let _ = session.add_pilot();
        }

        if session.state() == SessionState::Disconnected {
            break;
        }

        std::thread::sleep(FRAME_PERIOD);
    }

    let stats = session.statistics();
    println!(
        "done: runtime={:?} sent={} received={} errors={} aircraft_tracked={}",
        stats.runtime,
        stats.sent_count,
        stats.received_count,
        stats.error_count,
        registry.len(),
    );
}
