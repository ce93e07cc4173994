//! Startup configuration (§6 "CLI/config surface"). The core accepts this
//! struct at connect time; no file format is defined here — persistence is a
//! collaborator concern (§6).

use std::time::Duration;

/// Startup configuration passed into a [`crate::session::Session`], the same
/// plain-struct shape as the teacher's `bridge::local::Configuration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// FSD server hostname or IP.
    pub server_address: String,
    /// FSD server TCP port.
    pub server_port: u16,
    /// VATSIM CID used by the auth function.
    pub vatsim_id: String,
    /// VATSIM password used by the auth function.
    pub vatsim_password: String,
    /// Own callsign transmitted on add-pilot.
    pub callsign: String,
    /// Own ICAO type for plane-info responses.
    pub aircraft_type: String,
    /// Fallback ICAO type for remotes whose type is unknown.
    pub default_ac_icao: String,
    /// Label tint hint passed through to the host, `RRGGBB`.
    pub default_label_color: String,
    /// Visibility cutoff hint, nautical miles.
    pub max_label_distance_nm: f64,
    /// Whether the client issues reciprocal auth challenges to the server.
    pub challenge_server: bool,
    /// TCP connect timeout; ambient transport tuning, not a spec.md field.
    pub connect_timeout: Duration,
    /// Delay before a caller-initiated reconnect attempt; ambient transport
    /// tuning, not a spec.md field (the session itself never auto-retries,
    /// §4.C "the session never silently retries").
    pub retry_delay: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            server_address: String::new(),
            server_port: 6809,
            vatsim_id: String::new(),
            vatsim_password: String::new(),
            callsign: String::new(),
            aircraft_type: "A320".to_string(),
            default_ac_icao: "A320".to_string(),
            default_label_color: "00FF00".to_string(),
            max_label_distance_nm: 40.0,
            challenge_server: false,
            connect_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Configuration::default();
        assert_eq!(config.server_port, 6809);
        assert!(!config.challenge_server);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }
}
