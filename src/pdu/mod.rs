//! FSD wire protocol codec (§4.B): line classification, per-role parsing,
//! and serialization.

pub mod attitude;
mod enums;
mod fields;
mod messages;

pub use enums::{ClientQueryKind, FacilityType, NetworkRating, ProtocolRevision, SimulatorType, TransponderMode};
pub use messages::{
    AddAtc, AddPilot, AircraftConfigPdu, AtcPosition, AtcSecondaryVisCentre, AuthChallenge, AuthResponse,
    ClientIdentification, ClientQuery, ClientQueryResponse, DeleteAtc, DeletePilot, FastPilotPosition, Heartbeat,
    Kill, PilotPosition, PlaneInfoRequest, PlaneInfoResponse, ServerError, ServerIdentification, TextOrRadioMessage,
};

use std::fmt::Display;

use crate::error::ProtocolError;

/// One parsed line of FSD traffic. Variants mirror the semantic roles named
/// in §4.B's PDU table; each wraps a struct carrying that role's fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Pdu {
    ServerIdentification(ServerIdentification),
    ClientIdentification(ClientIdentification),
    AddPilot(AddPilot),
    AddAtc(AddAtc),
    DeletePilot(DeletePilot),
    DeleteAtc(DeleteAtc),
    PilotPosition(PilotPosition),
    FastPilotPosition(FastPilotPosition),
    AtcPosition(AtcPosition),
    AtcSecondaryVisCentre(AtcSecondaryVisCentre),
    TextOrRadioMessage(TextOrRadioMessage),
    Heartbeat(Heartbeat),
    PlaneInfoRequest(PlaneInfoRequest),
    PlaneInfoResponse(PlaneInfoResponse),
    AircraftConfig(AircraftConfigPdu),
    AuthChallenge(AuthChallenge),
    AuthResponse(AuthResponse),
    ClientQuery(ClientQuery),
    ClientQueryResponse(ClientQueryResponse),
    Kill(Kill),
    Error(ServerError),
}

impl Display for Pdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pdu::ServerIdentification(p) => p.fmt(f),
            Pdu::ClientIdentification(p) => p.fmt(f),
            Pdu::AddPilot(p) => p.fmt(f),
            Pdu::AddAtc(p) => p.fmt(f),
            Pdu::DeletePilot(p) => p.fmt(f),
            Pdu::DeleteAtc(p) => p.fmt(f),
            Pdu::PilotPosition(p) => p.fmt(f),
            Pdu::FastPilotPosition(p) => p.fmt(f),
            Pdu::AtcPosition(p) => p.fmt(f),
            Pdu::AtcSecondaryVisCentre(p) => p.fmt(f),
            Pdu::TextOrRadioMessage(p) => p.fmt(f),
            Pdu::Heartbeat(p) => p.fmt(f),
            Pdu::PlaneInfoRequest(p) => p.fmt(f),
            Pdu::PlaneInfoResponse(p) => p.fmt(f),
            Pdu::AircraftConfig(p) => p.fmt(f),
            Pdu::AuthChallenge(p) => p.fmt(f),
            Pdu::AuthResponse(p) => p.fmt(f),
            Pdu::ClientQuery(p) => p.fmt(f),
            Pdu::ClientQueryResponse(p) => p.fmt(f),
            Pdu::Kill(p) => p.fmt(f),
            Pdu::Error(p) => p.fmt(f),
        }
    }
}

/// Splits one already-unframed FSD line (CRLF already stripped by the
/// transport) into its marker and colon-delimited fields, then dispatches to
/// the matching PDU parser.
///
/// Markers are matched longest-first: the three single-character markers
/// (`@`, `^`, `%`, `\`) take the rest of the line as the callsign-leading
/// field directly, while `$`/`#`-prefixed PDUs carry a two-letter code before
/// the callsign.
pub fn parse_line(line: &str) -> Result<Pdu, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ProtocolError::TooFewFields { expected: 1, found: 0 });
    }

    let mut chars = line.chars();
    let marker = chars.next().unwrap();

    match marker {
        '@' => parse_with(&line[1..], |f| Ok(Pdu::PilotPosition(split_transponder_prefixed(f)?))),
        '^' => parse_with(&line[1..], |f| Ok(Pdu::FastPilotPosition(FastPilotPosition::try_from(f)?))),
        '%' => parse_with(&line[1..], |f| Ok(Pdu::AtcPosition(AtcPosition::try_from(f)?))),
        '\\' => parse_with(&line[1..], |f| {
            Ok(Pdu::AtcSecondaryVisCentre(AtcSecondaryVisCentre::try_from(f)?))
        }),
        '$' | '#' => {
            if line.len() < 3 {
                return Err(ProtocolError::UnknownType(line.to_string()));
            }
            let code = &line[0..3];
            let rest = &line[3..];
            match code {
                "$DI" => parse_with(rest, |f| Ok(Pdu::ServerIdentification(ServerIdentification::try_from(f)?))),
                "$ID" => parse_with(rest, |f| Ok(Pdu::ClientIdentification(ClientIdentification::try_from(f)?))),
                "#AP" => parse_with(rest, |f| Ok(Pdu::AddPilot(AddPilot::try_from(f)?))),
                "#AA" => parse_with(rest, |f| Ok(Pdu::AddAtc(AddAtc::try_from(f)?))),
                "#DP" => parse_with(rest, |f| Ok(Pdu::DeletePilot(DeletePilot::try_from(f)?))),
                "#DA" => parse_with(rest, |f| Ok(Pdu::DeleteAtc(DeleteAtc::try_from(f)?))),
                "#TM" => parse_with(rest, |f| Ok(Pdu::TextOrRadioMessage(TextOrRadioMessage::try_from(f)?))),
                "#PC" => parse_with(rest, |f| Ok(Pdu::Heartbeat(Heartbeat::try_from(f)?))),
                "$PI" => parse_with(rest, |f| Ok(Pdu::PlaneInfoRequest(PlaneInfoRequest::try_from(f)?))),
                "$PO" => parse_with(rest, |f| Ok(Pdu::PlaneInfoResponse(PlaneInfoResponse::try_from(f)?))),
                "#SB" => parse_with(rest, |f| Ok(Pdu::AircraftConfig(AircraftConfigPdu::try_from(f)?))),
                "$ZC" => parse_with(rest, |f| Ok(Pdu::AuthChallenge(AuthChallenge::try_from(f)?))),
                "$ZR" => parse_with(rest, |f| Ok(Pdu::AuthResponse(AuthResponse::try_from(f)?))),
                "$CQ" => parse_with(rest, |f| Ok(Pdu::ClientQuery(ClientQuery::try_from(f)?))),
                "$CR" => parse_with(rest, |f| Ok(Pdu::ClientQueryResponse(ClientQueryResponse::try_from(f)?))),
                "$!!" => parse_with(rest, |f| Ok(Pdu::Kill(Kill::try_from(f)?))),
                "$ER" => parse_with(rest, |f| Ok(Pdu::Error(ServerError::try_from(f)?))),
                _ => Err(ProtocolError::UnknownType(code.to_string())),
            }
        }
        _ => Err(ProtocolError::UnknownPrefix(marker.to_string())),
    }
}

fn parse_with<T>(rest: &str, f: impl FnOnce(&[&str]) -> Result<T, ProtocolError>) -> Result<T, ProtocolError> {
    let fields: Vec<&str> = rest.split(':').collect();
    f(&fields)
}

/// `@` position reports carry the transponder mode as a single-character
/// prefix directly on the callsign field rather than as its own colon field;
/// split it off before delegating to the normal field parser.
fn split_transponder_prefixed(fields: &[&str]) -> Result<PilotPosition, ProtocolError> {
    let first = fields.first().copied().unwrap_or("");
    let mut chars = first.chars();
    let mode_char = chars.next().ok_or(ProtocolError::TooFewFields { expected: 1, found: 0 })?;
    let callsign = chars.as_str();

    let mut rebuilt: Vec<&str> = Vec::with_capacity(fields.len() + 1);
    rebuilt.push(callsign);
    rebuilt.push(match mode_char {
        'S' => "S",
        'Y' => "Y",
        _ => "N",
    });
    rebuilt.extend_from_slice(&fields[1..]);
    PilotPosition::try_from(rebuilt.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_identification() {
        let pdu = parse_line("$DISERVER:CLIENT:VATSIM FSD V3.40:9b06821a\r\n").unwrap();
        match pdu {
            Pdu::ServerIdentification(s) => {
                assert_eq!(s.server_callsign, "SERVER");
                assert_eq!(s.initial_challenge_key, "9b06821a");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_fast_pilot_position_and_round_trips_pbh() {
        let pbh = attitude::encode_pitch_bank_heading(2.0, -3.0, 270.0, false);
        let line = format!("^PILOT:37.6189:-122.3750:10000.00:5000.00:{pbh}:0.0000:0.0000:50.0000:1.5000:2.5000:0.5000:0.00");
        let pdu = parse_line(&line).unwrap();
        match pdu {
            Pdu::FastPilotPosition(p) => {
                assert_eq!(p.callsign, "PILOT");
                assert!((p.latitude - 37.6189).abs() < 1e-6);
                assert!((p.longitude - (-122.3750)).abs() < 1e-6);
                assert!((p.true_altitude - 10000.0).abs() < 1e-6);
                assert!((p.altitude_agl - 5000.0).abs() < 1e-6);
                assert!((p.pitch - 2.0).abs() < 0.1);
                assert!((p.bank - (-3.0)).abs() < 0.1);
                assert!((p.heading - 270.0).abs() < 0.1);
                assert!(!p.on_ground);
                // wire x/y/z map to lateral(lon)/vertical(alt)/longitudinal(lat).
                assert!((p.velocity_lateral - 0.0).abs() < 1e-6);
                assert!((p.velocity_vertical - 0.0).abs() < 1e-6);
                assert!((p.velocity_longitudinal - 50.0).abs() < 1e-6);
                // §3: pitch-rate and bank-rate are negated on ingest, heading-rate is not.
                assert!((p.velocity_pitch_rate - (-1.5)).abs() < 1e-6);
                assert!((p.velocity_heading_rate - 2.5).abs() < 1e-6);
                assert!((p.velocity_bank_rate - (-0.5)).abs() < 1e-6);

                let rendered = p.to_string();
                let reparsed = parse_line(&rendered).unwrap();
                assert_eq!(reparsed, Pdu::FastPilotPosition(p));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn discriminates_radio_from_text_message() {
        match parse_line("#TMN123AB:@12190:hello").unwrap() {
            Pdu::TextOrRadioMessage(TextOrRadioMessage::Radio { frequencies_khz, .. }) => {
                assert_eq!(frequencies_khz, vec![121_900]);
            }
            other => panic!("unexpected {other:?}"),
        }

        match parse_line("#TMN123AB:SERVER:hello").unwrap() {
            Pdu::TextOrRadioMessage(TextOrRadioMessage::Text { to, .. }) => assert_eq!(to, "SERVER"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_marker() {
        assert!(parse_line("?GARBAGE:1:2").is_err());
    }

    #[test]
    fn rejects_too_few_fields() {
        assert!(matches!(
            parse_line("#APONLYONE"),
            Err(ProtocolError::TooFewFields { .. })
        ));
    }

    #[test]
    fn kill_pdu_round_trips() {
        let k = Kill {
            target: "N123AB".to_string(),
            reason: "requested by supervisor".to_string(),
        };
        let line = k.to_string();
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed, Pdu::Kill(k));
    }
}
