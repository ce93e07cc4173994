//! PDU variant structs: one per semantic role in spec.md §4.B's table, each
//! with a `TryFrom<&[&str]>` parser and a `Display` serializer, following the
//! reference crate's `azimuth-radar-fsd-interface` field-splitting idiom.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::pdu::attitude::{decode_pitch_bank_heading, encode_pitch_bank_heading};
use crate::pdu::enums::{ClientQueryKind, FacilityType, NetworkRating, ProtocolRevision, SimulatorType, TransponderMode};
use crate::pdu::fields::{parse_field, parse_optional_field, require_fields, sanitize_text_body};
use crate::types::ConfigFlagsDelta;

/// `$DI` — sent by the server immediately after connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerIdentification {
    pub server_callsign: String,
    pub server_version: String,
    pub initial_challenge_key: String,
}

impl TryFrom<&[&str]> for ServerIdentification {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 4);
        Ok(ServerIdentification {
            server_callsign: fields[0].to_string(),
            server_version: fields[2].to_string(),
            initial_challenge_key: fields[3].to_string(),
        })
    }
}

impl Display for ServerIdentification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "$DI{}:CLIENT:{}:{}",
            self.server_callsign, self.server_version, self.initial_challenge_key
        )
    }
}

/// `$ID` — sent by the client to identify itself to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIdentification {
    pub callsign: String,
    pub client_id: u16,
    pub client_name: String,
    pub major_version: u16,
    pub minor_version: u16,
    pub user_id: String,
    pub system_uid: String,
    pub initial_challenge_response: String,
}

impl TryFrom<&[&str]> for ClientIdentification {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 8);
        Ok(ClientIdentification {
            callsign: fields[0].to_string(),
            client_id: parse_field(fields, 1, "client_id")?,
            client_name: fields[2].to_string(),
            major_version: parse_field(fields, 3, "major_version")?,
            minor_version: parse_field(fields, 4, "minor_version")?,
            user_id: fields[5].to_string(),
            system_uid: fields[6].to_string(),
            initial_challenge_response: fields[7].to_string(),
        })
    }
}

impl Display for ClientIdentification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "$ID{}:SERVER:{:x}:{}:{}:{}:{}:{}:{}",
            self.callsign,
            self.client_id,
            self.client_name,
            self.major_version,
            self.minor_version,
            self.user_id,
            self.system_uid,
            self.initial_challenge_response,
        )
    }
}

/// `#AP` — add pilot.
#[derive(Debug, Clone, PartialEq)]
pub struct AddPilot {
    pub callsign: String,
    pub user_id: String,
    pub password: String,
    pub rating: NetworkRating,
    pub protocol_revision: ProtocolRevision,
    pub sim_type: SimulatorType,
    pub real_name: String,
}

impl TryFrom<&[&str]> for AddPilot {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 7);
        Ok(AddPilot {
            callsign: fields[0].to_string(),
            user_id: fields[1].to_string(),
            password: fields[2].to_string(),
            rating: parse_field(fields, 3, "rating")?,
            protocol_revision: parse_field(fields, 4, "protocol_revision")?,
            sim_type: parse_field(fields, 5, "sim_type")?,
            real_name: fields[6].to_string(),
        })
    }
}

impl Display for AddPilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#AP{}:SERVER:{}:{}:{}:{}:{}:{}",
            self.callsign,
            self.user_id,
            self.password,
            self.rating,
            self.protocol_revision,
            self.sim_type,
            sanitize_text_body(&self.real_name),
        )
    }
}

/// `#AA` — add ATC.
#[derive(Debug, Clone, PartialEq)]
pub struct AddAtc {
    pub callsign: String,
    pub real_name: String,
    pub user_id: String,
    pub password: String,
    pub rating: NetworkRating,
    pub protocol_revision: ProtocolRevision,
}

impl TryFrom<&[&str]> for AddAtc {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 6);
        Ok(AddAtc {
            callsign: fields[0].to_string(),
            real_name: fields[1].to_string(),
            user_id: fields[2].to_string(),
            password: fields[3].to_string(),
            rating: parse_field(fields, 4, "rating")?,
            protocol_revision: parse_field(fields, 5, "protocol_revision")?,
        })
    }
}

impl Display for AddAtc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#AA{}:SERVER:{}:{}:{}:{}:{}",
            self.callsign,
            sanitize_text_body(&self.real_name),
            self.user_id,
            self.password,
            self.rating,
            self.protocol_revision,
        )
    }
}

/// `#DP` — delete pilot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePilot {
    pub callsign: String,
    pub user_id: String,
}

impl TryFrom<&[&str]> for DeletePilot {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 1);
        Ok(DeletePilot {
            callsign: fields[0].to_string(),
            user_id: fields.get(1).unwrap_or(&"").to_string(),
        })
    }
}

impl Display for DeletePilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#DP{}:{}", self.callsign, self.user_id)
    }
}

/// `#DA` — delete ATC.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteAtc {
    pub callsign: String,
    pub user_id: String,
}

impl TryFrom<&[&str]> for DeleteAtc {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 1);
        Ok(DeleteAtc {
            callsign: fields[0].to_string(),
            user_id: fields.get(1).unwrap_or(&"").to_string(),
        })
    }
}

impl Display for DeleteAtc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#DA{}:{}", self.callsign, self.user_id)
    }
}

/// `@` — pilot slow position report.
#[derive(Debug, Clone, PartialEq)]
pub struct PilotPosition {
    pub callsign: String,
    pub transponder_mode: TransponderMode,
    pub transponder_code: u16,
    pub rating: NetworkRating,
    pub latitude: f64,
    pub longitude: f64,
    pub true_altitude: f64,
    pub ground_speed: u32,
    pub pitch: f64,
    pub bank: f64,
    pub heading: f64,
    pub on_ground: bool,
}

impl TryFrom<&[&str]> for PilotPosition {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 9);
        let pbh: u32 = parse_field(fields, 7, "pitch_bank_heading")?;
        let (pitch, bank, heading, on_ground) = decode_pitch_bank_heading(pbh);
        Ok(PilotPosition {
            callsign: fields[0].to_string(),
            transponder_mode: parse_field(fields, 1, "transponder_mode")?,
            transponder_code: parse_field(fields, 2, "transponder_code")?,
            rating: parse_field(fields, 3, "rating")?,
            latitude: parse_field(fields, 4, "latitude")?,
            longitude: parse_field(fields, 5, "longitude")?,
            true_altitude: parse_field(fields, 6, "true_altitude")?,
            ground_speed: parse_field(fields, 8, "ground_speed")?,
            pitch,
            bank,
            heading,
            on_ground,
        })
    }
}

impl Display for PilotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pbh = encode_pitch_bank_heading(self.pitch, self.bank, self.heading, self.on_ground);
        write!(
            f,
            "@{}{}:{:04}:{}:{:.7}:{:.7}:{:.2}:{}:{}:0",
            self.transponder_mode,
            self.callsign,
            self.transponder_code,
            self.rating,
            self.latitude,
            self.longitude,
            self.true_altitude,
            self.ground_speed,
            pbh,
        )
    }
}

/// `^` — fast pilot position report, carrying body-relative velocities.
#[derive(Debug, Clone, PartialEq)]
pub struct FastPilotPosition {
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    pub true_altitude: f64,
    pub altitude_agl: f64,
    pub pitch: f64,
    pub bank: f64,
    pub heading: f64,
    pub on_ground: bool,
    pub velocity_longitudinal: f64,
    pub velocity_vertical: f64,
    pub velocity_lateral: f64,
    pub velocity_pitch_rate: f64,
    pub velocity_heading_rate: f64,
    pub velocity_bank_rate: f64,
    pub nose_wheel_angle: Option<f64>,
}

impl TryFrom<&[&str]> for FastPilotPosition {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 12);
        let pbh: u32 = parse_field(fields, 5, "pitch_bank_heading")?;
        let (pitch, bank, heading, on_ground) = decode_pitch_bank_heading(pbh);

        // §3: pitch-rate and bank-rate are negated on ingest.
        let raw_pitch_rate: f64 = parse_field(fields, 9, "pitch_rate")?;
        let raw_bank_rate: f64 = parse_field(fields, 11, "bank_rate")?;

        Ok(FastPilotPosition {
            callsign: fields[0].to_string(),
            latitude: parse_field(fields, 1, "latitude")?,
            longitude: parse_field(fields, 2, "longitude")?,
            true_altitude: parse_field(fields, 3, "true_altitude")?,
            altitude_agl: parse_field(fields, 4, "altitude_agl")?,
            pitch,
            bank,
            heading,
            on_ground,
            // Wire x/y/z velocities map to lateral(lon)/vertical(alt)/longitudinal(lat).
            velocity_lateral: parse_field(fields, 6, "velocity_lateral")?,
            velocity_vertical: parse_field(fields, 7, "velocity_vertical")?,
            velocity_longitudinal: parse_field(fields, 8, "velocity_longitudinal")?,
            velocity_pitch_rate: -raw_pitch_rate,
            velocity_heading_rate: parse_field(fields, 10, "heading_rate")?,
            velocity_bank_rate: -raw_bank_rate,
            nose_wheel_angle: parse_optional_field(fields, 12, "nose_wheel_angle")?,
        })
    }
}

impl Display for FastPilotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pbh = encode_pitch_bank_heading(self.pitch, self.bank, self.heading, self.on_ground);
        write!(
            f,
            "^{}:{:.7}:{:.7}:{:.2}:{:.2}:{}:{:.4}:{:.4}:{:.4}:{:.4}:{:.4}:{:.4}",
            self.callsign,
            self.latitude,
            self.longitude,
            self.true_altitude,
            self.altitude_agl,
            pbh,
            self.velocity_lateral,
            self.velocity_vertical,
            self.velocity_longitudinal,
            -self.velocity_pitch_rate,
            self.velocity_heading_rate,
            -self.velocity_bank_rate,
        )?;
        if let Some(nga) = self.nose_wheel_angle {
            write!(f, ":{:.2}", nga)?;
        }
        Ok(())
    }
}

/// `#PC` — heartbeat / ping-pong keepalive (§4.B supplement).
#[derive(Debug, Clone, PartialEq)]
pub struct Heartbeat {
    pub callsign: String,
    pub target: String,
}

impl TryFrom<&[&str]> for Heartbeat {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 1);
        Ok(Heartbeat {
            callsign: fields[0].to_string(),
            target: fields.get(1).unwrap_or(&"SERVER").to_string(),
        })
    }
}

impl Display for Heartbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#PC{}:{}:HBEAT", self.callsign, self.target)
    }
}

/// `%` — ATC position report (received only).
#[derive(Debug, Clone, PartialEq)]
pub struct AtcPosition {
    pub callsign: String,
    pub frequency_khz: u32,
    pub facility: FacilityType,
    pub visual_range: u32,
    pub rating: NetworkRating,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: i32,
}

impl TryFrom<&[&str]> for AtcPosition {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 7);
        Ok(AtcPosition {
            callsign: fields[0].to_string(),
            frequency_khz: parse_field::<u32>(fields, 1, "frequency")? * 10,
            facility: parse_field(fields, 2, "facility")?,
            visual_range: parse_field(fields, 3, "visual_range")?,
            rating: parse_field(fields, 4, "rating")?,
            latitude: parse_field(fields, 5, "latitude")?,
            longitude: parse_field(fields, 6, "longitude")?,
            elevation: parse_optional_field(fields, 7, "elevation")?.unwrap_or(0),
        })
    }
}

impl Display for AtcPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "%{}:{}:{}:{}:{}:{:.5}:{:.5}:{}",
            self.callsign,
            self.frequency_khz / 10,
            self.facility,
            self.visual_range,
            self.rating,
            self.latitude,
            self.longitude,
            self.elevation,
        )
    }
}

/// `\` — ATC secondary visibility centre (§4.B supplement, reference-crate
/// grounded: `AtcSecondaryVisCentreMessage`).
#[derive(Debug, Clone, PartialEq)]
pub struct AtcSecondaryVisCentre {
    pub callsign: String,
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<&[&str]> for AtcSecondaryVisCentre {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 4);
        Ok(AtcSecondaryVisCentre {
            callsign: fields[0].to_string(),
            index: parse_field(fields, 1, "index")?,
            latitude: parse_field(fields, 2, "latitude")?,
            longitude: parse_field(fields, 3, "longitude")?,
        })
    }
}

impl Display for AtcSecondaryVisCentre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\\{}:{}:{:.5}:{:.5}",
            self.callsign, self.index, self.latitude, self.longitude
        )
    }
}

/// `#TM` — text or radio message, discriminated on the `to` field shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOrRadioMessage {
    Text { from: String, to: String, body: String },
    Radio { from: String, frequencies_khz: Vec<u32>, body: String },
}

impl TryFrom<&[&str]> for TextOrRadioMessage {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 2);
        let from = fields[0].to_string();
        let to = fields[1];
        let body = fields[2..].join(":");

        if let Some(freqs) = parse_frequency_list(to) {
            Ok(TextOrRadioMessage::Radio {
                from,
                frequencies_khz: freqs,
                body,
            })
        } else {
            Ok(TextOrRadioMessage::Text {
                from,
                to: to.to_string(),
                body,
            })
        }
    }
}

fn parse_frequency_list(field: &str) -> Option<Vec<u32>> {
    if !field.starts_with('@') && !field.contains('&') {
        return None;
    }
    let parts: Vec<&str> = field.split(['@', '&']).filter(|s| !s.is_empty()).collect();
    if parts.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        out.push(part.parse::<u32>().ok()? * 10);
    }
    Some(out)
}

impl Display for TextOrRadioMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextOrRadioMessage::Text { from, to, body } => {
                write!(f, "#TM{}:{}:{}", from, to, sanitize_text_body(body))
            }
            TextOrRadioMessage::Radio {
                from,
                frequencies_khz,
                body,
            } => {
                let freqs = frequencies_khz
                    .iter()
                    .map(|khz| format!("@{}", khz / 10))
                    .collect::<Vec<_>>()
                    .join("&");
                write!(f, "#TM{}:{}:{}", from, freqs, sanitize_text_body(body))
            }
        }
    }
}

/// `$PI` — plane info request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneInfoRequest {
    pub from: String,
    pub to: String,
}

impl TryFrom<&[&str]> for PlaneInfoRequest {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 2);
        Ok(PlaneInfoRequest {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
        })
    }
}

impl Display for PlaneInfoRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$PI{}:{}", self.from, self.to)
    }
}

/// `$PO` — plane info response.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneInfoResponse {
    pub from: String,
    pub to: String,
    pub icao_type: String,
    pub airline: Option<String>,
    pub livery: Option<String>,
}

impl TryFrom<&[&str]> for PlaneInfoResponse {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        Ok(PlaneInfoResponse {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            icao_type: fields[2].to_string(),
            airline: parse_optional_field(fields, 3, "airline")?,
            livery: parse_optional_field(fields, 4, "livery")?,
        })
    }
}

impl Display for PlaneInfoResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$PO{}:{}:EQUIPMENT={}", self.from, self.to, self.icao_type)?;
        if let Some(airline) = &self.airline {
            write!(f, ":AIRLINE={}", airline)?;
        }
        if let Some(livery) = &self.livery {
            write!(f, ":LIVERY={}", livery)?;
        }
        Ok(())
    }
}

/// `#SB` — aircraft configuration, JSON payload (§4.B, §9 Open Question).
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftConfigPdu {
    pub from: String,
    pub to: String,
    pub config: ConfigFlagsDelta,
}

#[derive(Serialize, Deserialize)]
struct ConfigEnvelope {
    config: ConfigFlagsDelta,
}

impl TryFrom<&[&str]> for AircraftConfigPdu {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        let json = fields[2..].join(":");
        let envelope: ConfigEnvelope =
            serde_json::from_str(&json).map_err(|_| ProtocolError::InvalidField {
                field: "aircraft_config",
                value: json.clone(),
            })?;
        Ok(AircraftConfigPdu {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            config: envelope.config,
        })
    }
}

impl Display for AircraftConfigPdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let envelope = ConfigEnvelope { config: self.config };
        let json = serde_json::to_string(&envelope).unwrap_or_default();
        write!(f, "#SB{}:{}:{}", self.from, self.to, json)
    }
}

/// `$ZC` — auth challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthChallenge {
    pub from: String,
    pub to: String,
    pub challenge: String,
}

impl TryFrom<&[&str]> for AuthChallenge {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        Ok(AuthChallenge {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            challenge: fields[2].to_string(),
        })
    }
}

impl Display for AuthChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$ZC{}:{}:{}", self.from, self.to, self.challenge)
    }
}

/// `$ZR` — auth response.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub from: String,
    pub to: String,
    pub response: String,
}

impl TryFrom<&[&str]> for AuthResponse {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        Ok(AuthResponse {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            response: fields[2].to_string(),
        })
    }
}

impl Display for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$ZR{}:{}:{}", self.from, self.to, self.response)
    }
}

/// `$CQ` — client query.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientQuery {
    pub from: String,
    pub to: String,
    pub kind: ClientQueryKind,
    pub payload: Vec<String>,
}

impl TryFrom<&[&str]> for ClientQuery {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        Ok(ClientQuery {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            kind: fields[2].parse()?,
            payload: fields[3..].iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Display for ClientQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$CQ{}:{}:{}", self.from, self.to, self.kind)?;
        for p in &self.payload {
            write!(f, ":{p}")?;
        }
        Ok(())
    }
}

/// `$CR` — client query response.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientQueryResponse {
    pub from: String,
    pub to: String,
    pub kind: ClientQueryKind,
    pub payload: Vec<String>,
}

impl TryFrom<&[&str]> for ClientQueryResponse {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 3);
        Ok(ClientQueryResponse {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            kind: fields[2].parse()?,
            payload: fields[3..].iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Display for ClientQueryResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$CR{}:{}:{}", self.from, self.to, self.kind)?;
        for p in &self.payload {
            write!(f, ":{p}")?;
        }
        Ok(())
    }
}

/// `$!!` — kill.
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub target: String,
    pub reason: String,
}

impl TryFrom<&[&str]> for Kill {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 1);
        Ok(Kill {
            target: fields[0].to_string(),
            reason: fields.get(1..).unwrap_or(&[]).join(":"),
        })
    }
}

impl Display for Kill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$!!{}:{}", self.target, self.reason)
    }
}

/// `$ER` — server error.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    pub from: String,
    pub to: String,
    pub code: String,
    pub param: String,
    pub message: String,
}

impl TryFrom<&[&str]> for ServerError {
    type Error = ProtocolError;

    fn try_from(fields: &[&str]) -> Result<Self, Self::Error> {
        require_fields!(fields, 5);
        Ok(ServerError {
            from: fields[0].to_string(),
            to: fields[1].to_string(),
            code: fields[2].to_string(),
            param: fields[3].to_string(),
            message: fields[4..].join(":"),
        })
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "$ER{}:{}:{}:{}:{}",
            self.from, self.to, self.code, self.param, self.message
        )
    }
}
