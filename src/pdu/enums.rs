//! Small enumerations carried by PDU fields.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ProtocolError;

/// VATSIM network rating, carried as a small integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkRating {
    Observer = 1,
    PilotOrS1 = 2,
    S2 = 3,
    S3 = 4,
    C1 = 5,
    C2 = 6,
    C3 = 7,
    I1 = 8,
    I2 = 9,
    I3 = 10,
    Supervisor = 11,
    Administrator = 12,
}

impl FromStr for NetworkRating {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use NetworkRating::*;
        Ok(match s.parse::<i32>().map_err(|_| ProtocolError::InvalidField {
            field: "rating",
            value: s.to_string(),
        })? {
            1 => Observer,
            2 => PilotOrS1,
            3 => S2,
            4 => S3,
            5 => C1,
            6 => C2,
            7 => C3,
            8 => I1,
            9 => I2,
            10 => I3,
            11 => Supervisor,
            12 => Administrator,
            _ => {
                return Err(ProtocolError::InvalidField {
                    field: "rating",
                    value: s.to_string(),
                })
            }
        })
    }
}

impl Display for NetworkRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i32)
    }
}

/// Client/server protocol revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolRevision {
    Classic = 9,
    VatsimNoAuth = 10,
    Vatsim2022 = 100,
}

impl FromStr for ProtocolRevision {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i32>().map_err(|_| ProtocolError::InvalidField {
            field: "protocol_revision",
            value: s.to_string(),
        })? {
            9 => ProtocolRevision::Classic,
            10 => ProtocolRevision::VatsimNoAuth,
            100 => ProtocolRevision::Vatsim2022,
            _ => {
                return Err(ProtocolError::InvalidField {
                    field: "protocol_revision",
                    value: s.to_string(),
                })
            }
        })
    }
}

impl Display for ProtocolRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i32)
    }
}

/// Simulator type reported by a pilot client on add-pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorType {
    Unknown = 0,
    MSFS95 = 1,
    MSFS98 = 2,
    MSCFS = 3,
    AS2 = 4,
    PS1 = 5,
    XPlane = 6,
}

impl FromStr for SimulatorType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i32>().unwrap_or(-1) {
            0 => SimulatorType::Unknown,
            1 => SimulatorType::MSFS95,
            2 => SimulatorType::MSFS98,
            3 => SimulatorType::MSCFS,
            4 => SimulatorType::AS2,
            5 => SimulatorType::PS1,
            6 => SimulatorType::XPlane,
            _ => SimulatorType::Unknown,
        })
    }
}

impl Display for SimulatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i32)
    }
}

/// Pilot transponder mode (standby / mode C / ident).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransponderMode {
    Standby,
    ModeC,
    Ident,
}

impl FromStr for TransponderMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(TransponderMode::Standby),
            "N" => Ok(TransponderMode::ModeC),
            "Y" => Ok(TransponderMode::Ident),
            _ => Err(ProtocolError::InvalidField {
                field: "transponder_mode",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for TransponderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            TransponderMode::Standby => "S",
            TransponderMode::ModeC => "N",
            TransponderMode::Ident => "Y",
        };
        write!(f, "{c}")
    }
}

/// ATC facility type carried on ATC position reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityType {
    Observer = 0,
    FlightService = 1,
    Delivery = 2,
    Ground = 3,
    Tower = 4,
    Approach = 5,
    Center = 6,
}

impl FromStr for FacilityType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i32>().map_err(|_| ProtocolError::InvalidField {
            field: "facility_type",
            value: s.to_string(),
        })? {
            0 => FacilityType::Observer,
            1 => FacilityType::FlightService,
            2 => FacilityType::Delivery,
            3 => FacilityType::Ground,
            4 => FacilityType::Tower,
            5 => FacilityType::Approach,
            6 => FacilityType::Center,
            _ => {
                return Err(ProtocolError::InvalidField {
                    field: "facility_type",
                    value: s.to_string(),
                })
            }
        })
    }
}

impl Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i32)
    }
}

/// Client query / response sub-kind (§4.B supplement: the routine
/// session-bookkeeping sub-kinds, others tolerated and ignored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientQueryKind {
    IsValidAtc,
    Capabilities,
    RealName,
    Server,
    AircraftConfig,
    Other(String),
}

impl FromStr for ClientQueryKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "IS_VALID_ATC" => ClientQueryKind::IsValidAtc,
            "CAPS" => ClientQueryKind::Capabilities,
            "RN" => ClientQueryKind::RealName,
            "SV" => ClientQueryKind::Server,
            "ACC" => ClientQueryKind::AircraftConfig,
            other => ClientQueryKind::Other(other.to_string()),
        })
    }
}

impl Display for ClientQueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClientQueryKind::IsValidAtc => "IS_VALID_ATC",
            ClientQueryKind::Capabilities => "CAPS",
            ClientQueryKind::RealName => "RN",
            ClientQueryKind::Server => "SV",
            ClientQueryKind::AircraftConfig => "ACC",
            ClientQueryKind::Other(s) => s,
        };
        write!(f, "{s}")
    }
}
