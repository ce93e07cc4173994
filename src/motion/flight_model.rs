//! Surface-animation duration tables selected by Doc 8643 classification
//! (§4.F step 5), grounded on `NetworkAircraft::GetFlightModel`'s
//! WTC/classification/ICAO-type match table, simplified to prefix/substring
//! matching rather than the original's regex table (small, fixed match set).

use crate::types::Doc8643Class;

/// Wake turbulence category, the first field of the Doc 8643 triple the
/// original's regex table matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCategory {
    Heavy,
    Medium,
    Light,
}

/// Per-surface animation parameters for one aircraft size/engine class
/// (§4.F step 5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDurations {
    pub gear_duration_ms: f64,
    pub flaps_duration_ms: f64,
    pub spoilers_duration_ms: f64,
    pub reversers_duration_ms: f64,
    pub gear_deflection: f64,
}

const HUGE_JETS: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 10_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 1.4,
};

const BIZ_JET: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 250.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.5,
};

const MEDIUM_JETS: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.5,
};

const MEDIUM_PROPS: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 8_000.0,
    flaps_duration_ms: 7_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.4,
};

const GA: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.25,
};

const LIGHT_AC: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.25,
};

const HELI: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.25,
};

const GLIDER: SurfaceDurations = SurfaceDurations {
    gear_duration_ms: 10_000.0,
    flaps_duration_ms: 5_000.0,
    spoilers_duration_ms: 5_000.0,
    reversers_duration_ms: 1_500.0,
    gear_deflection: 0.25,
};

/// Picks the duration table for `(wtc, engine_class, icao_type)`, mirroring
/// the priority order of the original match table: wide-body heavies first,
/// then business jets by type prefix, then the engine-class fallbacks.
pub fn durations_for(wtc: WakeCategory, engine_class: Doc8643Class, icao_type: &str) -> SurfaceDurations {
    const BIZ_JET_TYPES: &[&str] = &["C56", "C68", "FA", "GLF", "CL30", "CL35", "E50", "E55", "LJ"];

    if wtc == WakeCategory::Heavy && engine_class == Doc8643Class::Jet {
        return HUGE_JETS;
    }

    if engine_class == Doc8643Class::Jet && BIZ_JET_TYPES.iter().any(|prefix| icao_type.starts_with(prefix)) {
        return BIZ_JET;
    }

    match engine_class {
        Doc8643Class::Helicopter => HELI,
        Doc8643Class::Glider => GLIDER,
        Doc8643Class::Jet => MEDIUM_JETS,
        Doc8643Class::TurboProp => MEDIUM_PROPS,
        Doc8643Class::PistonProp => {
            if wtc == WakeCategory::Light {
                LIGHT_AC
            } else {
                GA
            }
        }
        Doc8643Class::Unknown => MEDIUM_JETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavy_jet_gets_huge_jets_table() {
        let table = durations_for(WakeCategory::Heavy, Doc8643Class::Jet, "B744");
        assert_eq!(table, HUGE_JETS);
    }

    #[test]
    fn business_jet_type_gets_fast_gear() {
        let table = durations_for(WakeCategory::Medium, Doc8643Class::Jet, "C56X");
        assert_eq!(table.gear_duration_ms, 250.0);
    }

    #[test]
    fn light_piston_gets_light_ac_table() {
        let table = durations_for(WakeCategory::Light, Doc8643Class::PistonProp, "C172");
        assert_eq!(table, LIGHT_AC);
    }

    #[test]
    fn helicopter_always_gets_heli_table_regardless_of_wtc() {
        let table = durations_for(WakeCategory::Light, Doc8643Class::Helicopter, "H60");
        assert_eq!(table, HELI);
    }
}
