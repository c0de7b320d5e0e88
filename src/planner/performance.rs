// src/planner/performance.rs
//
// Cruise performance reference data. SAR and fuel flow come from the
// aircraft's flight-plan tables: SAR is keyed by Mach number to two
// decimals, fuel flow by 5000 kg weight bracket and cruise schedule, with
// a 1% per 3 C correction for ISA deviation.

use crate::models::flightplan::AltitudeCapability;

/// Fallback SAR for Mach numbers outside the tabulated schedules (the LRC
/// column value).
pub const DEFAULT_SAR_KG_PER_NM: f64 = 9.4;

/// Width of one fuel-flow weight bracket, kg.
pub const WEIGHT_BRACKET_STEP: f64 = 5000.0;

/// Specific air range expressed as fuel burn per air nautical mile
/// (kg/nm), keyed by Mach number rounded to two decimals.
pub fn sar_kg_per_nm(mach: f64) -> f64 {
    match (mach * 100.0).round() as i64 {
        78 => 8.9,
        80 => 9.2,
        82 => 9.6,
        84 => 10.1,
        _ => DEFAULT_SAR_KG_PER_NM,
    }
}

/// One weight bracket of the cruise fuel-flow table, kg/h per schedule.
struct FuelFlowRow {
    weight_lower: f64,
    m078: f64,
    m080: f64,
    m082: f64,
    m084: f64,
    lrc: f64,
}

/// Brackets run in fixed 5000 kg steps; weights outside the table clamp to
/// the first/last row.
const FUEL_FLOW_TABLE: &[FuelFlowRow] = &[
    FuelFlowRow { weight_lower: 45_000.0, m078: 3540.0, m080: 3660.0, m082: 3810.0, m084: 3990.0, lrc: 3600.0 },
    FuelFlowRow { weight_lower: 50_000.0, m078: 3760.0, m080: 3880.0, m082: 4030.0, m084: 4210.0, lrc: 3820.0 },
    FuelFlowRow { weight_lower: 55_000.0, m078: 3990.0, m080: 4110.0, m082: 4260.0, m084: 4440.0, lrc: 4050.0 },
    FuelFlowRow { weight_lower: 60_000.0, m078: 4230.0, m080: 4350.0, m082: 4500.0, m084: 4680.0, lrc: 4290.0 },
    FuelFlowRow { weight_lower: 65_000.0, m078: 4480.0, m080: 4600.0, m082: 4750.0, m084: 4930.0, lrc: 4540.0 },
    FuelFlowRow { weight_lower: 70_000.0, m078: 4740.0, m080: 4860.0, m082: 5010.0, m084: 5190.0, lrc: 4800.0 },
    FuelFlowRow { weight_lower: 75_000.0, m078: 5010.0, m080: 5130.0, m082: 5280.0, m084: 5460.0, lrc: 5070.0 },
    FuelFlowRow { weight_lower: 80_000.0, m078: 5290.0, m080: 5410.0, m082: 5560.0, m084: 5740.0, lrc: 5350.0 },
];

/// Result of a fuel-flow lookup, including the bracket bounds actually
/// used so the EMZW solver can verify self-consistency.
#[derive(Debug, Clone, Copy)]
pub struct FuelFlowLookup {
    /// kg/h, ISA-corrected.
    pub fuel_flow: f64,
    pub bracket_lower: f64,
    pub bracket_upper: f64,
}

/// Looks up cruise fuel flow for the bracket containing `weight_kg` at the
/// given Mach schedule (untabulated Mach numbers use the LRC column), then
/// applies the ISA-deviation correction of 1% per 3 C.
pub fn fuel_flow_for_weight(weight_kg: f64, mach: f64, isa_deviation_c: f64) -> FuelFlowLookup {
    let row = FUEL_FLOW_TABLE
        .iter()
        .rev()
        .find(|r| weight_kg >= r.weight_lower)
        .unwrap_or(&FUEL_FLOW_TABLE[0]);

    let base = match (mach * 100.0).round() as i64 {
        78 => row.m078,
        80 => row.m080,
        82 => row.m082,
        84 => row.m084,
        _ => row.lrc,
    };

    FuelFlowLookup {
        fuel_flow: base * (1.0 + isa_deviation_c / 3.0 * 0.01),
        bracket_lower: row.weight_lower,
        bracket_upper: row.weight_lower + WEIGHT_BRACKET_STEP,
    }
}

/// Advisory check against the altitude-capability table: true when the
/// segment weight exceeds the tabulated ceiling weight. Never blocks
/// editing; the handler only attaches a warning.
pub fn exceeds_capability(weight_tonnes: f64, capability: &AltitudeCapability) -> bool {
    weight_tonnes > capability.max_weight_tonnes
}
