// src/planner/engine.rs
//
// Pure arithmetic over one flight-plan leg. Every function takes all of
// its inputs as parameters and touches no clock, RNG or storage. Derived
// fields keep their prior value whenever a precondition fails, so a
// half-filled worksheet never turns into NaN.

use crate::models::flightplan::{FlightPlanSegment, SegmentField};
use crate::planner::atmosphere::mach_to_tas;
use crate::planner::performance::{fuel_flow_for_weight, sar_kg_per_nm};

/// Iteration cap for the EMZW fixed-point loop. Weight brackets are coarse
/// enough that the loop settles in one or two passes; the cap guards
/// against pathological inputs, returning the last estimate instead of
/// spinning.
pub const MAX_SOLVER_ITERATIONS: usize = 5;

/// Ground speed from TAS and the signed along-track wind component
/// (headwind negative, tailwind positive).
pub fn ground_speed(tas_kt: f64, wind_component_kt: f64) -> f64 {
    tas_kt + wind_component_kt
}

/// Leg time in minutes, defined only for positive distance and ground
/// speed.
pub fn estimated_time_interval(distance_nm: f64, ground_speed_kt: f64) -> Option<f64> {
    if distance_nm > 0.0 && ground_speed_kt > 0.0 {
        Some(distance_nm / ground_speed_kt * 60.0)
    } else {
        None
    }
}

/// Air distance flown in the leg time at the given TAS.
pub fn air_distance(tas_kt: f64, time_interval_min: f64) -> f64 {
    tas_kt * time_interval_min / 60.0
}

/// Specific ground range: SAR corrected for wind at 0.02 kg/nm per knot,
/// added for headwind (negative component) and subtracted for tailwind.
pub fn specific_ground_range(mach: f64, wind_component_kt: f64) -> f64 {
    sar_kg_per_nm(mach) - 0.02 * wind_component_kt
}

/// Output of the zone-fuel solver.
#[derive(Debug, Clone, Copy)]
pub struct ZoneFuelSolution {
    /// Estimated mid-zone weight, kg.
    pub emzw: f64,
    /// kg burned over the leg.
    pub zone_fuel: f64,
    /// kg/h used for the accepted bracket.
    pub fuel_flow: f64,
    pub end_zone_weight: f64,
    pub iterations: usize,
    /// False when the iteration cap was hit; the values are then the last
    /// best-effort estimate.
    pub converged: bool,
}

/// Fixed-point EMZW / zone-fuel solver, mirroring manual flight-computer
/// iteration:
///
/// 1. seed the mid-zone weight estimate from the SGR half-leg burn;
/// 2. look up fuel flow for the bracket containing the estimate;
/// 3. derive zone fuel, the actual mid-zone weight and the end weight;
/// 4. accept once the actual weight lands inside the bracket used for the
///    lookup, otherwise feed it back into step 2;
/// 5. give up (best effort) after `MAX_SOLVER_ITERATIONS`.
pub fn solve_zone_fuel(
    start_zone_weight_kg: f64,
    distance_nm: f64,
    mach: f64,
    wind_component_kt: f64,
    time_interval_min: f64,
    isa_deviation_c: f64,
) -> ZoneFuelSolution {
    let sgr = specific_ground_range(mach, wind_component_kt);
    let mut estimate = start_zone_weight_kg - (distance_nm * sgr) / 2.0;

    let mut solution = ZoneFuelSolution {
        emzw: estimate,
        zone_fuel: 0.0,
        fuel_flow: 0.0,
        end_zone_weight: start_zone_weight_kg,
        iterations: 0,
        converged: false,
    };

    for iteration in 1..=MAX_SOLVER_ITERATIONS {
        let lookup = fuel_flow_for_weight(estimate, mach, isa_deviation_c);
        let zone_fuel = lookup.fuel_flow * time_interval_min / 60.0;
        let actual_emzw = start_zone_weight_kg - zone_fuel;

        solution = ZoneFuelSolution {
            emzw: actual_emzw,
            zone_fuel,
            fuel_flow: lookup.fuel_flow,
            end_zone_weight: actual_emzw - zone_fuel,
            iterations: iteration,
            converged: actual_emzw >= lookup.bracket_lower && actual_emzw < lookup.bracket_upper,
        };

        if solution.converged {
            break;
        }
        estimate = actual_emzw;
    }

    solution
}

/// Derived quantities, in recomputation order. The full chain is TAS ->
/// ground speed -> time interval -> air distance -> zone fuel/weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Derived {
    Tas,
    GroundSpeed,
    TimeInterval,
    AirDistance,
    ZoneFuel,
}

const FULL_CHAIN: &[Derived] = &[
    Derived::Tas,
    Derived::GroundSpeed,
    Derived::TimeInterval,
    Derived::AirDistance,
    Derived::ZoneFuel,
];

/// Which derived fields each editable field invalidates. Fields not listed
/// (labels, free-text times, fuel-remaining entries) trigger nothing.
const DEPENDENTS: &[(SegmentField, &[Derived])] = &[
    (SegmentField::FlightLevel, FULL_CHAIN),
    (SegmentField::TempDeviation, FULL_CHAIN),
    (SegmentField::MachNumber, FULL_CHAIN),
    (
        SegmentField::WindComponent,
        &[
            Derived::GroundSpeed,
            Derived::TimeInterval,
            Derived::AirDistance,
            Derived::ZoneFuel,
        ],
    ),
    (
        SegmentField::Distance,
        &[Derived::TimeInterval, Derived::AirDistance, Derived::ZoneFuel],
    ),
    (SegmentField::StartZoneWeight, &[Derived::ZoneFuel]),
];

/// Recomputes the derived fields of one segment after an edit to
/// `changed_field`. Cross-segment propagation is deliberately out of
/// scope: the worksheet recomputes the edited row only.
pub fn recompute(mut segment: FlightPlanSegment, changed_field: SegmentField) -> FlightPlanSegment {
    let steps = DEPENDENTS
        .iter()
        .find(|(field, _)| *field == changed_field)
        .map(|(_, steps)| *steps)
        .unwrap_or(&[]);

    for step in steps {
        match step {
            Derived::Tas => recompute_tas(&mut segment),
            Derived::GroundSpeed => recompute_ground_speed(&mut segment),
            Derived::TimeInterval => recompute_time_interval(&mut segment),
            Derived::AirDistance => recompute_air_distance(&mut segment),
            Derived::ZoneFuel => recompute_zone_fuel(&mut segment),
        }
    }

    segment
}

fn recompute_tas(segment: &mut FlightPlanSegment) {
    if let (Some(mach), Some(flight_level)) = (segment.mach_number, segment.flight_level) {
        if mach > 0.0 && flight_level > 0.0 {
            let deviation = segment.temp_deviation.unwrap_or(0.0);
            segment.tas = Some(mach_to_tas(mach, flight_level * 100.0, deviation));
        }
    }
}

fn recompute_ground_speed(segment: &mut FlightPlanSegment) {
    if let (Some(tas), Some(wind)) = (segment.tas, segment.wind_component) {
        segment.ground_speed = Some(ground_speed(tas, wind));
    }
}

fn recompute_time_interval(segment: &mut FlightPlanSegment) {
    if let (Some(distance), Some(gs)) = (segment.distance, segment.ground_speed) {
        if let Some(eti) = estimated_time_interval(distance, gs) {
            segment.estimated_time_interval = Some(eti);
        }
    }
}

fn recompute_air_distance(segment: &mut FlightPlanSegment) {
    if let (Some(tas), Some(eti)) = (segment.tas, segment.estimated_time_interval) {
        if tas > 0.0 && eti > 0.0 {
            segment.air_distance = Some(air_distance(tas, eti));
        }
    }
}

fn recompute_zone_fuel(segment: &mut FlightPlanSegment) {
    let (Some(start), Some(distance), Some(mach), Some(eti)) = (
        segment.start_zone_weight,
        segment.distance,
        segment.mach_number,
        segment.estimated_time_interval,
    ) else {
        return;
    };
    if distance <= 0.0 || eti <= 0.0 || start <= 0.0 {
        return;
    }

    let solution = solve_zone_fuel(
        start,
        distance,
        mach,
        segment.wind_component.unwrap_or(0.0),
        eti,
        segment.temp_deviation.unwrap_or(0.0),
    );

    segment.fuel_flow = Some(solution.fuel_flow);
    segment.zone_fuel = Some(solution.zone_fuel);
    segment.emzw = Some(solution.emzw);
    segment.end_zone_weight = Some(solution.end_zone_weight);
}
