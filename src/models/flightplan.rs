// src/models/flightplan.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// One leg of the flight-plan worksheet.
///
/// Derived fields (`tas`, `ground_speed`, `estimated_time_interval`,
/// `air_distance`, `fuel_flow`, `zone_fuel`, `emzw`, `end_zone_weight`) are
/// owned by `planner::engine::recompute`; everything else is operator input.
/// The `wind` string is display-only: the wind component is entered
/// manually, it is never derived from the string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightPlanSegment {
    pub id: String,
    /// Leg label, e.g. "ML-LT" or "TOC-WAYPT".
    pub segment: String,

    pub flight_level: Option<f64>,
    /// ISA temperature deviation in degrees C.
    pub temp_deviation: Option<f64>,
    pub mach_number: Option<f64>,
    pub tas: Option<f64>,

    pub track: Option<f64>,
    /// Raw wind entry, e.g. "250/45". Not parsed.
    pub wind: Option<String>,
    /// Signed along-track component: headwind negative, tailwind positive.
    pub wind_component: Option<f64>,
    pub ground_speed: Option<f64>,

    pub distance: Option<f64>,
    /// Minutes for the leg.
    pub estimated_time_interval: Option<f64>,
    pub air_distance: Option<f64>,

    /// kg per hour at the estimated mid-zone weight.
    pub fuel_flow: Option<f64>,
    /// kg burned over the leg.
    pub zone_fuel: Option<f64>,

    pub start_zone_weight: Option<f64>,
    pub emzw: Option<f64>,
    pub end_zone_weight: Option<f64>,
    pub plan_fuel_remaining: Option<f64>,
    pub actual_fuel_remaining: Option<f64>,

    pub plan_time: Option<String>,
    pub actual_time: Option<String>,
}

/// Editable fields of a segment, named so the recompute cascade can be
/// table-driven rather than a chain of conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentField {
    Segment,
    FlightLevel,
    TempDeviation,
    MachNumber,
    Track,
    Wind,
    WindComponent,
    Distance,
    StartZoneWeight,
    PlanFuelRemaining,
    ActualFuelRemaining,
    PlanTime,
    ActualTime,
}

/// Row of the 'altitude_capabilities' table: the maximum weight (tonnes) at
/// which a flight level can be held for a cruise schedule and ISA band.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AltitudeCapability {
    pub flight_level: i64,
    pub cruise_schedule: String,
    /// Upper edge of the ISA-deviation band this row covers, degrees C.
    pub temp_deviation: i64,
    pub max_weight_tonnes: f64,
}

/// DTO for the recompute endpoint: a segment plus which field just changed.
#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    pub segment: FlightPlanSegment,
    pub changed_field: SegmentField,
    /// Schedule used for the advisory altitude-capability check.
    pub cruise_schedule: Option<String>,
}

/// Recomputed segment plus advisory warnings. Warnings never block editing.
#[derive(Debug, Serialize)]
pub struct RecomputeResponse {
    pub segment: FlightPlanSegment,
    pub warnings: Vec<String>,
}

/// Query parameters for the direct capability lookup.
#[derive(Debug, Deserialize)]
pub struct CapabilityParams {
    pub flight_level: i64,
    pub cruise_schedule: String,
    pub temp_deviation: i64,
}
