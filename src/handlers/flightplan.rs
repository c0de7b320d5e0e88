// src/handlers/flightplan.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::flightplan::{CapabilityParams, RecomputeRequest, RecomputeResponse},
    planner::{engine, performance},
    store,
};

/// Recomputes the derived fields of one worksheet segment after an edit.
///
/// The arithmetic itself is pure (`planner::engine::recompute`); this
/// handler only adds the advisory altitude-capability warning on top. A
/// failed capability lookup is logged and skipped — advisories never fail
/// the request, let alone block editing.
pub async fn recompute(
    State(pool): State<SqlitePool>,
    Json(req): Json<RecomputeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let segment = engine::recompute(req.segment, req.changed_field);
    let mut warnings = Vec::new();

    if let (Some(flight_level), Some(weight_kg)) = (segment.flight_level, segment.start_zone_weight)
    {
        let schedule = req.cruise_schedule.as_deref().unwrap_or("LRC");
        let deviation = segment.temp_deviation.unwrap_or(0.0).round() as i64;

        match store::performance::altitude_capability(
            &pool,
            flight_level.round() as i64,
            schedule,
            deviation,
        )
        .await
        {
            Ok(Some(capability)) => {
                let weight_tonnes = weight_kg / 1000.0;
                if performance::exceeds_capability(weight_tonnes, &capability) {
                    warnings.push(format!(
                        "Weight {:.1} t exceeds FL{} capability of {:.1} t ({} schedule, ISA{:+})",
                        weight_tonnes,
                        capability.flight_level,
                        capability.max_weight_tonnes,
                        capability.cruise_schedule,
                        capability.temp_deviation,
                    ));
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Altitude capability lookup failed, skipping advisory: {}", e);
            }
        }
    }

    Ok(Json(RecomputeResponse { segment, warnings }))
}

/// Direct capability lookup for the worksheet's altitude picker.
pub async fn capability(
    State(pool): State<SqlitePool>,
    Query(params): Query<CapabilityParams>,
) -> Result<impl IntoResponse, AppError> {
    let capability = store::performance::altitude_capability(
        &pool,
        params.flight_level,
        &params.cruise_schedule,
        params.temp_deviation,
    )
    .await?;

    Ok(Json(capability))
}
