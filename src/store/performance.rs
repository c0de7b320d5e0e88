// src/store/performance.rs

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::flightplan::AltitudeCapability;

/// Looks up the altitude-capability row for a flight level and cruise
/// schedule, picking the tightest ISA band at or above the requested
/// deviation. `None` when the combination is not tabulated.
pub async fn altitude_capability(
    pool: &SqlitePool,
    flight_level: i64,
    cruise_schedule: &str,
    temp_deviation: i64,
) -> Result<Option<AltitudeCapability>, AppError> {
    let capability = sqlx::query_as::<_, AltitudeCapability>(
        r#"
        SELECT flight_level, cruise_schedule, temp_deviation, max_weight_tonnes
        FROM altitude_capabilities
        WHERE flight_level = ? AND cruise_schedule = ? AND temp_deviation >= ?
        ORDER BY temp_deviation ASC
        LIMIT 1
        "#,
    )
    .bind(flight_level)
    .bind(cruise_schedule)
    .bind(temp_deviation)
    .fetch_optional(pool)
    .await?;

    Ok(capability)
}
