// tests/flightplan_tests.rs

use flightprep::{config::Config, exam::scenarios::ScenarioTable, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

async fn spawn_app() -> (String, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        listen_port: 0,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        scenarios: Arc::new(ScenarioTable::builtin().expect("builtin scenarios")),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

fn cruise_segment(start_zone_weight: f64) -> serde_json::Value {
    serde_json::json!({
        "id": "seg-1",
        "segment": "ML-LT",
        "flight_level": 330.0,
        "temp_deviation": 0.0,
        "mach_number": 0.82,
        "wind": "250/45",
        "wind_component": -20.0,
        "distance": 300.0,
        "start_zone_weight": start_zone_weight
    })
}

async fn recompute(
    client: &reqwest::Client,
    address: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = client
        .post(format!("{address}/api/flightplan/recompute"))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.expect("Failed to parse json")
}

#[tokio::test]
async fn mach_edit_recomputes_the_whole_chain() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "segment": cruise_segment(60_000.0),
        "changed_field": "mach_number"
    });
    let response = recompute(&client, &address, body).await;
    let segment = &response["segment"];

    let tas = segment["tas"].as_f64().expect("tas");
    let gs = segment["ground_speed"].as_f64().expect("ground_speed");
    assert!((gs - (tas - 20.0)).abs() < 1e-9);

    assert!(segment["estimated_time_interval"].as_f64().unwrap() > 0.0);
    assert!(segment["air_distance"].as_f64().unwrap() > 300.0);
    assert!(segment["zone_fuel"].as_f64().unwrap() > 0.0);
    assert!(segment["end_zone_weight"].as_f64().unwrap() < 60_000.0);
    assert!(segment["emzw"].as_f64().unwrap() < 60_000.0);
}

#[tokio::test]
async fn wind_string_is_never_parsed_into_a_component() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Wind string present but no manual component entered.
    let mut segment = cruise_segment(60_000.0);
    segment["wind_component"] = serde_json::Value::Null;

    let response = recompute(
        &client,
        &address,
        serde_json::json!({ "segment": segment, "changed_field": "mach_number" }),
    )
    .await;

    // TAS derives fine, but ground speed stays unset: the component is
    // manual entry only.
    assert!(response["segment"]["tas"].as_f64().is_some());
    assert!(response["segment"]["ground_speed"].is_null());
}

#[tokio::test]
async fn zero_distance_leaves_time_interval_unset() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let mut segment = cruise_segment(60_000.0);
    segment["distance"] = serde_json::json!(0.0);

    let response = recompute(
        &client,
        &address,
        serde_json::json!({ "segment": segment, "changed_field": "distance" }),
    )
    .await;

    assert!(response["segment"]["estimated_time_interval"].is_null());
    assert!(response["segment"]["zone_fuel"].is_null());
}

#[tokio::test]
async fn overweight_segment_gets_an_advisory_warning() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // 80 t against the FL330 LRC ISA ceiling of 74.5 t.
    let body = serde_json::json!({
        "segment": cruise_segment(80_000.0),
        "changed_field": "mach_number"
    });
    let response = recompute(&client, &address, body).await;

    let warnings = response["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    let warning = warnings[0].as_str().unwrap();
    assert!(warning.contains("FL330"), "warning: {warning}");
    assert!(warning.contains("capability"), "warning: {warning}");

    // Advisory only: the arithmetic still ran.
    assert!(response["segment"]["zone_fuel"].as_f64().is_some());
}

#[tokio::test]
async fn in_limits_segment_has_no_warnings() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "segment": cruise_segment(60_000.0),
        "changed_field": "mach_number"
    });
    let response = recompute(&client, &address, body).await;
    assert!(response["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn capability_lookup_picks_the_covering_isa_band() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // ISA+5 falls in the "up to ISA+10" band.
    let capability: serde_json::Value = client
        .get(format!(
            "{address}/api/flightplan/capability?flight_level=330&cruise_schedule=LRC&temp_deviation=5"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(capability["temp_deviation"].as_i64(), Some(10));
    assert_eq!(capability["max_weight_tonnes"].as_f64(), Some(72.0));
}

#[tokio::test]
async fn untabulated_capability_is_null() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let capability: serde_json::Value = client
        .get(format!(
            "{address}/api/flightplan/capability?flight_level=999&cruise_schedule=LRC&temp_deviation=0"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(capability.is_null());
}
