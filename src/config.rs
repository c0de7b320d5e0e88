// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Questions in every generated trial exam, regardless of scenario.
pub const EXAM_QUESTION_COUNT: usize = 17;

/// Minutes allowed per attempt.
pub const EXAM_TIME_LIMIT_MINUTES: i64 = 180;

/// Session slot used when the client does not name one. One slot holds at
/// most one session, which gives the application its "single active
/// session" behaviour.
pub const DEFAULT_SESSION_SLOT: &str = "active";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub listen_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://flightprep.db?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let listen_port = env::var("LISTEN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            rust_log,
            listen_port,
        }
    }
}
