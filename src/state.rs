use crate::config::Config;
use crate::exam::scenarios::ScenarioTable;
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Validated at startup; construction fails on inconsistent quotas.
    pub scenarios: Arc<ScenarioTable>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ScenarioTable> {
    fn from_ref(state: &AppState) -> Self {
        state.scenarios.clone()
    }
}
