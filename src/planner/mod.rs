// src/planner/mod.rs

pub mod atmosphere;
pub mod engine;
pub mod performance;
