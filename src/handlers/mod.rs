// src/handlers/mod.rs

pub mod exam;
pub mod flightplan;
pub mod questions;
pub mod session;
