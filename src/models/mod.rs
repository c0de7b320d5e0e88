// src/models/mod.rs

pub mod exam;
pub mod flightplan;
pub mod question;
pub mod session;
