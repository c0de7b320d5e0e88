// src/store/mod.rs
//
// Narrow data-access collaborators consumed by the handlers. The core
// (exam generator, session manager, planner engine) never touches these;
// handlers fetch, call the pure core, then persist.

pub mod exams;
pub mod performance;
pub mod questions;
pub mod sessions;
