// src/exam/mod.rs

pub mod generator;
pub mod rng;
pub mod scenarios;
pub mod session;
