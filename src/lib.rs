// src/lib.rs - Library interface for internal module access

pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod errors;
pub mod types;
