// src/data_input/mod.rs

pub mod log_parser;
pub mod metadata;
pub mod record;
