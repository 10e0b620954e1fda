// src/data_analysis/mod.rs

pub mod electrochem;
pub mod outlier;
pub mod regression;
pub mod smoothing;
pub mod summary;
