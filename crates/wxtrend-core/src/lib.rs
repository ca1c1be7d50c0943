//! Core data types, unit normalization, and rollup calculations for wxtrend
//!
//! This crate holds the observation record schema, the summary produced
//! from it, and the source/store seams the ingest and summary crates are
//! written against.

pub mod pipeline;
pub mod rollups;
pub mod types;
pub mod units;

pub use pipeline::*;
pub use rollups::*;
pub use types::*;
pub use units::*;
