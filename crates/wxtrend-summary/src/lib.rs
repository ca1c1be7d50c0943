//! Rolling summaries over the observation store
//!
//! Reads the store, never writes it. Each call is a fresh, independent
//! pass over whatever the store returns at that moment.

pub mod aggregator;

pub use aggregator::*;

use thiserror::Error;
use wxtrend_core::StoreError;

/// Trailing window used when the caller does not pick one
pub const DEFAULT_WINDOW_HOURS: f64 = 24.0;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Store read error: {0}")]
    StoreRead(#[from] StoreError),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
