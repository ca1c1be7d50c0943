//! Simulated observation source for local runs

use std::sync::atomic::{AtomicU64, Ordering};

use wxtrend_core::{LatestObservation, ObservationSource, SourceError};

/// Generates synthetic observations around a base temperature
pub struct SimulatorSource {
    base_temp: f64,
    calls: AtomicU64,
}

impl SimulatorSource {
    pub fn new(base_temp: f64) -> Self {
        Self {
            base_temp,
            calls: AtomicU64::new(0),
        }
    }

    fn generate(&self, step: u64) -> LatestObservation {
        // Sawtooth over 100 steps, +/- 5 degrees
        let variation = ((step % 100) as f64 / 10.0) - 5.0;
        let temperature = self.base_temp + variation;

        LatestObservation {
            temperature: Some(temperature),
            dewpoint: Some(temperature - 6.0),
            wind_speed: Some(5.0 + variation.abs()),
            precipitation_last_6_hours: None,
            wind_chill: (temperature < 10.0).then(|| temperature - variation.abs()),
            heat_index: (temperature > 27.0).then(|| temperature + 1.5),
        }
    }
}

impl Default for SimulatorSource {
    fn default() -> Self {
        Self::new(20.0)
    }
}

#[async_trait::async_trait]
impl ObservationSource for SimulatorSource {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn latest(&self) -> Result<LatestObservation, SourceError> {
        let step = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.generate(step))
    }
}
