//! Rolling temperature statistics over stored observations

use crate::types::{ObservationRecord, Reading, Summary, SummaryOutcome, Timestamp};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Oldest timestamp excluded from a trailing window ending at `now`
pub fn window_cutoff(now: Timestamp, window_hours: f64) -> Timestamp {
    now - (window_hours * SECONDS_PER_HOUR) as Timestamp
}

/// Round to one decimal place, halves away from zero
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All-time min/max temperature
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extremes {
    min: Option<f64>,
    max: Option<f64>,
    count: usize,
}

impl Extremes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, temperature: f64) {
        self.min = Some(self.min.map_or(temperature, |m| m.min(temperature)));
        self.max = Some(self.max.map_or(temperature, |m| m.max(temperature)));
        self.count += 1;
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<'a> FromIterator<&'a ObservationRecord> for Extremes {
    fn from_iter<I: IntoIterator<Item = &'a ObservationRecord>>(iter: I) -> Self {
        let mut extremes = Extremes::new();
        for record in iter {
            extremes.add(record.temperature);
        }
        extremes
    }
}

/// Accumulator for the windowed part of a summary
#[derive(Debug, Clone, Default)]
pub struct WindowAccumulator {
    temperatures: Vec<f64>,
    latest: Option<Reading>,
}

impl WindowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one normalized reading.
    ///
    /// The most recent reading only changes on a strictly larger timestamp,
    /// so among equal timestamps the first one added wins.
    pub fn add(&mut self, reading: Reading) {
        self.temperatures.push(reading.temperature);

        match self.latest {
            Some(current) if reading.timestamp <= current.timestamp => {}
            _ => self.latest = Some(reading),
        }
    }

    pub fn count(&self) -> usize {
        self.temperatures.len()
    }

    pub fn min(&self) -> Option<f64> {
        if self.temperatures.is_empty() {
            return None;
        }
        Some(self.temperatures.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> Option<f64> {
        if self.temperatures.is_empty() {
            return None;
        }
        Some(
            self.temperatures
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        )
    }

    /// Mean temperature, rounded to tenths and kept within [min, max].
    ///
    /// The clamp runs after rounding, so the result can carry more than one
    /// decimal place: `[22.25, 22.25]` averages to 22.25, not 22.3.
    ///
    /// Values are summed in ascending order so the result does not depend
    /// on scan order.
    pub fn average(&self) -> Option<f64> {
        let (min, max) = (self.min()?, self.max()?);

        let mut sorted = self.temperatures.clone();
        sorted.sort_by(f64::total_cmp);
        let sum: f64 = sorted.iter().sum();
        let mean = sum / sorted.len() as f64;

        Some(round_tenths(mean).clamp(min, max))
    }

    /// Reading with the largest timestamp seen so far
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// Combine with the all-time extremes into the final outcome
    pub fn finish(&self, all_time: &Extremes) -> SummaryOutcome {
        let (Some(min), Some(max), Some(average), Some(latest)) =
            (self.min(), self.max(), self.average(), self.latest)
        else {
            return SummaryOutcome::NoData;
        };

        SummaryOutcome::Summary(Summary {
            min_temperature: min,
            max_temperature: max,
            average_temperature: average,
            current_temperature: latest.temperature,
            all_time_min_temperature: all_time.min(),
            all_time_max_temperature: all_time.max(),
            current_dewpoint: latest.dewpoint,
            current_heatindex: latest.heatindex,
            current_windchill: latest.windchill,
            current_windspeed: latest.windspeed,
            precipitation_6_hr: latest.precipitation_last_6_hrs,
        })
    }
}

impl<'a> FromIterator<&'a ObservationRecord> for WindowAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a ObservationRecord>>(iter: I) -> Self {
        let mut acc = WindowAccumulator::new();
        for record in iter {
            acc.add(record.normalize());
        }
        acc
    }
}

/// Summarize an already windowed record set against separately computed
/// all-time extremes
pub fn summarize_window(windowed: &[ObservationRecord], all_time: &Extremes) -> SummaryOutcome {
    windowed
        .iter()
        .collect::<WindowAccumulator>()
        .finish(all_time)
}

/// Summarize from one full scan: every record feeds the all-time extremes,
/// only records newer than `cutoff` feed the window.
pub fn summarize_records(records: &[ObservationRecord], cutoff: Timestamp) -> SummaryOutcome {
    let mut all_time = Extremes::new();
    let mut window = WindowAccumulator::new();

    for record in records {
        all_time.add(record.temperature);
        if record.timestamp > cutoff {
            window.add(record.normalize());
        }
    }

    window.finish(&all_time)
}
