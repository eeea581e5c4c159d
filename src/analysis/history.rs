//! Recent reading history for trend displays.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::model::{Metric, Reading};

/// Default number of samples kept, matching the dashboard chart width.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// The metric values of one reading, as plotted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub heat_index: f64,
    pub gas_level: i64,
    pub crowd_distance: i64,
}

impl HistorySample {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::HeatIndex => self.heat_index,
            Metric::Gas => self.gas_level as f64,
            Metric::Crowd => self.crowd_distance as f64,
        }
    }
}

impl From<&Reading> for HistorySample {
    fn from(reading: &Reading) -> Self {
        HistorySample {
            timestamp: reading.timestamp,
            temperature: reading.temperature,
            humidity: reading.humidity,
            heat_index: reading.heat_index,
            gas_level: reading.gas_level,
            crowd_distance: reading.crowd_distance,
        }
    }
}

/// Fixed-capacity FIFO: appending past capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    samples: VecDeque<HistorySample>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, reading: &Reading) {
        self.samples.push_back(HistorySample::from(reading));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    /// Values of one metric, oldest first.
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|s| s.value(metric)).collect()
    }

    /// Time-of-day axis labels, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|s| s.timestamp.format("%H:%M:%S").to_string())
            .collect()
    }

    /// Change between the two newest samples of a metric.
    ///
    /// Returns None if there's not enough history.
    pub fn trend(&self, metric: Metric) -> Option<f64> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        let current = self.samples.get(n - 1)?.value(metric);
        let previous = self.samples.get(n - 2)?.value(metric);
        Some(current - previous)
    }
}
