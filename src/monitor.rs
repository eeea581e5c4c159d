//! Poll-cycle state: everything that survives from one tick to the next.
//!
//! A tick takes the outcome of one feed fetch and always produces a
//! `Report`. When the fetch failed, the reading shown is, in order of
//! preference, the last live reading of this run, the cached reading from a
//! previous run, or the neutral reading.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::alert::{self, stalenesses, Assessment, HealthTipRotator};
use crate::analysis::history::HistoryBuffer;
use crate::cache::ReadingCache;
use crate::config::Config;
use crate::dev_mode::DevMode;
use crate::logging::{self, Source};
use crate::model::{Bands, FeedError, Reading, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    Live,
    Replay,
    LastKnown,
    Cached,
    Fallback,
}

impl ReadingSource {
    /// True when the reading was produced on this tick.
    pub fn is_fresh(&self) -> bool {
        matches!(self, ReadingSource::Live | ReadingSource::Replay)
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub poll: u64,
    pub reading: Reading,
    pub source: ReadingSource,
    pub stale: bool,
    pub assessment: Assessment,
}

pub struct Monitor {
    bands: Bands,
    stale_after_secs: u64,
    rotator: HealthTipRotator,
    history: HistoryBuffer,
    last_reading: Option<Reading>,
    cache: Option<ReadingCache>,
    polls: u64,
    fresh_polls: u64,
}

impl Monitor {
    pub fn new(config: &Config) -> Self {
        Monitor {
            bands: config.bands,
            stale_after_secs: config.poll.stale_after_secs,
            rotator: HealthTipRotator::default(),
            history: HistoryBuffer::new(config.history.capacity),
            last_reading: None,
            cache: config.cache.path.as_ref().map(|p| ReadingCache::new(p.clone())),
            polls: 0,
            fresh_polls: 0,
        }
    }

    pub fn with_cache(mut self, cache: ReadingCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn rotator(&self) -> &HealthTipRotator {
        &self.rotator
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Polls served by a reading fetched on that tick.
    pub fn fresh_polls(&self) -> u64 {
        self.fresh_polls
    }

    /// Processes the outcome of a live fetch.
    pub fn tick(&mut self, fetched: Result<Reading, FeedError>, now: DateTime<Utc>) -> Report {
        match fetched {
            Ok(reading) => self.process(reading, ReadingSource::Live, now),
            Err(e) => {
                logging::log_feed_failure("Fetch latest entry", &e);
                let (reading, source) = self.fallback(now);
                self.process(reading, source, now)
            }
        }
    }

    /// Processes the next recorded entry of a replay.
    pub fn replay_tick(&mut self, dev: &mut DevMode, now: DateTime<Utc>) -> Report {
        let reading = dev.next_reading(now);
        self.process(reading, ReadingSource::Replay, now)
    }

    fn fallback(&mut self, now: DateTime<Utc>) -> (Reading, ReadingSource) {
        if let Some(reading) = &self.last_reading {
            return (reading.clone(), ReadingSource::LastKnown);
        }

        if let Some(cache) = &self.cache {
            match cache.load() {
                Ok(Some(reading)) => {
                    logging::info(
                        Source::Cache,
                        Some(&reading.worker_uid),
                        &format!("Using cached reading from {}", reading.timestamp.to_rfc3339()),
                    );
                    self.last_reading = Some(reading.clone());
                    return (reading, ReadingSource::Cached);
                }
                Ok(None) => {}
                Err(e) => logging::warn(
                    Source::Cache,
                    None,
                    &format!("Ignoring unreadable cache {}: {}", cache.path().display(), e),
                ),
            }
        }

        (Reading::neutral(now), ReadingSource::Fallback)
    }

    fn process(&mut self, reading: Reading, source: ReadingSource, now: DateTime<Utc>) -> Report {
        self.polls += 1;

        if source.is_fresh() {
            self.fresh_polls += 1;
            self.history.record(&reading);
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.store(&reading) {
                    logging::warn(Source::Cache, None, &format!("Could not store reading: {}", e));
                }
            }
            self.last_reading = Some(reading.clone());
        }

        let stale = stalenesses::is_stale_at(&reading, self.stale_after_secs, now);
        if stale {
            logging::warn(
                Source::Feed,
                Some(&reading.worker_uid),
                &format!("Reading is {}s old", stalenesses::age_secs_at(&reading, now)),
            );
        }

        let assessment = alert::assess(&reading, &self.bands, &mut self.rotator);
        let summary = format!(
            "risk {} (temp {}, hum {}, real feel {}, gas {}, crowd {})",
            assessment.risk,
            assessment.statuses.temperature,
            assessment.statuses.humidity,
            assessment.statuses.heat_index,
            assessment.statuses.gas,
            assessment.statuses.crowd,
        );
        match assessment.risk {
            RiskLevel::High => logging::warn(Source::Engine, Some(&reading.worker_uid), &summary),
            _ => logging::debug(Source::Engine, Some(&reading.worker_uid), &summary),
        }

        Report {
            poll: self.polls,
            reading,
            source,
            stale,
            assessment,
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// Next poll deadline after a poll that was due at `due` finished at `now`.
///
/// Ticks fall on `due + k * interval`. Ticks due strictly before `now` are
/// skipped rather than run back to back; a tick due exactly at `now` fires.
/// Returns the next deadline and the number of skipped ticks.
pub fn next_deadline(due: Instant, interval: Duration, now: Instant) -> (Instant, u32) {
    let step = interval.as_nanos();
    if step == 0 {
        return (now, 0);
    }
    let elapsed = now.saturating_duration_since(due).as_nanos();
    let missed = (elapsed.div_ceil(step)).saturating_sub(1);
    let missed = u32::try_from(missed).unwrap_or(u32::MAX - 1);
    (due + interval * (missed + 1), missed)
}
