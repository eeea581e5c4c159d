/// Development mode utilities for working with recorded channel data
///
/// When the live channel is unavailable (no station powered up, no network
/// on the bench), use this module to replay a saved `feeds.json` export
/// through the monitor as if it were arriving live.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;

use crate::ingest::thingspeak::{self, FeedEntry};
use crate::model::{FeedError, Reading};
use crate::workers;

/// Replays recorded channel entries in order, wrapping around at the end.
pub struct DevMode {
    entries: Vec<FeedEntry>,
    cursor: usize,
    /// Restamp replayed readings with the replay time instead of their
    /// recorded `created_at`, so staleness checks treat them as live.
    pub restamp: bool,
}

impl DevMode {
    /// Load a replay from a saved `feeds.json` document.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Build a replay from the text of a `feeds.json` document.
    ///
    /// A document without entries is rejected; there would be nothing to
    /// replay.
    pub fn from_json_str(text: &str) -> Result<Self, FeedError> {
        let response = thingspeak::parse_response(text)?;
        if response.feeds.is_empty() {
            return Err(FeedError::NoFeeds);
        }
        Ok(Self {
            entries: response.feeds,
            cursor: 0,
            restamp: true,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next recorded reading, enriched exactly as a live one would be.
    pub fn next_reading(&mut self, now: DateTime<Utc>) -> Reading {
        let entry = &self.entries[self.cursor];
        self.cursor = (self.cursor + 1) % self.entries.len();

        let mut reading = workers::enrich(thingspeak::parse_entry(entry, now));
        if self.restamp {
            reading.timestamp = now;
        }
        reading
    }
}
