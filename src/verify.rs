//! Feed Verification Module
//!
//! Checks a configured channel against the live API to determine whether it
//! is reachable and whether its newest entry carries the eight fields the
//! monitor expects, each in a usable form.
//!
//! Run this (`worksafe_service --verify`) when commissioning a new station.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::ingest::thingspeak::{self, FeedEntry};
use crate::model::FeedError;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedVerification {
    pub timestamp: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub status: VerificationStatus,
    pub api_responsive: bool,
    pub entry_id: Option<u64>,
    pub fields: Vec<FieldCheck>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: String,
    pub meaning: String,
    pub state: FieldState,
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum FieldState {
    Present,
    Missing,
    /// Present but will be replaced by its fallback value.
    NonNumeric,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

/// (field number, meaning, numeric?)
const EXPECTED_FIELDS: [(usize, &str, bool); 8] = [
    (1, "temperature", true),
    (2, "humidity", true),
    (3, "gas level", true),
    (4, "crowd distance", true),
    (5, "worker uid", false),
    (6, "worker name", false),
    (7, "worker role", false),
    (8, "heat index", true),
];

// ============================================================================
// Entry inspection
// ============================================================================

/// Usable exactly when ingestion would read a number out of it.
fn is_numeric(raw: &str) -> bool {
    thingspeak::parse_float(Some(raw), f64::NAN).is_finite()
}

/// Checks each expected field of one entry.
pub fn inspect_entry(entry: &FeedEntry) -> Vec<FieldCheck> {
    EXPECTED_FIELDS
        .iter()
        .map(|&(n, meaning, numeric)| {
            let raw = entry.field(n).map(str::trim).filter(|s| !s.is_empty());
            let state = match raw {
                None => FieldState::Missing,
                Some(value) if numeric && !is_numeric(value) => FieldState::NonNumeric,
                Some(_) => FieldState::Present,
            };
            FieldCheck {
                field: format!("field{}", n),
                meaning: meaning.to_string(),
                state,
                raw: raw.map(String::from),
            }
        })
        .collect()
}

/// Success when every field is present and usable, PartialSuccess when the
/// entry arrived but some fields will fall back to defaults.
pub fn status_for(fields: &[FieldCheck]) -> VerificationStatus {
    if fields.iter().all(|f| f.state == FieldState::Present) {
        VerificationStatus::Success
    } else {
        VerificationStatus::PartialSuccess
    }
}

// ============================================================================
// Channel Verification
// ============================================================================

pub fn verify_channel(client: &reqwest::blocking::Client, feed: &FeedConfig) -> FeedVerification {
    let mut result = FeedVerification {
        timestamp: Utc::now().to_rfc3339(),
        channel_id: feed.channel_id.clone(),
        channel_name: None,
        status: VerificationStatus::Failed,
        api_responsive: false,
        entry_id: None,
        fields: Vec::new(),
        error_message: None,
    };

    let response = client
        .get(feed.url())
        .timeout(Duration::from_secs(feed.timeout_secs.max(1)))
        .send();

    match response {
        Ok(response) if response.status().is_success() => {
            result.api_responsive = true;
            match response.text() {
                Ok(body) => apply_body(&mut result, &body),
                Err(e) => result.error_message = Some(format!("Read failed: {}", e)),
            }
        }
        Ok(response) => {
            result.error_message = Some(FeedError::HttpError(response.status().as_u16()).to_string());
        }
        Err(e) => {
            result.error_message = Some(format!("Request failed: {}", e));
        }
    }

    result
}

/// Fills the verification from a response body.
fn apply_body(result: &mut FeedVerification, body: &str) {
    let response = match thingspeak::parse_response(body) {
        Ok(r) => r,
        Err(e) => {
            result.error_message = Some(e.to_string());
            return;
        }
    };
    result.channel_name = response.channel.as_ref().and_then(|c| c.name.clone());

    match thingspeak::latest_entry(response) {
        Ok(entry) => {
            result.entry_id = entry.entry_id;
            result.fields = inspect_entry(&entry);
            result.status = status_for(&result.fields);
        }
        Err(e) => {
            // Reachable channel, nothing recorded yet.
            result.error_message = Some(e.to_string());
            result.status = VerificationStatus::PartialSuccess;
        }
    }
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_verification(feed: &FeedConfig) -> Result<FeedVerification, Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(verify_channel(&client, feed))
}
