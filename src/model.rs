/// Reading, Profile, Status/RiskLevel, FeedError
/// core data structures and error handling
///
/// Core data types for the worker-safety monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O. The only logic here is the small amount of derivation
/// that belongs to the types themselves (age groups, derived thresholds).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Profile defaults
// ---------------------------------------------------------------------------

/// Temperature limit (°C) applied when a worker has no tuned profile.
pub const DEFAULT_TEMP_THRESHOLD: f64 = 35.0;

/// Gas limit (raw ADC units) applied when a worker has no tuned profile.
pub const DEFAULT_GAS_THRESHOLD: i64 = 3000;

/// Placeholder the feed uses for an unidentified worker.
pub const UNKNOWN_WORKER: &str = "N/A";

// ---------------------------------------------------------------------------
// Worker attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerRole {
    Engineer,
    Supervisor,
    Visitor,
    Unknown,
}

impl WorkerRole {
    /// Parses the free-text role sent by the RFID station. Anything that is
    /// not a recognised role (including "N/A" and blanks) is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "engineer" => WorkerRole::Engineer,
            "supervisor" => WorkerRole::Supervisor,
            "visitor" => WorkerRole::Visitor,
            _ => WorkerRole::Unknown,
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerRole::Engineer => write!(f, "Engineer"),
            WorkerRole::Supervisor => write!(f, "Supervisor"),
            WorkerRole::Visitor => write!(f, "Visitor"),
            WorkerRole::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkingLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for WorkingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingLevel::Low => write!(f, "Low"),
            WorkingLevel::Medium => write!(f, "Medium"),
            WorkingLevel::High => write!(f, "High"),
        }
    }
}

/// Age bracket used to prioritise advice.
///
///   Young  : age <= 30
///   Middle : 30 < age <= 50
///   Older  : age > 50
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Young,
    Middle,
    Older,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        if age <= 30 {
            AgeGroup::Young
        } else if age <= 50 {
            AgeGroup::Middle
        } else {
            AgeGroup::Older
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One telemetry sample enriched with the identified worker's attributes.
///
/// Built once per poll by `ingest::thingspeak::parse_entry` and then
/// `workers::enrich`. Every numeric field has already been defaulted, so
/// downstream code never sees a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,   // °C
    pub humidity: f64,      // %
    pub heat_index: f64,    // °C, "real feel"
    pub gas_level: i64,     // raw ADC, 0-4095 nominal
    pub crowd_distance: i64, // cm, larger = less crowded
    pub worker_uid: String,
    pub worker_name: String,
    pub worker_role: WorkerRole,
    pub worker_age: Option<u32>,
    pub working_level: Option<WorkingLevel>,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// A reading whose every metric sits inside its Normal band under the
    /// default profile. Used when nothing has ever been fetched.
    pub fn neutral(timestamp: DateTime<Utc>) -> Self {
        Reading {
            temperature: 25.0,
            humidity: 70.0,
            heat_index: 25.0,
            gas_level: 0,
            crowd_distance: 200,
            worker_uid: UNKNOWN_WORKER.to_string(),
            worker_name: UNKNOWN_WORKER.to_string(),
            worker_role: WorkerRole::Unknown,
            worker_age: None,
            working_level: None,
            timestamp,
        }
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.worker_age.map(AgeGroup::from_age)
    }
}

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// Per-worker limits that parameterise classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub temp_threshold: f64,
    pub gas_threshold: i64,
}

impl Profile {
    /// Heat index limit, derived from the temperature limit and the
    /// configured offset (7 °C by default).
    pub fn heat_index_threshold(&self, offset: f64) -> f64 {
        self.temp_threshold + offset
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            temp_threshold: DEFAULT_TEMP_THRESHOLD,
            gas_threshold: DEFAULT_GAS_THRESHOLD,
        }
    }
}

/// Band edges that are not tied to a worker profile.
///
/// Several dashboard variants disagreed on these, so they are configuration
/// rather than constants. Defaults reproduce the canonical variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bands {
    pub humidity_normal_max: f64,
    pub humidity_warning_max: f64,
    /// Crowd distance is inverted: at or above this is Normal.
    pub crowd_normal_min: i64,
    pub crowd_warning_min: i64,
    /// Width of the Warning band below the temperature (and heat index) limit.
    pub temp_warning_margin: f64,
    /// Width of the Warning band below the gas limit.
    pub gas_warning_margin: i64,
    /// Heat index limit = temperature limit + this.
    pub heat_index_offset: f64,
}

impl Default for Bands {
    fn default() -> Self {
        Bands {
            humidity_normal_max: 80.0,
            humidity_warning_max: 85.0,
            crowd_normal_min: 30,
            crowd_warning_min: 15,
            temp_warning_margin: 5.0,
            gas_warning_margin: 1000,
            heat_index_offset: 7.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification results
// ---------------------------------------------------------------------------

/// Per-metric classification, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Normal => write!(f, "Normal"),
            Status::Warning => write!(f, "Warning"),
            Status::Critical => write!(f, "Critical"),
        }
    }
}

/// The five monitored metrics, in the order advice is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    HeatIndex,
    Gas,
    Crowd,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::HeatIndex,
        Metric::Gas,
        Metric::Crowd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::HeatIndex => "Real Feel",
            Metric::Gas => "Gas Level",
            Metric::Crowd => "Crowd Distance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet {
    pub temperature: Status,
    pub humidity: Status,
    pub heat_index: Status,
    pub gas: Status,
    pub crowd: Status,
}

impl StatusSet {
    pub fn get(&self, metric: Metric) -> Status {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::HeatIndex => self.heat_index,
            Metric::Gas => self.gas,
            Metric::Crowd => self.crowd,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Status)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    pub fn all_normal(&self) -> bool {
        self.iter().all(|(_, s)| s == Status::Normal)
    }
}

/// Aggregate risk, derived from a `StatusSet` and never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Prefix attached to every warning emitted under this risk level.
    pub fn urgency_prefix(&self) -> &'static str {
        match self {
            RiskLevel::High => "URGENT: ",
            RiskLevel::Moderate => "CAUTION: ",
            RiskLevel::Low => "",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding the telemetry feed.
///
/// The classification engine never sees these: the monitor replaces a failed
/// fetch with a fallback reading before classifying.
#[derive(Debug, PartialEq)]
pub enum FeedError {
    /// Non-2xx HTTP response from the feed API.
    HttpError(u16),
    /// The request never produced a response (DNS, TLS, timeout...).
    Transport(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The channel answered but contained no feed entries.
    NoFeeds,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FeedError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FeedError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FeedError::NoFeeds => write!(f, "No feeds available in channel response"),
        }
    }
}

impl std::error::Error for FeedError {}
