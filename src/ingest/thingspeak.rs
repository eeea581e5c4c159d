/// ThingSpeak channel feed client
///
/// Retrieves the newest entry of the site's telemetry channel and turns it
/// into a `Reading`. The channel layout is fixed by the field station:
///
///   field1  temperature (°C)        field5  worker RFID uid
///   field2  humidity (%)            field6  worker name
///   field3  gas level (raw ADC)     field7  worker role
///   field4  crowd distance (cm)     field8  heat index (°C)
///
/// API Documentation: https://www.mathworks.com/help/thingspeak/readdata.html
///
/// Parsing is deliberately forgiving. A field that is null, missing, or
/// not numeric gets its documented fallback value instead of failing the
/// whole reading; only transport and document-level problems are errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::{FeedError, Reading, WorkerRole, UNKNOWN_WORKER};
use crate::workers;

pub const THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";

// Fallbacks for unusable feed fields.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_HUMIDITY: f64 = 70.0;
pub const DEFAULT_GAS_LEVEL: i64 = 0;
pub const DEFAULT_CROWD_DISTANCE: i64 = 0;
pub const DEFAULT_HEAT_INDEX: f64 = 0.0;

// ============================================================================
// API Response Structures
// ============================================================================

/// `feeds.json` response for one channel.
#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub channel: Option<ChannelInfo>,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelInfo {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub last_entry_id: Option<u64>,
}

/// One channel entry. Field values arrive as strings, numbers or null
/// depending on how the station wrote them; all are kept as text here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEntry {
    pub created_at: Option<String>,
    pub entry_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field1: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field2: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field3: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field4: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field5: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field6: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field7: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field8: Option<String>,
}

impl FeedEntry {
    /// Raw text of field `n` (1-based, as in the channel settings).
    pub fn field(&self, n: usize) -> Option<&str> {
        let raw = match n {
            1 => &self.field1,
            2 => &self.field2,
            3 => &self.field3,
            4 => &self.field4,
            5 => &self.field5,
            6 => &self.field6,
            7 => &self.field7,
            8 => &self.field8,
            _ => return None,
        };
        raw.as_deref()
    }
}

fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the feed URL for the newest `results` entries of a channel.
/// The api key is omitted for public channels.
pub fn build_feed_url(base_url: &str, channel_id: &str, api_key: Option<&str>, results: u32) -> String {
    let base = base_url.trim_end_matches('/');
    match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => format!(
            "{}/channels/{}/feeds.json?api_key={}&results={}",
            base, channel_id, key, results
        ),
        None => format!("{}/channels/{}/feeds.json?results={}", base, channel_id, results),
    }
}

/// Fetches the newest entry of a channel.
pub fn fetch_latest(client: &reqwest::blocking::Client, url: &str) -> Result<FeedEntry, FeedError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| FeedError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FeedError::HttpError(response.status().as_u16()));
    }

    let body = response.text().map_err(|e| FeedError::Transport(e.to_string()))?;
    latest_entry(parse_response(&body)?)
}

/// Fetches, parses and enriches the newest reading in one step.
pub fn fetch_reading(
    client: &reqwest::blocking::Client,
    url: &str,
    now: DateTime<Utc>,
) -> Result<Reading, FeedError> {
    let entry = fetch_latest(client, url)?;
    Ok(workers::enrich(parse_entry(&entry, now)))
}

// ============================================================================
// Parsing
// ============================================================================

pub fn parse_response(body: &str) -> Result<ChannelResponse, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::ParseError(e.to_string()))
}

/// ThingSpeak lists entries oldest first; the newest is the last one.
pub fn latest_entry(response: ChannelResponse) -> Result<FeedEntry, FeedError> {
    response.feeds.into_iter().last().ok_or(FeedError::NoFeeds)
}

/// Leading numeric part of a field, e.g. "23.5C" → "23.5".
///
/// Decimal fields also take an exponent tail ("2.5e1", "1e-7"), but only
/// when at least one exponent digit follows; "5e" reads as "5".
fn numeric_prefix(raw: &str, allow_fraction: bool) -> &str {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return "";
    }

    if allow_fraction && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let digits = bytes[exp..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            end = exp + digits;
        }
    }
    &s[..end]
}

/// Parses a decimal field, falling back to `default` when unusable.
pub fn parse_float(raw: Option<&str>, default: f64) -> f64 {
    raw.map(|r| numeric_prefix(r, true))
        .and_then(|s| s.trim_end_matches('.').parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Parses an integer field. Decimal input is truncated ("12.7" → 12).
pub fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    raw.map(|r| numeric_prefix(r, false))
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(default)
}

fn parse_text(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN_WORKER.to_string(),
    }
}

/// Converts a feed entry into a reading. Never fails.
///
/// Age and working level are not part of the feed; they stay unknown here
/// and are filled in by `workers::enrich`.
pub fn parse_entry(entry: &FeedEntry, fetched_at: DateTime<Utc>) -> Reading {
    let timestamp = entry
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(fetched_at);

    Reading {
        temperature: parse_float(entry.field(1), DEFAULT_TEMPERATURE),
        humidity: parse_float(entry.field(2), DEFAULT_HUMIDITY),
        gas_level: parse_int(entry.field(3), DEFAULT_GAS_LEVEL),
        crowd_distance: parse_int(entry.field(4), DEFAULT_CROWD_DISTANCE),
        worker_uid: parse_text(entry.field(5)),
        worker_name: parse_text(entry.field(6)),
        worker_role: WorkerRole::parse(entry.field(7).unwrap_or_default()),
        heat_index: parse_float(entry.field(8), DEFAULT_HEAT_INDEX),
        worker_age: None,
        working_level: None,
        timestamp,
    }
}

// ============================================================================
// Tests
// ============================================================================
