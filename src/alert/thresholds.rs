//! Per-metric status classification and risk aggregation.
//!
//! Every metric uses a two-cut-point ladder: at or below the lower cut is
//! Normal, at or below the upper cut is Warning, above it is Critical.
//! Boundary values always fall into the lower-risk band. Crowd distance is
//! inverted (a short distance is the dangerous side).

use crate::model::{Bands, Profile, Reading, RiskLevel, Status, StatusSet};

/// Classifies a value where larger is worse.
///
/// NaN fails both comparisons and lands in Critical, which is the safe side.
fn ladder(value: f64, normal_max: f64, warning_max: f64) -> Status {
    if value <= normal_max {
        Status::Normal
    } else if value <= warning_max {
        Status::Warning
    } else {
        Status::Critical
    }
}

/// Classifies a value where smaller is worse.
fn inverted_ladder(value: i64, normal_min: i64, warning_min: i64) -> Status {
    if value >= normal_min {
        Status::Normal
    } else if value >= warning_min {
        Status::Warning
    } else {
        Status::Critical
    }
}

pub fn classify_temperature(temperature: f64, profile: &Profile, bands: &Bands) -> Status {
    ladder(
        temperature,
        profile.temp_threshold - bands.temp_warning_margin,
        profile.temp_threshold,
    )
}

pub fn classify_humidity(humidity: f64, bands: &Bands) -> Status {
    ladder(humidity, bands.humidity_normal_max, bands.humidity_warning_max)
}

pub fn classify_heat_index(heat_index: f64, profile: &Profile, bands: &Bands) -> Status {
    let limit = profile.heat_index_threshold(bands.heat_index_offset);
    ladder(heat_index, limit - bands.temp_warning_margin, limit)
}

pub fn classify_gas(gas_level: i64, profile: &Profile, bands: &Bands) -> Status {
    let limit = profile.gas_threshold;
    if gas_level <= limit - bands.gas_warning_margin {
        Status::Normal
    } else if gas_level <= limit {
        Status::Warning
    } else {
        Status::Critical
    }
}

pub fn classify_crowd(crowd_distance: i64, bands: &Bands) -> Status {
    inverted_ladder(crowd_distance, bands.crowd_normal_min, bands.crowd_warning_min)
}

/// Classifies every metric of a reading against a worker profile.
pub fn classify(reading: &Reading, profile: &Profile, bands: &Bands) -> StatusSet {
    StatusSet {
        temperature: classify_temperature(reading.temperature, profile, bands),
        humidity: classify_humidity(reading.humidity, bands),
        heat_index: classify_heat_index(reading.heat_index, profile, bands),
        gas: classify_gas(reading.gas_level, profile, bands),
        crowd: classify_crowd(reading.crowd_distance, bands),
    }
}

/// Worst metric wins: any Critical is High, else any Warning is Moderate.
pub fn aggregate(statuses: &StatusSet) -> RiskLevel {
    match statuses.iter().map(|(_, s)| s).max() {
        Some(Status::Critical) => RiskLevel::High,
        Some(Status::Warning) => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
