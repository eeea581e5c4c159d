//! Safety assessment of a single reading.
//!
//! Submodules:
//! - `thresholds` — per-metric status classification and risk aggregation.
//! - `advisor` — role/age-aware warnings and health tip selection.
//! - `tips` — the rotating general health tips.
//! - `stalenesses` — flags readings that are too old to trust.

pub mod advisor;
pub mod stalenesses;
pub mod thresholds;
pub mod tips;

use crate::model::{Bands, Profile, Reading, RiskLevel, StatusSet};
use crate::workers;

pub use advisor::{Advice, STABLE_SENTINEL};
pub use tips::HealthTipRotator;

/// Everything derived from one reading on one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub profile: Profile,
    pub statuses: StatusSet,
    pub risk: RiskLevel,
    pub advice: Advice,
}

/// Runs the full chain: profile lookup → classify → aggregate → advise.
pub fn assess(reading: &Reading, bands: &Bands, rotator: &mut HealthTipRotator) -> Assessment {
    let profile = workers::resolve_profile(&reading.worker_uid);
    let statuses = thresholds::classify(reading, &profile, bands);
    let risk = thresholds::aggregate(&statuses);
    let advice = advisor::advise(reading, &statuses, risk, rotator);
    Assessment { profile, statuses, risk, advice }
}
