//! Warning and recommendation generation.
//!
//! Advice is chosen from rule tables rather than nested conditionals. Each
//! metric has an ordered list of (audience, messages) rules; the first rule
//! whose audience matches the reading wins. Audience priority is
//!
//!   Older age group  >  Engineer  >  Supervisor  >  everyone else
//!
//! so an older engineer gets the age-specific advice.

use crate::alert::tips::HealthTipRotator;
use crate::model::{AgeGroup, Metric, Reading, RiskLevel, Status, StatusSet, WorkerRole, WorkingLevel};

/// Emitted as the only entry when no metric is out of its Normal band.
pub const STABLE_SENTINEL: &str = "No warnings, environment stable.";

/// Appended after a Critical temperature warning for high-exertion work.
pub const TEMPERATURE_ESCALATION: &str = "Critical temp! Evacuate if persists.";

// ---------------------------------------------------------------------------
// Audience matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Older,
    Engineer,
    Supervisor,
    General,
}

impl Audience {
    pub fn matches(&self, reading: &Reading) -> bool {
        match self {
            Audience::Older => reading.age_group() == Some(AgeGroup::Older),
            Audience::Engineer => reading.worker_role == WorkerRole::Engineer,
            Audience::Supervisor => reading.worker_role == WorkerRole::Supervisor,
            Audience::General => true,
        }
    }
}

/// Priority order used for both warnings and tip overrides.
const AUDIENCE_PRIORITY: [Audience; 4] = [
    Audience::Older,
    Audience::Engineer,
    Audience::Supervisor,
    Audience::General,
];

/// First audience in priority order that the reading belongs to.
pub fn audience_for(reading: &Reading) -> Audience {
    AUDIENCE_PRIORITY
        .into_iter()
        .find(|a| a.matches(reading))
        .unwrap_or(Audience::General)
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Messages for one audience on one metric.
pub struct AdviceRule {
    pub audience: Audience,
    pub critical: &'static str,
    pub warning: &'static str,
}

const fn rule(audience: Audience, critical: &'static str, warning: &'static str) -> AdviceRule {
    AdviceRule { audience, critical, warning }
}

static TEMPERATURE_RULES: [AdviceRule; 4] = [
    rule(Audience::Older, "High temp! Rest in a cool area and hydrate.", "Rising temp! Take extra breaks and drink water."),
    rule(Audience::Engineer, "High temp! Check cooling systems.", "Rising temp! Monitor cooling systems."),
    rule(Audience::Supervisor, "High temp! Ensure team cools down.", "Rising temp! Remind team to hydrate."),
    rule(Audience::General, "High temp! Move to shaded area.", "Rising temp! Stay hydrated."),
];

static HUMIDITY_RULES: [AdviceRule; 4] = [
    rule(Audience::Older, "High humidity! Stop strenuous work and rest.", "Humidity rising! Pace yourself."),
    rule(Audience::Engineer, "High humidity! Increase ventilation.", "Humidity rising! Check ventilation."),
    rule(Audience::Supervisor, "High humidity! Ensure vents are open.", "Humidity rising! Watch team for fatigue."),
    rule(Audience::General, "High humidity! Avoid exertion.", "Humidity rising! Slow down."),
];

static HEAT_INDEX_RULES: [AdviceRule; 4] = [
    rule(Audience::Older, "Extreme heat index! Leave the hot zone now.", "Heat index rising! Rest in shade."),
    rule(Audience::Engineer, "Extreme heat index! Use cooling fans.", "Heat index rising! Prepare cooling fans."),
    rule(Audience::Supervisor, "Extreme heat index! Limit team work.", "Heat index rising! Rotate team duties."),
    rule(Audience::General, "Extreme heat index! Find shade.", "Heat index rising! Take a break."),
];

static GAS_RULES: [AdviceRule; 4] = [
    rule(Audience::Older, "Dangerous gas! Leave the area immediately.", "Gas rising! Move toward fresh air."),
    rule(Audience::Engineer, "Dangerous gas! Ventilate immediately.", "Gas rising! Inspect for leaks."),
    rule(Audience::Supervisor, "Dangerous gas! Evacuate team.", "Gas rising! Prepare team to evacuate."),
    rule(Audience::General, "Dangerous gas! Move to fresh air.", "Gas rising! Stay near exits."),
];

static CROWD_RULES: [AdviceRule; 4] = [
    rule(Audience::Older, "Overcrowded! Step away to open space.", "Crowd building! Keep clear of congestion."),
    rule(Audience::Engineer, "Overcrowded! Clear work area.", "Crowd building! Keep equipment zone clear."),
    rule(Audience::Supervisor, "Overcrowded! Disperse team.", "Crowd building! Spread team out."),
    rule(Audience::General, "Overcrowded! Maintain distance.", "Crowd building! Keep your distance."),
];

pub fn rules_for(metric: Metric) -> &'static [AdviceRule] {
    match metric {
        Metric::Temperature => &TEMPERATURE_RULES,
        Metric::Humidity => &HUMIDITY_RULES,
        Metric::HeatIndex => &HEAT_INDEX_RULES,
        Metric::Gas => &GAS_RULES,
        Metric::Crowd => &CROWD_RULES,
    }
}

/// Tip overrides for elevated risk: (audience, high-risk tip, moderate-risk tip).
static TIP_OVERRIDES: [(Audience, &str, &str); 4] = [
    (Audience::Older, "Stop work and rest in a cool area now.", "Take frequent breaks and hydrate."),
    (Audience::Engineer, "Stop work, check cooling systems.", "Wear light clothing, check vents."),
    (Audience::Supervisor, "Evacuate team, ensure safety.", "Ensure team takes breaks."),
    (Audience::General, "Move to cooler area now.", "Stay alert, hydrate often."),
];

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    /// Never empty: holds `STABLE_SENTINEL` alone when nothing triggered.
    pub warnings: Vec<String>,
    pub tip: String,
}

impl Advice {
    pub fn is_stable(&self) -> bool {
        self.warnings.len() == 1 && self.warnings[0] == STABLE_SENTINEL
    }
}

/// Message for one metric, or `None` while it is Normal.
fn metric_message(metric: Metric, status: Status, reading: &Reading) -> Option<&'static str> {
    if status == Status::Normal {
        return None;
    }
    let rule = rules_for(metric).iter().find(|r| r.audience.matches(reading))?;
    Some(match status {
        Status::Critical => rule.critical,
        _ => rule.warning,
    })
}

/// Ordered warnings for a classified reading.
pub fn warnings_for(reading: &Reading, statuses: &StatusSet, risk: RiskLevel) -> Vec<String> {
    let prefix = risk.urgency_prefix();
    let mut warnings = Vec::new();

    for (metric, status) in statuses.iter() {
        let Some(message) = metric_message(metric, status, reading) else {
            continue;
        };
        warnings.push(format!("{}{}", prefix, message));

        if metric == Metric::Temperature
            && status == Status::Critical
            && reading.working_level == Some(WorkingLevel::High)
        {
            warnings.push(format!("{}{}", prefix, TEMPERATURE_ESCALATION));
        }
    }

    if warnings.is_empty() {
        warnings.push(STABLE_SENTINEL.to_string());
    }
    warnings
}

/// Tip replacing the rotated one while risk is elevated.
pub fn elevated_tip(reading: &Reading, risk: RiskLevel) -> Option<&'static str> {
    let audience = audience_for(reading);
    let (_, high, moderate) = TIP_OVERRIDES.iter().find(|(a, _, _)| *a == audience)?;
    match risk {
        RiskLevel::High => Some(*high),
        RiskLevel::Moderate => Some(*moderate),
        RiskLevel::Low => None,
    }
}

/// Builds the warnings and the health tip for one poll.
///
/// The rotator advances on every call, whatever the risk, so the general
/// tips keep cycling underneath an elevated-risk override.
pub fn advise(
    reading: &Reading,
    statuses: &StatusSet,
    risk: RiskLevel,
    rotator: &mut HealthTipRotator,
) -> Advice {
    let warnings = warnings_for(reading, statuses, risk);
    let rotated = rotator.next().unwrap_or_default();
    let tip = elevated_tip(reading, risk).unwrap_or(rotated).to_string();
    Advice { warnings, tip }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::tips::HEALTH_TIPS;
    use chrono::Utc;

    fn reading(role: WorkerRole, age: Option<u32>, level: Option<WorkingLevel>) -> Reading {
        let mut r = Reading::neutral(Utc::now());
        r.worker_role = role;
        r.worker_age = age;
        r.working_level = level;
        r
    }

    fn statuses(temperature: Status, humidity: Status, heat_index: Status, gas: Status, crowd: Status) -> StatusSet {
        StatusSet { temperature, humidity, heat_index, gas, crowd }
    }

    fn all(status: Status) -> StatusSet {
        statuses(status, status, status, status, status)
    }

    // --- Audience cascade ---------------------------------------------------

    #[test]
    fn test_older_age_takes_precedence_over_role() {
        let r = reading(WorkerRole::Engineer, Some(56), None);
        assert_eq!(audience_for(&r), Audience::Older);
    }

    #[test]
    fn test_engineer_over_supervisor_over_general() {
        assert_eq!(audience_for(&reading(WorkerRole::Engineer, Some(40), None)), Audience::Engineer);
        assert_eq!(audience_for(&reading(WorkerRole::Supervisor, None, None)), Audience::Supervisor);
        assert_eq!(audience_for(&reading(WorkerRole::Visitor, Some(20), None)), Audience::General);
        assert_eq!(audience_for(&reading(WorkerRole::Unknown, None, None)), Audience::General);
    }

    #[test]
    fn test_every_rule_table_ends_with_general_audience() {
        for metric in Metric::ALL {
            let rules = rules_for(metric);
            assert_eq!(rules.len(), AUDIENCE_PRIORITY.len());
            for (rule, audience) in rules.iter().zip(AUDIENCE_PRIORITY) {
                assert_eq!(rule.audience, audience, "{:?} rules out of priority order", metric);
            }
        }
    }

    // --- Warnings ------------------------------------------------------------

    #[test]
    fn test_engineer_critical_temperature_with_high_workload_escalates() {
        let r = reading(WorkerRole::Engineer, Some(28), Some(WorkingLevel::High));
        let s = statuses(Status::Critical, Status::Normal, Status::Normal, Status::Normal, Status::Normal);
        let warnings = warnings_for(&r, &s, RiskLevel::High);
        assert_eq!(
            warnings,
            vec![
                "URGENT: High temp! Check cooling systems.".to_string(),
                "URGENT: Critical temp! Evacuate if persists.".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_escalation_without_high_working_level() {
        for level in [None, Some(WorkingLevel::Low), Some(WorkingLevel::Medium)] {
            let r = reading(WorkerRole::Engineer, Some(28), level);
            let s = statuses(Status::Critical, Status::Normal, Status::Normal, Status::Normal, Status::Normal);
            assert_eq!(warnings_for(&r, &s, RiskLevel::High).len(), 1, "level {:?}", level);
        }
    }

    #[test]
    fn test_no_escalation_for_warning_temperature() {
        let r = reading(WorkerRole::Engineer, Some(28), Some(WorkingLevel::High));
        let s = statuses(Status::Warning, Status::Normal, Status::Normal, Status::Normal, Status::Normal);
        assert_eq!(
            warnings_for(&r, &s, RiskLevel::Moderate),
            vec!["CAUTION: Rising temp! Monitor cooling systems.".to_string()]
        );
    }

    #[test]
    fn test_all_normal_yields_only_sentinel() {
        let r = reading(WorkerRole::Supervisor, Some(45), Some(WorkingLevel::High));
        assert_eq!(warnings_for(&r, &all(Status::Normal), RiskLevel::Low), vec![STABLE_SENTINEL.to_string()]);
    }

    #[test]
    fn test_warnings_follow_fixed_metric_order() {
        let r = reading(WorkerRole::Visitor, None, None);
        let s = statuses(Status::Normal, Status::Warning, Status::Normal, Status::Critical, Status::Warning);
        let warnings = warnings_for(&r, &s, RiskLevel::High);
        assert_eq!(
            warnings,
            vec![
                "URGENT: Humidity rising! Slow down.".to_string(),
                "URGENT: Dangerous gas! Move to fresh air.".to_string(),
                "URGENT: Crowd building! Keep your distance.".to_string(),
            ]
        );
    }

    #[test]
    fn test_older_worker_gets_age_specific_messages() {
        let r = reading(WorkerRole::Supervisor, Some(61), None);
        let s = statuses(Status::Normal, Status::Normal, Status::Normal, Status::Critical, Status::Normal);
        assert_eq!(
            warnings_for(&r, &s, RiskLevel::High),
            vec!["URGENT: Dangerous gas! Leave the area immediately.".to_string()]
        );
    }

    #[test]
    fn test_warning_count_never_exceeds_six() {
        let r = reading(WorkerRole::Engineer, Some(28), Some(WorkingLevel::High));
        let warnings = warnings_for(&r, &all(Status::Critical), RiskLevel::High);
        assert_eq!(warnings.len(), 6);
        assert_eq!(warnings[1], "URGENT: Critical temp! Evacuate if persists.");
    }

    #[test]
    fn test_prefix_uses_overall_risk_level() {
        let r = reading(WorkerRole::Unknown, None, None);
        let s = statuses(Status::Warning, Status::Warning, Status::Critical, Status::Normal, Status::Normal);
        for warning in warnings_for(&r, &s, RiskLevel::High) {
            assert!(warning.starts_with("URGENT: "), "{}", warning);
        }
        let s = all(Status::Warning);
        for warning in warnings_for(&r, &s, RiskLevel::Moderate) {
            assert!(warning.starts_with("CAUTION: "), "{}", warning);
        }
    }

    #[test]
    fn test_low_risk_warnings_carry_no_prefix() {
        // Only reachable when a caller passes a risk level that disagrees with
        // the statuses; the prefix still follows the risk level it was given.
        let r = reading(WorkerRole::Unknown, None, None);
        let s = statuses(Status::Warning, Status::Normal, Status::Normal, Status::Normal, Status::Normal);
        assert_eq!(warnings_for(&r, &s, RiskLevel::Low), vec!["Rising temp! Stay hydrated.".to_string()]);
    }

    // --- Tips ---------------------------------------------------------------

    #[test]
    fn test_low_risk_uses_rotated_tip() {
        let r = reading(WorkerRole::Engineer, Some(28), None);
        let mut rotator = HealthTipRotator::default();
        for expected in HEALTH_TIPS.iter().chain(HEALTH_TIPS.iter().take(1)) {
            let advice = advise(&r, &all(Status::Normal), RiskLevel::Low, &mut rotator);
            assert_eq!(advice.tip, *expected);
            assert!(advice.is_stable());
        }
    }

    #[test]
    fn test_elevated_risk_overrides_tip_by_audience() {
        let mut rotator = HealthTipRotator::default();
        let engineer = reading(WorkerRole::Engineer, Some(28), None);
        let advice = advise(&engineer, &all(Status::Critical), RiskLevel::High, &mut rotator);
        assert_eq!(advice.tip, "Stop work, check cooling systems.");

        let supervisor = reading(WorkerRole::Supervisor, Some(40), None);
        let advice = advise(&supervisor, &all(Status::Warning), RiskLevel::Moderate, &mut rotator);
        assert_eq!(advice.tip, "Ensure team takes breaks.");

        let older = reading(WorkerRole::Supervisor, Some(70), None);
        let advice = advise(&older, &all(Status::Critical), RiskLevel::High, &mut rotator);
        assert_eq!(advice.tip, "Stop work and rest in a cool area now.");

        let visitor = reading(WorkerRole::Visitor, None, None);
        let advice = advise(&visitor, &all(Status::Warning), RiskLevel::Moderate, &mut rotator);
        assert_eq!(advice.tip, "Stay alert, hydrate often.");
    }

    #[test]
    fn test_rotator_advances_under_override() {
        let r = reading(WorkerRole::Visitor, None, None);
        let mut rotator = HealthTipRotator::default();
        advise(&r, &all(Status::Critical), RiskLevel::High, &mut rotator);
        assert_eq!(rotator.index(), 1);
    }
}
