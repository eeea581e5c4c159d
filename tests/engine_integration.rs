/// Integration tests for the reading-to-advice pipeline
///
/// Tests verify:
/// 1. A recorded channel response parses, enriches and assesses end to end
/// 2. Role, age and working level steer the warnings and the tip
/// 3. The health tip rotates across polls of a running monitor
/// 4. Fetch failures degrade to the last known or neutral reading
///
/// No network access needed; every feed body is inline.
///
/// Run with: cargo test --test engine_integration

use chrono::{DateTime, TimeZone, Utc};
use worksafe_service::alert::{self, tips::HEALTH_TIPS, HealthTipRotator, STABLE_SENTINEL};
use worksafe_service::config::Config;
use worksafe_service::ingest::thingspeak;
use worksafe_service::model::{Bands, FeedError, Reading, RiskLevel, Status, WorkerRole, WorkingLevel};
use worksafe_service::monitor::{Monitor, ReadingSource};
use worksafe_service::workers;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fetched_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 13, 0, 5).unwrap()
}

fn body(fields: &[(&str, &str)]) -> String {
    let entry: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("\"{}\": \"{}\"", k, v))
        .collect();
    format!(
        r#"{{"channel": {{"id": 2936641, "name": "Site A"}}, "feeds": [{{"created_at": "2025-04-01T13:00:00Z", "entry_id": 1, {}}}]}}"#,
        entry.join(", ")
    )
}

fn reading_from(body: &str) -> Reading {
    let response = thingspeak::parse_response(body).expect("body should parse");
    let entry = thingspeak::latest_entry(response).expect("channel should have an entry");
    workers::enrich(thingspeak::parse_entry(&entry, fetched_at()))
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_hot_engineer_on_high_workload() {
    let reading = reading_from(&body(&[
        ("field1", "36"),
        ("field2", "70"),
        ("field3", "1000"),
        ("field4", "50"),
        ("field5", "A3F29C11"),
        ("field6", "N/A"),
        ("field7", "N/A"),
        ("field8", "30"),
    ]));
    assert_eq!(reading.worker_name, "Ravi Kumar");
    assert_eq!(reading.worker_role, WorkerRole::Engineer);
    assert_eq!(reading.worker_age, Some(28));
    assert_eq!(reading.working_level, Some(WorkingLevel::High));

    let mut rotator = HealthTipRotator::default();
    let assessment = alert::assess(&reading, &Bands::default(), &mut rotator);

    assert_eq!(assessment.statuses.temperature, Status::Critical);
    assert_eq!(assessment.statuses.humidity, Status::Normal);
    assert_eq!(assessment.statuses.heat_index, Status::Normal);
    assert_eq!(assessment.statuses.gas, Status::Normal);
    assert_eq!(assessment.statuses.crowd, Status::Normal);
    assert_eq!(assessment.risk, RiskLevel::High);
    assert_eq!(
        assessment.advice.warnings,
        vec![
            "URGENT: High temp! Check cooling systems.".to_string(),
            "URGENT: Critical temp! Evacuate if persists.".to_string(),
        ]
    );
    assert_eq!(assessment.advice.tip, "Stop work, check cooling systems.");
    assert_eq!(rotator.index(), 1, "rotator advances even under an override");
}

#[test]
fn test_calm_reading_is_stable_with_rotated_tip() {
    let reading = reading_from(&body(&[
        ("field1", "24.5"),
        ("field2", "55"),
        ("field3", "400"),
        ("field4", "120"),
        ("field5", "5B0E7D42"),
        ("field8", "25"),
    ]));
    let mut rotator = HealthTipRotator::default();
    let assessment = alert::assess(&reading, &Bands::default(), &mut rotator);

    assert!(assessment.statuses.all_normal());
    assert_eq!(assessment.risk, RiskLevel::Low);
    assert_eq!(assessment.advice.warnings, vec![STABLE_SENTINEL.to_string()]);
    assert_eq!(assessment.advice.tip, HEALTH_TIPS[0]);
}

#[test]
fn test_worker_profile_tightens_limits() {
    // 34 °C is inside the default band but over Joseph Mathew's 33 °C limit.
    let fields = [("field1", "34"), ("field2", "60"), ("field4", "100"), ("field8", "30")];
    let default_worker = reading_from(&body(&fields));

    let mut with_uid = fields.to_vec();
    with_uid.push(("field5", "C7194A8E"));
    let registered = reading_from(&body(&with_uid));

    let bands = Bands::default();
    let mut rotator = HealthTipRotator::default();
    let a = alert::assess(&default_worker, &bands, &mut rotator);
    let b = alert::assess(&registered, &bands, &mut rotator);

    assert_eq!(a.statuses.temperature, Status::Warning);
    assert_eq!(b.statuses.temperature, Status::Critical);
    assert_eq!(b.profile.temp_threshold, 33.0);
    assert!(b.advice.warnings.iter().all(|w| w.starts_with("URGENT: ")));
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let reading = reading_from(r#"{"feeds": [{"field1": "bogus"}]}"#);
    assert_eq!(reading.temperature, 0.0);
    assert_eq!(reading.humidity, 70.0);
    assert_eq!(reading.crowd_distance, 0);
    assert_eq!(reading.worker_uid, "N/A");
    assert_eq!(reading.timestamp, fetched_at());

    // A zero crowd distance means someone is right at the sensor.
    let mut rotator = HealthTipRotator::default();
    let assessment = alert::assess(&reading, &Bands::default(), &mut rotator);
    assert_eq!(assessment.statuses.crowd, Status::Critical);
    assert_eq!(assessment.risk, RiskLevel::High);
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

#[test]
fn test_monitor_cycles_tips_across_polls() {
    let mut monitor = Monitor::new(&Config::default());
    let tips: Vec<String> = (0..HEALTH_TIPS.len() + 1)
        .map(|_| {
            monitor
                .tick(Ok(Reading::neutral(fetched_at())), fetched_at())
                .assessment
                .advice
                .tip
        })
        .collect();

    for (i, tip) in tips.iter().take(HEALTH_TIPS.len()).enumerate() {
        assert_eq!(tip, HEALTH_TIPS[i]);
    }
    assert_eq!(tips[HEALTH_TIPS.len()], HEALTH_TIPS[0], "rotation wraps");
}

#[test]
fn test_monitor_survives_outage() {
    let mut monitor = Monitor::new(&Config::default());

    let first = monitor.tick(Err(FeedError::HttpError(503)), fetched_at());
    assert_eq!(first.source, ReadingSource::Fallback);
    assert_eq!(first.assessment.advice.warnings, vec![STABLE_SENTINEL.to_string()]);

    let live = reading_from(&body(&[("field1", "31"), ("field2", "60"), ("field4", "100"), ("field8", "30")]));
    let second = monitor.tick(Ok(live), fetched_at());
    assert_eq!(second.source, ReadingSource::Live);
    assert_eq!(second.assessment.risk, RiskLevel::Moderate);

    let third = monitor.tick(Err(FeedError::NoFeeds), fetched_at());
    assert_eq!(third.source, ReadingSource::LastKnown);
    assert_eq!(third.reading.temperature, 31.0);
    assert_eq!(third.assessment.risk, RiskLevel::Moderate);

    assert_eq!(monitor.polls(), 3);
    assert_eq!(monitor.fresh_polls(), 1);
}
