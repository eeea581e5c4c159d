//! Console dashboard.
//!
//! Renders one `Report` as a block of text: worker card, one line per metric
//! with its status badge and trend, the numbered warnings and the health tip.

use std::fmt::Write;

use crate::analysis::history::HistoryBuffer;
use crate::model::{Metric, Reading, RiskLevel, Status};
use crate::monitor::{ReadingSource, Report};

fn badge(status: Status) -> &'static str {
    match status {
        Status::Normal => "[ NORMAL ]",
        Status::Warning => "[WARNING ]",
        Status::Critical => "[CRITICAL]",
    }
}

fn formatted_value(reading: &Reading, metric: Metric) -> String {
    match metric {
        Metric::Temperature => format!("{:.1} °C", reading.temperature),
        Metric::Humidity => format!("{:.1} %", reading.humidity),
        Metric::HeatIndex => format!("{:.1} °C", reading.heat_index),
        Metric::Gas => format!("{}", reading.gas_level),
        Metric::Crowd => format!("{} cm", reading.crowd_distance),
    }
}

fn trend_arrow(history: &HistoryBuffer, metric: Metric) -> &'static str {
    match history.trend(metric) {
        Some(d) if d > 0.0 => "↑",
        Some(d) if d < 0.0 => "↓",
        Some(_) => "→",
        None => " ",
    }
}

fn source_note(source: ReadingSource) -> &'static str {
    match source {
        ReadingSource::Live => "live",
        ReadingSource::Replay => "replay",
        ReadingSource::LastKnown => "last known (fetch failed)",
        ReadingSource::Cached => "cached (fetch failed)",
        ReadingSource::Fallback => "no data yet (fetch failed)",
    }
}

pub fn render(report: &Report, history: &HistoryBuffer) -> String {
    let reading = &report.reading;
    let assessment = &report.assessment;
    let mut out = String::with_capacity(1024);

    let _ = writeln!(
        out,
        "─── POLL #{} · {} · {} ───",
        report.poll,
        reading.timestamp.format("%H:%M:%S"),
        source_note(report.source)
    );
    if report.stale {
        let _ = writeln!(out, "!! data is stale");
    }

    let age = reading.worker_age.map(|a| a.to_string()).unwrap_or_else(|| "?".into());
    let level = reading.working_level.map(|l| l.to_string()).unwrap_or_else(|| "?".into());
    let _ = writeln!(
        out,
        "Worker {} ({}) · {} · age {} · work level {}",
        reading.worker_name, reading.worker_uid, reading.worker_role, age, level
    );
    let _ = writeln!(
        out,
        "Limits: temp {:.1} °C · gas {}",
        assessment.profile.temp_threshold, assessment.profile.gas_threshold
    );
    let _ = writeln!(out);

    for (metric, status) in assessment.statuses.iter() {
        let _ = writeln!(
            out,
            "  {:<15} {:>10} {} {}",
            metric.label(),
            formatted_value(reading, metric),
            trend_arrow(history, metric),
            badge(status)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Risk: {}", assessment.risk);
    for (i, warning) in assessment.advice.warnings.iter().enumerate() {
        if assessment.risk == RiskLevel::Low && assessment.advice.is_stable() {
            let _ = writeln!(out, "  {}", warning);
        } else {
            let _ = writeln!(out, "  {}. {}", i + 1, warning);
        }
    }
    let _ = writeln!(out, "Tip: {}", assessment.advice.tip);
    out
}
