//! Worker-safety telemetry monitor.
//!
//! Polls a ThingSpeak channel fed by an on-site sensor station (temperature,
//! humidity, heat index, gas, crowd distance and the RFID badge of the
//! worker on duty), classifies each sample against the worker's limits and
//! produces role- and age-aware warnings plus a health tip.
//!
//! The classification engine lives in `alert` and is pure apart from the
//! explicit tip rotator; everything else feeds it or displays its output.

pub mod alert;
pub mod analysis;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod verify;
pub mod workers;
