/// Feed ingestion for the worker-safety monitoring service.
///
/// Submodules:
/// - `thingspeak` — channel feed client and defensive entry parsing.

pub mod thingspeak;
