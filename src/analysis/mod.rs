/// Data organization utilities for the worker-safety monitoring service.
///
/// This module keeps the recent readings that feed trend displays. Chart
/// drawing itself is left to whatever consumes the series.
///
/// Submodules:
/// - `history` — fixed-capacity FIFO of recent readings with per-metric series.

pub mod history;
