// Domain layer - Readings, the rolling window, threshold bands and snapshots
pub mod dashboard;
pub mod error;
pub mod reading;
pub mod telemetry;
pub mod threshold;
