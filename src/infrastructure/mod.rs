pub mod snapshot;
pub mod telemetry;
