//! Strip boot logs, log markers and binary junk out of telemetry CSV dumps,
//! keeping the validated header and clean numeric rows.

pub mod clean;
pub mod config;
pub mod discover;
pub mod report;
pub mod runner;

pub use clean::StopMarkers;
pub use config::RunConfig;
pub use runner::run;
