// src/config.rs

use std::path::PathBuf;

use crate::clean::{StopMarkers, DEFAULT_STOP_MARKERS};

/// Everything a cleaning run needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Files or directories; empty means the current directory.
    pub inputs: Vec<PathBuf>,
    /// Explicit destination, only valid when exactly one file is selected.
    pub output: Option<PathBuf>,
    /// Forced row width. `None` lets the header or first good row decide.
    pub expected_columns: Option<usize>,
    pub stop_markers: StopMarkers,
    pub dry_run: bool,
    /// Where to write the JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            expected_columns: None,
            stop_markers: StopMarkers::parse(DEFAULT_STOP_MARKERS),
            dry_run: false,
            report: None,
        }
    }
}

#[cfg(test)]
impl RunConfig {
    pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }
}
