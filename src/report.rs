// src/report.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::clean::{CleanOutcome, EXPECTED_HEADER};

/// One line of console output for a processed file.
///
/// `written_to` is the output path, or `None` for a dry run.
pub fn summary_line(file_name: &str, outcome: &CleanOutcome, written_to: Option<&Path>) -> String {
    if outcome.kept == 0 {
        return format!("{file_name}: header '{EXPECTED_HEADER}' not found; skipped.");
    }

    let mut summary = format!(
        "{file_name}: kept {} rows (skipped {})",
        outcome.kept, outcome.skipped
    );
    if let Some(columns) = outcome.columns {
        summary.push_str(&format!(" across {columns} columns"));
    }
    summary.push('.');
    if let Some(path) = written_to {
        summary.push_str(&format!(" Wrote cleaned data to {}.", path.display()));
    }
    summary
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub kept: usize,
    pub skipped: usize,
    pub columns: Option<usize>,
    pub header_found: bool,
    pub stopped_at_line: Option<usize>,
}

impl FileReport {
    pub fn new(input: &Path, output: Option<&Path>, outcome: &CleanOutcome) -> Self {
        Self {
            input: input.to_path_buf(),
            // nothing is written when the header never showed up
            output: output
                .filter(|_| outcome.header_found)
                .map(Path::to_path_buf),
            kept: outcome.kept,
            skipped: outcome.skipped,
            columns: outcome.columns,
            header_found: outcome.header_found,
            stopped_at_line: outcome.stopped_at_line,
        }
    }
}

/// Machine-readable summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub expected_header: &'static str,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn new(dry_run: bool, files: Vec<FileReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            dry_run,
            expected_header: EXPECTED_HEADER,
            files,
        }
    }

    pub fn total_kept(&self) -> usize {
        self.files.iter().map(|f| f.kept).sum()
    }

    /// Pretty JSON at `path`, creating parent directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing run report")?;
        let mut file =
            File::create(path).with_context(|| format!("creating report {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn outcome(kept: usize, skipped: usize, columns: Option<usize>) -> CleanOutcome {
        CleanOutcome {
            kept,
            skipped,
            columns,
            header_found: kept > 0,
            stopped_at_line: None,
        }
    }

    #[test]
    fn header_missing_message() {
        let line = summary_line("boot.csv", &outcome(0, 0, None), Some(Path::new("x")));
        assert_eq!(
            line,
            "boot.csv: header 'time_ms,accel_mag_g,fan_pwm,vibration_pwm,current_a,event_code' not found; skipped."
        );
    }

    #[test]
    fn written_summary() {
        let line = summary_line(
            "run.csv",
            &outcome(3, 1, Some(6)),
            Some(Path::new("/data/run_clean.csv")),
        );
        assert_eq!(
            line,
            "run.csv: kept 3 rows (skipped 1) across 6 columns. Wrote cleaned data to /data/run_clean.csv."
        );
    }

    #[test]
    fn dry_run_summary() {
        let line = summary_line("run.csv", &outcome(3, 1, Some(6)), None);
        assert_eq!(line, "run.csv: kept 3 rows (skipped 1) across 6 columns.");
    }

    #[test]
    fn json_report_round_trips_fields() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("reports").join("run.json");
        let files = vec![
            FileReport::new(
                Path::new("a.csv"),
                Some(Path::new("a_clean.csv")),
                &outcome(3, 1, Some(6)),
            ),
            FileReport::new(
                Path::new("b.csv"),
                Some(Path::new("b_clean.csv")),
                &outcome(0, 0, None),
            ),
        ];
        let report = RunReport::new(false, files);
        assert_eq!(report.total_kept(), 3);
        report.write_json(&path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["dry_run"], false);
        assert_eq!(value["expected_header"], EXPECTED_HEADER);
        assert_eq!(value["files"][0]["output"], "a_clean.csv");
        assert_eq!(value["files"][0]["columns"], 6);
        assert!(value["files"][1]["output"].is_null());
        assert!(value["generated_at"].is_string());
        Ok(())
    }
}
