// src/runner.rs

use anyhow::{bail, Context, Result};
use std::{
    env, fs,
    io::Write,
    path::{self, Path, PathBuf},
    time::Instant,
};
use tracing::info;

use crate::{
    clean::clean_file,
    config::RunConfig,
    discover::{default_output_path, discover_csv_files},
    report::{summary_line, FileReport, RunReport},
};

/// Clean every selected file in order, printing one summary line per file
/// to `out`. With no inputs the current directory is scanned.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunReport> {
    let cwd = env::current_dir().context("reading current directory")?;
    run_in(config, &cwd, out)
}

/// Like [`run`], but `base` stands in for the current directory.
/// Fatal conditions abort before any file is touched.
pub fn run_in<W: Write>(config: &RunConfig, base: &Path, out: &mut W) -> Result<RunReport> {
    let targets: Vec<PathBuf> = if config.inputs.is_empty() {
        vec![base.to_path_buf()]
    } else {
        config.inputs.clone()
    };
    let input_files = discover_csv_files(&targets)?;
    info!("{} file(s) to clean", input_files.len());

    let explicit_output = match &config.output {
        Some(output) if input_files.len() != 1 => {
            bail!(
                "--output can only be used when cleaning a single file ({} selected, e.g. {}).",
                input_files.len(),
                output.display()
            );
        }
        Some(output) => Some(
            path::absolute(output)
                .with_context(|| format!("resolving output path {}", output.display()))?,
        ),
        None => None,
    };
    if let Some(output) = &explicit_output {
        if fs::canonicalize(output).is_ok_and(|o| input_files.contains(&o)) {
            bail!("Output path {} is also the input file.", output.display());
        }
    }

    let mut reports = Vec::with_capacity(input_files.len());
    for input in &input_files {
        let start = Instant::now();
        let output_path = explicit_output
            .clone()
            .unwrap_or_else(|| default_output_path(input));
        let destination = (!config.dry_run).then_some(output_path.as_path());

        let outcome = clean_file(
            input,
            destination,
            config.expected_columns,
            &config.stop_markers,
        )?;

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        writeln!(out, "{}", summary_line(&file_name, &outcome, destination))
            .context("writing summary")?;
        info!(file = %file_name, elapsed = ?start.elapsed(), "cleaned");

        reports.push(FileReport::new(input, destination, &outcome));
    }

    let report = RunReport::new(config.dry_run, reports);
    info!(
        files = report.files.len(),
        kept = report.total_kept(),
        "run complete"
    );
    if let Some(path) = &config.report {
        report.write_json(path)?;
        info!("wrote run report to {}", path.display());
    }
    Ok(report)
}
