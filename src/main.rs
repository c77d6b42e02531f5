use anyhow::Result;
use clap::Parser;
use std::{io, path::PathBuf};
use telemetry_clean::{clean::DEFAULT_STOP_MARKERS, run, RunConfig, StopMarkers};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove boot logs or binary junk from a CSV file by keeping only rows that contain numeric comma-separated values."
)]
struct Args {
    /// CSV file or directory to clean. Repeat to cover several locations.
    /// Defaults to the current working directory.
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// Where to write the cleaned CSV. Defaults to <input stem>_clean<input suffix>.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Expected number of columns. If omitted (or 0), the header or first valid row decides.
    #[arg(short = 'c', long)]
    expected_columns: Option<u32>,

    /// Stop reading a file once any of these case-insensitive markers are seen.
    /// Separate markers with '|'; pass an empty string to disable.
    #[arg(long, default_value = DEFAULT_STOP_MARKERS)]
    stop_marker: String,

    /// Report how many rows would be kept without writing a file.
    #[arg(long)]
    dry_run: bool,

    /// Also write a JSON summary of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            inputs: args.input,
            output: args.output,
            expected_columns: args
                .expected_columns
                .filter(|&c| c > 0)
                .map(|c| c as usize),
            stop_markers: StopMarkers::parse(&args.stop_marker),
            dry_run: args.dry_run,
            report: args.report,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "startup");
    let config = RunConfig::from(args);
    debug!(markers = ?config.stop_markers.as_slice(), "stop markers");
    run(&config, &mut io::stdout().lock())?;
    Ok(())
}
