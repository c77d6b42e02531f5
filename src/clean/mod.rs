// src/clean/mod.rs
use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, trace};

pub mod header;
pub mod markers;
pub mod row;

pub use header::{is_header, EXPECTED_HEADER};
pub use markers::{StopMarkers, DEFAULT_STOP_MARKERS};
pub use row::{clean_numeric_row, Rejection, RowVerdict};

/// What happened to a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// Write this line (without trailing newline) to the output.
    Keep(String),
    /// Counted as skipped.
    Skip(Rejection),
    /// Blank, or noise before the header: not counted at all.
    Ignore,
    /// A stop marker was seen; nothing further from this file is read.
    Stop,
}

/// Per-file result of a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub kept: usize,
    pub skipped: usize,
    pub columns: Option<usize>,
    pub header_found: bool,
    /// 1-based line number of the stop marker, if one triggered.
    pub stopped_at_line: Option<usize>,
}

/// Header-then-rows state machine for one file.
pub struct RowFilter<'a> {
    markers: &'a StopMarkers,
    outcome: CleanOutcome,
    line_no: usize,
    stopped: bool,
}

impl<'a> RowFilter<'a> {
    pub fn new(expected_columns: Option<usize>, markers: &'a StopMarkers) -> Self {
        Self {
            markers,
            outcome: CleanOutcome {
                columns: expected_columns,
                ..CleanOutcome::default()
            },
            line_no: 0,
            stopped: false,
        }
    }

    /// Feed the next line. After `LineAction::Stop` every call returns `Stop`.
    pub fn process_line(&mut self, line: &str) -> LineAction {
        if self.stopped {
            return LineAction::Stop;
        }
        self.line_no += 1;

        if self.markers.should_stop(line) {
            self.stopped = true;
            self.outcome.stopped_at_line = Some(self.line_no);
            debug!(line = self.line_no, "stop marker seen");
            return LineAction::Stop;
        }
        if line.trim().is_empty() {
            return LineAction::Ignore;
        }

        if !self.outcome.header_found {
            if !is_header(line) {
                trace!(line = self.line_no, "no header yet; ignoring");
                return LineAction::Ignore;
            }
            self.outcome.header_found = true;
            self.outcome.columns.get_or_insert_with(header::header_columns);
            self.outcome.kept += 1;
            debug!(line = self.line_no, columns = ?self.outcome.columns, "header accepted");
            return LineAction::Keep(EXPECTED_HEADER.to_string());
        }

        match clean_numeric_row(line, self.outcome.columns) {
            RowVerdict::Kept { line, columns } => {
                self.outcome.columns.get_or_insert(columns);
                self.outcome.kept += 1;
                LineAction::Keep(line)
            }
            RowVerdict::Rejected(reason) => {
                trace!(line = self.line_no, ?reason, "row skipped");
                self.outcome.skipped += 1;
                LineAction::Skip(reason)
            }
        }
    }

    pub fn finish(self) -> CleanOutcome {
        self.outcome
    }
}

/// Output file that is only created once there is something to write.
struct LazyOutput {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl LazyOutput {
    fn new(path: Option<&Path>) -> Result<Self> {
        if let Some(parent) = path.and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory {}", parent.display()))?;
            }
        }
        Ok(Self {
            path: path.map(Path::to_path_buf),
            writer: None,
        })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if self.writer.is_none() {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            self.writer = Some(BufWriter::new(file));
        }
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{line}").with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(())
    }

    fn close(self) -> Result<()> {
        if let (Some(path), Some(mut writer)) = (self.path, self.writer) {
            writer
                .flush()
                .with_context(|| format!("flushing {}", path.display()))?;
        }
        Ok(())
    }
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // valid_up_to guarantees this prefix is UTF-8
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(n) => rest = &after[n..],
                    None => return out,
                }
            }
        }
    }
}

/// Run the filter over any line source, handing kept lines to `sink`.
pub fn clean_reader<R, F>(
    mut reader: R,
    expected_columns: Option<usize>,
    markers: &StopMarkers,
    mut sink: F,
) -> Result<CleanOutcome>
where
    R: BufRead,
    F: FnMut(&str) -> Result<()>,
{
    let mut filter = RowFilter::new(expected_columns, markers);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        match filter.process_line(&decode_lossy(&buf)) {
            LineAction::Keep(line) => sink(&line)?,
            LineAction::Stop => break,
            LineAction::Skip(_) | LineAction::Ignore => {}
        }
    }
    Ok(filter.finish())
}

/// Clean `input`, writing to `output` unless it is `None` (dry run).
#[instrument(level = "debug", skip(input, markers), fields(input = %input.display()))]
pub fn clean_file(
    input: &Path,
    output: Option<&Path>,
    expected_columns: Option<usize>,
    markers: &StopMarkers,
) -> Result<CleanOutcome> {
    let mut destination = LazyOutput::new(output)?;
    let source = File::open(input).with_context(|| format!("opening {}", input.display()))?;

    let outcome = clean_reader(BufReader::new(source), expected_columns, markers, |line| {
        destination.write_line(line)
    })
    .with_context(|| format!("cleaning {}", input.display()))?;
    destination.close()?;

    debug!(
        kept = outcome.kept,
        skipped = outcome.skipped,
        columns = ?outcome.columns,
        "finished file"
    );
    Ok(outcome)
}
