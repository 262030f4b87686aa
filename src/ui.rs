// UI layer: what the operator sees on stdout, the spinner shown while a
// request is in flight, and the Enter prompt that gates the commit.

use crate::api::{CommitResponse, DetectResponse, UploadResponse, ValidateResponse};
use crate::error::ImportError;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::borrow::Cow;
use std::io::{self, BufRead, StdinLock, Write};
use std::time::Duration;

/// How many row errors are listed after a failed or partial validation.
pub const MAX_LISTED_ERRORS: usize = 5;

/// Stats keys already printed from the top-level counters.
const REPORTED_STATS: &[&str] = &["validRows", "errorRows", "warningRows"];

/// Blocks the run until the operator agrees to commit.
pub trait Operator {
    fn confirm_commit(&mut self) -> Result<(), ImportError>;
}

/// Waits for one line of input before the commit. Any line (usually a
/// bare Enter) confirms; end of input cancels the run.
pub struct LineOperator<R> {
    input: R,
}

/// The operator at the terminal, reading from stdin.
pub type TerminalOperator = LineOperator<StdinLock<'static>>;

impl TerminalOperator {
    pub fn stdin() -> Self {
        LineOperator::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineOperator<R> {
    pub fn new(input: R) -> Self {
        LineOperator { input }
    }
}

impl<R: BufRead> Operator for LineOperator<R> {
    fn confirm_commit(&mut self) -> Result<(), ImportError> {
        print!("\nReady to import. Press ENTER to continue or Ctrl+C to cancel...");
        io::stdout().flush().map_err(ImportError::Prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(ImportError::Prompt)?;
        if read == 0 {
            return Err(ImportError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the import was confirmed",
            )));
        }
        Ok(())
    }
}

/// Spinner for a pending request, drawn on stderr. Hidden when stderr is
/// not a terminal.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn upload_lines(resp: &UploadResponse) -> Vec<String> {
    let mut lines = vec![format!("Upload OK: {}", resp.file_path)];
    if let Some(size) = resp.size {
        lines.push(format!("  Size: {:.2} KB", size as f64 / 1024.0));
    }
    lines
}

pub fn detection_lines(resp: &DetectResponse) -> Vec<String> {
    let config = resp.import_config();
    let first: Vec<&str> = resp.headers.iter().take(3).map(String::as_str).collect();
    vec![
        format!("Encoding: {}", config.encoding),
        format!("Delimiter: '{}'", config.delimiter),
        format!("Headers: {:?}...", first),
        format!("Total rows: ~{}", resp.total_rows),
    ]
}

pub fn validation_lines(resp: &ValidateResponse) -> Vec<String> {
    let mut lines = vec![
        format!("Valid rows: {}", resp.valid_rows),
        format!("Error rows: {}", resp.error_rows),
        format!("Warning rows: {}", resp.warning_rows),
    ];
    if let Some(stats) = &resp.stats {
        for (key, value) in stats {
            if REPORTED_STATS.contains(&key.as_str()) {
                continue;
            }
            // nested objects (e.g. preview) are not worth dumping
            match value {
                Value::String(text) => lines.push(format!("  {}: {}", key, text)),
                Value::Object(_) | Value::Array(_) | Value::Null => {}
                other => lines.push(format!("  {}: {}", key, other)),
            }
        }
    }
    if !resp.errors.is_empty() {
        lines.push(format!(
            "Errors found ({} of {}):",
            resp.errors.len().min(MAX_LISTED_ERRORS),
            resp.errors.len()
        ));
        for error in resp.errors.iter().take(MAX_LISTED_ERRORS) {
            let mut line = format!("  Line {}: {} - {}", error.row, error.field, error.message);
            if let Some(severity) = &error.severity {
                line.push_str(&format!(" ({})", severity));
            }
            lines.push(line);
        }
    }
    lines
}

pub fn job_lines(job: &CommitResponse) -> Vec<String> {
    let mut lines = vec![
        format!("Import job created: {}", job.job_id),
        format!("Import log ID: {}", job.import_log_id),
        format!("Status: {}", job.status),
    ];
    if !job.message.is_empty() {
        lines.push(job.message.clone());
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
