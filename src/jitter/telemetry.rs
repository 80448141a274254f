//! Sun-center pointing telemetry.
//!
//! One `.suncentre` file per observation date, whitespace-delimited rows of
//! `date x dx y dy r dr` sorted by timestamp. Offsets are anchored so the
//! first sample maps to (0, 0) and times are seconds since the first row.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::jitter::interp::{InterpolationError, LinearSeries};

/// Errors raised while locating or reading telemetry.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("cannot read telemetry directory {dir}: {source}")]
    DirRead {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("no telemetry file found for date '{date}' in {dir}")]
    NoMatch { dir: PathBuf, date: String },
    #[error("{count} telemetry files match date '{date}' in {dir}; refusing to guess")]
    MultipleMatches {
        dir: PathBuf,
        date: String,
        count: usize,
    },
    #[error("cannot read telemetry file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("telemetry parse error at {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("telemetry series is unusable: {0}")]
    Series(#[from] InterpolationError),
}

/// Locate the telemetry file for an observation date.
///
/// Scans `dir` for `.suncentre` files whose name contains `date`. Exactly
/// one match is required; zero or several matches abort the run.
pub fn find_telemetry_file(dir: &Path, date: &str) -> Result<PathBuf, TelemetryError> {
    let entries = fs::read_dir(dir).map_err(|source| TelemetryError::DirRead {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "suncentre")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.contains(date))
        })
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(TelemetryError::NoMatch {
            dir: dir.to_path_buf(),
            date: date.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(TelemetryError::MultipleMatches {
            dir: dir.to_path_buf(),
            date: date.to_string(),
            count,
        }),
    }
}

/// Parsed and anchored sun-center series: interpolable x(t) and y(t) with
/// x(0) = y(0) = 0 at the first sample.
#[derive(Debug, Clone)]
pub struct SunCenterSeries {
    x: LinearSeries,
    y: LinearSeries,
    span_s: f64,
}

impl SunCenterSeries {
    /// Read and parse a telemetry file.
    pub fn from_path(path: &Path) -> Result<Self, TelemetryError> {
        let text = fs::read_to_string(path).map_err(|source| TelemetryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse telemetry rows; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, TelemetryError> {
        let mut times = Vec::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (timestamp, x, y) = parse_row(trimmed).map_err(|reason| TelemetryError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })?;
            times.push(timestamp);
            xs.push(x);
            ys.push(y);
        }

        if times.len() < 2 {
            return Err(TelemetryError::Series(InterpolationError::TooFewPoints(
                times.len(),
            )));
        }

        // Anchor offsets and clock to the first sample
        let t0 = times[0];
        let (x0, y0) = (xs[0], ys[0]);
        let seconds: Vec<f64> = times.iter().map(|t| seconds_since(t0, *t)).collect();
        let xs: Vec<f64> = xs.iter().map(|x| x - x0).collect();
        let ys: Vec<f64> = ys.iter().map(|y| y - y0).collect();

        let span_s = seconds[seconds.len() - 1];
        let x = LinearSeries::new(seconds.clone(), xs)?;
        let y = LinearSeries::new(seconds, ys)?;
        Ok(Self { x, y, span_s })
    }

    /// Length of the sampled span in seconds.
    pub fn span_s(&self) -> f64 {
        self.span_s
    }

    /// Number of telemetry samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Interpolated `(x, y)` sun-center offset at `t` seconds after the
    /// first sample. Out-of-span times are an error.
    pub fn offset_at(&self, t_s: f64) -> Result<(f64, f64), InterpolationError> {
        Ok((self.x.sample(t_s)?, self.y.sample(t_s)?))
    }
}

/// Parse one `date x dx y dy r dr` row into (timestamp, x, y).
fn parse_row(row: &str) -> Result<(NaiveDateTime, f64, f64), String> {
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() != 7 {
        return Err(format!("expected 7 columns, found {}", fields.len()));
    }

    let timestamp = parse_timestamp(fields[0])?;
    let x: f64 = fields[1]
        .parse()
        .map_err(|_| format!("invalid x value '{}'", fields[1]))?;
    let y: f64 = fields[3]
        .parse()
        .map_err(|_| format!("invalid y value '{}'", fields[3]))?;
    // Columns dx, dy, r, dr are carried in the file but unused here; they
    // still have to parse so schema drift is caught early.
    for (name, field) in [("dx", fields[2]), ("dy", fields[4]), ("r", fields[5]), ("dr", fields[6])]
    {
        field
            .parse::<f64>()
            .map_err(|_| format!("invalid {name} value '{field}'"))?;
    }
    Ok((timestamp, x, y))
}

fn parse_timestamp(field: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.fZ"];
    for format in FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(field, format) {
            return Ok(t);
        }
    }
    Err(format!("invalid timestamp '{field}'"))
}

fn seconds_since(t0: NaiveDateTime, t: NaiveDateTime) -> f64 {
    let delta = t.signed_duration_since(t0);
    delta
        .num_microseconds()
        .map(|us| us as f64 * 1e-6)
        .unwrap_or_else(|| delta.num_seconds() as f64)
}
