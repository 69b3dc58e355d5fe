use crate::signal::Signal;
use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;

fn parse_lines<T>(text: &str, what: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val = trimmed
            .parse::<T>()
            .with_context(|| format!("line {} is not {}: {}", idx + 1, what, trimmed))?;
        out.push(val);
    }
    Ok(out)
}

/// Parse newline-delimited samples, ignoring blank and `#` comment lines.
pub fn parse_f64_series(text: &str) -> Result<Vec<f64>> {
    let out = parse_lines(text, "f64")?;
    if out.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(out)
}

pub fn read_f64_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_f64_series(&text).with_context(|| format!("in {}", path.display()))
}

/// Parse newline-delimited sample indices (annotations or detector output).
pub fn parse_indices(text: &str) -> Result<Vec<usize>> {
    let mut out: Vec<usize> = parse_lines(text, "an integer index")?;
    out.sort_unstable();
    Ok(out)
}

pub fn read_indices(path: &Path) -> Result<Vec<usize>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_indices(&text).with_context(|| format!("in {}", path.display()))
}

/// Load a text series as a validated [`Signal`].
pub fn read_signal(path: &Path, fs: f64) -> Result<Signal> {
    let data = read_f64_series(path)?;
    Signal::new(fs, data).with_context(|| format!("invalid signal in {}", path.display()))
}
