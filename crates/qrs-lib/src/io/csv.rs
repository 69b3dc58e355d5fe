use crate::signal::Signal;
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read one numeric column, selected by header name, from a delimited file.
pub fn read_column(path: &Path, column: &str, delimiter: u8) -> Result<Vec<f64>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_column(file, column, delimiter).with_context(|| format!("in {}", path.display()))
}

pub fn parse_column<R: Read>(reader: R, column: &str, delimiter: u8) -> Result<Vec<f64>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("reading header")?.clone();
    let idx = locate_column(&headers, column)?;

    let mut out = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.context("reading record")?;
        let value = record
            .get(idx)
            .ok_or_else(|| anyhow!("row {} has no {} field", row + 1, column))?
            .parse::<f64>()
            .with_context(|| format!("row {}: {} is not numeric", row + 1, column))?;
        out.push(value);
    }
    if out.is_empty() {
        anyhow::bail!("column {} has no rows", column);
    }
    Ok(out)
}

pub fn read_signal(path: &Path, column: &str, delimiter: u8, fs: f64) -> Result<Signal> {
    let data = read_column(path, column, delimiter)?;
    Signal::new(fs, data).with_context(|| format!("invalid signal in {}", path.display()))
}

fn locate_column(headers: &StringRecord, requested: &str) -> Result<usize> {
    headers
        .iter()
        .position(|name| name.trim_matches('\'').eq_ignore_ascii_case(requested))
        .ok_or_else(|| anyhow!("missing column {}", requested))
}
