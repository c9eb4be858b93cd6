use std::fs;
use std::path::Path;

use ta_core::{Candle, EngineError};

/// Load base candles from a `time,open,high,low,close,volume` CSV file.
/// A non-numeric first field on the first line is treated as a header.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>, EngineError> {
    let text = fs::read_to_string(path)
        .map_err(|e| EngineError::Parse(format!("{}: {e}", path.display())))?;
    parse_candles(&text)
}

pub fn parse_candles(text: &str) -> Result<Vec<Candle>, EngineError> {
    let mut candles = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if idx == 0 && fields.first().is_some_and(|f| f.parse::<i64>().is_err()) {
            continue; // header row
        }
        if fields.len() != 6 {
            return Err(EngineError::Parse(format!(
                "line {}: expected 6 fields, got {}",
                idx + 1,
                fields.len()
            )));
        }
        let num = |i: usize| -> Result<f64, EngineError> {
            fields[i].parse().map_err(|_| {
                EngineError::Parse(format!("line {}: bad number {:?}", idx + 1, fields[i]))
            })
        };
        candles.push(Candle {
            time: fields[0].parse().map_err(|_| {
                EngineError::Parse(format!("line {}: bad timestamp {:?}", idx + 1, fields[0]))
            })?,
            open: num(1)?,
            high: num(2)?,
            low: num(3)?,
            close: num(4)?,
            volume: num(5)?,
        });
    }
    Ok(candles)
}
