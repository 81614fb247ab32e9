//! Processed artifact encoding (CSV / Parquet)
//!
//! Row construction is format-independent; only the final byte encoding differs.

use polars::prelude::{Column, DataFrame, ParquetWriter};
use thiserror::Error;

use crate::domain::{OutputFormat, RateRow};

/// Column names, in output order
pub const COLUMNS: [&str; 4] = ["base_currency", "target_currency", "rate", "date"];

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("CSV encoding error: {0}")]
    Csv(String),

    #[error("Parquet encoding error: {0}")]
    Parquet(String),
}

/// Encode rows in the requested format
pub fn encode_rows(rows: &[RateRow], format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Csv => encode_csv(rows),
        OutputFormat::Parquet => encode_parquet(rows),
    }
}

/// CSV with a header row, even when there are no rows
fn encode_csv(rows: &[RateRow]) -> Result<Vec<u8>, EncodeError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(COLUMNS)
        .map_err(|e| EncodeError::Csv(e.to_string()))?;

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| EncodeError::Csv(e.to_string()))?;
    }

    wtr.into_inner()
        .map_err(|e| EncodeError::Csv(e.to_string()))
}

/// Build the tabular frame for rows
fn rows_to_dataframe(rows: &[RateRow]) -> Result<DataFrame, EncodeError> {
    let base: Vec<&str> = rows.iter().map(|r| r.base_currency.as_str()).collect();
    let target: Vec<&str> = rows.iter().map(|r| r.target_currency.as_str()).collect();
    let rate: Vec<f64> = rows.iter().map(|r| r.rate).collect();
    let date: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();

    DataFrame::new(vec![
        Column::new(COLUMNS[0].into(), base),
        Column::new(COLUMNS[1].into(), target),
        Column::new(COLUMNS[2].into(), rate),
        Column::new(COLUMNS[3].into(), date),
    ])
    .map_err(|e| EncodeError::Parquet(format!("dataframe creation: {e}")))
}

fn encode_parquet(rows: &[RateRow]) -> Result<Vec<u8>, EncodeError> {
    let mut df = rows_to_dataframe(rows)?;
    let mut buffer = Vec::new();

    ParquetWriter::new(&mut buffer)
        .finish(&mut df)
        .map_err(|e| EncodeError::Parquet(format!("write parquet: {e}")))?;

    Ok(buffer)
}
