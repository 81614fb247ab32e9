/// Output encoding of processed artifacts
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutputFormatError {
    #[error("OUTPUT_FORMAT must be either 'csv' or 'parquet' (got '{0}')")]
    Unsupported(String),
}

/// Tabular encoding written to the processed bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Row-oriented text with a header row
    Csv,
    /// Columnar binary
    Parquet,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// Content-Type used when writing the artifact
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Parquet => "application/x-parquet",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputFormatError;

    /// Case-insensitive parse; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(OutputFormatError::Unsupported(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
