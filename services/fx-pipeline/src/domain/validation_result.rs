/// Query result validation outcome
///
/// A result set always carries a header row, so data rows are `total - 1`.
/// "SUCCEEDED" here means the result was non-empty.
use serde::{Deserialize, Serialize};

/// Name of the metric published for every validation
pub const EMPTY_RESULTS_METRIC: &str = "EmptyQueryResults";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Data rows, header excluded
    pub rows: u64,
    pub is_empty: bool,
    pub status: ValidationStatus,
}

impl ValidationResult {
    /// Build from the total row count of a result set (header included)
    pub fn from_total_rows(total_rows: u64) -> Self {
        let rows = total_rows.saturating_sub(1);
        let is_empty = rows == 0;

        Self {
            rows,
            is_empty,
            status: if is_empty {
                ValidationStatus::Failed
            } else {
                ValidationStatus::Succeeded
            },
        }
    }

    /// Value of the `EmptyQueryResults` metric
    pub fn metric_value(&self) -> f64 {
        if self.is_empty { 1.0 } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_is_empty() {
        let result = ValidationResult::from_total_rows(1);

        assert_eq!(result.rows, 0);
        assert!(result.is_empty);
        assert_eq!(result.status, ValidationStatus::Failed);
        assert_eq!(result.metric_value(), 1.0);
    }

    #[test]
    fn test_header_plus_three_rows() {
        let result = ValidationResult::from_total_rows(4);

        assert_eq!(result.rows, 3);
        assert!(!result.is_empty);
        assert_eq!(result.status, ValidationStatus::Succeeded);
        assert_eq!(result.metric_value(), 0.0);
    }

    #[test]
    fn test_no_rows_at_all_does_not_underflow() {
        let result = ValidationResult::from_total_rows(0);

        assert_eq!(result.rows, 0);
        assert!(result.is_empty);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(ValidationResult::from_total_rows(4)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"rows": 3, "is_empty": false, "status": "SUCCEEDED"})
        );
    }
}
