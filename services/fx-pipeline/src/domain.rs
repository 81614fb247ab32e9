// Domain layer modules
pub mod object_key;
pub mod output_format;
pub mod rate_document;
pub mod validation_result;

// Re-exports
pub use object_key::{RateMetadata, is_raw_object_key, output_name, processed_object_key};
pub use output_format::{OutputFormat, OutputFormatError};
pub use rate_document::{RateDocument, RateDocumentError, RateRow};
pub use validation_result::{EMPTY_RESULTS_METRIC, ValidationResult, ValidationStatus};
