// Infrastructure layer modules
pub mod config;
pub mod ingestion_config;
pub mod logging;
pub mod metrics_ops;
pub mod object_store;
pub mod query_ops;
pub mod rate_api_client;
pub mod tabular_encoder;
pub mod transform_config;
pub mod validation_config;

// Re-exports
pub use config::{ConfigError, LogLevel};
pub use ingestion_config::IngestionConfig;
pub use logging::init_logging;
pub use metrics_ops::{CloudWatchMetricsOps, CountMetric, MetricsOps, MetricsOpsError};
pub use object_store::{ObjectStore, ObjectStoreError, PutRequest, S3ObjectStore, StoredObject};
pub use query_ops::{AthenaQueryOps, QueryExecutionInfo, QueryOps, QueryOpsError};
pub use rate_api_client::{RateApi, RateApiClient, RateApiError};
pub use tabular_encoder::{EncodeError, encode_rows};
pub use transform_config::TransformConfig;
pub use validation_config::ValidationConfig;
