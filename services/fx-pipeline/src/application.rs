// アプリケーション層モジュール
pub mod ingestion_handler;
pub mod transform_handler;
pub mod validation_handler;

// 再エクスポート
pub use ingestion_handler::{IngestionError, IngestionHandler, IngestionOutput};
pub use transform_handler::{ProcessedObject, TransformError, TransformHandler, TransformSummary};
pub use validation_handler::{ValidationError, ValidationHandler};
