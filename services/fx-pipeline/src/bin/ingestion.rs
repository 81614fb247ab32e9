/// Ingestion Lambda関数
///
/// 為替レートAPIから設定期間のレートを取得し、生データバケットに保存する。
/// 設定は起動時に環境変数から読み込み、不正な場合はI/Oの前に失敗する。
///
/// # 環境変数
/// - RAW_BUCKET, START_DATE, END_DATE, BASE_CURRENCY, BASE_API_URL（必須）
/// - LOG_LEVEL（任意、デフォルトINFO）
use fx_pipeline::application::{IngestionHandler, IngestionOutput};
use fx_pipeline::infrastructure::{
    IngestionConfig, LogLevel, RateApiClient, S3ObjectStore, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 設定を環境変数から読み込み（I/Oより前に検証）
    let config = match IngestionConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            init_logging(LogLevel::Info);
            error!(error = %err, "Ingestion設定読み込み失敗");
            return Err(err.into());
        }
    };

    // 構造化ログを初期化
    init_logging(config.log_level());

    info!(
        raw_bucket = config.raw_bucket(),
        start_date = %config.start_date(),
        end_date = %config.end_date(),
        base_currency = config.base_currency(),
        "Ingestion設定を読み込み"
    );

    let rate_api = RateApiClient::new(config.base_api_url())?;
    let store = S3ObjectStore::from_config().await;
    let ingestion = IngestionHandler::new(rate_api, store, config);

    // Lambda関数を初期化して実行
    lambda_runtime::run(service_fn(|event| handler(event, &ingestion))).await
}

/// Lambda関数のメインハンドラー
///
/// イベントペイロードは使用しない（取得条件は環境変数で固定）。
async fn handler(
    _event: LambdaEvent<Value>,
    ingestion: &IngestionHandler<RateApiClient, S3ObjectStore>,
) -> Result<IngestionOutput, Error> {
    match ingestion.handle().await {
        Ok(output) => Ok(output),
        Err(err) => {
            error!(error = %err, "Ingestion失敗");
            Err(err.into())
        }
    }
}
