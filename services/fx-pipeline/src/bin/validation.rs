/// Validation Lambda関数
///
/// 完了済みクエリ（QueryExecutionId）の結果行数を検証し、
/// EmptyQueryResultsメトリクスを発行する。
///
/// # 環境変数
/// - METRIC_NAMESPACE（必須）
/// - PIPELINE（任意、Pipelineディメンション）
/// - LOG_LEVEL（任意、デフォルトINFO）
///
/// # 入力イベント
/// `{"QueryExecutionId": "..."}`
use fx_pipeline::application::ValidationHandler;
use fx_pipeline::domain::ValidationResult;
use fx_pipeline::infrastructure::{
    AthenaQueryOps, CloudWatchMetricsOps, LogLevel, ValidationConfig, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 設定を環境変数から読み込み（I/Oより前に検証）
    let config = match ValidationConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            init_logging(LogLevel::Info);
            error!(error = %err, "Validation設定読み込み失敗");
            return Err(err.into());
        }
    };

    // 構造化ログを初期化
    init_logging(config.log_level());

    info!(
        metric_namespace = config.metric_namespace(),
        pipeline = ?config.pipeline(),
        "Validation設定を読み込み"
    );

    // クライアントは起動時に1回だけ作成し、呼び出し間で再利用する
    let query_ops = AthenaQueryOps::from_config().await;
    let metrics_ops = CloudWatchMetricsOps::from_config().await;
    let validation = ValidationHandler::new(query_ops, metrics_ops, config);

    // Lambda関数を初期化して実行
    lambda_runtime::run(service_fn(|event| handler(event, &validation))).await
}

/// Lambda関数のメインハンドラー
async fn handler(
    event: LambdaEvent<Value>,
    validation: &ValidationHandler<AthenaQueryOps, CloudWatchMetricsOps>,
) -> Result<ValidationResult, Error> {
    match validation.handle(&event.payload).await {
        Ok(result) => {
            info!(
                rows = result.rows,
                is_empty = result.is_empty,
                status = ?result.status,
                "Validation完了"
            );
            Ok(result)
        }
        Err(err) => {
            error!(error = %err, "Validation失敗");
            Err(err.into())
        }
    }
}
