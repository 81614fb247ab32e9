/// Transformジョブ
///
/// 生データバケットの為替レートJSONを行形式に展開し、
/// CSVまたはParquetで加工済みバケットに書き込む。
/// Lambda関数としても、ローカル/バッチジョブとしても実行可能。
///
/// # 設定（引数が環境変数より優先）
/// - --raw-bucket / RAW_BUCKET（必須）
/// - --processed-bucket / PROCESSED_BUCKET（必須）
/// - --output-format / OUTPUT_FORMAT（必須、csv または parquet）
/// - --log-level / LOG_LEVEL（任意、デフォルトINFO）
///
/// Glueジョブ形式の大文字引数（--RAW_BUCKET など）も受け付ける。
///
/// # ローカル実行
/// ```bash
/// cargo run --bin transform -- --raw-bucket fx-raw --processed-bucket fx-processed --output-format parquet
/// ```
use clap::Parser;
use fx_pipeline::application::{TransformHandler, TransformSummary};
use fx_pipeline::infrastructure::{LogLevel, S3ObjectStore, TransformConfig, init_logging};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "transform")]
#[command(about = "為替レートJSONをCSV/Parquetに変換")]
struct CliArgs {
    /// 入力（生データ）バケット
    #[arg(long, env = "RAW_BUCKET", alias = "RAW_BUCKET")]
    raw_bucket: String,

    /// 出力（加工済み）バケット
    #[arg(long, env = "PROCESSED_BUCKET", alias = "PROCESSED_BUCKET")]
    processed_bucket: String,

    /// 出力形式（csv / parquet、大文字小文字を区別しない）
    #[arg(long, env = "OUTPUT_FORMAT", alias = "OUTPUT_FORMAT")]
    output_format: String,

    /// ログレベル
    #[arg(long, env = "LOG_LEVEL", alias = "LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = CliArgs::parse();

    // 設定を検証（I/Oより前に失敗させる）
    let config = match TransformConfig::new(
        &args.raw_bucket,
        &args.processed_bucket,
        &args.output_format,
        args.log_level.as_deref(),
    ) {
        Ok(config) => config,
        Err(err) => {
            init_logging(LogLevel::Info);
            error!(error = %err, "Transform設定読み込み失敗");
            return Err(err.into());
        }
    };

    // 構造化ログを初期化
    init_logging(config.log_level());

    let store = S3ObjectStore::from_config().await;
    let transform = TransformHandler::new(store, config);

    // Lambda環境かどうかを判定
    if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        info!("Lambda関数として起動");
        lambda_runtime::run(service_fn(|event| handler(event, &transform))).await?;
    } else {
        info!("バッチジョブとして起動");
        run_once(&transform).await?;
    }

    Ok(())
}

/// Lambda関数のメインハンドラー（イベントペイロードは使用しない）
async fn handler(
    _event: LambdaEvent<Value>,
    transform: &TransformHandler<S3ObjectStore>,
) -> Result<TransformSummary, Error> {
    run_once(transform).await
}

/// ジョブを1回実行
async fn run_once(transform: &TransformHandler<S3ObjectStore>) -> Result<TransformSummary, Error> {
    match transform.run().await {
        Ok(summary) => {
            info!(
                format = %summary.format,
                processed_count = summary.processed.len(),
                "ETLジョブ成功"
            );
            Ok(summary)
        }
        Err(err) => {
            error!(error = %err, "ETLジョブ失敗");
            Err(err.into())
        }
    }
}
