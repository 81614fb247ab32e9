/// Validation Lambda設定
///
/// メトリクスの名前空間とディメンションを環境変数から読み込む。
use super::config::{self, ConfigError, LogLevel};

/// Validation Lambda設定
///
/// 以下の環境変数から読み込む:
/// - METRIC_NAMESPACE: CloudWatchメトリクスの名前空間（必須）
/// - PIPELINE: パイプライン名ディメンション（任意）
/// - LOG_LEVEL: ログレベル（任意、デフォルトINFO）
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    metric_namespace: String,
    pipeline: Option<String>,
    log_level: LogLevel,
}

impl ValidationConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(config::process_env)
    }

    /// 任意のルックアップ関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            metric_namespace: config::required(&lookup, "METRIC_NAMESPACE")?,
            pipeline: config::optional(&lookup, "PIPELINE"),
            log_level: config::log_level(&lookup)?,
        })
    }

    /// 明示的な値で設定を作成（テスト用）
    pub fn new(metric_namespace: impl Into<String>, pipeline: Option<String>) -> Self {
        Self {
            metric_namespace: metric_namespace.into(),
            pipeline,
            log_level: config::DEFAULT_LOG_LEVEL,
        }
    }

    /// メトリクスの名前空間を取得
    pub fn metric_namespace(&self) -> &str {
        &self.metric_namespace
    }

    /// パイプライン名を取得
    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    /// ログレベルを取得
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}
