/// Transformジョブ設定
///
/// 入力バケット・出力バケット・出力形式を保持する。
/// 値はコマンドライン引数（環境変数フォールバック）から渡される。
use super::config::{ConfigError, LogLevel, DEFAULT_LOG_LEVEL};
use crate::domain::OutputFormat;

/// Transformジョブ設定
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    raw_bucket: String,
    processed_bucket: String,
    output_format: OutputFormat,
    log_level: LogLevel,
}

impl TransformConfig {
    /// 文字列の設定値を検証して設定を作成
    ///
    /// # エラー
    /// - バケット名が空: `MissingEnvVar`
    /// - OUTPUT_FORMATがcsv/parquet以外: `InvalidOutputFormat`
    /// - LOG_LEVELが不正: `InvalidLogLevel`
    pub fn new(
        raw_bucket: &str,
        processed_bucket: &str,
        output_format: &str,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let raw_bucket = non_empty("RAW_BUCKET", raw_bucket)?;
        let processed_bucket = non_empty("PROCESSED_BUCKET", processed_bucket)?;
        let output_format = output_format.parse::<OutputFormat>()?;
        let log_level = match log_level.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value.parse::<LogLevel>()?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Self {
            raw_bucket,
            processed_bucket,
            output_format,
            log_level,
        })
    }

    /// 入力（生データ）バケット名を取得
    pub fn raw_bucket(&self) -> &str {
        &self.raw_bucket
    }

    /// 出力（加工済み）バケット名を取得
    pub fn processed_bucket(&self) -> &str {
        &self.processed_bucket
    }

    /// 出力形式を取得
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// ログレベルを取得
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}

fn non_empty(name: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingEnvVar(name.to_string()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutputFormatError;

    #[test]
    fn test_new_success() {
        let config = TransformConfig::new("fx-raw", "fx-processed", "PARQUET", None).unwrap();

        assert_eq!(config.raw_bucket(), "fx-raw");
        assert_eq!(config.processed_bucket(), "fx-processed");
        assert_eq!(config.output_format(), OutputFormat::Parquet);
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_new_with_log_level() {
        let config = TransformConfig::new("fx-raw", "fx-processed", "csv", Some("DEBUG")).unwrap();

        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_new_rejects_unknown_format() {
        let result = TransformConfig::new("fx-raw", "fx-processed", "xml", None);

        assert_eq!(
            result,
            Err(ConfigError::InvalidOutputFormat(OutputFormatError::Unsupported(
                "xml".to_string()
            )))
        );
    }

    #[test]
    fn test_new_rejects_empty_bucket() {
        let result = TransformConfig::new("", "fx-processed", "csv", None);

        assert_eq!(result, Err(ConfigError::MissingEnvVar("RAW_BUCKET".to_string())));
    }

    #[test]
    fn test_new_rejects_unknown_log_level() {
        let result = TransformConfig::new("fx-raw", "fx-processed", "csv", Some("chatty"));

        assert!(matches!(result, Err(ConfigError::InvalidLogLevel(_))));
    }
}
