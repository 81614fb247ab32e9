/// Ingestion Lambda設定
///
/// 為替レートAPIの呼び出しパラメータと保存先バケットを環境変数から読み込む。
use chrono::NaiveDate;
use url::Url;

use super::config::{self, ConfigError, LogLevel};
use crate::domain::RateMetadata;

/// Ingestion Lambda設定
///
/// 以下の環境変数から読み込む:
/// - RAW_BUCKET: 生データ保存先バケット
/// - START_DATE / END_DATE: 取得期間（YYYY-MM-DD）
/// - BASE_CURRENCY: 基準通貨コード
/// - BASE_API_URL: 為替レートAPIのベースURL
/// - LOG_LEVEL: ログレベル（任意、デフォルトINFO）
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionConfig {
    raw_bucket: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    base_currency: String,
    base_api_url: String,
    log_level: LogLevel,
}

impl IngestionConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(config::process_env)
    }

    /// 任意のルックアップ関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_bucket = config::required(&lookup, "RAW_BUCKET")?;
        let start_date = parse_date("START_DATE", &config::required(&lookup, "START_DATE")?)?;
        let end_date = parse_date("END_DATE", &config::required(&lookup, "END_DATE")?)?;
        let base_currency = config::required(&lookup, "BASE_CURRENCY")?;
        let base_api_url = config::required(&lookup, "BASE_API_URL")?;
        let log_level = config::log_level(&lookup)?;

        if end_date < start_date {
            return Err(ConfigError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        validate_api_url(&base_api_url)?;

        Ok(Self {
            raw_bucket,
            start_date,
            end_date,
            base_currency,
            base_api_url,
            log_level,
        })
    }

    /// 生データ保存先バケット名を取得
    pub fn raw_bucket(&self) -> &str {
        &self.raw_bucket
    }

    /// 取得開始日を取得
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// 取得終了日を取得
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// 基準通貨コードを取得
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// 為替レートAPIのベースURLを取得
    pub fn base_api_url(&self) -> &str {
        &self.base_api_url
    }

    /// ログレベルを取得
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// 保存するオブジェクトのメタデータ
    pub fn metadata(&self) -> RateMetadata {
        RateMetadata::new(
            self.base_currency.clone(),
            self.start_date.to_string(),
            self.end_date.to_string(),
        )
    }
}

/// YYYY-MM-DD形式の日付を解析する
///
/// オブジェクトキーに元の文字列がそのまま現れるよう、ゼロ埋めされていない値（2024-1-5など）は拒否する。
fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    let invalid = || ConfigError::InvalidDate {
        name: name.to_string(),
        value: value.to_string(),
    };

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    if date.format("%Y-%m-%d").to_string() != value {
        return Err(invalid());
    }
    Ok(date)
}

fn validate_api_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            value, scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::tests::lookup_from;
    use serial_test::serial;

    const VALID: &[(&str, &str)] = &[
        ("RAW_BUCKET", "fx-raw"),
        ("START_DATE", "2024-01-01"),
        ("END_DATE", "2024-01-31"),
        ("BASE_CURRENCY", "USD"),
        ("BASE_API_URL", "https://api.frankfurter.app"),
    ];

    fn with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs: Vec<(&str, &str)> = VALID
            .iter()
            .filter(|(k, _)| !overrides.iter().any(|(o, _)| o == k))
            .copied()
            .collect();
        pairs.extend(overrides.iter().filter(|(_, v)| !v.is_empty()).copied());
        pairs
    }

    #[test]
    fn test_from_lookup_success() {
        let config = IngestionConfig::from_lookup(lookup_from(VALID)).unwrap();

        assert_eq!(config.raw_bucket(), "fx-raw");
        assert_eq!(config.start_date().to_string(), "2024-01-01");
        assert_eq!(config.end_date().to_string(), "2024-01-31");
        assert_eq!(config.base_currency(), "USD");
        assert_eq!(config.base_api_url(), "https://api.frankfurter.app");
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_metadata() {
        let config = IngestionConfig::from_lookup(lookup_from(VALID)).unwrap();

        assert_eq!(
            config.metadata().raw_object_key(),
            "exchange_rates_USD_2024-01-01_to_2024-01-31.json"
        );
    }

    #[test]
    fn test_each_required_variable_is_checked() {
        for name in ["RAW_BUCKET", "START_DATE", "END_DATE", "BASE_CURRENCY", "BASE_API_URL"] {
            let pairs: Vec<(&str, &str)> = VALID.iter().filter(|(k, _)| *k != name).copied().collect();

            let result = IngestionConfig::from_lookup(lookup_from(&pairs));

            assert_eq!(result, Err(ConfigError::MissingEnvVar(name.to_string())));
        }
    }

    #[test]
    fn test_invalid_date() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("START_DATE", "2024/01/01")])));

        assert_eq!(
            result,
            Err(ConfigError::InvalidDate {
                name: "START_DATE".to_string(),
                value: "2024/01/01".to_string(),
            })
        );
    }

    #[test]
    fn test_unpadded_date_is_rejected() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("START_DATE", "2024-1-5")])));

        assert_eq!(
            result,
            Err(ConfigError::InvalidDate {
                name: "START_DATE".to_string(),
                value: "2024-1-5".to_string(),
            })
        );
    }

    #[test]
    fn test_end_before_start() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("END_DATE", "2023-12-31")])));

        assert!(matches!(result, Err(ConfigError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_same_start_and_end_is_allowed() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("END_DATE", "2024-01-01")])));

        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("BASE_API_URL", "not a url")])));
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));

        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("BASE_API_URL", "ftp://example.com")])));
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_log_level() {
        let result = IngestionConfig::from_lookup(lookup_from(&with(&[("LOG_LEVEL", "LOUD")])));

        assert_eq!(result, Err(ConfigError::InvalidLogLevel("LOUD".to_string())));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // 環境変数を設定 (Rust 2024ではunsafe)
        unsafe {
            for (key, value) in VALID {
                std::env::set_var(key, value);
            }
            std::env::set_var("LOG_LEVEL", "debug");
        }

        let config = IngestionConfig::from_env().expect("設定の読み込みに失敗");

        assert_eq!(config.raw_bucket(), "fx-raw");
        assert_eq!(config.log_level(), LogLevel::Debug);

        // クリーンアップ
        unsafe {
            for (key, _) in VALID {
                std::env::remove_var(key);
            }
            std::env::remove_var("LOG_LEVEL");
        }
    }
}
