/// 設定読み込みの共通部品
///
/// 各ユニット（ingestion / transform / validation）の設定は
/// 起動時に一度だけ検証し、I/Oより前に不正値で失敗させる。
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::OutputFormatError;

/// LOG_LEVELのデフォルト値
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// 設定のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// 列挙値以外のOUTPUT_FORMAT
    #[error(transparent)]
    InvalidOutputFormat(#[from] OutputFormatError),

    /// 列挙値以外のLOG_LEVEL
    #[error("Invalid LOG_LEVEL: {0}")]
    InvalidLogLevel(String),

    /// YYYY-MM-DD形式でない日付
    #[error("Invalid date in {name}: {value}")]
    InvalidDate {
        /// 環境変数名
        name: String,
        /// 設定値
        value: String,
    },

    /// END_DATEがSTART_DATEより前
    #[error("END_DATE ({end}) is before START_DATE ({start})")]
    InvalidDateRange {
        start: String,
        end: String,
    },

    /// 不正なBASE_API_URL
    #[error("Invalid BASE_API_URL: {0}")]
    InvalidUrl(String),
}

/// ログレベル
///
/// Pythonの`logging`と同じ名前（WARNING / CRITICAL）も受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// EnvFilterに渡すディレクティブ
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "CRITICAL" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// プロセスの環境変数を読み取る
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// 必須の値を取得（未設定・空文字はエラー）
///
/// `lookup`は環境変数を読み取る関数。テストでは`HashMap`から値を返すクロージャを渡す。
pub fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    optional(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// 任意の値を取得（空文字は未設定扱い）
pub fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// LOG_LEVELを取得（未設定ならINFO）
pub fn log_level(lookup: &impl Fn(&str) -> Option<String>) -> Result<LogLevel, ConfigError> {
    match optional(lookup, "LOG_LEVEL") {
        Some(value) => value.parse(),
        None => Ok(DEFAULT_LOG_LEVEL),
    }
}
