// RateApiClient - 為替レートAPIクライアント
//
// `{BASE_API_URL}/{START}..{END}?base={BASE}`を1回だけ呼び出す。
// 失敗時の再試行は行わず、呼び出し元（オーケストレーター）に委ねる。

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 為替レートAPIのエラー型
#[derive(Debug, Error)]
pub enum RateApiError {
    /// HTTPエラー（ステータスコード付き）
    #[error("HTTPエラー: status={status}, message={message}")]
    HttpError {
        /// HTTPステータスコード
        status: u16,
        /// レスポンスボディ
        message: String,
    },

    /// ネットワークエラー（タイムアウト含む）
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// レスポンスがJSONでない
    #[error("レスポンスのデコードに失敗: {0}")]
    DecodeError(String),

    /// HTTPクライアントの構築に失敗
    #[error("HTTPクライアントの構築に失敗: {0}")]
    ClientBuildError(String),
}

/// 為替レート取得トレイト（テスト用の抽象化）
#[async_trait]
pub trait RateApi: Send + Sync {
    /// 期間と基準通貨を指定してレートを取得する
    ///
    /// # 戻り値
    /// * `Ok(Value)` - APIが返したJSON（加工しない）
    /// * `Err(RateApiError)` - エラー
    async fn fetch_rates(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        base_currency: &str,
    ) -> Result<Value, RateApiError>;
}

/// reqwestを使用した為替レートAPIクライアント
#[derive(Debug, Clone)]
pub struct RateApiClient {
    client: Client,
    base_url: String,
}

impl RateApiClient {
    /// ベースURLからクライアントを作成
    pub fn new(base_url: impl Into<String>) -> Result<Self, RateApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RateApiError::ClientBuildError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// 期間指定エンドポイントURLを構築
    fn range_url(&self, start_date: NaiveDate, end_date: NaiveDate) -> String {
        format!(
            "{}/{}..{}",
            self.base_url.trim_end_matches('/'),
            start_date,
            end_date
        )
    }
}

#[async_trait]
impl RateApi for RateApiClient {
    #[instrument(skip(self))]
    async fn fetch_rates(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        base_currency: &str,
    ) -> Result<Value, RateApiError> {
        let url = self.range_url(start_date, end_date);
        debug!(url = %url, "為替レートAPIを呼び出し");

        let response = self
            .client
            .get(&url)
            .query(&[("base", base_currency)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "為替レートAPIリクエスト失敗");
                RateApiError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "為替レートAPIエラーレスポンス");
            return Err(RateApiError::HttpError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload = response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "為替レートAPIレスポンスのデコードに失敗");
            RateApiError::DecodeError(e.to_string())
        })?;

        debug!("為替レートの取得に成功");
        Ok(payload)
    }
}
