/// Ingestionハンドラー
///
/// 為替レートAPIから指定期間のレートを取得し、
/// 生データバケットにJSONオブジェクトとして1件保存する。
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::infrastructure::{
    IngestionConfig, ObjectStore, ObjectStoreError, PutRequest, RateApi, RateApiError,
};

/// 生データのContent-Type
const RAW_CONTENT_TYPE: &str = "application/json";

/// Ingestionハンドラーのエラー型
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 為替レートAPIの呼び出しに失敗
    #[error("Rate API error: {0}")]
    RateApi(#[from] RateApiError),

    /// レスポンスのシリアライズに失敗
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 保存に失敗
    #[error("Storage error: {0}")]
    Storage(#[from] ObjectStoreError),
}

/// Ingestionの実行結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionOutput {
    pub status: String,
    /// 保存したオブジェクトキー
    pub key: String,
    pub start_date: String,
    pub end_date: String,
    pub base: String,
}

/// 為替レートの取得と保存を行うハンドラー
pub struct IngestionHandler<A, S>
where
    A: RateApi,
    S: ObjectStore,
{
    rate_api: A,
    store: S,
    config: IngestionConfig,
}

impl<A, S> IngestionHandler<A, S>
where
    A: RateApi,
    S: ObjectStore,
{
    /// 新しいIngestionHandlerを作成
    pub fn new(rate_api: A, store: S, config: IngestionConfig) -> Self {
        Self {
            rate_api,
            store,
            config,
        }
    }

    /// 取得・保存を実行
    ///
    /// # 処理フロー
    /// 1. 為替レートAPIを呼び出し（再試行なし）
    /// 2. レスポンスJSONを決定的なキーで保存（メタデータ付き）
    /// 3. 保存キーとパラメータを返却
    pub async fn handle(&self) -> Result<IngestionOutput, IngestionError> {
        let config = &self.config;
        let metadata = config.metadata();

        let payload = self
            .rate_api
            .fetch_rates(config.start_date(), config.end_date(), config.base_currency())
            .await
            .inspect_err(|err| error!(error = %err, "為替レートの取得に失敗"))?;

        let body = serde_json::to_vec(&payload).map_err(|e| {
            error!(error = %e, "レスポンスのシリアライズに失敗");
            IngestionError::Serialization(e.to_string())
        })?;

        let key = metadata.raw_object_key();
        let request = PutRequest::new(key.clone(), body, RAW_CONTENT_TYPE).with_metadata(metadata.to_map());

        self.store
            .put_object(config.raw_bucket(), request)
            .await
            .inspect_err(|err| error!(error = %err, key = %key, "生データの保存に失敗"))?;

        info!(
            bucket = config.raw_bucket(),
            key = %key,
            "Ingestion成功"
        );

        Ok(IngestionOutput {
            status: "ok".to_string(),
            key,
            start_date: metadata.start_date,
            end_date: metadata.end_date,
            base: metadata.base_currency,
        })
    }
}
