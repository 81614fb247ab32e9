/// Transformハンドラー
///
/// 生データバケットのJSONオブジェクトを全件読み込み、
/// (日付, 通貨)ごとの行に展開してCSV / Parquetで加工済みバケットに書き込む。
/// 1件でも失敗したらジョブ全体を失敗させる（部分成功なし）。
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::{
    OutputFormat, RateDocument, RateDocumentError, RateMetadata, is_raw_object_key, output_name,
    processed_object_key,
};
use crate::infrastructure::{
    EncodeError, ObjectStore, ObjectStoreError, PutRequest, TransformConfig, encode_rows,
};

/// Transformハンドラーのエラー型
#[derive(Debug, Error)]
pub enum TransformError {
    /// 一覧取得・読み取り・書き込みに失敗
    #[error("Storage error: {0}")]
    Storage(#[from] ObjectStoreError),

    /// 生データのパースに失敗
    #[error("{key}: {source}")]
    Document {
        key: String,
        #[source]
        source: RateDocumentError,
    },

    /// 出力形式へのエンコードに失敗
    #[error("{key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: EncodeError,
    },
}

/// 1オブジェクト分の変換結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedObject {
    pub source_key: String,
    pub output_key: String,
    pub row_count: usize,
}

/// Transformジョブの実行結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformSummary {
    /// 出力形式（csv / parquet）
    pub format: String,
    pub processed: Vec<ProcessedObject>,
}

/// 生データを加工済みデータに変換するハンドラー
pub struct TransformHandler<S>
where
    S: ObjectStore,
{
    store: S,
    config: TransformConfig,
}

impl<S> TransformHandler<S>
where
    S: ObjectStore,
{
    /// 新しいTransformHandlerを作成
    pub fn new(store: S, config: TransformConfig) -> Self {
        Self { store, config }
    }

    /// ジョブを実行
    ///
    /// # 処理フロー
    /// 1. 生データバケットの一覧を全ページ取得し、`.json`のキーを抽出
    /// 2. 各キーを順番に変換・書き込み
    /// 3. 最初の失敗でエラーを返す
    pub async fn run(&self) -> Result<TransformSummary, TransformError> {
        let format = self.config.output_format();

        info!(
            raw_bucket = self.config.raw_bucket(),
            processed_bucket = self.config.processed_bucket(),
            format = %format,
            "Transformジョブ開始"
        );

        let keys: Vec<String> = self
            .store
            .list_keys(self.config.raw_bucket())
            .await
            .inspect_err(|err| error!(error = %err, "生データの一覧取得に失敗"))?
            .into_iter()
            .filter(|key| is_raw_object_key(key))
            .collect();

        info!(file_count = keys.len(), "変換対象のJSONファイルを検出");

        let mut processed = Vec::with_capacity(keys.len());
        for key in &keys {
            let result = self
                .process_key(key, format)
                .await
                .inspect_err(|err| error!(key = %key, error = %err, "オブジェクトの変換に失敗"))?;
            processed.push(result);
        }

        info!(processed_count = processed.len(), "Transformジョブ完了");

        Ok(TransformSummary {
            format: format.to_string(),
            processed,
        })
    }

    /// 1オブジェクトを変換して書き込む
    #[instrument(skip(self, format))]
    async fn process_key(&self, key: &str, format: OutputFormat) -> Result<ProcessedObject, TransformError> {
        let object = self.store.get_object(self.config.raw_bucket(), key).await?;

        let document = RateDocument::from_slice(&object.body).map_err(|source| TransformError::Document {
            key: key.to_string(),
            source,
        })?;
        let rows = document.flatten();

        let metadata = RateMetadata::from_map(&object.metadata);
        let output_key = processed_object_key(&output_name(key, metadata.as_ref()), format);

        let body = encode_rows(&rows, format).map_err(|source| TransformError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.store
            .put_object(
                self.config.processed_bucket(),
                PutRequest::new(output_key.clone(), body, format.content_type()),
            )
            .await?;

        info!(
            source_key = %key,
            output_key = %output_key,
            row_count = rows.len(),
            from_metadata = metadata.is_some(),
            "オブジェクト変換完了"
        );

        Ok(ProcessedObject {
            source_key: key.to_string(),
            output_key,
            row_count: rows.len(),
        })
    }
}
