//! オブジェクトストア操作モジュール
//!
//! 生データ・加工済みデータのS3バケットに対する操作を提供する。
//! - JSONオブジェクトの一覧取得（全ページを取得してから返す）
//! - オブジェクト本体とメタデータの取得
//! - オブジェクトの書き込み（Content-Type・メタデータ付き）

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::{debug, error, info};

/// オブジェクトストア操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObjectStoreError {
    /// 一覧取得に失敗
    #[error("List error: bucket={bucket}, {message}")]
    ListError { bucket: String, message: String },

    /// 読み取りに失敗
    #[error("Read error: s3://{bucket}/{key}, {message}")]
    ReadError {
        bucket: String,
        key: String,
        message: String,
    },

    /// 書き込みに失敗
    #[error("Write error: s3://{bucket}/{key}, {message}")]
    WriteError {
        bucket: String,
        key: String,
        message: String,
    },
}

/// 取得したオブジェクト
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredObject {
    /// オブジェクト本体
    pub body: Vec<u8>,
    /// ユーザー定義メタデータ（x-amz-meta-*）
    pub metadata: HashMap<String, String>,
}

/// 書き込むオブジェクト
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

impl PutRequest {
    /// メタデータなしの書き込みリクエストを作成
    pub fn new(key: impl Into<String>, body: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body,
            content_type: content_type.into(),
            metadata: HashMap::new(),
        }
    }

    /// メタデータを付与
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// オブジェクトストア操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// バケット内の全キーを取得する
    ///
    /// ページネーションは内部で全て消化し、一覧順に返す。
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, ObjectStoreError>;

    /// オブジェクトを取得する
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, ObjectStoreError>;

    /// オブジェクトを書き込む（同じキーは上書き）
    async fn put_object(&self, bucket: &str, request: PutRequest) -> Result<(), ObjectStoreError>;
}

/// 実際のAWS S3 SDKを使用したオブジェクトストア実装
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    /// 新しいS3ObjectStoreを作成
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(S3Client::new(&config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, ObjectStoreError> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                error!(bucket = %bucket, error = %err, "S3一覧取得エラー");
                ObjectStoreError::ListError {
                    bucket: bucket.to_string(),
                    message: err.to_string(),
                }
            })?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );
        }

        debug!(bucket = %bucket, key_count = keys.len(), "S3一覧取得完了");
        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, ObjectStoreError> {
        let read_error = |message: String| ObjectStoreError::ReadError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                error!(bucket = %bucket, key = %key, error = %err, "S3 GetObjectエラー");
                read_error(err.to_string())
            })?;

        let metadata = output.metadata().cloned().unwrap_or_default();

        let body = output
            .body
            .collect()
            .await
            .map_err(|err| {
                error!(bucket = %bucket, key = %key, error = %err, "S3オブジェクト本体の読み取りエラー");
                read_error(err.to_string())
            })?
            .into_bytes()
            .to_vec();

        Ok(StoredObject { body, metadata })
    }

    async fn put_object(&self, bucket: &str, request: PutRequest) -> Result<(), ObjectStoreError> {
        let PutRequest {
            key,
            body,
            content_type,
            metadata,
        } = request;
        let size = body.len();

        let mut builder = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type);

        if !metadata.is_empty() {
            builder = builder.set_metadata(Some(metadata));
        }

        match builder.send().await {
            Ok(_) => {
                info!(bucket = %bucket, key = %key, size = size, "S3 PutObject成功");
                Ok(())
            }
            Err(err) => {
                error!(bucket = %bucket, key = %key, error = %err, "S3 PutObjectエラー");
                Err(ObjectStoreError::WriteError {
                    bucket: bucket.to_string(),
                    key,
                    message: err.to_string(),
                })
            }
        }
    }
}
