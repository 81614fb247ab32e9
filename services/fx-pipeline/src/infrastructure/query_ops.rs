//! クエリ実行操作モジュール
//!
//! Validation Lambdaで使用するAthenaクエリ実行の参照機能を提供する。
//! - クエリ実行の状態・ワークグループの取得
//! - 結果セットの行数カウント（NextTokenを辿って全ページを集計）

use async_trait::async_trait;
use aws_sdk_athena::Client as AthenaClient;
use thiserror::Error;
use tracing::{debug, error};

/// 正常終了を表すクエリ状態
pub const SUCCEEDED_STATE: &str = "SUCCEEDED";

/// クエリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryOpsError {
    /// AWS SDK エラー
    #[error("AWS Athena APIエラー: {0}")]
    AwsSdkError(String),

    /// レスポンスに実行情報が含まれない
    #[error("クエリ実行情報がありません: {0}")]
    MissingExecution(String),
}

/// クエリ実行の情報
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecutionInfo {
    /// 実行状態（QUEUED / RUNNING / SUCCEEDED / FAILED / CANCELLED）
    pub state: String,
    /// 状態変更理由（失敗時のエラーメッセージなど）
    pub state_change_reason: Option<String>,
    /// ワークグループ名
    pub work_group: Option<String>,
}

impl QueryExecutionInfo {
    /// 正常終了したかどうか
    pub fn is_succeeded(&self) -> bool {
        self.state == SUCCEEDED_STATE
    }
}

/// クエリ操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait QueryOps: Send + Sync {
    /// クエリ実行の状態を取得する
    async fn get_execution(&self, query_execution_id: &str) -> Result<QueryExecutionInfo, QueryOpsError>;

    /// 結果セットの総行数（ヘッダー行を含む）を取得する
    async fn count_result_rows(&self, query_execution_id: &str) -> Result<u64, QueryOpsError>;
}

/// 実際のAWS Athena SDKを使用したクエリ操作実装
#[derive(Debug, Clone)]
pub struct AthenaQueryOps {
    client: AthenaClient,
}

impl AthenaQueryOps {
    /// 新しいAthenaQueryOpsを作成
    pub fn new(client: AthenaClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(AthenaClient::new(&config))
    }
}

#[async_trait]
impl QueryOps for AthenaQueryOps {
    async fn get_execution(&self, query_execution_id: &str) -> Result<QueryExecutionInfo, QueryOpsError> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(query_execution_id)
            .send()
            .await
            .map_err(|err| {
                error!(query_execution_id = %query_execution_id, error = %err, "GetQueryExecutionエラー");
                QueryOpsError::AwsSdkError(err.to_string())
            })?;

        let execution = output
            .query_execution()
            .ok_or_else(|| QueryOpsError::MissingExecution(query_execution_id.to_string()))?;

        let status = execution.status();
        let state = status
            .and_then(|s| s.state())
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        Ok(QueryExecutionInfo {
            state,
            state_change_reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
            work_group: execution.work_group().map(str::to_string),
        })
    }

    async fn count_result_rows(&self, query_execution_id: &str) -> Result<u64, QueryOpsError> {
        let mut total: u64 = 0;
        let mut next_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let output = self
                .client
                .get_query_results()
                .query_execution_id(query_execution_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|err| {
                    error!(query_execution_id = %query_execution_id, error = %err, "GetQueryResultsエラー");
                    QueryOpsError::AwsSdkError(err.to_string())
                })?;

            pages += 1;
            total += output
                .result_set()
                .map(|rs| rs.rows().len() as u64)
                .unwrap_or(0);

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            query_execution_id = %query_execution_id,
            pages = pages,
            total_rows = total,
            "クエリ結果の行数を集計"
        );
        Ok(total)
    }
}
