/// Validationハンドラー
///
/// 完了済みクエリの結果行数を数え、空結果かどうかをメトリクスとして発行する。
/// クエリがSUCCEEDEDでなければ再試行せずに失敗させる。
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{EMPTY_RESULTS_METRIC, ValidationResult};
use crate::infrastructure::{
    CountMetric, MetricsOps, MetricsOpsError, QueryOps, QueryOpsError, ValidationConfig,
};

/// イベント中のクエリ実行IDのフィールド名
const QUERY_EXECUTION_ID_FIELD: &str = "QueryExecutionId";

/// Validationハンドラーのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// イベントにQueryExecutionIdがない
    #[error("Missing QueryExecutionId")]
    MissingQueryExecutionId,

    /// クエリが正常終了していない
    #[error("Query {query_execution_id} did not succeed: state={state}, reason={reason}")]
    QueryNotSucceeded {
        query_execution_id: String,
        state: String,
        reason: String,
    },

    /// クエリ情報の取得に失敗
    #[error("Query error: {0}")]
    Query(#[from] QueryOpsError),

    /// メトリクスの発行に失敗
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsOpsError),
}

/// クエリ結果を検証するハンドラー
pub struct ValidationHandler<Q, M>
where
    Q: QueryOps,
    M: MetricsOps,
{
    query_ops: Q,
    metrics_ops: M,
    config: ValidationConfig,
}

impl<Q, M> ValidationHandler<Q, M>
where
    Q: QueryOps,
    M: MetricsOps,
{
    /// 新しいValidationHandlerを作成
    pub fn new(query_ops: Q, metrics_ops: M, config: ValidationConfig) -> Self {
        Self {
            query_ops,
            metrics_ops,
            config,
        }
    }

    /// 検証を実行
    ///
    /// # 処理フロー
    /// 1. イベントからQueryExecutionIdを取得（なければ即失敗）
    /// 2. クエリ実行状態を確認（SUCCEEDED以外は失敗）
    /// 3. 結果セットの行数からヘッダー行を除いたデータ行数を算出
    /// 4. EmptyQueryResultsメトリクスを発行
    pub async fn handle(&self, event: &Value) -> Result<ValidationResult, ValidationError> {
        let query_execution_id = event
            .get(QUERY_EXECUTION_ID_FIELD)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingQueryExecutionId)?;

        let execution = self
            .query_ops
            .get_execution(query_execution_id)
            .await
            .inspect_err(|err| error!(query_execution_id = %query_execution_id, error = %err, "クエリ実行情報の取得に失敗"))?;

        if !execution.is_succeeded() {
            error!(
                query_execution_id = %query_execution_id,
                state = %execution.state,
                reason = ?execution.state_change_reason,
                "クエリが正常終了していない"
            );
            return Err(ValidationError::QueryNotSucceeded {
                query_execution_id: query_execution_id.to_string(),
                state: execution.state,
                reason: execution.state_change_reason.unwrap_or_default(),
            });
        }

        let total_rows = self.query_ops.count_result_rows(query_execution_id).await?;
        let result = ValidationResult::from_total_rows(total_rows);

        let metric = self.build_metric(&result, execution.work_group.as_deref());
        self.metrics_ops.put_count(&metric).await?;

        if result.is_empty {
            warn!(
                query_execution_id = %query_execution_id,
                work_group = ?execution.work_group,
                "クエリ結果が空"
            );
        } else {
            info!(
                query_execution_id = %query_execution_id,
                rows = result.rows,
                "クエリ結果を検証"
            );
        }

        Ok(result)
    }

    /// 発行するメトリクスを組み立てる
    fn build_metric(&self, result: &ValidationResult, work_group: Option<&str>) -> CountMetric {
        let mut dimensions = Vec::new();
        if let Some(work_group) = work_group {
            dimensions.push(("WorkGroup".to_string(), work_group.to_string()));
        }
        if let Some(pipeline) = self.config.pipeline() {
            dimensions.push(("Pipeline".to_string(), pipeline.to_string()));
        }

        CountMetric {
            namespace: self.config.metric_namespace().to_string(),
            metric_name: EMPTY_RESULTS_METRIC.to_string(),
            value: result.metric_value(),
            dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationStatus;
    use crate::infrastructure::metrics_ops::tests::MockMetricsOps;
    use crate::infrastructure::query_ops::tests::MockQueryOps;
    use serde_json::json;

    fn handler(
        query_ops: MockQueryOps,
        pipeline: Option<&str>,
    ) -> ValidationHandler<MockQueryOps, MockMetricsOps> {
        ValidationHandler::new(
            query_ops,
            MockMetricsOps::new(),
            ValidationConfig::new("FxPipeline", pipeline.map(str::to_string)),
        )
    }

    fn event() -> Value {
        json!({"QueryExecutionId": "q-123"})
    }

    #[tokio::test]
    async fn test_handle_header_only_is_empty() {
        let handler = handler(MockQueryOps::new("SUCCEEDED", Some("primary"), 1), None);

        let result = handler.handle(&event()).await.unwrap();

        assert_eq!(result.rows, 0);
        assert!(result.is_empty);
        assert_eq!(result.status, ValidationStatus::Failed);

        let published = handler.metrics_ops.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].namespace, "FxPipeline");
        assert_eq!(published[0].metric_name, "EmptyQueryResults");
        assert_eq!(published[0].value, 1.0);
    }

    #[tokio::test]
    async fn test_handle_header_plus_three_rows() {
        let handler = handler(MockQueryOps::new("SUCCEEDED", None, 4), None);

        let result = handler.handle(&event()).await.unwrap();

        assert_eq!(result.rows, 3);
        assert!(!result.is_empty);
        assert_eq!(result.status, ValidationStatus::Succeeded);
        assert_eq!(handler.metrics_ops.published()[0].value, 0.0);
    }

    #[tokio::test]
    async fn test_handle_dimensions() {
        let handler = handler(
            MockQueryOps::new("SUCCEEDED", Some("primary"), 2),
            Some("daily-rates"),
        );

        handler.handle(&event()).await.unwrap();

        assert_eq!(
            handler.metrics_ops.published()[0].dimensions,
            vec![
                ("WorkGroup".to_string(), "primary".to_string()),
                ("Pipeline".to_string(), "daily-rates".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_without_dimensions() {
        let handler = handler(MockQueryOps::new("SUCCEEDED", None, 2), None);

        handler.handle(&event()).await.unwrap();

        assert!(handler.metrics_ops.published()[0].dimensions.is_empty());
    }

    #[tokio::test]
    async fn test_handle_missing_query_execution_id() {
        let handler = handler(MockQueryOps::new("SUCCEEDED", None, 2), None);

        for event in [json!({}), json!({"QueryExecutionId": ""}), json!({"QueryExecutionId": 42})] {
            let result = handler.handle(&event).await;
            assert_eq!(result, Err(ValidationError::MissingQueryExecutionId));
        }

        // AWS呼び出しは行われない
        assert!(handler.query_ops.calls().is_empty());
        assert!(handler.metrics_ops.published().is_empty());
    }

    #[tokio::test]
    async fn test_handle_query_not_succeeded() {
        let handler = handler(MockQueryOps::new("FAILED", Some("primary"), 4), None);

        let result = handler.handle(&event()).await;

        assert_eq!(
            result,
            Err(ValidationError::QueryNotSucceeded {
                query_execution_id: "q-123".to_string(),
                state: "FAILED".to_string(),
                reason: "mock reason".to_string(),
            })
        );
        assert_eq!(handler.query_ops.calls(), vec!["get_execution"]);
        assert!(handler.metrics_ops.published().is_empty());
    }

    #[tokio::test]
    async fn test_handle_query_still_running() {
        let handler = handler(MockQueryOps::new("RUNNING", None, 0), None);

        let result = handler.handle(&event()).await;

        assert!(matches!(result, Err(ValidationError::QueryNotSucceeded { .. })));
    }

    #[tokio::test]
    async fn test_handle_query_lookup_failure() {
        let handler = handler(MockQueryOps::failing(), None);

        let result = handler.handle(&event()).await;

        assert!(matches!(result, Err(ValidationError::Query(_))));
    }

    #[tokio::test]
    async fn test_handle_metric_failure() {
        let handler = ValidationHandler::new(
            MockQueryOps::new("SUCCEEDED", None, 2),
            MockMetricsOps::failing(),
            ValidationConfig::new("FxPipeline", None),
        );

        let result = handler.handle(&event()).await;

        assert!(matches!(result, Err(ValidationError::Metrics(_))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::MissingQueryExecutionId.to_string(),
            "Missing QueryExecutionId"
        );
    }
}
