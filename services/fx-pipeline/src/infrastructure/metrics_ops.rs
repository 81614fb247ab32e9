//! メトリクス操作モジュール
//!
//! Validation Lambdaで使用するCloudWatchメトリクス発行機能を提供する。

use async_trait::async_trait;
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use thiserror::Error;
use tracing::{error, info};

/// メトリクス操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsOpsError {
    /// AWS SDK エラー
    #[error("AWS CloudWatch APIエラー: {0}")]
    AwsSdkError(String),
}

/// 発行するカウントメトリクス
#[derive(Debug, Clone, PartialEq)]
pub struct CountMetric {
    /// 名前空間
    pub namespace: String,
    /// メトリクス名
    pub metric_name: String,
    /// 値
    pub value: f64,
    /// ディメンション（名前, 値）
    pub dimensions: Vec<(String, String)>,
}

/// メトリクス操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait MetricsOps: Send + Sync {
    /// 単位Countのメトリクスを1件発行する
    async fn put_count(&self, metric: &CountMetric) -> Result<(), MetricsOpsError>;
}

/// 実際のAWS CloudWatch SDKを使用したメトリクス操作実装
#[derive(Debug, Clone)]
pub struct CloudWatchMetricsOps {
    client: CloudWatchClient,
}

impl CloudWatchMetricsOps {
    /// 新しいCloudWatchMetricsOpsを作成
    pub fn new(client: CloudWatchClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(CloudWatchClient::new(&config))
    }

    fn build_datum(metric: &CountMetric) -> MetricDatum {
        let dimensions: Vec<Dimension> = metric
            .dimensions
            .iter()
            .map(|(name, value)| Dimension::builder().name(name).value(value).build())
            .collect();

        MetricDatum::builder()
            .metric_name(&metric.metric_name)
            .value(metric.value)
            .unit(StandardUnit::Count)
            .set_dimensions((!dimensions.is_empty()).then_some(dimensions))
            .build()
    }
}

#[async_trait]
impl MetricsOps for CloudWatchMetricsOps {
    async fn put_count(&self, metric: &CountMetric) -> Result<(), MetricsOpsError> {
        let datum = Self::build_datum(metric);

        match self
            .client
            .put_metric_data()
            .namespace(&metric.namespace)
            .metric_data(datum)
            .send()
            .await
        {
            Ok(_) => {
                info!(
                    namespace = %metric.namespace,
                    metric_name = %metric.metric_name,
                    value = metric.value,
                    "PutMetricData成功"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    namespace = %metric.namespace,
                    metric_name = %metric.metric_name,
                    error = %err,
                    "PutMetricDataエラー"
                );
                Err(MetricsOpsError::AwsSdkError(err.to_string()))
            }
        }
    }
}
