//! 系统状态类接口的响应，只供展示层使用

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::de::{lenient_f64, opt_string_or_number};

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub llm: Option<String>,
    /// 后端返回数据集大小（数字），也可能是描述字符串
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub dataset: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub const OFFLINE: &'static str = "offline";

    /// 健康检查失败时的降级状态
    pub fn offline() -> Self {
        Self {
            status: Self::OFFLINE.to_string(),
            llm: None,
            dataset: None,
            version: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == "ok"
    }
}

/// `GET /evaluate/baseline`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineMetrics {
    #[serde(deserialize_with = "lenient_f64")]
    pub baseline_accuracy: f64,
    pub baseline_precision: f64,
    pub baseline_recall: f64,
    pub baseline_f1: f64,
    pub system_accuracy: f64,
    pub system_precision: f64,
    pub system_recall: f64,
    pub system_f1: f64,
    pub dataset_size: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub improvement: f64,
}

/// `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetStats {
    pub dataset: JsonValue,
    pub llm_provider: String,
    pub topics_available: u32,
    pub timestamp: String,
}
