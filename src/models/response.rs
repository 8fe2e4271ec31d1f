//! 后端响应类型以及派生出的状态

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 后端表示健康的状态字面量
pub const HEALTHY: &str = "healthy";

/// 上传、二维码处理等接口的通用响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/health` 响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    /// 连接失败时使用的合成状态
    pub fn unreachable() -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some("Failed to connect to backend".to_string()),
            extra: Map::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

/// `/upload/list` 响应
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentList {
    /// 缺失或为 null 时视为空列表
    #[serde(default, deserialize_with = "null_as_empty")]
    pub documents: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/query` 响应
///
/// 翻译失败时后端只返回 `warning`，没有 `answer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl QueryResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            warning: None,
        }
    }
}

/// 后端健康状态，仅由最近一次健康检查得出
#[derive(Debug, Clone, PartialEq)]
pub struct BackendStatus {
    pub is_healthy: bool,
    pub details: Option<HealthResponse>,
    pub error: Option<String>,
}

impl BackendStatus {
    pub fn from_health(details: HealthResponse) -> Self {
        Self {
            is_healthy: details.is_healthy(),
            details: Some(details),
            error: None,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            is_healthy: false,
            details: None,
            error: Some("Failed to connect to backend".to_string()),
        }
    }
}

/// 文档可用状态
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStatus {
    pub available: bool,
    pub documents: Vec<Value>,
    /// 无法直接确认文档存在时的说明
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_requires_exact_literal() {
        let ok: HealthResponse = serde_json::from_value(json!({"status": "healthy"})).unwrap();
        let upper: HealthResponse = serde_json::from_value(json!({"status": "Healthy"})).unwrap();
        let missing: HealthResponse = serde_json::from_value(json!({})).unwrap();

        assert!(ok.is_healthy());
        assert!(!upper.is_healthy());
        assert!(!missing.is_healthy());
        assert!(!HealthResponse::unreachable().is_healthy());
    }

    #[test]
    fn test_message_response_keeps_extra_fields() {
        let resp: MessageResponse =
            serde_json::from_value(json!({"message": "ok", "chunks": 12})).unwrap();
        assert_eq!(resp.message.as_deref(), Some("ok"));
        assert_eq!(resp.extra.get("chunks"), Some(&json!(12)));
    }

    #[test]
    fn test_document_list_null_is_empty() {
        let null: DocumentList = serde_json::from_value(json!({"documents": null})).unwrap();
        let missing: DocumentList = serde_json::from_value(json!({})).unwrap();
        assert!(null.documents.is_empty());
        assert!(missing.documents.is_empty());
    }

    #[test]
    fn test_query_response_warning_only() {
        let resp: QueryResponse = serde_json::from_value(
            json!({"warning": "Query translation failed, results may be less accurate"}),
        )
        .unwrap();
        assert!(resp.answer.is_empty());
        assert!(resp.warning.is_some());
    }
}
