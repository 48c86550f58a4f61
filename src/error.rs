//! 错误类型
//!
//! 三类错误：
//! - `GuardError`：本地前置条件/校验失败，永远不会到达后端
//! - `RemoteError`：后端返回非成功状态或不可达，只由 Gateway 产生
//! - `FlowError`：控制器对外暴露的唯一错误类型
//!
//! 所有错误都实现 `Clone`，以便 `Failed` 状态直接携带错误值。

use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// 后端调用错误
///
/// `Display` 输出即面向用户的 detail 文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// 后端返回非 2xx 状态
    #[error("{detail}")]
    Status {
        endpoint: String,
        status: u16,
        detail: String,
    },
    /// 网络不可达、连接被拒绝或传输层超时
    #[error("{detail}")]
    Unreachable { endpoint: String, detail: String },
    /// 成功响应但响应体无法解析
    #[error("{detail}")]
    Decode { endpoint: String, detail: String },
}

impl RemoteError {
    /// 根据非成功响应构造错误
    ///
    /// 响应体约定为 `{ "detail": string }`：
    /// - `detail` 为字符串时直接使用
    /// - `detail` 为其他非空 JSON 时使用其紧凑文本
    /// - 响应体是 JSON 但缺少 `detail` 时使用 `HTTP <code>`
    /// - 响应体不是 JSON 时使用状态码的标准描述，没有则 `HTTP <code>`
    pub fn from_response(endpoint: impl Into<String>, status: StatusCode, body: &str) -> Self {
        let fallback = || format!("HTTP {}", status.as_u16());

        let detail = match serde_json::from_str::<JsonValue>(body) {
            Ok(json) => match json.get("detail") {
                Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
                Some(JsonValue::Null) | None => fallback(),
                Some(JsonValue::String(_)) => fallback(),
                Some(other) => other.to_string(),
            },
            Err(_) => status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(fallback),
        };

        RemoteError::Status {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            detail,
        }
    }

    pub fn unreachable(endpoint: impl Into<String>, source: &reqwest::Error) -> Self {
        RemoteError::Unreachable {
            endpoint: endpoint.into(),
            detail: format!("Backend unreachable: {}", source),
        }
    }

    pub fn decode(endpoint: impl Into<String>, source: impl std::fmt::Display) -> Self {
        RemoteError::Decode {
            endpoint: endpoint.into(),
            detail: format!("Unexpected response from backend: {}", source),
        }
    }

    /// 面向用户的错误描述
    pub fn detail(&self) -> &str {
        match self {
            RemoteError::Status { detail, .. }
            | RemoteError::Unreachable { detail, .. }
            | RemoteError::Decode { detail, .. } => detail,
        }
    }

    /// 对应的 HTTP 状态码（网络错误时没有）
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            RemoteError::Status { endpoint, .. }
            | RemoteError::Unreachable { endpoint, .. }
            | RemoteError::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// 本地前置条件错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// 评分前还没有生成模拟试卷
    #[error("Generate a mock paper first")]
    MissingPaperResult,
    /// OCR 或手动输入的答案为空
    #[error("No text extracted — try clearer photos")]
    NoAnswerText,
    /// 学习目标为空
    #[error("Please provide a learning goal")]
    EmptyGoal,
    /// 同一控制器已有进行中的运行
    #[error("{flow} is already running, wait for it to finish")]
    Busy { flow: &'static str },
}

/// 控制器错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// 运行期间控制器被重置，结果已丢弃
    #[error("run was reset before it finished, result discarded")]
    Superseded,
}

impl FlowError {
    pub fn is_guard(&self) -> bool {
        matches!(self, FlowError::Guard(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, FlowError::Remote(_))
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// ========== Result 类型别名 ==========

/// 控制器结果类型
pub type FlowResult<T> = Result<T, FlowError>;

/// Gateway 调用结果类型
pub type RemoteResult<T> = Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string_is_used() {
        let err = RemoteError::from_response(
            "/paper/upload",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"Could not extract text. Try a clearer scan."}"#,
        );
        assert_eq!(err.to_string(), "Could not extract text. Try a clearer scan.");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.endpoint(), "/paper/upload");
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let err = RemoteError::from_response(
            "/grade",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","ocr_text"],"msg":"field required"}]}"#,
        );
        assert!(err.detail().contains("field required"));
    }

    #[test]
    fn test_json_without_detail_falls_back_to_status_code() {
        let err = RemoteError::from_response("/learn", StatusCode::BAD_REQUEST, r#"{"error":"x"}"#);
        assert_eq!(err.detail(), "HTTP 400");
    }

    #[test]
    fn test_non_json_body_uses_reason_phrase() {
        let err = RemoteError::from_response(
            "/paper/analyse",
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>oops</html>",
        );
        assert_eq!(err.detail(), "Internal Server Error");
    }

    #[test]
    fn test_guard_messages() {
        assert_eq!(
            GuardError::NoAnswerText.to_string(),
            "No text extracted — try clearer photos"
        );
        assert_eq!(
            GuardError::MissingPaperResult.to_string(),
            "Generate a mock paper first"
        );
    }

    #[test]
    fn test_flow_error_is_transparent() {
        let remote = RemoteError::Unreachable {
            endpoint: "/grade".into(),
            detail: "Backend unreachable: connection refused".into(),
        };
        let err = FlowError::from(remote);
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "Backend unreachable: connection refused");
        assert!(FlowError::from(GuardError::EmptyGoal).is_guard());
    }
}
