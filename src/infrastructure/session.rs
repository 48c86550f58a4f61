//! 会话上下文
//!
//! 每个用户会话生成一次的不透明标识，随评分和学习请求发给后端，
//! 用于在没有登录的情况下关联同一用户的多次调用。本地从不解析它。

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// 不透明的会话标识
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// 使用已有标识（例如试卷分析结果中后端分配的 session_id）
    pub fn from_raw(raw: impl AsRef<str>) -> Self {
        Self(Arc::from(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会话上下文，进程生命周期内不可变
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: SessionId,
}

impl SessionContext {
    /// 会话开始时生成一次
    pub fn start() -> Self {
        Self {
            id: SessionId::from_raw(Uuid::new_v4().to_string()),
        }
    }

    pub fn with_id(id: SessionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// 优先使用 `preferred`（非空时），否则回退到本会话的标识
    pub fn resolve(&self, preferred: &str) -> SessionId {
        if preferred.trim().is_empty() {
            self.id.clone()
        } else {
            SessionId::from_raw(preferred)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_stable_across_clones() {
        let session = SessionContext::start();
        let cloned = session.clone();
        assert_eq!(session.id(), cloned.id());
        assert!(!session.id().is_empty());
    }

    #[test]
    fn test_sessions_are_distinct() {
        assert_ne!(SessionContext::start().id(), SessionContext::start().id());
    }

    #[test]
    fn test_resolve_prefers_non_empty() {
        let session = SessionContext::with_id(SessionId::from_raw("local"));
        assert_eq!(session.resolve("paper-7f1c").as_str(), "paper-7f1c");
        assert_eq!(session.resolve("  ").as_str(), "local");
    }
}
