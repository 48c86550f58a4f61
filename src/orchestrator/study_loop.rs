//! 一次用户会话的装配
//!
//! 创建会话标识和 Result Relay，把两个槽位的写入端分别交给试卷分析和评分控制器。
//! 三个控制器共用同一个 Gateway。

use std::sync::Arc;

use tracing::debug;

use crate::clients::Gateway;
use crate::infrastructure::{ResultRelay, SessionContext};
use crate::workflow::{GradeFlow, LearnFlow, PaperFlow};

/// 一次会话内的全部控制器
pub struct StudyLoop {
    session: SessionContext,
    relay: ResultRelay,
    gateway: Arc<dyn Gateway>,
    paper: Arc<PaperFlow>,
    grade: Arc<GradeFlow>,
    learn: Arc<LearnFlow>,
}

impl StudyLoop {
    /// 新会话
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_session(gateway, SessionContext::start())
    }

    pub fn with_session(gateway: Arc<dyn Gateway>, session: SessionContext) -> Self {
        let (relay, paper_slot, grade_slot) = ResultRelay::channel();
        debug!("会话开始: {}", session.id());

        Self {
            paper: Arc::new(PaperFlow::new(Arc::clone(&gateway), paper_slot)),
            grade: Arc::new(GradeFlow::new(
                Arc::clone(&gateway),
                session.clone(),
                relay.clone(),
                grade_slot,
            )),
            learn: Arc::new(LearnFlow::new(Arc::clone(&gateway), session.clone())),
            session,
            relay,
            gateway,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// 只读的结果视图
    pub fn relay(&self) -> &ResultRelay {
        &self.relay
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub fn paper(&self) -> &Arc<PaperFlow> {
        &self.paper
    }

    pub fn grade(&self) -> &Arc<GradeFlow> {
        &self.grade
    }

    pub fn learn(&self) -> &Arc<LearnFlow> {
        &self.learn
    }
}
