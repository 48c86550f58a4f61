//! 主题学习流程 - 流程层
//!
//! 独立旅程：没有前置条件，结果只保存在本控制器的 done 状态中，不写入 Result Relay。

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::Gateway;
use crate::error::{FlowResult, GuardError};
use crate::infrastructure::SessionContext;
use crate::models::LearningResult;
use crate::workflow::flow_state::{FlowCell, FlowState, LearnStage};

pub type LearnState = FlowState<LearnStage, LearningResult>;

/// 主题学习控制器
pub struct LearnFlow {
    gateway: Arc<dyn Gateway>,
    session: SessionContext,
    cell: FlowCell<LearnStage, LearningResult>,
}

impl LearnFlow {
    pub fn new(gateway: Arc<dyn Gateway>, session: SessionContext) -> Self {
        Self {
            gateway,
            session,
            cell: FlowCell::new("主题学习"),
        }
    }

    pub fn state(&self) -> LearnState {
        self.cell.state()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<LearnState> {
        self.cell.subscribe()
    }

    pub fn reset(&self) {
        self.cell.reset();
    }

    /// 最近一次完成的学习结果
    pub fn result(&self) -> Option<Arc<LearningResult>> {
        self.cell.state().result().cloned()
    }

    /// 生成学习路径。目标为空时直接拒绝，状态不变
    pub async fn run(&self, goal: &str) -> FlowResult<Arc<LearningResult>> {
        let goal = goal.trim();
        if goal.is_empty() {
            warn!("⚠️ 学习目标为空，忽略");
            return Err(GuardError::EmptyGoal.into());
        }

        let ticket = self.cell.begin(LearnStage::Loading)?;
        info!("📚 正在生成学习路径: {}", goal);

        match self
            .gateway
            .generate_learning_path(goal, self.session.id())
            .await
        {
            Ok(result) => {
                let result = self.cell.finish(ticket, Arc::new(result), |_| {})?;
                info!(
                    "✓ 学习路径生成完成: {} 个主题 | 平均掌握度 {:.0}%",
                    result.learning_path.len(),
                    result.avg_mastery * 100.0
                );
                Ok(result)
            }
            Err(e) => {
                error!("❌ 学习路径生成失败: {}", e);
                Err(self.cell.fail(ticket, e.into()))
            }
        }
    }
}
