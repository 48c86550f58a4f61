//! 答题评分流程 - 流程层
//!
//! 前置条件：Result Relay 中已有带模拟试卷的分析结果，否则直接拒绝（不进入任何状态）。
//!
//! 流程顺序：
//! 1. ocr：有答题照片就调用后端识别，识别结果覆盖手动输入的文字；没有照片就用手动输入
//! 2. 文字去掉空白后为空 → 本地校验失败，不调用评分接口
//! 3. grading：调用后端评分
//! 4. done：把结果写入 Result Relay 的评分槽位

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::clients::Gateway;
use crate::error::{FlowResult, GuardError};
use crate::infrastructure::{GradeSlot, ResultRelay, SessionContext};
use crate::models::{Artifact, GradingResult, PaperAnalysisResult};
use crate::utils::logging::truncate_text;
use crate::workflow::flow_state::{FlowCell, FlowState, GradeStage};

pub type GradeState = FlowState<GradeStage, GradingResult>;

/// 提交前的草稿：答题照片列表和手动输入的文字
#[derive(Debug, Default)]
struct Draft {
    artifacts: Vec<Artifact>,
    manual_text: String,
}

/// 答题评分控制器
pub struct GradeFlow {
    gateway: Arc<dyn Gateway>,
    session: SessionContext,
    relay: ResultRelay,
    slot: GradeSlot,
    draft: Mutex<Draft>,
    cell: FlowCell<GradeStage, GradingResult>,
}

impl GradeFlow {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionContext,
        relay: ResultRelay,
        slot: GradeSlot,
    ) -> Self {
        Self {
            gateway,
            session,
            relay,
            slot,
            draft: Mutex::new(Draft::default()),
            cell: FlowCell::new("答题评分"),
        }
    }

    pub fn state(&self) -> GradeState {
        self.cell.state()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<GradeState> {
        self.cell.subscribe()
    }

    /// 回到 idle，在途的运行结果将被丢弃。草稿保留
    pub fn reset(&self) {
        self.cell.reset();
    }

    fn draft(&self) -> MutexGuard<'_, Draft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 检查前置条件，通过时返回要作答的试卷分析结果
    pub fn precondition(&self) -> Result<Arc<PaperAnalysisResult>, GuardError> {
        self.relay
            .paper_result()
            .filter(|paper| paper.has_mock_paper())
            .ok_or(GuardError::MissingPaperResult)
    }

    /// 添加答题照片，只接受图片和 PDF，其余静默忽略。返回实际接受的数量
    pub fn add_artifacts(&self, artifacts: impl IntoIterator<Item = Artifact>) -> usize {
        let mut draft = self.draft();
        let before = draft.artifacts.len();
        for artifact in artifacts {
            if artifact.is_image_or_pdf() {
                draft.artifacts.push(artifact);
            } else {
                debug!("忽略非图片/PDF 文件: {} ({})", artifact.name(), artifact.mime_type());
            }
        }
        draft.artifacts.len() - before
    }

    /// 按下标移除，越界时返回 None
    pub fn remove_artifact(&self, index: usize) -> Option<Artifact> {
        let mut draft = self.draft();
        if index < draft.artifacts.len() {
            Some(draft.artifacts.remove(index))
        } else {
            None
        }
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.draft().artifacts.clone()
    }

    pub fn set_manual_text(&self, text: impl Into<String>) {
        self.draft().manual_text = text.into();
    }

    /// 当前的答题文字（手动输入，或最近一次识别结果）
    pub fn manual_text(&self) -> String {
        self.draft().manual_text.clone()
    }

    /// 提交当前草稿进行评分
    pub async fn submit(&self) -> FlowResult<Arc<GradingResult>> {
        let paper = self.precondition().map_err(|e| {
            warn!("⚠️ 无法评分: {}", e);
            e
        })?;

        let (artifacts, manual_text) = {
            let draft = self.draft();
            (draft.artifacts.clone(), draft.manual_text.clone())
        };

        let ticket = self.cell.begin(GradeStage::Ocr)?;

        let answer_text = if artifacts.is_empty() {
            debug!("没有答题照片，使用手动输入的文字");
            manual_text
        } else {
            info!("📷 正在识别 {} 张答题照片...", artifacts.len());
            match self.gateway.extract_answer_text(&artifacts).await {
                Ok(ocr) => {
                    info!(
                        "✓ 手写识别完成: {} 字符{}",
                        ocr.ocr_text.chars().count(),
                        ocr.engine
                            .as_deref()
                            .map(|engine| format!(" ({})", engine))
                            .unwrap_or_default()
                    );
                    // 只有本轮仍有效时才覆盖草稿
                    self.cell.with_current(ticket, || {
                        self.draft().manual_text = ocr.ocr_text.clone();
                    })?;
                    ocr.ocr_text
                }
                Err(e) => {
                    error!("❌ 手写识别失败: {}", e);
                    return Err(self.cell.fail(ticket, e.into()));
                }
            }
        };

        if answer_text.trim().is_empty() {
            warn!("⚠️ 答题文字为空，不调用评分接口");
            return Err(self.cell.fail(ticket, GuardError::NoAnswerText.into()));
        }

        self.cell.advance(ticket, GradeStage::Grading)?;
        let session_id = self.session.resolve(&paper.session_id);
        info!(
            "📝 正在评分: {} 题 | 答案预览: {}",
            paper.mock_paper.question_count(),
            truncate_text(answer_text.trim(), 40)
        );

        let result = match self
            .gateway
            .grade_answers(&paper.mock_paper, &answer_text, &session_id)
            .await
        {
            Ok(result) => Arc::new(result),
            Err(e) => {
                error!("❌ 评分失败: {}", e);
                return Err(self.cell.fail(ticket, e.into()));
            }
        };

        let result = self
            .cell
            .finish(ticket, result, |r| self.slot.publish(r))?;

        info!(
            "✓ 评分完成: {:.1}% ({}) | 及格 {}/{}",
            result.total_score,
            result.grade_letter,
            result.passed_count(),
            result.question_count()
        );
        Ok(result)
    }
}
