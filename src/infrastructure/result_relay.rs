//! Result Relay
//!
//! 保存试卷分析和评分两个旅程的最新结果，供后续阶段读取。
//!
//! - 每个槽位只有一个写入者：`PaperSlot` / `GradeSlot` 不可克隆，分别交给对应控制器
//! - 写入是整体替换，读取不会清空槽位
//! - 不保留历史，只保留最新结果

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::{GradingResult, PaperAnalysisResult};

type Slot<T> = Option<Arc<T>>;

/// 试卷槽位的唯一写入端
#[derive(Debug)]
pub struct PaperSlot(watch::Sender<Slot<PaperAnalysisResult>>);

impl PaperSlot {
    /// 整体替换试卷结果
    pub fn publish(&self, result: Arc<PaperAnalysisResult>) {
        debug!("Result Relay: 更新试卷结果 (session {})", result.session_id);
        self.0.send_replace(Some(result));
    }

    /// 当前值（写入者自己也可以读）
    pub fn current(&self) -> Slot<PaperAnalysisResult> {
        self.0.borrow().clone()
    }
}

/// 评分槽位的唯一写入端
#[derive(Debug)]
pub struct GradeSlot(watch::Sender<Slot<GradingResult>>);

impl GradeSlot {
    /// 整体替换评分结果
    pub fn publish(&self, result: Arc<GradingResult>) {
        debug!("Result Relay: 更新评分结果 ({})", result.grade_letter);
        self.0.send_replace(Some(result));
    }

    pub fn current(&self) -> Slot<GradingResult> {
        self.0.borrow().clone()
    }
}

/// 只读视图，可随意克隆
#[derive(Debug, Clone)]
pub struct ResultRelay {
    paper: watch::Receiver<Slot<PaperAnalysisResult>>,
    grade: watch::Receiver<Slot<GradingResult>>,
}

impl ResultRelay {
    /// 创建空的 Relay 及两个槽位的写入端
    pub fn channel() -> (Self, PaperSlot, GradeSlot) {
        let (paper_tx, paper_rx) = watch::channel(None);
        let (grade_tx, grade_rx) = watch::channel(None);
        (
            Self {
                paper: paper_rx,
                grade: grade_rx,
            },
            PaperSlot(paper_tx),
            GradeSlot(grade_tx),
        )
    }

    pub fn paper_result(&self) -> Slot<PaperAnalysisResult> {
        self.paper.borrow().clone()
    }

    pub fn grade_result(&self) -> Slot<GradingResult> {
        self.grade.borrow().clone()
    }

    /// 订阅试卷槽位的变化
    pub fn watch_paper(&self) -> watch::Receiver<Slot<PaperAnalysisResult>> {
        self.paper.clone()
    }

    /// 订阅评分槽位的变化
    pub fn watch_grade(&self) -> watch::Receiver<Slot<GradingResult>> {
        self.grade.clone()
    }
}
