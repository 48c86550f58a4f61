//! 试卷分析流程 - 流程层
//!
//! 流程顺序：
//! 1. extracting：从 `PaperSource` 读取试卷文字（上传文件走后端提取，演示试卷直接返回固定文本）
//! 2. analysing：调用后端分析并生成模拟试卷
//! 3. done：把结果写入 Result Relay 的试卷槽位
//!
//! 任何一步失败都进入 error，Relay 中已有的结果保持不变。

use std::sync::Arc;

use tracing::{error, info};

use crate::clients::Gateway;
use crate::error::FlowResult;
use crate::infrastructure::PaperSlot;
use crate::models::{Artifact, PaperAnalysisResult};
use crate::services::{DemoPaper, PaperSource, UploadedPaper};
use crate::utils::logging::truncate_text;
use crate::workflow::flow_state::{FlowCell, FlowState, PaperStage};

pub type PaperState = FlowState<PaperStage, PaperAnalysisResult>;

/// 试卷分析控制器
///
/// 持有试卷槽位的唯一写入端，只有进入 done 时才写入。
pub struct PaperFlow {
    gateway: Arc<dyn Gateway>,
    slot: PaperSlot,
    cell: FlowCell<PaperStage, PaperAnalysisResult>,
}

impl PaperFlow {
    pub fn new(gateway: Arc<dyn Gateway>, slot: PaperSlot) -> Self {
        Self {
            gateway,
            slot,
            cell: FlowCell::new("试卷分析"),
        }
    }

    pub fn state(&self) -> PaperState {
        self.cell.state()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<PaperState> {
        self.cell.subscribe()
    }

    /// 回到 idle，在途的运行结果将被丢弃
    pub fn reset(&self) {
        self.cell.reset();
    }

    /// 有上传文件就分析上传文件，否则使用内置演示试卷
    pub async fn analyse(&self, upload: Option<Artifact>) -> FlowResult<Arc<PaperAnalysisResult>> {
        match upload {
            Some(artifact) => self.run(&UploadedPaper::new(artifact)).await,
            None => self.run(&DemoPaper).await,
        }
    }

    /// 从指定来源执行一轮完整的试卷分析
    pub async fn run(&self, source: &dyn PaperSource) -> FlowResult<Arc<PaperAnalysisResult>> {
        let ticket = self.cell.begin(PaperStage::Extracting)?;
        info!("📄 开始试卷分析: {}", source.describe());

        let text = match source.read_text(self.gateway.as_ref()).await {
            Ok(text) => text,
            Err(e) => {
                error!("❌ 试卷文字提取失败: {}", e);
                return Err(self.cell.fail(ticket, e.into()));
            }
        };

        self.cell.advance(ticket, PaperStage::Analysing)?;
        info!("🔍 正在分析试卷 ({} 字符): {}", text.chars().count(), truncate_text(&text, 40));

        let result = match self.gateway.analyse_paper(&text).await {
            Ok(result) => Arc::new(result),
            Err(e) => {
                error!("❌ 试卷分析失败: {}", e);
                return Err(self.cell.fail(ticket, e.into()));
            }
        };

        let result = self
            .cell
            .finish(ticket, result, |r| self.slot.publish(r))?;

        info!(
            "✓ 试卷分析完成: {} | 满分 {} | 模拟试卷 {} 题",
            result.subject(),
            result.total_marks(),
            result.mock_paper.question_count()
        );
        Ok(result)
    }
}
