//! Remote Processing Gateway
//!
//! 后端每项能力对应一个方法。所有调用都是单次网络请求：
//! 不自动重试、不缓存，超时只由传输层决定。评分和学习请求代价高，
//! 调用方也不得自行重试。

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::infrastructure::SessionId;
use crate::models::{
    AnswerText, Artifact, BaselineMetrics, DatasetStats, GradingResult, HealthStatus,
    LearningResult, MockPaper, PaperAnalysisResult, PaperText,
};

#[async_trait]
pub trait Gateway: Send + Sync {
    /// 健康检查。失败时返回 `HealthStatus::offline()`，从不报错
    async fn check_health(&self) -> HealthStatus;

    /// `POST /paper/upload`：提取试卷文字
    async fn extract_paper_text(&self, artifact: &Artifact) -> RemoteResult<PaperText>;

    /// `POST /paper/analyse`：分析试卷并生成模拟试卷
    async fn analyse_paper(&self, text: &str) -> RemoteResult<PaperAnalysisResult>;

    /// `POST /answers/upload`：识别一张或多张答题照片的手写文字
    async fn extract_answer_text(&self, artifacts: &[Artifact]) -> RemoteResult<AnswerText>;

    /// `POST /grade`：调用方保证 `answer_text` 非空
    async fn grade_answers(
        &self,
        mock_paper: &MockPaper,
        answer_text: &str,
        session_id: &SessionId,
    ) -> RemoteResult<GradingResult>;

    /// `POST /learn`
    async fn generate_learning_path(
        &self,
        goal: &str,
        session_id: &SessionId,
    ) -> RemoteResult<LearningResult>;

    /// `GET /evaluate/baseline`，只供展示
    async fn baseline_metrics(&self) -> RemoteResult<BaselineMetrics>;

    /// `GET /stats`，只供展示
    async fn dataset_stats(&self) -> RemoteResult<DatasetStats>;

    /// 模拟试卷 PDF 的下载地址，只生成链接，不下载
    fn pdf_url(&self, filename: &str) -> String;
}
