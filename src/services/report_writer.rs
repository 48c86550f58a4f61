//! 评分报告写入服务 - 业务能力层
//!
//! 只负责"把 grade_report 写到磁盘"，不关心流程

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};

use crate::models::GradingResult;

/// 评分报告写入服务
///
/// - 每次写入生成一个新文件，文件名带时间戳，不覆盖旧报告
/// - 报告目录不存在时自动创建
pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    /// 写入到指定目录
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// 写入评分报告，返回文件路径
    pub async fn write(&self, result: &GradingResult) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.report_dir)
            .await
            .with_context(|| format!("无法创建报告目录: {}", self.report_dir.display()))?;

        let path = self.report_dir.join(Self::file_name(&result.session_id));
        debug!(
            "写入评分报告: {} ({} 字节)",
            path.display(),
            result.grade_report.len()
        );

        tokio::fs::write(&path, Self::render(result))
            .await
            .with_context(|| format!("无法写入评分报告: {}", path.display()))?;

        info!("📄 评分报告已保存: {}", path.display());
        Ok(path)
    }

    fn file_name(session_id: &str) -> String {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let short: String = session_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect();

        if short.is_empty() {
            format!("grade_report_{}.txt", stamp)
        } else {
            format!("grade_report_{}_{}.txt", stamp, short)
        }
    }

    /// 后端给了报告正文就原样写出，否则用分数和反馈拼一个
    fn render(result: &GradingResult) -> String {
        if !result.grade_report.trim().is_empty() {
            return result.grade_report.clone();
        }

        let mut out = format!(
            "Total Score: {:.1}% ({})\nPassed: {}/{}\n",
            result.total_score,
            result.grade_letter,
            result.passed_count(),
            result.question_count()
        );
        if !result.feedback_text.is_empty() {
            out.push('\n');
            out.push_str(&result.feedback_text);
            out.push('\n');
        }
        out
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new("reports")
    }
}
