/// 日志工具模块
///
/// 日志初始化，以及终端展示用的格式化输出
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::infrastructure::SessionId;
use crate::models::{
    BaselineMetrics, DatasetStats, GradingResult, HealthStatus, LearningResult,
    PaperAnalysisResult, QUICK_GOALS,
};

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式为 `debug`。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, session: &SessionId) {
    info!("{}", "=".repeat(60));
    info!("🚀 EduAgent 学习闭环启动");
    info!("🌐 后端地址: {}", config.api_base_url);
    info!("🔑 会话: {}", session);
    info!("{}", "=".repeat(60));
}

/// 记录后端状态
pub fn log_health(health: &HealthStatus) {
    if health.is_online() {
        info!(
            "✓ 后端在线 | LLM: {} | 数据集: {}",
            health.llm.as_deref().unwrap_or("-"),
            health.dataset.as_deref().unwrap_or("-")
        );
    } else {
        warn!("⚠️ 后端状态: {}", health.status);
    }
}

/// 记录基线对比指标
pub fn log_baseline(metrics: &BaselineMetrics) {
    info!("{}", format_baseline(metrics));
}

/// 后端返回的准确率已经是百分数，提升值是百分点
fn format_baseline(metrics: &BaselineMetrics) -> String {
    format!(
        "📊 评分准确率: 系统 {:.1}% vs 基线 {:.1}% (提升 {:+.1}) | 样本 {}",
        metrics.system_accuracy,
        metrics.baseline_accuracy,
        metrics.improvement,
        metrics.dataset_size
    )
}

pub fn log_dataset_stats(stats: &DatasetStats) {
    info!(
        "📚 题库: {} 个主题 | LLM: {}",
        stats.topics_available, stats.llm_provider
    );
}

/// 打印试卷分析结果和模拟试卷
pub fn log_mock_paper(result: &PaperAnalysisResult, pdf_url: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📄 {} | 满分 {} | 时长 {}",
        result.subject(),
        result.total_marks(),
        result.estimated_duration()
    );
    if !result.key_concepts().is_empty() {
        info!("💡 核心概念: {}", result.key_concepts().join(", "));
    }
    for (level, count) in result.difficulty_distribution() {
        info!("   难度 {}: {}", level, count);
    }
    for (kind, count) in result.type_distribution() {
        info!("   题型 {}: {}", kind, count);
    }
    info!("{}", "─".repeat(60));

    let mock = &result.mock_paper;
    info!(
        "📝 模拟试卷: {} | 满分 {} | {}",
        mock.subject, mock.total_marks, mock.duration
    );
    for (pos, question) in mock.questions.iter().enumerate() {
        info!(
            "{}. [{} | {} | {} 分] {}",
            question.label(pos),
            question.topic,
            question.difficulty,
            question.marks,
            truncate_text(&question.text, 60)
        );
        for part in &question.sub_parts {
            info!("     ({}) {}", part.label, truncate_text(&part.text, 50));
        }
    }
    if let Some(url) = pdf_url {
        info!("⬇️ PDF 下载: {}", url);
    }
    info!("{}", "=".repeat(60));
}

/// 打印评分结果
pub fn log_grading_result(result: &GradingResult) {
    info!("\n{}", "=".repeat(60));
    info!(
        "{} 总分: {:.1}% | 等级 {} | 及格 {}/{}",
        result.band().icon(),
        result.total_score,
        result.grade_letter,
        result.passed_count(),
        result.question_count()
    );
    for (question, grade) in &result.grading_results {
        info!(
            "{} {}: {}/{} ({:.0}%) {}",
            grade.band().icon(),
            question,
            grade.marks_awarded,
            grade.marks_total,
            grade.percentage,
            truncate_text(&grade.feedback, 60)
        );
        for point in &grade.missing_points {
            info!("     ✗ {}", point);
        }
    }
    if !result.metrics.is_empty() {
        info!(
            "📊 F1 {:.2} | 基线 {:.2} | 样本 {}",
            result.metrics.f1_score, result.metrics.baseline, result.metrics.dataset_size
        );
    }
    if !result.feedback_text.is_empty() {
        info!("💬 {}", result.feedback_text);
    }
    info!("{}", "=".repeat(60));
}

/// 打印学习路径
pub fn log_learning_result(result: &LearningResult) {
    info!("\n{}", "=".repeat(60));
    info!("🧭 学习路径: {}", result.learning_path.join(" → "));
    info!("平均掌握度: {:.0}%", result.avg_mastery * 100.0);
    for topic in &result.topics {
        info!(
            "{} {} ({:.0}%)",
            topic.mastery_level().icon(),
            topic.topic,
            topic.mastery_percent()
        );
        if let Some(feedback) = &topic.feedback {
            info!("     {}", truncate_text(feedback, 80));
        }
    }
    if !result.feedback_text.is_empty() {
        info!("💬 {}", result.feedback_text);
    }
    info!("{}", "=".repeat(60));
}

/// 未配置学习目标时提示可选项
pub fn log_quick_goals() {
    info!("💡 可设置 LEARN_GOAL 开始主题学习，例如: {}", QUICK_GOALS.join(" / "));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("数据结构与算法", 4), "数据结构...");
    }

    #[test]
    fn test_baseline_is_printed_as_percentages() {
        let metrics = BaselineMetrics {
            baseline_accuracy: 61.2,
            system_accuracy: 89.54,
            improvement: 28.34,
            dataset_size: 480,
            ..Default::default()
        };
        assert_eq!(
            format_baseline(&metrics),
            "📊 评分准确率: 系统 89.5% vs 基线 61.2% (提升 +28.3) | 样本 480"
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
