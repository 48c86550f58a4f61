//! 终端驱动 - 编排层
//!
//! ## 职责
//!
//! 按配置依次跑完一次学习闭环，并把每个控制器的结果打印到终端：
//!
//! 1. **后端状态**：健康检查、基线指标、题库统计（并发请求，只用于展示）
//! 2. **试卷分析**：`PAPER_FILE` 指定的文件，未设置时用内置演示试卷
//! 3. **答题评分**：配置了答题照片或手动答案时执行，成功后保存评分报告
//! 4. **主题学习**：配置了学习目标时执行
//!
//! 评分和学习的失败只记录日志，不影响后续步骤；试卷分析失败则直接结束。

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::clients::{ApiClient, Gateway};
use crate::config::Config;
use crate::models::Artifact;
use crate::orchestrator::study_loop::StudyLoop;
use crate::services::ReportWriter;
use crate::utils::logging::{
    log_baseline, log_dataset_stats, log_grading_result, log_health, log_learning_result,
    log_mock_paper, log_quick_goals, log_startup,
};

/// 应用主结构
pub struct App {
    config: Config,
    study: StudyLoop,
    reports: ReportWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config).context("无法创建 HTTP 客户端")?;
        Ok(Self::with_gateway(config, Arc::new(client)))
    }

    /// 使用指定的 Gateway（测试时可以注入假的后端）
    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let reports = ReportWriter::new(&config.report_dir);
        Self {
            study: StudyLoop::new(gateway),
            reports,
            config,
        }
    }

    pub fn study(&self) -> &StudyLoop {
        &self.study
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config, self.study.session().id());

        self.show_backend_status().await;
        self.run_paper().await?;

        if self.has_answers() {
            self.run_grading().await?;
        } else {
            info!("ℹ️ 未配置 ANSWER_FILES / ANSWER_TEXT，跳过评分");
        }

        match self.config.learn_goal.as_deref() {
            Some(goal) => self.run_learning(goal).await,
            None => log_quick_goals(),
        }

        info!("🎉 全部流程结束");
        Ok(())
    }

    async fn show_backend_status(&self) {
        let gateway = self.study.gateway();
        let (health, baseline, stats) = futures::join!(
            gateway.check_health(),
            gateway.baseline_metrics(),
            gateway.dataset_stats()
        );

        log_health(&health);
        match baseline {
            Ok(metrics) => log_baseline(&metrics),
            Err(e) => debug!("基线指标不可用: {}", e),
        }
        match stats {
            Ok(stats) => log_dataset_stats(&stats),
            Err(e) => debug!("题库统计不可用: {}", e),
        }
    }

    async fn run_paper(&self) -> Result<()> {
        let upload = match self.config.paper_file.as_deref() {
            Some(path) => Some(Artifact::from_path(path).await?),
            None => None,
        };

        let result = self
            .study
            .paper()
            .analyse(upload)
            .await
            .context("试卷分析失败")?;

        let pdf_url = result
            .pdf_filename()
            .map(|name| self.study.gateway().pdf_url(name));
        log_mock_paper(&result, pdf_url.as_deref());
        Ok(())
    }

    fn has_answers(&self) -> bool {
        !self.config.answer_files.is_empty()
            || self
                .config
                .answer_text
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }

    async fn run_grading(&self) -> Result<()> {
        let grade = self.study.grade();

        if let Some(text) = &self.config.answer_text {
            grade.set_manual_text(text.clone());
        }

        let mut artifacts = Vec::with_capacity(self.config.answer_files.len());
        for path in &self.config.answer_files {
            artifacts.push(Artifact::from_path(path).await?);
        }
        let offered = artifacts.len();
        let accepted = grade.add_artifacts(artifacts);
        if accepted < offered {
            warn!("⚠️ {} 个文件不是图片或 PDF，已忽略", offered - accepted);
        }

        match grade.submit().await {
            Ok(result) => {
                log_grading_result(&result);
                self.reports.write(&result).await?;
            }
            Err(e) => error!("❌ 评分未完成: {}", e),
        }
        Ok(())
    }

    async fn run_learning(&self, goal: &str) {
        match self.study.learn().run(goal).await {
            Ok(result) => log_learning_result(&result),
            Err(e) => error!("❌ 主题学习未完成: {}", e),
        }
    }
}
