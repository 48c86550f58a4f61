/// 后端 API 客户端
///
/// `Gateway` 的 HTTP 实现，封装所有与后端的请求/响应交互
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clients::gateway::Gateway;
use crate::config::Config;
use crate::error::{ConfigError, RemoteError, RemoteResult};
use crate::infrastructure::SessionId;
use crate::models::{
    AnswerText, Artifact, BaselineMetrics, DatasetStats, GradingResult, HealthStatus,
    LearningResult, MockPaper, PaperAnalysisResult, PaperText,
};

#[derive(Serialize)]
struct AnalyseRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GradeRequest<'a> {
    mock_paper: &'a MockPaper,
    ocr_text: &'a str,
    session_id: &'a str,
}

#[derive(Serialize)]
struct LearnRequest<'a> {
    goal: &'a str,
    session_id: &'a str,
}

/// 后端 API 客户端
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// 使用自定义的 reqwest 客户端
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        debug!("GET {}", path);
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| RemoteError::unreachable(path, &e))?;
        Self::decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::unreachable(path, &e))?;
        Self::decode(path, response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> RemoteResult<T> {
        debug!("POST {} (multipart)", path);
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemoteError::unreachable(path, &e))?;
        Self::decode(path, response).await
    }

    /// 非成功状态转为 `RemoteError::Status`，成功时反序列化响应体
    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> RemoteResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::unreachable(path, &e))?;

        if !status.is_success() {
            let err = RemoteError::from_response(path, status, &body);
            warn!("后端返回错误 {} ({}): {}", path, status.as_u16(), err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::decode(path, e))
    }

    fn file_part(artifact: &Artifact, path: &str) -> RemoteResult<Part> {
        Part::bytes(artifact.bytes().to_vec())
            .file_name(artifact.name().to_string())
            .mime_str(artifact.mime_type())
            .map_err(|e| RemoteError::decode(path, e))
    }
}

#[async_trait]
impl Gateway for ApiClient {
    async fn check_health(&self) -> HealthStatus {
        match self.get_json::<HealthStatus>("/health").await {
            Ok(status) => status,
            Err(e) => {
                warn!("健康检查失败，标记为离线: {}", e);
                HealthStatus::offline()
            }
        }
    }

    async fn extract_paper_text(&self, artifact: &Artifact) -> RemoteResult<PaperText> {
        const PATH: &str = "/paper/upload";
        let form = Form::new().part("file", Self::file_part(artifact, PATH)?);
        self.post_form(PATH, form).await
    }

    async fn analyse_paper(&self, text: &str) -> RemoteResult<PaperAnalysisResult> {
        self.post_json("/paper/analyse", &AnalyseRequest { text }).await
    }

    async fn extract_answer_text(&self, artifacts: &[Artifact]) -> RemoteResult<AnswerText> {
        const PATH: &str = "/answers/upload";
        let mut form = Form::new();
        for artifact in artifacts {
            form = form.part("files", Self::file_part(artifact, PATH)?);
        }
        self.post_form(PATH, form).await
    }

    async fn grade_answers(
        &self,
        mock_paper: &MockPaper,
        answer_text: &str,
        session_id: &SessionId,
    ) -> RemoteResult<GradingResult> {
        let body = GradeRequest {
            mock_paper,
            ocr_text: answer_text,
            session_id: session_id.as_str(),
        };
        self.post_json("/grade", &body).await
    }

    async fn generate_learning_path(
        &self,
        goal: &str,
        session_id: &SessionId,
    ) -> RemoteResult<LearningResult> {
        let body = LearnRequest {
            goal,
            session_id: session_id.as_str(),
        };
        self.post_json("/learn", &body).await
    }

    async fn baseline_metrics(&self) -> RemoteResult<BaselineMetrics> {
        self.get_json("/evaluate/baseline").await
    }

    async fn dataset_stats(&self) -> RemoteResult<DatasetStats> {
        self.get_json("/stats").await
    }

    fn pdf_url(&self, filename: &str) -> String {
        self.url(&format!("/paper/pdf/{}", filename))
    }
}
