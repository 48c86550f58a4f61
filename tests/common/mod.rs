//! 测试用的内存后端
//!
//! 记录每一次调用；`hold()` 之后，分析 / 手写识别 / 评分 / 学习请求会停在网络边界，
//! 直到测试调用 `release()`。

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use eduagent_client::error::{RemoteError, RemoteResult};
use eduagent_client::models::{
    AnswerText, Artifact, BaselineMetrics, DatasetStats, GradeLetter, GradingResult, HealthStatus,
    LearningResult, MockPaper, PaperAnalysis, PaperAnalysisResult, PaperText, Question,
    QuestionGrade, TopicResult,
};
use eduagent_client::{Gateway, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ExtractPaper(String),
    Analyse(String),
    ExtractAnswers(Vec<String>),
    Grade {
        answer: String,
        session: String,
        questions: usize,
    },
    Learn {
        goal: String,
        session: String,
    },
}

pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    paper_extraction: Mutex<Option<RemoteError>>,
    analysis: Mutex<RemoteResult<PaperAnalysisResult>>,
    ocr_text: Mutex<RemoteResult<String>>,
    grading: Mutex<RemoteResult<GradingResult>>,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            paper_extraction: Mutex::new(None),
            analysis: Mutex::new(Ok(paper_result("paper-session", 8))),
            ocr_text: Mutex::new(Ok("Q1. A BST keeps smaller keys on the left.".to_string())),
            grading: Mutex::new(Ok(grading_result(78.0))),
            gate: Mutex::new(None),
            entered: Notify::new(),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// 之后的试卷文字提取都返回该错误
    pub fn fail_paper_extraction(&self, err: RemoteError) {
        *self.paper_extraction.lock().unwrap() = Some(err);
    }

    pub fn set_analysis(&self, result: RemoteResult<PaperAnalysisResult>) {
        *self.analysis.lock().unwrap() = result;
    }

    pub fn set_ocr_text(&self, result: RemoteResult<String>) {
        *self.ocr_text.lock().unwrap() = result;
    }

    pub fn set_grading(&self, result: RemoteResult<GradingResult>) {
        *self.grading.lock().unwrap() = result;
    }

    /// 之后的分析 / 手写识别 / 评分 / 学习请求都会挂起
    pub fn hold(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    /// 放行一个挂起的请求
    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.notify_one();
        }
    }

    /// 等待某个请求到达网络边界
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn boundary(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn check_health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            llm: Some("groq".to_string()),
            dataset: Some("480".to_string()),
            version: Some("2.0.0".to_string()),
        }
    }

    async fn extract_paper_text(&self, artifact: &Artifact) -> RemoteResult<PaperText> {
        self.record(Call::ExtractPaper(artifact.name().to_string()));
        if let Some(err) = self.paper_extraction.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(PaperText {
            text: format!("scanned text of {}", artifact.name()),
            ..Default::default()
        })
    }

    async fn analyse_paper(&self, text: &str) -> RemoteResult<PaperAnalysisResult> {
        self.record(Call::Analyse(text.to_string()));
        self.boundary().await;
        let result = self.analysis.lock().unwrap().clone();
        result
    }

    async fn extract_answer_text(&self, artifacts: &[Artifact]) -> RemoteResult<AnswerText> {
        self.record(Call::ExtractAnswers(
            artifacts.iter().map(|a| a.name().to_string()).collect(),
        ));
        self.boundary().await;
        let text = self.ocr_text.lock().unwrap().clone()?;
        Ok(AnswerText {
            ocr_text: text,
            pages: Some(artifacts.len() as u32),
            engine: Some("easyocr".to_string()),
        })
    }

    async fn grade_answers(
        &self,
        mock_paper: &MockPaper,
        answer_text: &str,
        session_id: &SessionId,
    ) -> RemoteResult<GradingResult> {
        self.record(Call::Grade {
            answer: answer_text.to_string(),
            session: session_id.to_string(),
            questions: mock_paper.question_count(),
        });
        self.boundary().await;
        let result = self.grading.lock().unwrap().clone();
        result
    }

    async fn generate_learning_path(
        &self,
        goal: &str,
        session_id: &SessionId,
    ) -> RemoteResult<LearningResult> {
        self.record(Call::Learn {
            goal: goal.to_string(),
            session: session_id.to_string(),
        });
        self.boundary().await;
        Ok(learning_result(goal))
    }

    async fn baseline_metrics(&self) -> RemoteResult<BaselineMetrics> {
        Ok(BaselineMetrics {
            baseline_accuracy: 61.2,
            system_accuracy: 89.54,
            improvement: 28.34,
            dataset_size: 480,
            ..Default::default()
        })
    }

    async fn dataset_stats(&self) -> RemoteResult<DatasetStats> {
        Err(RemoteError::decode("/stats", "not available in tests"))
    }

    fn pdf_url(&self, filename: &str) -> String {
        format!("http://backend.test/api/paper/pdf/{}", filename)
    }
}

pub fn paper_result(session_id: &str, questions: usize) -> PaperAnalysisResult {
    PaperAnalysisResult {
        session_id: session_id.to_string(),
        analysis: PaperAnalysis {
            subject: "Data Structures and Algorithms".to_string(),
            total_marks: 100,
            estimated_duration: "3 hours".to_string(),
            key_concepts: vec!["BST".to_string(), "Dynamic Programming".to_string()],
            ..Default::default()
        },
        mock_paper: MockPaper {
            subject: "Data Structures and Algorithms".to_string(),
            total_marks: 100,
            duration: "3 hours".to_string(),
            questions: (1..=questions)
                .map(|n| Question {
                    number: n.to_string(),
                    topic: "Trees".to_string(),
                    marks: 10,
                    text: format!("Question {}", n),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        },
        pdf_url: Some("/api/paper/pdf/mock_1a2b3c4d.pdf".to_string()),
    }
}

pub fn grading_result(total: f64) -> GradingResult {
    let mut grading_results = BTreeMap::new();
    grading_results.insert(
        "Q1".to_string(),
        QuestionGrade {
            percentage: 80.0,
            grade: "A".to_string(),
            marks_awarded: 8.0,
            marks_total: 10.0,
            feedback: "Good definition".to_string(),
            ..Default::default()
        },
    );
    grading_results.insert(
        "Q2".to_string(),
        QuestionGrade {
            percentage: 30.0,
            grade: "F".to_string(),
            marks_awarded: 3.0,
            marks_total: 10.0,
            missing_points: vec!["space complexity".to_string()],
            ..Default::default()
        },
    );

    GradingResult {
        session_id: "paper-session".to_string(),
        grading_results,
        total_score: total,
        grade_letter: GradeLetter::B,
        grade_report: "GRADE REPORT\n".to_string(),
        feedback_text: "Review graph traversal.".to_string(),
        metrics: Default::default(),
    }
}

pub fn learning_result(goal: &str) -> LearningResult {
    LearningResult {
        session_id: String::new(),
        learning_path: vec![goal.to_string(), "Practice".to_string()],
        avg_mastery: 0.75,
        topics: vec![TopicResult {
            topic: goal.to_string(),
            mastery: 0.75,
            ..Default::default()
        }],
        feedback_text: "Keep going.".to_string(),
        metrics: None,
    }
}

pub fn image(name: &str) -> Artifact {
    Artifact::new(name, "image/jpeg", vec![0xffu8, 0xd8, 0xff])
}
