//! 试卷分析结果与模拟试卷

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::de::{lenient_u32, lenient_u32_map, string_or_number};

/// 难度
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// 后端给出的其他标签，原样保留
    Other(String),
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(value),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(s) => s,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    Theory,
    Coding,
    Mcq,
    Numerical,
    Diagram,
    Other(String),
}

impl From<String> for QuestionKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "theory" => QuestionKind::Theory,
            "coding" => QuestionKind::Coding,
            "mcq" => QuestionKind::Mcq,
            "numerical" => QuestionKind::Numerical,
            "diagram" => QuestionKind::Diagram,
            _ => QuestionKind::Other(value),
        }
    }
}

impl From<QuestionKind> for String {
    fn from(value: QuestionKind) -> Self {
        value.as_str().to_string()
    }
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::Theory => "theory",
            QuestionKind::Coding => "coding",
            QuestionKind::Mcq => "MCQ",
            QuestionKind::Numerical => "numerical",
            QuestionKind::Diagram => "diagram",
            QuestionKind::Other(s) => s,
        }
    }
}

impl Default for QuestionKind {
    fn default() -> Self {
        QuestionKind::Theory
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 小题
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubPart {
    #[serde(deserialize_with = "string_or_number")]
    pub label: String,
    pub text: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub marks: u32,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// 模拟试卷中的一道题
///
/// 未识别的字段保存在 `extra` 中，提交评分时原样回传。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(deserialize_with = "lenient_u32")]
    pub marks: u32,
    pub text: String,
    pub sub_parts: Vec<SubPart>,
    /// 评分时后端依据的参考答案
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_answer: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Question {
    /// 题号，缺失时按位置生成 `Q<n>`
    pub fn label(&self, position: usize) -> String {
        if self.number.trim().is_empty() {
            format!("Q{}", position + 1)
        } else {
            self.number.clone()
        }
    }
}

/// 模拟试卷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockPaper {
    pub subject: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub total_marks: u32,
    pub duration: String,
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl MockPaper {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// 原试卷的分析结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperAnalysis {
    pub subject: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub total_marks: u32,
    pub estimated_duration: String,
    pub topics: Vec<String>,
    /// 原试卷题目，仅用于展示
    pub questions: Vec<JsonValue>,
    #[serde(deserialize_with = "lenient_u32_map")]
    pub difficulty_distribution: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_u32_map")]
    pub type_distribution: BTreeMap<String, u32>,
    pub key_concepts: Vec<String>,
}

/// `POST /paper/analyse` 的响应
///
/// 创建后不可变，由 Result Relay 以 `Arc` 形式持有。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperAnalysisResult {
    pub session_id: String,
    pub analysis: PaperAnalysis,
    pub mock_paper: MockPaper,
    pub pdf_url: Option<String>,
}

impl PaperAnalysisResult {
    pub fn subject(&self) -> &str {
        &self.analysis.subject
    }

    pub fn total_marks(&self) -> u32 {
        self.analysis.total_marks
    }

    pub fn estimated_duration(&self) -> &str {
        &self.analysis.estimated_duration
    }

    pub fn key_concepts(&self) -> &[String] {
        &self.analysis.key_concepts
    }

    pub fn difficulty_distribution(&self) -> &BTreeMap<String, u32> {
        &self.analysis.difficulty_distribution
    }

    pub fn type_distribution(&self) -> &BTreeMap<String, u32> {
        &self.analysis.type_distribution
    }

    /// 评分的前置条件：必须带有非空的模拟试卷
    pub fn has_mock_paper(&self) -> bool {
        !self.mock_paper.is_empty()
    }

    /// 从 `pdf_url`（如 `/api/paper/pdf/mock_1a2b3c4d.pdf`）中取出文件名
    pub fn pdf_filename(&self) -> Option<&str> {
        self.pdf_url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }
}

/// `POST /paper/upload` 的响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaperText {
    pub text: String,
    pub filename: Option<String>,
    pub chars: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyse_response() -> JsonValue {
        json!({
            "session_id": "7f1c",
            "analysis": {
                "subject": "Data Structures and Algorithms",
                "total_marks": 100,
                "estimated_duration": "3 Hours",
                "topics": ["Trees", "Graphs"],
                "questions": [],
                "difficulty_distribution": {"easy": 3, "medium": 3, "hard": 2},
                "type_distribution": {"theory": 5, "coding": 3},
                "key_concepts": ["BST", "Dijkstra"]
            },
            "mock_paper": {
                "subject": "Data Structures and Algorithms",
                "total_marks": 100,
                "duration": "3 Hours",
                "created_at": "2026-01-01T00:00:00",
                "questions": [{
                    "number": "Q1", "topic": "Trees", "difficulty": "easy", "type": "MCQ",
                    "marks": "8", "text": "Define a BST.", "model_answer": "A binary tree...",
                    "sub_parts": [{"label": "a", "text": "Properties", "marks": 4}],
                    "rubric": ["ordering"]
                }]
            },
            "pdf_url": "/api/paper/pdf/mock_7f1c.pdf"
        })
    }

    #[test]
    fn test_decode_analyse_response() {
        let result: PaperAnalysisResult = serde_json::from_value(analyse_response()).unwrap();

        assert_eq!(result.subject(), "Data Structures and Algorithms");
        assert_eq!(result.difficulty_distribution()["hard"], 2);
        assert!(result.has_mock_paper());
        assert_eq!(result.pdf_filename(), Some("mock_7f1c.pdf"));

        let q = &result.mock_paper.questions[0];
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.kind, QuestionKind::Mcq);
        assert_eq!(q.marks, 8);
        assert_eq!(q.sub_parts[0].marks, 4);
    }

    #[test]
    fn test_mock_paper_echoes_unknown_fields_and_model_answer() {
        let result: PaperAnalysisResult = serde_json::from_value(analyse_response()).unwrap();
        let echoed = serde_json::to_value(&result.mock_paper).unwrap();

        assert_eq!(echoed["created_at"], "2026-01-01T00:00:00");
        assert_eq!(echoed["questions"][0]["model_answer"], "A binary tree...");
        assert_eq!(echoed["questions"][0]["rubric"], json!(["ordering"]));
        assert_eq!(echoed["questions"][0]["type"], "MCQ");
    }

    #[test]
    fn test_unknown_labels_are_preserved() {
        let q: Question = serde_json::from_value(json!({
            "number": 4, "difficulty": "advanced", "type": "essay", "marks": 10
        }))
        .unwrap();
        assert_eq!(q.number, "4");
        assert_eq!(q.difficulty, Difficulty::Other("advanced".into()));
        assert_eq!(q.kind.as_str(), "essay");
        assert_eq!(q.label(3), "4");
        assert_eq!(Question::default().label(3), "Q4");
    }

    #[test]
    fn test_fractional_distributions_are_rounded() {
        let result: PaperAnalysisResult = serde_json::from_value(json!({
            "analysis": {
                "difficulty_distribution": {"easy": 33.3, "medium": 33.3, "hard": 33.4},
                "type_distribution": {"theory": "5", "coding": null}
            },
            "mock_paper": analyse_response()["mock_paper"].clone()
        }))
        .unwrap();

        assert_eq!(result.difficulty_distribution()["easy"], 33);
        assert_eq!(result.difficulty_distribution()["hard"], 33);
        assert_eq!(result.type_distribution()["theory"], 5);
        assert_eq!(result.type_distribution()["coding"], 0);
        assert!(result.has_mock_paper());

        let empty: PaperAnalysis =
            serde_json::from_value(json!({"difficulty_distribution": null})).unwrap();
        assert!(empty.difficulty_distribution.is_empty());
    }

    #[test]
    fn test_missing_pdf_url() {
        let result = PaperAnalysisResult::default();
        assert_eq!(result.pdf_filename(), None);
        assert!(!result.has_mock_paper());
    }
}
