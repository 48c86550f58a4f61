//! 学习路径结果

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::de::{lenient_f64, lenient_u32};

/// 快捷学习目标
pub const QUICK_GOALS: [&str; 6] = [
    "Data Structures & Algorithms",
    "Machine Learning",
    "Databases & SQL",
    "Operating Systems",
    "Computer Networks",
    "Web Development",
];

/// 掌握程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryLevel {
    /// ≥ 0.8
    Strong,
    /// ≥ 0.7
    Solid,
    NeedsWork,
}

impl MasteryLevel {
    pub fn of(mastery: f64) -> Self {
        if mastery >= 0.8 {
            MasteryLevel::Strong
        } else if mastery >= 0.7 {
            MasteryLevel::Solid
        } else {
            MasteryLevel::NeedsWork
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MasteryLevel::Strong => "🌟",
            MasteryLevel::Solid => "✅",
            MasteryLevel::NeedsWork => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningQuestion {
    /// easy | medium | hard | advanced
    pub difficulty: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub marks: u32,
    pub question: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicResult {
    pub topic: String,
    /// 0–1
    #[serde(deserialize_with = "lenient_f64")]
    pub mastery: f64,
    pub content: Option<String>,
    pub questions: Option<Vec<LearningQuestion>>,
    pub feedback: Option<String>,
}

impl TopicResult {
    pub fn mastery_level(&self) -> MasteryLevel {
        MasteryLevel::of(self.mastery)
    }

    pub fn mastery_percent(&self) -> f64 {
        (self.mastery * 100.0).clamp(0.0, 100.0)
    }
}

/// `POST /learn` 的响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningResult {
    pub session_id: String,
    pub learning_path: Vec<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub avg_mastery: f64,
    #[serde(alias = "topics_covered")]
    pub topics: Vec<TopicResult>,
    pub feedback_text: String,
    pub metrics: Option<JsonValue>,
}
