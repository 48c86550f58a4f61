//! 评分结果

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::de::lenient_f64;

/// 等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLetter {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl GradeLetter {
    pub fn as_str(self) -> &'static str {
        match self {
            GradeLetter::APlus => "A+",
            GradeLetter::A => "A",
            GradeLetter::B => "B",
            GradeLetter::C => "C",
            GradeLetter::D => "D",
            GradeLetter::F => "F",
        }
    }
}

impl fmt::Display for GradeLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分数段，用于结果展示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// ≥ 70%
    Good,
    /// ≥ 50%
    Pass,
    Fail,
}

impl ScoreBand {
    pub fn of(percentage: f64) -> Self {
        if percentage >= 70.0 {
            ScoreBand::Good
        } else if percentage >= 50.0 {
            ScoreBand::Pass
        } else {
            ScoreBand::Fail
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ScoreBand::Good => "✅",
            ScoreBand::Pass => "⚠️",
            ScoreBand::Fail => "❌",
        }
    }
}

/// 单题评分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionGrade {
    #[serde(deserialize_with = "lenient_f64")]
    pub percentage: f64,
    pub grade: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub marks_awarded: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub marks_total: f64,
    pub correct_points: Vec<String>,
    pub missing_points: Vec<String>,
    pub feedback: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub student_answer: String,
}

impl QuestionGrade {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.percentage)
    }

    pub fn passed(&self) -> bool {
        self.percentage >= 50.0
    }
}

/// 评分指标，后端没有数据时返回 `{}`，此时全部为 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub baseline: f64,
    pub dataset_size: u64,
}

impl GradingMetrics {
    pub fn is_empty(&self) -> bool {
        *self == GradingMetrics::default()
    }
}

/// `POST /grade` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub grading_results: BTreeMap<String, QuestionGrade>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_score: f64,
    pub grade_letter: GradeLetter,
    #[serde(default)]
    pub grade_report: String,
    #[serde(default)]
    pub feedback_text: String,
    #[serde(default)]
    pub metrics: GradingMetrics,
}

impl GradingResult {
    pub fn question_count(&self) -> usize {
        self.grading_results.len()
    }

    /// 得分率 ≥ 50% 的题目数
    pub fn passed_count(&self) -> usize {
        self.grading_results.values().filter(|g| g.passed()).count()
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.total_score)
    }
}

/// `POST /answers/upload` 的响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnswerText {
    pub ocr_text: String,
    pub pages: Option<u32>,
    pub engine: Option<String>,
}
