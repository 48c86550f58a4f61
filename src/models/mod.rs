pub mod artifact;
pub mod de;
pub mod grading;
pub mod learning;
pub mod paper;
pub mod system;

pub use artifact::Artifact;
pub use grading::{AnswerText, GradeLetter, GradingMetrics, GradingResult, QuestionGrade, ScoreBand};
pub use learning::{LearningQuestion, LearningResult, MasteryLevel, TopicResult, QUICK_GOALS};
pub use paper::{
    Difficulty, MockPaper, PaperAnalysis, PaperAnalysisResult, PaperText, Question, QuestionKind,
    SubPart,
};
pub use system::{BaselineMetrics, DatasetStats, HealthStatus};
