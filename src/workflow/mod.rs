//! 流程层
//!
//! 三个控制器各自驱动一个用户旅程，状态都是显式的有限状态机 (`FlowState`)：
//! - `PaperFlow`：idle → extracting → analysing → done
//! - `GradeFlow`：idle → ocr → grading → done
//! - `LearnFlow`：idle → loading → done
//!
//! 每个控制器同一时间只允许一轮运行，三者之间互不影响。

pub mod flow_state;
pub mod grade_flow;
pub mod learn_flow;
pub mod paper_flow;

pub use flow_state::{FlowState, GradeStage, LearnStage, PaperStage};
pub use grade_flow::{GradeFlow, GradeState};
pub use learn_flow::{LearnFlow, LearnState};
pub use paper_flow::{PaperFlow, PaperState};
