//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `study_loop` - 会话装配
//! - 生成会话标识
//! - 创建 Result Relay，把槽位写入端交给对应控制器
//! - 持有三个控制器
//!
//! ### `app` - 终端驱动
//! - 按配置跑完一次学习闭环并打印结果
//! - 保存评分报告
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! study_loop (PaperFlow / GradeFlow / LearnFlow)
//!     ↓
//! services (PaperSource / ReportWriter)
//!     ↓
//! clients (Gateway) + infrastructure (SessionContext / ResultRelay)
//! ```

pub mod app;
pub mod study_loop;

pub use app::App;
pub use study_loop::StudyLoop;
