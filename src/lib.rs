//! # EduAgent Client
//!
//! 把一份试卷变成个人学习闭环：上传试卷 → 生成模拟试卷 → 提交手写答案 → 评分反馈，
//! 另有独立的主题学习流程。推理能力全部在后端，本 crate 负责驱动流程。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 会话标识 `SessionContext`、结果中转 `ResultRelay`
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - `Gateway` 定义后端能力，`ApiClient` 是 HTTP 实现
//!
//! ### ③ 业务能力层（Services）
//! - `PaperSource` - 试卷文字来源（上传文件 / 内置演示试卷）
//! - `ReportWriter` - 写评分报告
//!
//! ### ④ 流程层（Workflow）
//! - `PaperFlow` - extracting → analysing → done
//! - `GradeFlow` - ocr → grading → done
//! - `LearnFlow` - loading → done
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/study_loop` - 一次会话的装配
//! - `orchestrator/app` - 终端驱动
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ApiClient, Gateway};
pub use config::Config;
pub use error::{ConfigError, FlowError, FlowResult, GuardError, RemoteError, RemoteResult};
pub use infrastructure::{ResultRelay, SessionContext, SessionId};
pub use orchestrator::{App, StudyLoop};
pub use workflow::{FlowState, GradeFlow, LearnFlow, PaperFlow};
