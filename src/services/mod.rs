//! 业务能力层
//!
//! 每个服务只提供一种能力，不关心流程顺序：
//! - `paper_source`：拿到一段试卷文字（上传文件或内置演示试卷）
//! - `report_writer`：把评分报告写到磁盘

pub mod paper_source;
pub mod report_writer;

pub use paper_source::{DemoPaper, PaperSource, UploadedPaper, DEMO_PAPER};
pub use report_writer::ReportWriter;
