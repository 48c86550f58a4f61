//! 基础设施层
//!
//! 进程级共享资源：会话标识、结果中转。

pub mod result_relay;
pub mod session;

pub use result_relay::{GradeSlot, PaperSlot, ResultRelay};
pub use session::{SessionContext, SessionId};
