//! 控制器状态机
//!
//! 三个控制器共用同一个状态形状：
//!
//! ```text
//! Idle ──begin──▶ Running(stage) ──advance──▶ Running(next) ──finish──▶ Done(result)
//!                      │                            │
//!                      └───────────fail─────────────┴──────────────▶ Failed(error)
//!
//! reset: 任意状态 ──▶ Idle
//! ```
//!
//! 每次 `begin` 发放一张代次票据 (`Ticket`)。`reset` 或新一轮运行会让旧票据失效，
//! 旧运行在网络调用返回后发现票据过期，结果直接丢弃 (`FlowError::Superseded`)，
//! 不会改写状态，也不会写入 Result Relay。

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{FlowError, FlowResult, GuardError};

/// 控制器状态
#[derive(Debug)]
pub enum FlowState<S, R> {
    /// 空闲，可以开始新一轮
    Idle,
    /// 正在执行某个阶段
    Running(S),
    /// 已完成
    Done(Arc<R>),
    /// 已失败，可直接重新开始
    Failed(FlowError),
}

impl<S, R> FlowState<S, R> {
    /// 是否处于非终止状态（此时拒绝新的运行）
    pub fn is_busy(&self) -> bool {
        matches!(self, FlowState::Running(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Done(_) | FlowState::Failed(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FlowState::Idle)
    }

    pub fn stage(&self) -> Option<&S> {
        match self {
            FlowState::Running(stage) => Some(stage),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&Arc<R>> {
        match self {
            FlowState::Done(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FlowError> {
        match self {
            FlowState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<S: Clone, R> Clone for FlowState<S, R> {
    fn clone(&self) -> Self {
        match self {
            FlowState::Idle => FlowState::Idle,
            FlowState::Running(stage) => FlowState::Running(stage.clone()),
            FlowState::Done(result) => FlowState::Done(Arc::clone(result)),
            FlowState::Failed(err) => FlowState::Failed(err.clone()),
        }
    }
}

impl<S: fmt::Display, R> fmt::Display for FlowState<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::Idle => f.write_str("idle"),
            FlowState::Running(stage) => write!(f, "{}", stage),
            FlowState::Done(_) => f.write_str("done"),
            FlowState::Failed(_) => f.write_str("error"),
        }
    }
}

/// 试卷分析阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperStage {
    Extracting,
    Analysing,
}

/// 评分阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStage {
    Ocr,
    Grading,
}

/// 学习阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnStage {
    Loading,
}

impl fmt::Display for PaperStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaperStage::Extracting => "extracting",
            PaperStage::Analysing => "analysing",
        })
    }
}

impl fmt::Display for GradeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GradeStage::Ocr => "ocr",
            GradeStage::Grading => "grading",
        })
    }
}

impl fmt::Display for LearnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("loading")
    }
}

/// 一轮运行的代次票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// 单个控制器的状态单元
///
/// 状态的所有修改都在 watch 通道的写锁内完成，检查票据和写入是原子的。
pub(crate) struct FlowCell<S, R> {
    name: &'static str,
    state: watch::Sender<FlowState<S, R>>,
    generation: AtomicU64,
}

impl<S, R> FlowCell<S, R>
where
    S: Clone + fmt::Display,
{
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            name,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> FlowState<S, R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState<S, R>> {
        self.state.subscribe()
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// 开始新一轮。正在运行时返回 `Busy`，状态不变
    pub fn begin(&self, stage: S) -> Result<Ticket, GuardError> {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            let next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("[{}] {} → {} (run #{})", self.name, state, stage, next);
            *state = FlowState::Running(stage);
            ticket = Some(Ticket(next));
            true
        });

        ticket.ok_or_else(|| {
            warn!("[{}] ⏳ 上一轮还在运行，拒绝新的请求", self.name);
            GuardError::Busy { flow: self.name }
        })
    }

    /// 进入下一阶段
    pub fn advance(&self, ticket: Ticket, stage: S) -> FlowResult<()> {
        let mut current = false;
        self.state.send_if_modified(|state| {
            current = self.is_current(ticket);
            if current {
                debug!("[{}] {} → {}", self.name, state, stage);
                *state = FlowState::Running(stage);
            }
            current
        });

        if current {
            Ok(())
        } else {
            Err(self.superseded())
        }
    }

    /// 票据仍有效时在状态锁内执行 `effect`，状态本身不变
    pub fn with_current(&self, ticket: Ticket, effect: impl FnOnce()) -> FlowResult<()> {
        let mut current = false;
        self.state.send_if_modified(|_| {
            current = self.is_current(ticket);
            if current {
                effect();
            }
            false
        });

        if current {
            Ok(())
        } else {
            Err(self.superseded())
        }
    }

    /// 成功结束。`publish` 与状态写入在同一把锁内执行，过期的运行不会调用它
    pub fn finish(
        &self,
        ticket: Ticket,
        result: Arc<R>,
        publish: impl FnOnce(Arc<R>),
    ) -> FlowResult<Arc<R>> {
        let mut current = false;
        self.state.send_if_modified(|state| {
            current = self.is_current(ticket);
            if current {
                publish(Arc::clone(&result));
                *state = FlowState::Done(Arc::clone(&result));
            }
            current
        });

        if current {
            debug!("[{}] → done", self.name);
            Ok(result)
        } else {
            Err(self.superseded())
        }
    }

    /// 失败结束，返回调用方应当返回的错误
    pub fn fail(&self, ticket: Ticket, err: FlowError) -> FlowError {
        let mut current = false;
        self.state.send_if_modified(|state| {
            current = self.is_current(ticket);
            if current {
                *state = FlowState::Failed(err.clone());
            }
            current
        });

        if current {
            err
        } else {
            warn!("[{}] 过期运行的错误被丢弃: {}", self.name, err);
            self.superseded()
        }
    }

    /// 回到 Idle，并让所有在途运行失效
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            if !state.is_idle() {
                debug!("[{}] {} → idle (reset)", self.name, state);
            }
            *state = FlowState::Idle;
        });
    }

    fn superseded(&self) -> FlowError {
        warn!("[{}] 运行已被重置，结果丢弃", self.name);
        FlowError::Superseded
    }
}
