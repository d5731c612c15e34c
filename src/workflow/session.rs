//! 会话驱动 - 流程层
//!
//! 核心职责：把用户动作交给纯迁移函数，执行它要求的请求，再把结果送回。
//!
//! 流程顺序：
//! 1. upload → 提取服务 → 原始文本
//! 2. summarize → 摘要服务 → 摘要记录
//! 3. reset（任何时候都可以）
//!
//! 状态放在 `watch` 通道里，渲染层订阅即可在每次变化后重绘。
//! 请求期间不持有任何锁，所以 `reset` 可以在请求进行中调用；
//! 之后返回的旧结果按代数丢弃。

use tokio::sync::watch;
use tracing::{info, warn};

use crate::clients::{Summarizer, TextExtractor, UploadFile};
use crate::workflow::session_state::SessionState;
use crate::workflow::transition::{transition, Action, Command, Disposition};

/// 动作执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// 请求完成，结果已写入状态（成功或失败都算）
    Completed,
    /// 请求完成，但期间会话被重置或开始了新请求，结果已丢弃
    Superseded,
    /// 已有请求在进行，动作被拒绝
    Blocked,
    /// 没有输入，什么也没做
    NoOp,
}

/// 一次用户会话
pub struct Session<E, S> {
    extractor: E,
    summarizer: S,
    state: watch::Sender<SessionState>,
}

impl<E, S> Session<E, S>
where
    E: TextExtractor,
    S: Summarizer,
{
    /// 创建新的会话，所有字段为空
    pub fn new(extractor: E, summarizer: S) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            extractor,
            summarizer,
            state,
        }
    }

    /// 当前状态的拷贝
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// 上传文件并提取文本
    ///
    /// `None` 表示用户没有选中文件，直接返回 [`ActionStatus::NoOp`]。
    pub async fn upload(&self, file: Option<UploadFile>) -> ActionStatus {
        let Some(file) = file else {
            return ActionStatus::NoOp;
        };

        let (disposition, command) = self.dispatch(Action::Upload {
            file_name: file.name.clone(),
        });
        let generation = match (disposition, command) {
            (Disposition::Applied, Some(Command::Extract { generation })) => generation,
            (disposition, _) => return rejected(disposition),
        };

        info!("[会话 gen#{}] 📄 开始提取: {}", generation, file.name);

        let outcome = self
            .extractor
            .extract(&file)
            .await
            .map_err(|e| e.user_message("Upload failed"));

        let (disposition, _) = self.dispatch(Action::ExtractionSettled {
            generation,
            outcome,
        });
        self.settled(generation, disposition, "提取")
    }

    /// 对已提取的文本请求摘要
    pub async fn summarize(&self) -> ActionStatus {
        let (disposition, command) = self.dispatch(Action::Summarize);
        let (generation, text) = match (disposition, command) {
            (Disposition::Applied, Some(Command::Summarize { generation, text })) => {
                (generation, text)
            }
            (disposition, _) => return rejected(disposition),
        };

        info!("[会话 gen#{}] ✨ 开始摘要", generation);

        let outcome = self
            .summarizer
            .summarize(&text)
            .await
            .map_err(|e| e.user_message("Summarize failed"));

        let (disposition, _) = self.dispatch(Action::SummarizationSettled {
            generation,
            outcome,
        });
        self.settled(generation, disposition, "摘要")
    }

    /// 清空会话；不会取消进行中的请求，但它的结果会被丢弃
    pub fn reset(&self) {
        self.dispatch(Action::Reset);
        info!("🔄 会话已重置 {}", *self.state.borrow());
    }

    fn dispatch(&self, action: Action) -> (Disposition, Option<Command>) {
        let mut result = (Disposition::Stale, None);
        self.state.send_if_modified(|state| {
            let step = transition(state, action);
            let changed = step.disposition == Disposition::Applied;
            *state = step.state;
            result = (step.disposition, step.command);
            changed
        });
        result
    }

    fn settled(&self, generation: u64, disposition: Disposition, what: &str) -> ActionStatus {
        if disposition == Disposition::Applied {
            info!("[会话 gen#{}] ✓ {}结束 {}", generation, what, *self.state.borrow());
            ActionStatus::Completed
        } else {
            warn!(
                "[会话 gen#{}] ⚠️ {}结果已过期（当前 gen#{}），丢弃",
                generation,
                what,
                self.state.borrow().generation()
            );
            ActionStatus::Superseded
        }
    }
}

fn rejected(disposition: Disposition) -> ActionStatus {
    match disposition {
        Disposition::Blocked => {
            warn!("⚠️ 有请求正在进行，动作被拒绝");
            ActionStatus::Blocked
        }
        _ => ActionStatus::NoOp,
    }
}
