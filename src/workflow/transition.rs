//! 状态迁移 - 纯函数
//!
//! `transition(state, action)` 不做 IO，只返回新状态和需要执行的请求。
//! 请求结果回来后再以 `*Settled` 动作送回，代数不匹配的结果直接丢弃。

use crate::clients::Extraction;
use crate::services::SummaryRecord;
use crate::workflow::session_state::{Phase, SessionState, StatusMessage};

/// 会话动作
#[derive(Debug, Clone)]
pub enum Action {
    /// 用户选择了文件
    Upload { file_name: String },
    /// 用户点击摘要
    Summarize,
    /// 用户点击重置
    Reset,
    /// 提取请求结束
    ExtractionSettled {
        generation: u64,
        outcome: Result<Extraction, String>,
    },
    /// 摘要请求结束
    SummarizationSettled {
        generation: u64,
        outcome: Result<Option<SummaryRecord>, String>,
    },
}

/// 需要驱动层执行的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Extract { generation: u64 },
    Summarize { generation: u64, text: String },
}

/// 动作的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 已应用
    Applied,
    /// 有请求在进行，动作被拒绝
    Blocked,
    /// 没有可摘要的文本，什么也不做
    NoOp,
    /// 结果属于已被取代的代数，丢弃
    Stale,
}

/// 一次迁移
#[derive(Debug, Clone)]
pub struct Step {
    pub state: SessionState,
    pub command: Option<Command>,
    pub disposition: Disposition,
}

impl Step {
    fn unchanged(state: &SessionState, disposition: Disposition) -> Self {
        Self {
            state: state.clone(),
            command: None,
            disposition,
        }
    }

    fn applied(state: SessionState, command: Option<Command>) -> Self {
        Self {
            state,
            command,
            disposition: Disposition::Applied,
        }
    }
}

/// 提取成功时的提示文本
pub fn extracted_message(characters: u64) -> String {
    format!(
        "✓ Extracted {} characters. Click \"Summarize\" to analyze.",
        characters
    )
}

pub fn transition(state: &SessionState, action: Action) -> Step {
    match action {
        Action::Upload { file_name } => {
            if state.busy() {
                return Step::unchanged(state, Disposition::Blocked);
            }
            let generation = state.generation + 1;
            let next = SessionState {
                file_name,
                raw_text: String::new(),
                summary: None,
                status: None,
                phase: Phase::Uploading,
                generation,
            };
            Step::applied(next, Some(Command::Extract { generation }))
        }

        Action::Summarize => {
            if state.busy() {
                return Step::unchanged(state, Disposition::Blocked);
            }
            if !state.has_text() {
                return Step::unchanged(state, Disposition::NoOp);
            }
            let generation = state.generation + 1;
            let next = SessionState {
                summary: None,
                status: None,
                phase: Phase::Summarizing,
                generation,
                ..state.clone()
            };
            let text = next.raw_text.clone();
            Step::applied(next, Some(Command::Summarize { generation, text }))
        }

        Action::Reset => Step::applied(
            SessionState {
                generation: state.generation + 1,
                ..SessionState::default()
            },
            None,
        ),

        Action::ExtractionSettled {
            generation,
            outcome,
        } => {
            if generation != state.generation || state.phase != Phase::Uploading {
                return Step::unchanged(state, Disposition::Stale);
            }
            let mut next = SessionState {
                phase: Phase::Idle,
                ..state.clone()
            };
            match outcome {
                Ok(extraction) => {
                    next.status = Some(StatusMessage::success(extracted_message(
                        extraction.character_count(),
                    )));
                    next.raw_text = extraction.text;
                }
                Err(message) => {
                    next.status = Some(StatusMessage::error(message));
                }
            }
            Step::applied(next, None)
        }

        Action::SummarizationSettled {
            generation,
            outcome,
        } => {
            if generation != state.generation || state.phase != Phase::Summarizing {
                return Step::unchanged(state, Disposition::Stale);
            }
            let mut next = SessionState {
                phase: Phase::Idle,
                ..state.clone()
            };
            match outcome {
                Ok(summary) => next.summary = summary.filter(|_| state.has_text()),
                Err(message) => next.status = Some(StatusMessage::error(message)),
            }
            Step::applied(next, None)
        }
    }
}
