//! 会话状态
//!
//! 一次会话里唯一的可变记录。字段只能通过 [`crate::workflow::transition`]
//! 修改，外部只读。

use std::fmt::Display;

use crate::services::SummaryRecord;

/// 状态消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// 状态消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// 当前是否有请求在进行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Summarizing,
}

/// 空闲时的进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoText,
    HasText,
    HasSummary,
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub(crate) file_name: String,
    pub(crate) raw_text: String,
    pub(crate) summary: Option<SummaryRecord>,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) phase: Phase,
    /// 每次开始请求或重置都会加一，用来丢弃过期的响应
    pub(crate) generation: u64,
}

impl SessionState {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn summary(&self) -> Option<&SummaryRecord> {
        self.summary.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 上传或摘要进行中
    pub fn busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }

    pub fn stage(&self) -> Stage {
        if self.summary.is_some() {
            Stage::HasSummary
        } else if self.has_text() {
            Stage::HasText
        } else {
            Stage::NoText
        }
    }

    /// 除代数以外的字段都处于初始值
    pub fn is_pristine(&self) -> bool {
        self.file_name.is_empty()
            && self.raw_text.is_empty()
            && self.summary.is_none()
            && self.status.is_none()
            && !self.busy()
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[会话 gen#{} 阶段#{:?} 文件#{} 文本#{}字符 摘要#{}]",
            self.generation,
            self.phase,
            if self.file_name.is_empty() { "-" } else { self.file_name.as_str() },
            self.raw_text.chars().count(),
            self.summary.is_some()
        )
    }
}
