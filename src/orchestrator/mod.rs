//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 构建客户端和会话
//! - 单次模式：上传 → 摘要 → 打印
//!
//! ### `repl` - 交互命令循环
//! - 解析用户命令
//! - 按控件可用性拒绝或派发动作
//! - 订阅状态变化并重绘
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (App / repl)
//!     ↓
//! workflow::Session (会话状态机)
//!     ↓
//! clients (提取 / 摘要)
//!     ↓
//! services (错误消息推导 / 摘要模型)
//! ```

pub mod app;
pub mod repl;

// 重新导出主要类型
pub use app::{App, LiveSession};
pub use repl::{parse_command, pick_and_upload, FilePicker, UserCommand};
