//! # Syllabus Explainer
//!
//! 上传课程大纲（图片或 PDF），调用提取服务得到原始文本，
//! 再调用摘要服务得到结构化字段。
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/error_reporter` - 从失败响应推导用户可读的消息
//! - `services/summary` - 摘要记录模型与宽松解码
//!
//! ### ② 客户端层（Clients）
//! - `ExtractionClient` - multipart 上传，规整提取结果
//! - `SummarizationClient` - JSON 请求，取出摘要记录
//!
//! ### ③ 流程层（Workflow）
//! - `SessionState` - 会话状态记录
//! - `transition` - 纯函数状态迁移，按代数丢弃过期结果
//! - `Session` - 执行请求并把结果送回状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 初始化、单次模式
//! - `repl` - 交互命令循环
//!
//! `render` 只读会话状态，生成纯文本视图。

pub mod clients;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ExtractionClient, SummarizationClient, UploadFile};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::App;
pub use services::SummaryRecord;
pub use workflow::{ActionStatus, Session, SessionState};
