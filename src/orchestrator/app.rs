//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：构建共享的 HTTP 客户端、两个服务客户端和会话
//! 2. **单次模式**：上传指定文件，提取到文本后自动摘要，打印每一步的结果
//! 3. **交互模式**：委托 [`crate::orchestrator::repl`] 处理用户命令
//!
//! 只做调度和输出，不做业务判断。

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clients::{build_http_client, ExtractionClient, SummarizationClient, UploadFile};
use crate::config::Config;
use crate::orchestrator::repl;
use crate::render::{render, RenderOptions};
use crate::utils::logging::log_startup;
use crate::workflow::{ActionStatus, Session};

/// 生产环境使用的会话类型
pub type LiveSession = Session<ExtractionClient, SummarizationClient>;

/// 应用主结构
pub struct App {
    session: Arc<LiveSession>,
    options: RenderOptions,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let http = build_http_client(&config).context("无法创建 HTTP 客户端")?;
        let extractor = ExtractionClient::with_http(http.clone(), &config);
        let summarizer = SummarizationClient::with_http(http, &config);

        Ok(Self {
            session: Arc::new(Session::new(extractor, summarizer)),
            options: RenderOptions::from(&config),
        })
    }

    pub fn session(&self) -> &Arc<LiveSession> {
        &self.session
    }

    /// 单次模式
    ///
    /// # 返回
    /// 最终状态不是错误时返回 `true`
    pub async fn run_once(&self, path: &Path) -> Result<bool> {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("无法读取文件 {}", path.display()))?;

        if !file.has_accepted_extension() {
            warn!("⚠️ {} 不是 PNG/JPG/PDF，仍然尝试上传", file.name);
        }

        self.session.upload(Some(file)).await;
        println!("{}", render(&self.session.snapshot(), &self.options));

        if self.session.snapshot().has_text() {
            if self.session.summarize().await == ActionStatus::Completed {
                println!("{}", render(&self.session.snapshot(), &self.options));
            }
        } else {
            info!("没有提取到文本，跳过摘要");
        }

        let ok = !self
            .session
            .snapshot()
            .status()
            .map(|s| s.is_error())
            .unwrap_or(false);
        Ok(ok)
    }

    /// 交互模式
    pub async fn run_interactive(&self) -> Result<()> {
        repl::run(self.session.clone(), self.options).await
    }
}
