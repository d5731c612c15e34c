pub mod extraction_client;
pub mod summarization_client;
pub mod upload;

pub use extraction_client::{Extraction, ExtractionClient};
pub use summarization_client::SummarizationClient;
pub use upload::UploadFile;

use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::SummaryRecord;

/// 文本提取能力
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file: &UploadFile) -> AppResult<Extraction>;
}

/// 摘要能力
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> AppResult<Option<SummaryRecord>>;
}

/// 按配置构建共享的 HTTP 客户端（带超时）
pub fn build_http_client(config: &Config) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(AppError::Client)
}
