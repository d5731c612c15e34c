/// 摘要 API 客户端
///
/// 把原始文本以 JSON 发送到摘要服务，返回结构化的摘要记录
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{build_http_client, Summarizer};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{error_reporter, SummaryRecord};
use crate::utils::truncate_text;

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

/// 摘要服务客户端
pub struct SummarizationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SummarizationClient {
    /// 创建新的摘要客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_http(build_http_client(config)?, config))
    }

    /// 复用已有的 HTTP 客户端
    pub fn with_http(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: config.summarize_endpoint(),
        }
    }

    /// 请求摘要
    ///
    /// 文本为空或全是空白时不发请求，直接返回 `Ok(None)`。
    /// 成功响应中没有 `summary` 字段时同样返回 `Ok(None)`。
    pub async fn summarize(&self, text: &str) -> AppResult<Option<SummaryRecord>> {
        if text.trim().is_empty() {
            debug!("文本为空，跳过摘要请求");
            return Ok(None);
        }

        info!("🤖 请求摘要，文本长度 {} 字符", text.chars().count());
        debug!("摘要输入预览: {}", truncate_text(text, 80));

        let response = self
            .http
            .post(&self.endpoint)
            .json(&SummarizeRequest { text })
            .send()
            .await
            .map_err(|e| {
                warn!("摘要请求发送失败: {}", e);
                AppError::network(&self.endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_reporter::read_error(response).await;
            warn!("摘要失败 (HTTP {}): {}", status.as_u16(), message);
            return Err(AppError::http(&self.endpoint, status, message));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::network(&self.endpoint, e))?;

        Ok(normalize_summary(&body))
    }
}

#[async_trait::async_trait]
impl Summarizer for SummarizationClient {
    async fn summarize(&self, text: &str) -> AppResult<Option<SummaryRecord>> {
        SummarizationClient::summarize(self, text).await
    }
}

/// 取出成功响应中的 `summary` 字段
pub fn normalize_summary(body: &[u8]) -> Option<SummaryRecord> {
    let mut value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("摘要响应不是合法 JSON，忽略: {}", e);
            return None;
        }
    };

    match value.get_mut("summary").map(Value::take) {
        Some(summary) => SummaryRecord::from_value(summary),
        None => {
            warn!("摘要响应缺少 summary 字段");
            None
        }
    }
}
