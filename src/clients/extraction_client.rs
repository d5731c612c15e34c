/// 文本提取 API 客户端
///
/// 把文件以 multipart 上传到提取服务，并把返回结果规整成纯文本
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{build_http_client, upload::UploadFile, TextExtractor};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::error_reporter;

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 去掉首尾空白后的文本
    pub text: String,
    /// 服务端报告的字符数
    pub characters_found: Option<u64>,
}

impl Extraction {
    /// 展示用的字符数：优先服务端报告的值，缺失或为 0 时使用文本长度
    pub fn character_count(&self) -> u64 {
        self.characters_found
            .filter(|n| *n > 0)
            .unwrap_or(self.text.chars().count() as u64)
    }
}

/// 提取服务客户端
pub struct ExtractionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExtractionClient {
    /// 创建新的提取客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_http(build_http_client(config)?, config))
    }

    /// 复用已有的 HTTP 客户端
    pub fn with_http(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: config.extract_endpoint(),
        }
    }

    /// 上传文件并提取文本
    ///
    /// # 参数
    /// - `file`: 待上传的文件
    ///
    /// # 返回
    /// 成功时返回规整后的文本；非 2xx 状态返回 [`AppError::Http`]
    pub async fn extract(&self, file: &UploadFile) -> AppResult<Extraction> {
        info!("📤 上传文件 {} ({} 字节)", file.name, file.bytes.len());

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime).map_err(AppError::Client)?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("提取请求发送失败: {}", e);
                AppError::network(&self.endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_reporter::read_error(response).await;
            warn!("提取失败 (HTTP {}): {}", status.as_u16(), message);
            return Err(AppError::http(&self.endpoint, status, message));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::network(&self.endpoint, e))?;

        let extraction = normalize_extraction(&body);
        debug!(
            "提取完成: {} 个字符 (服务端报告 {:?})",
            extraction.text.chars().count(),
            extraction.characters_found
        );
        Ok(extraction)
    }
}

#[async_trait::async_trait]
impl TextExtractor for ExtractionClient {
    async fn extract(&self, file: &UploadFile) -> AppResult<Extraction> {
        ExtractionClient::extract(self, file).await
    }
}

/// 规整提取服务的成功响应
///
/// 文本可能在 `text` 或 `raw_text` 字段中，优先取非空的 `text`。
/// 响应体不是 JSON 时按空文本处理，不视为错误。
pub fn normalize_extraction(body: &[u8]) -> Extraction {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("提取响应不是合法 JSON，按空文本处理: {}", e);
            Value::Null
        }
    };

    let text = ["text", "raw_text"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .trim()
        .to_string();

    let characters_found = value.get("characters_found").and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    Extraction {
        text,
        characters_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_is_trimmed() {
        let extraction =
            normalize_extraction(br#"{"text": "  Hello World  ", "characters_found": 11}"#);
        assert_eq!(extraction.text, "Hello World");
        assert_eq!(extraction.characters_found, Some(11));
        assert_eq!(extraction.character_count(), 11);
    }

    #[test]
    fn test_alternate_field_name() {
        let extraction = normalize_extraction(br#"{"raw_text": "X"}"#);
        assert_eq!(extraction.text, "X");
        assert_eq!(extraction.characters_found, None);
        assert_eq!(extraction.character_count(), 1);
    }

    #[test]
    fn test_empty_text_falls_through_to_raw_text() {
        let extraction = normalize_extraction(br#"{"text": "", "raw_text": "fallback"}"#);
        assert_eq!(extraction.text, "fallback");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let extraction = normalize_extraction(br#"{"pages": 3}"#);
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.character_count(), 0);
    }

    #[test]
    fn test_malformed_body_is_not_an_error() {
        let extraction = normalize_extraction(b"<html>ok</html>");
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.characters_found, None);
    }

    #[test]
    fn test_zero_count_falls_back_to_length() {
        let extraction = normalize_extraction(br#"{"text": "abc", "characters_found": 0}"#);
        assert_eq!(extraction.character_count(), 3);
    }

    #[test]
    fn test_count_as_string_is_accepted() {
        let extraction = normalize_extraction(br#"{"text": "abc", "characters_found": "42"}"#);
        assert_eq!(extraction.characters_found, Some(42));
    }
}
