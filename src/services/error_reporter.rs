//! 错误消息推导 - 业务能力层
//!
//! 把任意失败的 HTTP 响应变成一条给用户看的消息，永不失败。
//!
//! 推导顺序：
//! 1. 响应体按 JSON 解析，读取 `error` 字段
//! 2. 解析失败或没有该字段：使用原始响应体文本
//! 3. 响应体为空：使用状态码生成消息

use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// 读取失败响应并推导消息
///
/// 响应体只读取一次（字节），JSON 解析与纯文本回退都基于同一份字节，
/// 所以 JSON 解析失败后仍然可以拿到原始文本。
pub async fn read_error(response: Response) -> String {
    let status = response.status();
    match response.bytes().await {
        Ok(body) => derive_message(status, &body),
        Err(e) => {
            warn!("读取错误响应体失败 (HTTP {}): {}", status.as_u16(), e);
            status_message(status)
        }
    }
}

/// 从状态码和响应体推导消息
pub fn derive_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = error_field(&value) {
            return message;
        }
        debug!("错误响应是 JSON 但没有可用的 error 字段，回退到原始文本");
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status_message(status)
}

/// 读取 `error` 字段
///
/// `null`、`false`、`0` 和空白字符串视为缺失；字符串原样返回，不做裁剪。
fn error_field(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 只根据状态码生成的消息
pub fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_wins() {
        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": "bad file"}"#);
        assert_eq!(msg, "bad file");
    }

    #[test]
    fn test_json_without_error_field_falls_back_to_body() {
        let body = br#"{"detail": "quota exceeded"}"#;
        let msg = derive_message(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(msg, r#"{"detail": "quota exceeded"}"#);
    }

    #[test]
    fn test_blank_error_field_falls_back_to_body() {
        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": ""}"#);
        assert_eq!(msg, r#"{"error": ""}"#);
    }

    #[test]
    fn test_error_string_is_not_trimmed() {
        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": "  line one\nline two\n"}"#);
        assert_eq!(msg, "  line one\nline two\n");
    }

    #[test]
    fn test_falsy_error_field_falls_back_to_body() {
        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": false, "detail": "x"}"#);
        assert_eq!(msg, r#"{"error": false, "detail": "x"}"#);

        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": 0}"#);
        assert_eq!(msg, r#"{"error": 0}"#);

        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": 0.0}"#);
        assert_eq!(msg, r#"{"error": 0.0}"#);
    }

    #[test]
    fn test_truthy_scalar_error_field_is_serialized() {
        assert_eq!(derive_message(StatusCode::BAD_REQUEST, br#"{"error": true}"#), "true");
        assert_eq!(derive_message(StatusCode::BAD_REQUEST, br#"{"error": 42}"#), "42");
    }

    #[test]
    fn test_non_string_error_field_is_serialized() {
        let msg = derive_message(StatusCode::BAD_REQUEST, br#"{"error": {"code": 7}}"#);
        assert_eq!(msg, r#"{"code":7}"#);
    }

    #[test]
    fn test_unparsable_body_uses_plain_text() {
        let msg = derive_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            b"<html><body>Internal Server Error</body></html>\n",
        );
        assert_eq!(msg, "<html><body>Internal Server Error</body></html>");
    }

    #[test]
    fn test_empty_body_uses_status_code() {
        assert_eq!(derive_message(StatusCode::BAD_GATEWAY, b""), "HTTP 502 Bad Gateway");
        assert_eq!(derive_message(StatusCode::BAD_GATEWAY, b"   \n"), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_unknown_status_has_bare_code() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(derive_message(status, b""), "HTTP 599");
    }

    #[test]
    fn test_invalid_utf8_body_still_produces_text() {
        let msg = derive_message(StatusCode::BAD_REQUEST, &[0xff, 0xfe, b'x']);
        assert!(!msg.is_empty());
    }
}
