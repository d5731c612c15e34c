use reqwest::StatusCode;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求未能发出，或响应未能完整接收
    #[error("{endpoint} 网络请求失败: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务返回非 2xx 状态
    ///
    /// `message` 由 [`crate::services::error_reporter`] 从响应体推导，
    /// Display 只输出它本身，这就是用户看到的文本。
    #[error("{message}")]
    Http {
        endpoint: String,
        status: StatusCode,
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 文件读取错误
    #[error("读取文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {0}")]
    Client(#[source] reqwest::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建 HTTP 状态错误
    pub fn http(endpoint: impl Into<String>, status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Http {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// 创建文件读取错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 写入会话状态消息槽的文本
    ///
    /// HTTP 错误直接使用推导出的消息；其余错误使用 `fallback`
    /// （例如 "Upload failed"）加上底层原因。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            AppError::Http { status, .. } => format!("{}: HTTP {}", fallback, status.as_u16()),
            AppError::Network { source, .. } if source.is_timeout() => {
                format!("{}: request timed out", fallback)
            }
            AppError::Network { source, .. } if source.is_connect() => {
                format!("{}: could not connect to the service", fallback)
            }
            AppError::Network { source, .. } => format!("{}: {}", fallback, source),
            AppError::Io { path, source } => format!("{}: cannot read {} ({})", fallback, path, source),
            other => format!("{}: {}", fallback, other),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
