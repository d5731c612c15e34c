use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 提取 / 摘要服务的基础地址
    pub api_base_url: String,
    /// 单个请求的总超时（秒），OCR 和模型推理都可能较慢
    pub request_timeout_secs: u64,
    /// 建立连接的超时（秒）
    pub connect_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 原始文本预览的最大字符数
    pub preview_chars: usize,
    /// 重要日期最多展示条数
    pub max_important_dates: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            verbose_logging: false,
            preview_chars: 1000,
            max_important_dates: 10,
        }
    }
}

impl Config {
    /// 只从环境变量读取，缺失的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 解析 TOML 配置文本，缺失的键使用默认值
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    /// 读取配置文件（若存在），再用环境变量覆盖
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let base = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::io(path.display().to_string(), e))?;
            Self::from_toml_str(&content, &path.display().to_string())?
        } else {
            Self::default()
        };

        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: std::env::var("SYLLABUS_API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: env_parse("SYLLABUS_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            connect_timeout_secs: env_parse("SYLLABUS_CONNECT_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.connect_timeout_secs),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            preview_chars: env_parse("SYLLABUS_PREVIEW_CHARS", "usize")?.unwrap_or(self.preview_chars),
            max_important_dates: env_parse("SYLLABUS_MAX_IMPORTANT_DATES", "usize")?
                .unwrap_or(self.max_important_dates),
        })
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: "不能为空".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: format!("'{}' 必须以 http:// 或 https:// 开头", base),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "必须大于 0".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "connect_timeout_secs",
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 去掉末尾斜杠的基础地址
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn extract_endpoint(&self) -> String {
        format!("{}/extract", self.base_url())
    }

    pub fn summarize_endpoint(&self) -> String {
        format!("{}/summarize", self.base_url())
    }
}

fn env_parse<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
