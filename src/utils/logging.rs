/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::config::Config;

/// 已安装的日志过滤器句柄，配置加载完成后可以再调整级别
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// 按配置切换 `info`/`debug`；设置了 `RUST_LOG` 时保持不变
    pub fn set_verbose(&self, verbose: bool) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.filter.reload(EnvFilter::new(default_level(verbose))) {
            debug!("日志级别未能调整: {}", e);
        }
    }
}

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。
/// 在加载配置之前调用，配置错误也能写进日志。
/// 重复调用不会报错（测试中经常如此）。
pub fn init(verbose: bool) -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_level(verbose)), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();

    LogHandle {
        filter: handle,
        from_env,
    }
}

/// 配置加载前使用的详细日志开关，读取 `VERBOSE_LOGGING`
pub fn verbose_from_env() -> bool {
    parse_verbose(std::env::var("VERBOSE_LOGGING").ok().as_deref())
}

/// 与配置层相同的解析规则；无法解析时关闭，具体错误留给配置加载报告
fn parse_verbose(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(false)
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 Syllabus Explainer 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 服务地址: {}", config.base_url());
    info!(
        "⏱️ 请求超时: {}s (连接 {}s)",
        config.request_timeout_secs, config.connect_timeout_secs
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_text("课程大纲概要", 2), "课程...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false).set_verbose(true);
        init(true).set_verbose(false);
    }

    #[test]
    fn test_parse_verbose() {
        assert!(parse_verbose(Some("true")));
        assert!(parse_verbose(Some(" true ")));
        assert!(!parse_verbose(Some("1")));
        assert!(!parse_verbose(Some("false")));
        assert!(!parse_verbose(Some("yes please")));
        assert!(!parse_verbose(None));
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "info");
    }
}
