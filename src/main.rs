use std::path::PathBuf;

use anyhow::Result;
use syllabus_explainer::utils::logging;
use syllabus_explainer::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    let log = logging::init(logging::verbose_from_env());

    // 加载配置
    let config_path =
        std::env::var("SYLLABUS_CONFIG").unwrap_or_else(|_| "syllabus.toml".to_string());
    let config = Config::load(&config_path).map_err(|e| {
        error!("❌ 配置加载失败 ({}): {}", config_path, e);
        e
    })?;
    log.set_verbose(config.verbose_logging);

    let app = App::initialize(config)?;

    // 有文件参数时单次运行，否则进入交互模式
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            if !app.run_once(&path).await? {
                std::process::exit(1);
            }
        }
        None => app.run_interactive().await?,
    }

    Ok(())
}
