//! 交互命令循环
//!
//! 上传和摘要放到独立任务里执行，命令循环不会被网络请求阻塞，
//! 请求进行中仍然可以输入 `reset`。被禁用的动作直接拒绝，不会派发。

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::clients::{Summarizer, TextExtractor, UploadFile};
use crate::error::AppResult;
use crate::orchestrator::app::LiveSession;
use crate::render::{controls, render, RenderOptions};
use crate::workflow::{ActionStatus, Session};

const HELP: &str = "\
Commands:
  upload <path>   extract text from a PNG/JPG/PDF syllabus
  summarize       summarize the extracted text
  reset           clear the session
  show            print the current session
  help            show this help
  quit            exit";

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Upload(PathBuf),
    Summarize,
    Reset,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> UserCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => UserCommand::Empty,
        "upload" | "u" if !rest.is_empty() => {
            UserCommand::Upload(PathBuf::from(rest.trim_matches('"')))
        }
        "summarize" | "s" => UserCommand::Summarize,
        "reset" | "r" => UserCommand::Reset,
        "show" => UserCommand::Show,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        _ => UserCommand::Unknown(line.to_string()),
    }
}

/// 文件选择器
///
/// 和文件输入框一样，已经选中的文件不能再选一次；上传尝试结束后
/// （成功或失败）清空选择，同一个文件才可以再次选择。
/// 克隆共享同一份选择，供上传任务结束时清空。
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    selected: Arc<Mutex<Option<PathBuf>>>,
}

impl FilePicker {
    /// 选择文件；与当前选择相同时返回 `false`
    pub fn select(&self, path: PathBuf) -> bool {
        let mut selected = self.lock();
        if selected.as_ref() == Some(&path) {
            return false;
        }
        *selected = Some(path);
        true
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn selected(&self) -> Option<PathBuf> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.selected.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 选择文件并上传
///
/// 无论读取文件失败、上传失败还是结果被丢弃，返回前都会清空选择。
/// 文件已被选中（上一次尝试还没结束）时不做任何事。
pub async fn pick_and_upload<E, S>(
    session: &Session<E, S>,
    picker: &FilePicker,
    path: PathBuf,
) -> AppResult<ActionStatus>
where
    E: TextExtractor,
    S: Summarizer,
{
    if !picker.select(path.clone()) {
        debug!("{} 已被选中，忽略重复选择", path.display());
        return Ok(ActionStatus::NoOp);
    }

    let result = match UploadFile::from_path(&path).await {
        Ok(file) => Ok(session.upload(Some(file)).await),
        Err(e) => Err(e),
    };
    picker.clear();
    result
}

/// 运行交互循环，直到 `quit` 或输入结束
pub async fn run(session: Arc<LiveSession>, options: RenderOptions) -> Result<()> {
    println!("{}", HELP);

    let mut watcher = session.subscribe();
    let render_task = tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let state = watcher.borrow_and_update().clone();
            println!("{}", render(&state, &options));
        }
    });

    let picker = FilePicker::default();
    let mut inflight = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        while inflight.try_join_next().is_some() {}

        match parse_command(&line) {
            UserCommand::Upload(path) => {
                if !controls(&session.snapshot()).upload {
                    println!("Upload is disabled while a request is in progress.");
                    continue;
                }
                let session = session.clone();
                let picker = picker.clone();
                inflight.spawn(async move {
                    match pick_and_upload(&session, &picker, path).await {
                        Ok(status) => status,
                        Err(e) => {
                            warn!("读取文件失败: {}", e);
                            println!("✗ {}", e.user_message("Upload failed"));
                            ActionStatus::NoOp
                        }
                    }
                });
            }
            UserCommand::Summarize => {
                if !controls(&session.snapshot()).summarize {
                    println!("Summarize is disabled: no extracted text, or a request is in progress.");
                    continue;
                }
                let session = session.clone();
                inflight.spawn(async move { session.summarize().await });
            }
            UserCommand::Reset => {
                picker.clear();
                session.reset();
            }
            UserCommand::Show => println!("{}", render(&session.snapshot(), &options)),
            UserCommand::Help => println!("{}", HELP),
            UserCommand::Quit => break,
            UserCommand::Empty => {}
            UserCommand::Unknown(input) => {
                debug!("未知命令: {}", input);
                println!("Unknown command: {} (type `help`)", input);
            }
        }
    }

    inflight.abort_all();
    render_task.abort();
    Ok(())
}
