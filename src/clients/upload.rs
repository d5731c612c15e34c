/// 待上传的文件
///
/// 只在选择器层面提示扩展名，客户端本身不做类型或大小校验。
use std::path::Path;

use crate::error::{AppError, AppResult};

/// 选择器提示的扩展名
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf"];

/// 上传文件（名称 + 内容）
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    /// 从内存中的数据创建，MIME 按文件名推断
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).map(str::to_string);
        Self { name, bytes, mime }
    }

    /// 读取磁盘上的文件
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(path.display().to_string(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, bytes))
    }

    /// 扩展名是否在提示列表中
    pub fn has_accepted_extension(&self) -> bool {
        extension(&self.name)
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn guess_mime(name: &str) -> Option<&'static str> {
    match extension(name)?.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_is_guessed_from_extension() {
        assert_eq!(UploadFile::new("scan.JPG", vec![]).mime.as_deref(), Some("image/jpeg"));
        assert_eq!(UploadFile::new("syllabus.pdf", vec![]).mime.as_deref(), Some("application/pdf"));
        assert_eq!(UploadFile::new("notes.docx", vec![]).mime, None);
        assert_eq!(UploadFile::new("README", vec![]).mime, None);
    }

    #[test]
    fn test_extension_hint() {
        assert!(UploadFile::new("page1.png", vec![]).has_accepted_extension());
        assert!(!UploadFile::new("page1.tiff", vec![]).has_accepted_extension());
    }

    #[tokio::test]
    async fn test_from_path_reads_name_and_bytes() {
        let dir = std::env::temp_dir().join(format!("syllabus-upload-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("week1.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "week1.png");
        assert_eq!(file.bytes, b"\x89PNG".to_vec());
        assert_eq!(file.mime.as_deref(), Some("image/png"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = UploadFile::from_path("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
