//! 上传文件
//!
//! 只在一次上传动作中存在于内存，从不写盘。

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

/// 内存中的上传文件（答题照片或试卷扫描件）
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    mime_type: String,
    data: Arc<[u8]>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: Arc::from(data.into()),
        }
    }

    /// 从磁盘读取，MIME 类型按扩展名推断
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("无法读取文件: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(name, mime_for_path(path), data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 字节数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// 答题上传只接受图片和 PDF（MIME 类型中包含 `image` 或 `pdf`）
    pub fn is_image_or_pdf(&self) -> bool {
        self.mime_type.contains("image") || self.mime_type.contains("pdf")
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} KB)", self.name, (self.size() + 512) / 1024)
    }
}

/// 按扩展名推断 MIME 类型
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
