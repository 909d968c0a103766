use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::Path;

pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// A file picked from disk or pasted from the clipboard, ready for multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// One entry of a clipboard paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::BadRequest(format!("Not a file: {}", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }

    /// The first image among pasted items, like a paste box that ignores text.
    pub fn from_clipboard(items: impl IntoIterator<Item = ClipboardItem>) -> Option<Self> {
        items
            .into_iter()
            .find(|item| item.mime_type.starts_with("image/"))
            .map(|item| {
                let ext = item.mime_type.trim_start_matches("image/").to_string();
                Self {
                    file_name: format!("pasted-image.{}", ext),
                    mime_type: item.mime_type,
                    bytes: item.bytes,
                }
            })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn ensure_image(&self) -> Result<()> {
        if self.is_image() {
            Ok(())
        } else {
            Err(Error::BadRequest(format!(
                "{} is not an image ({})",
                self.file_name, self.mime_type
            )))
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
