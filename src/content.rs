use anyhow::{anyhow, Result};
use std::path::Path;
use tokio::fs;

/// File content classified by whether the bytes decode as UTF-8.
#[derive(Debug, Clone)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    pub fn into_text(self) -> Option<String> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FileContent::Text(text) => text.into_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }
}

fn classify(bytes: Vec<u8>) -> FileContent {
    match String::from_utf8(bytes) {
        Ok(text) => FileContent::Text(text),
        Err(e) => FileContent::Binary(e.into_bytes()),
    }
}

/// Read a file, returning text when it decodes as UTF-8 and raw bytes
/// otherwise. A decode failure is classification, not an error; open and
/// read failures propagate to the caller.
pub async fn read(path: &Path) -> Result<FileContent> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(classify(bytes))
}

/// Blocking variant for use inside substitution callbacks, which cannot
/// suspend.
pub fn read_blocking(path: &Path) -> Result<FileContent> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(classify(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_utf8_as_text() {
        match classify(b"body { color: red; }".to_vec()) {
            FileContent::Text(text) => assert_eq!(text, "body { color: red; }"),
            FileContent::Binary(_) => panic!("UTF-8 input classified as binary"),
        }
    }

    #[test]
    fn classifies_non_utf8_as_binary() {
        let bytes = vec![0x89, 0x50, 0x4E, 0x47, 0xFF, 0xFE];
        match classify(bytes.clone()) {
            FileContent::Binary(data) => assert_eq!(data, bytes),
            FileContent::Text(_) => panic!("non-UTF-8 input classified as text"),
        }
    }

    #[test]
    fn into_bytes_preserves_text_content() {
        let content = classify(b"let x = 1;".to_vec());
        assert_eq!(content.into_bytes(), b"let x = 1;");
    }
}
