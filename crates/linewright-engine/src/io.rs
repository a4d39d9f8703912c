use std::fs;
use std::path::{Path, PathBuf};

use crate::document::RopeDocument;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not valid UTF-8")]
    NotUtf8(PathBuf),
}

/// Read a text file into a document, bytes untouched
pub fn read_document(path: &Path) -> Result<RopeDocument, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    RopeDocument::from_bytes(&bytes).map_err(|_| IoError::NotUtf8(path.to_path_buf()))
}

/// Write a document back to disk
pub fn write_document(path: &Path, document: &RopeDocument) -> Result<(), IoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document.text()).map_err(IoError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn round_trips_bytes_exactly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/file.txt");
        let doc = RopeDocument::from_text("a  \r\nb\r\n");
        write_document(&path, &doc).unwrap();
        let read = read_document(&path).unwrap();
        assert_eq!(read.text(), "a  \r\nb\r\n");
        assert_eq!(read.line_count(), 3);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn rejects_binary_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_document(&path), Err(IoError::NotUtf8(_))));
    }
}
