//! Shared helpers for reading source files as text and inspecting diff output.

use std::{fs, path::Path};

use crate::errors::SyndiffError;

/// Read a whole file and decode it as UTF-8.
///
/// A missing or unreadable file is an I/O error; bytes that are not UTF-8 are
/// reported as [`SyndiffError::Decode`].
pub fn read_text(path: &Path) -> Result<String, SyndiffError> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| SyndiffError::Decode(path.to_path_buf()))
}

/// True for the empty string and for strings made only of whitespace.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{is_blank, read_text};
    use crate::errors::SyndiffError;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t\n"));
        assert!(!is_blank("  x\n"));
    }

    #[test]
    fn read_text_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.c");
        fs::write(&path, [b'i', b'n', b't', 0xE9, b'\n']).unwrap();
        assert!(matches!(read_text(&path), Err(SyndiffError::Decode(p)) if p == path));
    }

    #[test]
    fn read_text_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_text(&dir.path().join("absent.c")).unwrap_err();
        assert!(matches!(err, SyndiffError::IOError(_)));
    }
}
