//! Extraction of a definition's lines from a source file, and the scratch directory the
//! external diff engine reads them from.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tempfile::{Builder, TempDir};

use crate::{
    boundary::{BoundaryDetector, DefinitionKind},
    errors::SyndiffError,
    utils::read_text,
};

/// The inclusive line range `[start, end]` of one definition, copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSnippet {
    pub path: PathBuf,
    pub start: usize,
    pub end: usize,
    /// Lines exactly as they appear in the source, line terminators included.
    pub text: String,
}

impl ExtractedSnippet {
    /// Resolve the end of the definition with `detector` and copy its lines out of `path`.
    pub fn extract<B: BoundaryDetector + ?Sized>(
        detector: &B,
        path: &Path,
        start: usize,
        kind: DefinitionKind,
    ) -> Result<Self, SyndiffError> {
        let source = read_text(path)?;
        let end = detector.find_definition_end_in(path, &source, start, kind)?;
        tracing::debug!("{} {}: lines {start}..={end}", kind, path.display());
        Ok(Self::from_source(path, &source, start, end))
    }

    /// Copy lines `start..=end` (1-based) out of `source`. Lines past the end of the
    /// source are silently absent.
    pub fn from_source(path: &Path, source: &str, start: usize, end: usize) -> Self {
        let skip = start.saturating_sub(1);
        let text = source
            .split_inclusive('\n')
            .skip(skip)
            .take(end.saturating_sub(skip))
            .collect();
        Self {
            path: path.to_path_buf(),
            start,
            end,
            text,
        }
    }

    /// First line of the snippet with surrounding whitespace removed; used to label hunks.
    pub fn label(&self) -> &str {
        self.text.lines().next().unwrap_or("").trim()
    }

    /// Amount added to snippet-relative line numbers to get file line numbers.
    pub fn offset(&self) -> usize {
        self.start.saturating_sub(1)
    }
}

#[derive(Debug)]
enum Location {
    Scoped(TempDir),
    Retained(PathBuf),
}

/// A per-call directory holding the two extracted snippets.
///
/// Removed when dropped unless it was created with `keep`.
#[derive(Debug)]
pub struct ScratchDir {
    location: Location,
}

impl ScratchDir {
    pub fn create(root: Option<&Path>, keep: bool) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("syndiff-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let location = if keep {
            let path = dir.keep();
            tracing::debug!("keeping scratch directory {}", path.display());
            Location::Retained(path)
        } else {
            Location::Scoped(dir)
        };
        Ok(Self { location })
    }

    pub fn path(&self) -> &Path {
        match &self.location {
            Location::Scoped(dir) => dir.path(),
            Location::Retained(path) => path,
        }
    }

    /// Write `snippet` into the directory under `name`, returning the file's path.
    pub fn write(&self, name: &str, snippet: &ExtractedSnippet) -> io::Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, &snippet.text)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::tempdir;

    use super::{ExtractedSnippet, ScratchDir};
    use crate::{
        boundary::{BoundaryDetector, BraceBoundary, DefinitionKind},
        errors::SyndiffError,
    };

    const SOURCE: &str = "int a;\n\n  int foo(void)  \n{\r\n\treturn 0;\n}";

    /// Detector that only works on loaded text.
    struct SourceOnly;

    impl BoundaryDetector for SourceOnly {
        fn find_definition_end(
            &self,
            _path: &Path,
            _start_line: usize,
            _kind: DefinitionKind,
        ) -> Result<usize, SyndiffError> {
            panic!("source should be passed in, not re-read");
        }

        fn find_definition_end_in(
            &self,
            _path: &Path,
            source: &str,
            start_line: usize,
            _kind: DefinitionKind,
        ) -> Result<usize, SyndiffError> {
            assert_eq!(source, SOURCE);
            Ok(start_line + 1)
        }
    }

    #[test]
    fn extract_hands_loaded_source_to_detector() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.c");
        fs::write(&path, SOURCE).unwrap();
        let snippet =
            ExtractedSnippet::extract(&SourceOnly, &path, 1, DefinitionKind::Type).unwrap();
        assert_eq!(snippet.end, 2);
        assert_eq!(snippet.text, "int a;\n\n");
    }

    #[test]
    fn extraction_preserves_bytes() {
        let snippet = ExtractedSnippet::from_source(Path::new("x.c"), SOURCE, 3, 6);
        assert_eq!(snippet.text, "  int foo(void)  \n{\r\n\treturn 0;\n}");
        assert_eq!(snippet.label(), "int foo(void)");
        assert_eq!(snippet.offset(), 2);
    }

    #[test]
    fn extraction_past_end_is_truncated() {
        let snippet = ExtractedSnippet::from_source(Path::new("x.c"), SOURCE, 5, 40);
        assert_eq!(snippet.text, "\treturn 0;\n}");
        let empty = ExtractedSnippet::from_source(Path::new("x.c"), SOURCE, 9, 12);
        assert_eq!(empty.text, "");
        assert_eq!(empty.label(), "");
    }

    #[test]
    fn extract_uses_detector() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.c");
        fs::write(&path, SOURCE).unwrap();
        let snippet =
            ExtractedSnippet::extract(&BraceBoundary, &path, 3, DefinitionKind::Function).unwrap();
        assert_eq!(snippet.end, 6);
        assert_eq!(snippet.text, "  int foo(void)  \n{\r\n\treturn 0;\n}");
    }

    #[test]
    fn scoped_scratch_is_removed() {
        let root = tempdir().unwrap();
        let snippet = ExtractedSnippet::from_source(Path::new("x.c"), SOURCE, 1, 1);
        let dir_path;
        {
            let scratch = ScratchDir::create(Some(root.path()), false).unwrap();
            dir_path = scratch.path().to_path_buf();
            let file = scratch.write("1", &snippet).unwrap();
            assert_eq!(fs::read_to_string(file).unwrap(), "int a;\n");
        }
        assert!(!dir_path.exists());
    }

    #[test]
    fn retained_scratch_survives_drop() {
        let root = tempdir().unwrap();
        let dir_path = {
            let scratch = ScratchDir::create(Some(root.path()), true).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(dir_path.is_dir());
        assert!(dir_path.starts_with(root.path()));
    }
}
