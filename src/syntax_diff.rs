//! The syntax diff of one definition between two files.
//!
//! Both snippets are extracted first (side A, then side B). If either boundary cannot be
//! found or either file is not text, the call answers with [`DIFF_NOT_OBTAINED_MESSAGE`]
//! instead of failing. The snippets are then compared by the configured engine:
//!
//! - [`DiffEngine::External`]: both snippets go to a scoped scratch directory, `diff -C 1` runs
//!   on them, and its output is rewritten by [`rewrite_context_diff`].
//! - [`DiffEngine::Embedded`]: [`ContextDiff`] renders the same text in-process.
//!
//! Failures of the external utility itself are never turned into the message; they are
//! returned as errors.

use std::path::{Path, PathBuf};

use crate::{
    boundary::{BoundaryDetector, BraceBoundary, DefinitionKind},
    config::{DiffEngine, SyndiffConfig},
    diff::{CONTEXT_LINES, ContextDiff},
    errors::SyndiffError,
    external::ExternalDiff,
    rewrite::rewrite_context_diff,
    snippet::{ExtractedSnippet, ScratchDir},
    utils::is_blank,
};

/// Returned in place of a diff when either definition cannot be extracted.
pub const DIFF_NOT_OBTAINED_MESSAGE: &str = "  [could not obtain diff]\n";

/// Inputs of one syntax diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    pub first_file: PathBuf,
    pub second_file: PathBuf,
    /// Name of the compared entity; only used in log messages.
    pub name: String,
    pub kind: DefinitionKind,
    /// 1-based line the definition starts on in `first_file`.
    pub first_line: usize,
    /// 1-based line the definition starts on in `second_file`.
    pub second_line: usize,
}

impl DiffRequest {
    pub fn new(
        first_file: impl Into<PathBuf>,
        second_file: impl Into<PathBuf>,
        name: impl Into<String>,
        kind: DefinitionKind,
        first_line: usize,
        second_line: usize,
    ) -> Self {
        Self {
            first_file: first_file.into(),
            second_file: second_file.into(),
            name: name.into(),
            kind,
            first_line,
            second_line,
        }
    }

    fn validate(&self) -> Result<(), SyndiffError> {
        if self.first_line == 0 || self.second_line == 0 {
            return Err(SyndiffError::InvalidArgument(format!(
                "start lines are 1-based, got {} and {}",
                self.first_line, self.second_line
            )));
        }
        Ok(())
    }
}

/// Syntax differ holding its configuration and boundary detector.
#[derive(Debug, Clone)]
pub struct SyntaxDiff<B = BraceBoundary> {
    config: SyndiffConfig,
    detector: B,
}

impl SyntaxDiff<BraceBoundary> {
    pub fn new(config: SyndiffConfig) -> Self {
        Self::with_detector(config, BraceBoundary)
    }
}

impl Default for SyntaxDiff<BraceBoundary> {
    fn default() -> Self {
        Self::new(SyndiffConfig::default())
    }
}

impl<B: BoundaryDetector> SyntaxDiff<B> {
    pub fn with_detector(config: SyndiffConfig, detector: B) -> Self {
        Self { config, detector }
    }

    pub fn config(&self) -> &SyndiffConfig {
        &self.config
    }

    /// Diff the definition described by `request`.
    ///
    /// Yields the rewritten context diff, an empty/whitespace string when there is no
    /// difference, or [`DIFF_NOT_OBTAINED_MESSAGE`].
    pub fn diff(&self, request: &DiffRequest) -> Result<String, SyndiffError> {
        request.validate()?;

        let (first, second) = match self.extract_pair(request) {
            Ok(pair) => pair,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    "could not obtain diff of {} `{}`: {}",
                    request.kind,
                    request.name,
                    e
                );
                return Ok(DIFF_NOT_OBTAINED_MESSAGE.to_string());
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(
            "diffing {} `{}` with the {} engine",
            request.kind,
            request.name,
            self.config.engine
        );
        match self.config.engine {
            DiffEngine::External => self.external_diff(&first, &second),
            DiffEngine::Embedded => Ok(ContextDiff::new(CONTEXT_LINES).render(&first, &second)),
        }
    }

    fn extract_pair(
        &self,
        request: &DiffRequest,
    ) -> Result<(ExtractedSnippet, ExtractedSnippet), SyndiffError> {
        let first = ExtractedSnippet::extract(
            &self.detector,
            &request.first_file,
            request.first_line,
            request.kind,
        )?;
        let second = ExtractedSnippet::extract(
            &self.detector,
            &request.second_file,
            request.second_line,
            request.kind,
        )?;
        Ok((first, second))
    }

    fn external_diff(
        &self,
        first: &ExtractedSnippet,
        second: &ExtractedSnippet,
    ) -> Result<String, SyndiffError> {
        let scratch = ScratchDir::create(
            self.config.scratch_root.as_deref(),
            self.config.keep_scratch,
        )?;
        let first_path = scratch.write("1", first)?;
        let second_path = scratch.write("2", second)?;

        let raw = ExternalDiff::new(&self.config.diff_program).run(&first_path, &second_path)?;
        if is_blank(&raw) {
            return Ok(raw);
        }
        Ok(rewrite_context_diff(
            &raw,
            first.label(),
            first.start,
            second.start,
        ))
    }
}

/// Diff a definition between two files with the default configuration and detector.
///
/// `kind` is one of `function`, `type` or `macro`.
pub fn syntax_diff(
    first_file: impl AsRef<Path>,
    second_file: impl AsRef<Path>,
    name: &str,
    kind: &str,
    first_line: usize,
    second_line: usize,
) -> Result<String, SyndiffError> {
    let request = DiffRequest::new(
        first_file.as_ref(),
        second_file.as_ref(),
        name,
        kind.parse()?,
        first_line,
        second_line,
    );
    SyntaxDiff::new(SyndiffConfig::default()).diff(&request)
}
