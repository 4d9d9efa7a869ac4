//! Locating where a definition ends, given the line it starts on.
//!
//! The rest of the crate only depends on the [`BoundaryDetector`] trait. [`BraceBoundary`] is the
//! default detector for C-like sources: it follows brace depth for functions, the terminating
//! semicolon for types and backslash continuations for macros, while ignoring anything inside
//! string literals, character literals and comments.

use std::{fmt, path::Path, str::FromStr};

use crate::{errors::SyndiffError, utils::read_text};

/// The sort of definition being compared; selects how its last line is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DefinitionKind {
    #[default]
    Function,
    Type,
    Macro,
}

impl DefinitionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Function => "function",
            DefinitionKind::Type => "type",
            DefinitionKind::Macro => "macro",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = SyndiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "function" => Ok(DefinitionKind::Function),
            "type" => Ok(DefinitionKind::Type),
            "macro" => Ok(DefinitionKind::Macro),
            other => Err(SyndiffError::InvalidArgument(format!(
                "unknown definition kind `{other}`"
            ))),
        }
    }
}

/// Finds the last line (1-based, inclusive) of the definition starting at `start_line`.
///
/// Implementations fail with [`SyndiffError::BoundaryNotFound`] when no end exists and with
/// [`SyndiffError::Decode`] when the file is not text.
pub trait BoundaryDetector {
    fn find_definition_end(
        &self,
        path: &Path,
        start_line: usize,
        kind: DefinitionKind,
    ) -> Result<usize, SyndiffError>;

    /// Like [`find_definition_end`](Self::find_definition_end) for a file whose contents are
    /// already loaded as `source`. The default goes back to `path`.
    fn find_definition_end_in(
        &self,
        path: &Path,
        _source: &str,
        start_line: usize,
        kind: DefinitionKind,
    ) -> Result<usize, SyndiffError> {
        self.find_definition_end(path, start_line, kind)
    }
}

/// Default detector for C-like sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceBoundary;

impl BraceBoundary {
    /// Same as [`BoundaryDetector::find_definition_end`] but over text already in memory.
    /// Returns `None` when the definition never ends.
    pub fn end_in_text(text: &str, start_line: usize, kind: DefinitionKind) -> Option<usize> {
        if start_line == 0 {
            return None;
        }
        let lines = text.lines().enumerate().skip(start_line - 1);
        match kind {
            DefinitionKind::Macro => {
                for (idx, line) in lines {
                    if !line.trim_end().ends_with('\\') {
                        return Some(idx + 1);
                    }
                }
                None
            }
            DefinitionKind::Function | DefinitionKind::Type => {
                let mut scanner = Scanner::default();
                for (idx, line) in lines {
                    if scanner.feed(line, kind) {
                        return Some(idx + 1);
                    }
                }
                None
            }
        }
    }
}

impl BoundaryDetector for BraceBoundary {
    fn find_definition_end(
        &self,
        path: &Path,
        start_line: usize,
        kind: DefinitionKind,
    ) -> Result<usize, SyndiffError> {
        let text = read_text(path)?;
        self.find_definition_end_in(path, &text, start_line, kind)
    }

    fn find_definition_end_in(
        &self,
        path: &Path,
        source: &str,
        start_line: usize,
        kind: DefinitionKind,
    ) -> Result<usize, SyndiffError> {
        Self::end_in_text(source, start_line, kind).ok_or_else(|| SyndiffError::BoundaryNotFound {
            path: path.to_path_buf(),
            line: start_line,
            kind,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Lexeme {
    #[default]
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// Brace-depth tracker carried across lines; block comments may span lines.
#[derive(Debug, Default)]
struct Scanner {
    state: Lexeme,
    depth: usize,
    opened: bool,
}

impl Scanner {
    /// Consume one line, returning true if the definition ends on it.
    fn feed(&mut self, line: &str, kind: DefinitionKind) -> bool {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match self.state {
                Lexeme::LineComment => break,
                Lexeme::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        self.state = Lexeme::Code;
                    }
                }
                Lexeme::Str | Lexeme::Char => {
                    let quote = if self.state == Lexeme::Str { '"' } else { '\'' };
                    if c == '\\' {
                        chars.next();
                    } else if c == quote {
                        self.state = Lexeme::Code;
                    }
                }
                Lexeme::Code => match c {
                    '/' if chars.peek() == Some(&'/') => self.state = Lexeme::LineComment,
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        self.state = Lexeme::BlockComment;
                    }
                    '"' => self.state = Lexeme::Str,
                    '\'' => self.state = Lexeme::Char,
                    '{' => {
                        self.depth += 1;
                        self.opened = true;
                    }
                    '}' => {
                        self.depth = self.depth.saturating_sub(1);
                        if kind == DefinitionKind::Function && self.opened && self.depth == 0 {
                            return true;
                        }
                    }
                    ';' if kind == DefinitionKind::Type && self.depth == 0 => return true,
                    _ => {}
                },
            }
        }
        // Only block comments survive a line break.
        if self.state != Lexeme::BlockComment {
            self.state = Lexeme::Code;
        }
        false
    }
}
