//! syndiff: the textual change of one function, type or macro definition between two
//! versions of a source file, rendered as a context diff whose line numbers point into the
//! original files.
//!
//! Goals
//! - Show a reviewer the syntactic change behind a semantic difference found elsewhere.
//! - Report line numbers of the real files, not of the extracted snippets.
//! - Never fail on unusable source text: such definitions are reported with a fixed message.
//!
//! Flow
//! - The boundary detector finds where each definition ends (`boundary`).
//! - Both definitions are copied out verbatim (`snippet`).
//! - `diff -C 1` runs on them (`external`) and its output is rewritten (`rewrite`), or the
//!   embedded Myers engine renders the same format directly (`diff`).
//!
//! Modules
//! - `syntax_diff`: the [`SyntaxDiff`] entry point and the [`syntax_diff()`] shortcut.
//! - `boundary`: [`BoundaryDetector`] and the default [`BraceBoundary`].
//! - `snippet`: extracted line ranges and scoped scratch directories.
//! - `external`, `rewrite`, `diff`: the two diff engines.
//! - `config`: [`SyndiffConfig`], loadable from TOML.
//! - `errors`: unified error type.
//!
//! Typical Usage
//! - `syntax_diff("old/foo.c", "new/foo.c", "foo", "function", 10, 20)?`

pub mod boundary;
pub mod config;
pub mod diff;
pub mod errors;
pub mod external;
pub mod rewrite;
pub mod snippet;
pub mod syntax_diff;
pub mod utils;

pub use boundary::{BoundaryDetector, BraceBoundary, DefinitionKind};
pub use config::{DiffEngine, SyndiffConfig};
pub use errors::SyndiffError;
pub use syntax_diff::{DIFF_NOT_OBTAINED_MESSAGE, DiffRequest, SyntaxDiff, syntax_diff};
