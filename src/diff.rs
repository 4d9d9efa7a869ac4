//! In-process context diff of two extracted snippets.
//!
//! Produces the same text as running `diff -C 1` and passing the result through
//! [`crate::rewrite::rewrite_context_diff`], without the external process: hunks come from a
//! Myers line diff grouped with one line of context, and each range marker is built with its
//! side known up front, so line offsets are applied before anything is rendered.

use std::{
    fmt::{self, Write},
    ops::Range,
};

use similar::{Algorithm, DiffOp, DiffTag, TextDiff};

use crate::snippet::ExtractedSnippet;

/// Lines of unchanged context around every change.
pub const CONTEXT_LINES: usize = 1;
/// Line that opens every hunk.
pub const HUNK_SEPARATOR: &str = "***************";
pub const NO_NEWLINE: &str = "\\ No newline at end of file";

const CONTEXT_PREFIX: &str = "  ";
const CHANGED_PREFIX: &str = "! ";
const REMOVED_PREFIX: &str = "- ";
const ADDED_PREFIX: &str = "+ ";

/// Which of the two compared snippets a range marker describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First file, marked with `*`.
    Original,
    /// Second file, marked with `-`.
    Modified,
}

impl Side {
    pub const fn polarity(&self) -> char {
        match self {
            Side::Original => '*',
            Side::Modified => '-',
        }
    }
}

/// A `*** 3,5 ***` / `--- 4 ---` line naming the lines a hunk covers on one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMarker {
    pub side: Side,
    pub numbers: Vec<usize>,
}

impl RangeMarker {
    /// Marker for the 1-based inclusive range `first..=last`. A range of one line, or an
    /// empty one (`last == first - 1`), is written as the single number `last`.
    pub fn span(side: Side, first: usize, last: usize) -> Self {
        let numbers = if last <= first {
            vec![last]
        } else {
            vec![first, last]
        };
        Self { side, numbers }
    }

    /// Move every number by `offset` lines.
    pub fn shifted(mut self, offset: usize) -> Self {
        for number in &mut self.numbers {
            *number += offset;
        }
        self
    }
}

impl fmt::Display for RangeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let polarity = self.side.polarity().to_string().repeat(3);
        let numbers: Vec<String> = self.numbers.iter().map(usize::to_string).collect();
        write!(f, "{polarity} {} {polarity}", numbers.join(","))
    }
}

/// Context diff renderer.
#[derive(Debug, Clone, Copy)]
pub struct ContextDiff {
    context: usize,
}

impl Default for ContextDiff {
    fn default() -> Self {
        Self::new(CONTEXT_LINES)
    }
}

impl ContextDiff {
    pub const fn new(context: usize) -> Self {
        Self { context }
    }

    /// Render the difference between two snippets with file-relative line numbers.
    /// Identical snippets produce an empty string.
    pub fn render(&self, old: &ExtractedSnippet, new: &ExtractedSnippet) -> String {
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(old.text.as_str(), new.text.as_str());
        let old_lines = diff.old_slices();
        let new_lines = diff.new_slices();

        let mut out = String::new();
        for group in diff.grouped_ops(self.context) {
            if group.iter().all(|op| op.tag() == DiffTag::Equal) {
                continue;
            }
            let hunk = Hunk::from_ops(&group);

            // Writing into a String cannot fail.
            let _ = writeln!(out, "{HUNK_SEPARATOR} {}", old.label());
            let _ = writeln!(out, "{}", hunk.marker(Side::Original).shifted(old.offset()));
            if hunk.old_changed {
                for &(prefix, idx) in &hunk.old_body {
                    push_body_line(&mut out, prefix, old_lines[idx]);
                }
            }
            let _ = writeln!(out, "{}", hunk.marker(Side::Modified).shifted(new.offset()));
            if hunk.new_changed {
                for &(prefix, idx) in &hunk.new_body {
                    push_body_line(&mut out, prefix, new_lines[idx]);
                }
            }
        }
        out
    }
}

/// One group of ops laid out per side: (prefix, 0-based line index) pairs.
struct Hunk {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
    old_body: Vec<(&'static str, usize)>,
    new_body: Vec<(&'static str, usize)>,
    old_changed: bool,
    new_changed: bool,
}

impl Hunk {
    fn from_ops(ops: &[DiffOp]) -> Self {
        let (old_start, old_end) = covered_span(ops.iter().map(DiffOp::old_range));
        let (new_start, new_end) = covered_span(ops.iter().map(DiffOp::new_range));
        let mut hunk = Hunk {
            old_start,
            old_end,
            new_start,
            new_end,
            old_body: Vec::new(),
            new_body: Vec::new(),
            old_changed: false,
            new_changed: false,
        };

        let mut i = 0;
        while i < ops.len() {
            if ops[i].tag() == DiffTag::Equal {
                hunk.old_body
                    .extend(ops[i].old_range().map(|idx| (CONTEXT_PREFIX, idx)));
                hunk.new_body
                    .extend(ops[i].new_range().map(|idx| (CONTEXT_PREFIX, idx)));
                i += 1;
                continue;
            }

            // Adjacent deletes and inserts form one change block.
            let mut j = i;
            while j < ops.len() && ops[j].tag() != DiffTag::Equal {
                j += 1;
            }
            let removed: Vec<usize> = ops[i..j].iter().flat_map(DiffOp::old_range).collect();
            let added: Vec<usize> = ops[i..j].iter().flat_map(DiffOp::new_range).collect();
            let (old_prefix, new_prefix) = if !removed.is_empty() && !added.is_empty() {
                (CHANGED_PREFIX, CHANGED_PREFIX)
            } else {
                (REMOVED_PREFIX, ADDED_PREFIX)
            };
            hunk.old_changed |= !removed.is_empty();
            hunk.new_changed |= !added.is_empty();
            hunk.old_body
                .extend(removed.into_iter().map(|idx| (old_prefix, idx)));
            hunk.new_body
                .extend(added.into_iter().map(|idx| (new_prefix, idx)));
            i = j;
        }
        hunk
    }

    fn marker(&self, side: Side) -> RangeMarker {
        let (start, end) = match side {
            Side::Original => (self.old_start, self.old_end),
            Side::Modified => (self.new_start, self.new_end),
        };
        RangeMarker::span(side, start + 1, end)
    }
}

/// Smallest range holding every non-empty range of one side. Empty ranges only position
/// the span when the side has no lines in the hunk at all; an op's empty range may sit past
/// the lines of its neighbours.
fn covered_span(ranges: impl Iterator<Item = Range<usize>> + Clone) -> (usize, usize) {
    let filled = ranges.clone().filter(|r| !r.is_empty());
    match (
        filled.clone().map(|r| r.start).min(),
        filled.map(|r| r.end).max(),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            let start = ranges.map(|r| r.start).min().unwrap_or(0);
            (start, start)
        }
    }
}

fn push_body_line(out: &mut String, prefix: &str, line: &str) {
    match line.strip_suffix('\n') {
        Some(text) => {
            let _ = writeln!(out, "{prefix}{text}");
        }
        None => {
            let _ = writeln!(out, "{prefix}{line}");
            let _ = writeln!(out, "{NO_NEWLINE}");
        }
    }
}
