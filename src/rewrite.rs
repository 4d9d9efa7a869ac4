//! Post-processing of raw `diff -C 1` output run on two scratch files.
//!
//! The utility numbers lines relative to the scratch files and names them in its two header
//! lines. The rewrite drops the headers, labels every hunk separator with the first line of the
//! original snippet and moves every range marker to the lines of the real source files.

use crate::diff::{RangeMarker, Side};

/// File-name header lines at the top of the utility's output.
const HEADER_LINES: usize = 2;

/// Rewrite raw context-diff output so its line numbers refer to the source files.
///
/// `label` is appended to every hunk separator; `first_line` and `second_line` are the 1-based
/// lines the two snippets start on in their files.
///
/// A separator line is labelled and emitted as is; it is never classified as a range marker,
/// even when the label itself looks like one.
pub fn rewrite_context_diff(
    raw: &str,
    label: &str,
    first_line: usize,
    second_line: usize,
) -> String {
    let first_offset = first_line.saturating_sub(1);
    let second_offset = second_line.saturating_sub(1);

    raw.split('\n')
        .skip(HEADER_LINES)
        .map(|line| {
            if is_hunk_separator(line) {
                return format!("{line} {label}");
            }
            match classify_marker(line) {
                Some(marker) => {
                    let offset = match marker.side {
                        Side::Original => first_offset,
                        Side::Modified => second_offset,
                    };
                    marker.shifted(offset).to_string()
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A line made only of `*`.
pub fn is_hunk_separator(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '*')
}

fn is_marker_char(c: char) -> bool {
    matches!(c, ' ' | '*' | '-' | ',') || c.is_ascii_digit()
}

/// Recognise a range-marker line and work out its side from the rendered text: a marker with
/// more than one `*` belongs to the first file, anything else to the second.
///
/// Returns `None` for ordinary diff lines, and for marker-shaped lines whose numbers don't parse.
pub fn classify_marker(line: &str) -> Option<RangeMarker> {
    if line.trim().is_empty()
        || !line.chars().all(is_marker_char)
        || !line.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    let side = if line.matches('*').count() > 1 {
        Side::Original
    } else {
        Side::Modified
    };
    let bare: String = line
        .chars()
        .filter(|c| !matches!(c, '*' | '-' | ' '))
        .collect();
    let numbers = bare
        .split(',')
        .map(str::parse::<usize>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(RangeMarker { side, numbers })
}
