//! Loose ordering for dotted/segmented version strings
//!
//! Versions scraped from index documents rarely follow semver, so they are
//! compared segment by segment instead of being parsed:
//! - "1.9" < "1.10" (digit runs compare numerically)
//! - "2" < "2.0.1" (a missing trailing segment sorts first)
//! - "1.0a" < "1.0b" (letter runs compare lexically)
//!
//! Comparison never fails; anything that does not look like a version still
//! gets a deterministic position through the lexical fallback.

use std::cmp::Ordering;

/// One component of a version string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    /// Maximal run of ASCII digits
    Numeric(&'a str),
    /// Maximal run of anything that is neither a digit nor a separator
    Text(&'a str),
}

impl Segment<'_> {
    fn as_str(&self) -> &str {
        match self {
            Segment::Numeric(s) | Segment::Text(s) => s,
        }
    }
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Split a version string into digit runs and text runs.
///
/// Separators (`.`, `-`, `_`, `+`, ...) only delimit segments and are dropped.
fn segments(version: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start = None;
    let mut numeric = false;

    for (idx, c) in version.char_indices() {
        if is_separator(c) {
            if let Some(begin) = start.take() {
                result.push(make_segment(&version[begin..idx], numeric));
            }
            continue;
        }

        let digit = c.is_ascii_digit();
        match start {
            Some(begin) if digit != numeric => {
                result.push(make_segment(&version[begin..idx], numeric));
                start = Some(idx);
                numeric = digit;
            }
            Some(_) => {}
            None => {
                start = Some(idx);
                numeric = digit;
            }
        }
    }

    if let Some(begin) = start {
        result.push(make_segment(&version[begin..], numeric));
    }

    result
}

fn make_segment(s: &str, numeric: bool) -> Segment<'_> {
    if numeric {
        Segment::Numeric(s)
    } else {
        Segment::Text(s)
    }
}

/// Compare two digit runs by value without parsing into a fixed-width integer.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_segments(a: &Segment<'_>, b: &Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => compare_numeric(a, b),
        _ => a.as_str().cmp(b.as_str()),
    }
}

/// Compare two version strings under the loose ordering.
///
/// Segment-wise comparison decides first; when every segment is equal
/// (e.g. "1.0" vs "1-0" or "1.0" vs "1.00") the raw strings break the tie so
/// that `Ordering::Equal` is only returned for identical strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = compare_segments(l, r);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

/// Sort version strings in ascending loose order, oldest first.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}
