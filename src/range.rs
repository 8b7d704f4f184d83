//! Selection ranges parsed from their textual forms.

use regex::Regex;

/// A selection range in a source file, all coordinates 1-based.
///
/// A column value of `0` means "unspecified". Column data is carried for
/// callers that have it, but expression matching is line-granular (see
/// [`crate::locate::expressions`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SelectionRange {
    /// Parse a selection range string.
    ///
    /// Four mutually exclusive forms are accepted, tried in this order:
    ///
    /// - `startLine:startColumn-endLine:endColumn` (full range)
    /// - `startLine-endLine` (columns default to 0)
    /// - `line:column` (end = start)
    /// - `line` (columns 0)
    ///
    /// Returns `None` for anything else.
    pub fn parse(selection: &str) -> Option<Self> {
        let full = Regex::new(r"^(\d+):(\d+)-(\d+):(\d+)$").unwrap();
        if let Some(caps) = full.captures(selection) {
            return Some(Self {
                start_line: caps[1].parse().ok()?,
                start_column: caps[2].parse().ok()?,
                end_line: caps[3].parse().ok()?,
                end_column: caps[4].parse().ok()?,
            });
        }

        let lines = Regex::new(r"^(\d+)-(\d+)$").unwrap();
        if let Some(caps) = lines.captures(selection) {
            return Some(Self {
                start_line: caps[1].parse().ok()?,
                start_column: 0,
                end_line: caps[2].parse().ok()?,
                end_column: 0,
            });
        }

        let point = Regex::new(r"^(\d+):(\d+)$").unwrap();
        if let Some(caps) = point.captures(selection) {
            let line = caps[1].parse().ok()?;
            let column = caps[2].parse().ok()?;
            return Some(Self {
                start_line: line,
                start_column: column,
                end_line: line,
                end_column: column,
            });
        }

        let single = Regex::new(r"^(\d+)$").unwrap();
        if let Some(caps) = single.captures(selection) {
            let line = caps[1].parse().ok()?;
            return Some(Self {
                start_line: line,
                start_column: 0,
                end_line: line,
                end_column: 0,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_range() {
        let range = SelectionRange::parse("3:5-7:12").unwrap();
        assert_eq!(range.start_line, 3);
        assert_eq!(range.start_column, 5);
        assert_eq!(range.end_line, 7);
        assert_eq!(range.end_column, 12);
    }

    #[test]
    fn test_parse_line_range() {
        let range = SelectionRange::parse("4-9").unwrap();
        assert_eq!(range.start_line, 4);
        assert_eq!(range.start_column, 0);
        assert_eq!(range.end_line, 9);
        assert_eq!(range.end_column, 0);
    }

    #[test]
    fn test_parse_point() {
        let range = SelectionRange::parse("6:14").unwrap();
        assert_eq!(range.start_line, 6);
        assert_eq!(range.start_column, 14);
        assert_eq!(range.end_line, 6);
        assert_eq!(range.end_column, 14);
    }

    #[test]
    fn test_parse_single_line() {
        let range = SelectionRange::parse("11").unwrap();
        assert_eq!(range.start_line, 11);
        assert_eq!(range.start_column, 0);
        assert_eq!(range.end_line, 11);
        assert_eq!(range.end_column, 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SelectionRange::parse("").is_none());
        assert!(SelectionRange::parse("abc").is_none());
        assert!(SelectionRange::parse("3:").is_none());
        assert!(SelectionRange::parse("3-").is_none());
        assert!(SelectionRange::parse("3:5-7").is_none());
        assert!(SelectionRange::parse("-4").is_none());
        assert!(SelectionRange::parse("3 - 4").is_none());
    }
}
