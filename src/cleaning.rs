//! Removal of header and comment lines from a raw solver log.

use std::fs;
use std::path::Path;

use crate::error::{ConvError, Result};

/// Default first character of header/metadata lines.
pub const HEADER_MARKER: char = '<';

/// Data lines kept from a raw log, each with its original terminator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanedLog {
    lines: Vec<String>,
    dropped: usize,
}

impl CleanedLog {
    /// Retained lines in file order, terminators included.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of retained lines.
    pub fn retained(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines that started with the header marker.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Concatenation of the retained lines, exactly as they will be written.
    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    /// Overwrites `path` with the retained lines.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.contents()).map_err(|err| ConvError::io(path, err))
    }
}

/// Splits `raw` into lines and drops every line whose first non-whitespace
/// character is `marker`. Retained lines are not modified.
pub fn clean(raw: &str, marker: char) -> CleanedLog {
    let mut lines = Vec::new();
    let mut dropped = 0usize;

    for line in raw.split_inclusive('\n') {
        if line.trim().starts_with(marker) {
            dropped += 1;
        } else {
            lines.push(line.to_string());
        }
    }

    CleanedLog { lines, dropped }
}

/// Reads the log at `path` and cleans it with `marker`.
pub fn clean_file(path: &Path, marker: char) -> Result<CleanedLog> {
    let raw = fs::read_to_string(path).map_err(|err| ConvError::io(path, err))?;
    Ok(clean(&raw, marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_marker_lines_and_keeps_order() {
        let raw = "<header a\n1 2 3\n   <indented header\n4 5 6\n";
        let cleaned = clean(raw, HEADER_MARKER);
        assert_eq!(cleaned.lines(), &["1 2 3\n", "4 5 6\n"]);
        assert_eq!(cleaned.dropped(), 2);
        assert_eq!(cleaned.retained() + cleaned.dropped(), 4);
    }

    #[test]
    fn keeps_marker_inside_line_and_missing_final_newline() {
        let raw = "1 <2 3\r\n4 5 6";
        let cleaned = clean(raw, HEADER_MARKER);
        assert_eq!(cleaned.contents(), raw);
        assert_eq!(cleaned.dropped(), 0);
    }

    #[test]
    fn no_retained_line_starts_with_marker() {
        let raw = "<a\n\n  \n<b\nx\n <c\n";
        let cleaned = clean(raw, HEADER_MARKER);
        assert!(cleaned
            .lines()
            .iter()
            .all(|line| !line.trim_start().starts_with(HEADER_MARKER)));
        assert_eq!(cleaned.retained() + cleaned.dropped(), raw.lines().count());
    }

    #[test]
    fn writing_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean_file.gst");
        let raw = "<h\n1 2\n3 4\n";

        clean(raw, HEADER_MARKER).write_to(&path).unwrap();
        let first = fs::read(&path).unwrap();
        clean(raw, HEADER_MARKER).write_to(&path).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"1 2\n3 4\n");
    }
}
