use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span inside a template file.
///
/// All line/column values are 1-based for human-readable error messages.
/// A zero span means the upstream compiler did not record a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "line")]
    pub start_line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    pub end_line: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Whether the upstream compiler left this span unset.
    pub fn is_unknown(&self) -> bool {
        self.start_line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "?:?")
        } else {
            write!(f, "{}:{}", self.start_line, self.start_col)
        }
    }
}
