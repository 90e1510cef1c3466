use std::fmt::Display;

/// Represents a position in source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SourcePosition {
    /// The 0-based index of the character in the input stream.
    pub index: usize,
    /// The 0-based byte offset of the character in the input stream.
    pub byte_offset: usize,
    /// The 1-based line number.
    pub line: usize,
    /// The 1-based column number.
    pub column: usize,
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self {
            index: 0,
            byte_offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{},{}", self.line, self.column))
    }
}

impl SourcePosition {
    /// Returns the position immediately following the given character, assuming
    /// the character starts at this position.
    ///
    /// # Arguments
    ///
    /// * `c` - The character being stepped over.
    #[must_use]
    pub const fn after(&self, c: char) -> Self {
        if c == '\n' {
            Self {
                index: self.index + 1,
                byte_offset: self.byte_offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                index: self.index + 1,
                byte_offset: self.byte_offset + c.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

#[cfg(feature = "diagnostics")]
impl From<&SourcePosition> for miette::SourceOffset {
    fn from(position: &SourcePosition) -> Self {
        position.byte_offset.into()
    }
}

/// Represents a span within source text.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SourceSpan {
    /// The start position.
    pub start: SourcePosition,
    /// The end position of the span (exclusive).
    pub end: SourcePosition,
}

impl SourceSpan {
    /// Returns the length of the span in characters.
    pub const fn length(&self) -> usize {
        self.end.index - self.start.index
    }

    /// Returns true if the span covers no characters.
    pub const fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Returns the byte range covered by the span, suitable for slicing the
    /// source text it was produced from.
    pub const fn byte_range(&self) -> std::ops::Range<usize> {
        self.start.byte_offset..self.end.byte_offset
    }
}

#[cfg(feature = "diagnostics")]
impl From<&SourceSpan> for miette::SourceSpan {
    fn from(span: &SourceSpan) -> Self {
        Self::new(
            span.start.byte_offset.into(),
            span.end.byte_offset - span.start.byte_offset,
        )
    }
}
