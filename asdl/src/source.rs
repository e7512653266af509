//! Types related to source files.

use std::fmt;
use std::ops::Range;

/// Byte offsets into source files.
pub type BytePos = u32;

/// One-based line numbers.
pub type LineNumber = u32;

pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Byte ranges in source files.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: BytePos,
    end: BytePos,
}

impl fmt::Debug for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteRange({}..{})", self.start, self.end)
    }
}

impl ByteRange {
    pub const fn new(start: BytePos, end: BytePos) -> Self {
        Self { start, end }
    }

    /// Shift the range so that it is relative to `offset` rather than the
    /// start of the line it was lexed from.
    pub const fn offset(self, offset: BytePos) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

impl From<ByteRange> for Range<usize> {
    fn from(range: ByteRange) -> Self {
        (range.start as usize)..(range.end as usize)
    }
}

impl From<Range<usize>> for ByteRange {
    fn from(range: Range<usize>) -> Self {
        ByteRange::new(range.start as BytePos, range.end as BytePos)
    }
}

/// Split `source` into lines, yielding the line number, the byte offset of
/// the start of the line, and the line without its terminator.
pub fn lines(source: &str) -> impl Iterator<Item = (LineNumber, BytePos, &str)> {
    assert!(
        source.len() <= MAX_SOURCE_LEN,
        "`source` must be less than 4GiB in length"
    );

    let mut offset: BytePos = 0;
    source.split_inclusive('\n').zip(1..).map(move |(text, line)| {
        let start = offset;
        offset += text.len() as BytePos;
        let text = text.strip_suffix('\n').unwrap_or(text);
        let text = text.strip_suffix('\r').unwrap_or(text);
        (line, start, text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// `ByteRange` is used a lot. Ensure it doesn't grow accidentally.
    fn byte_range_size() {
        assert_eq!(std::mem::size_of::<ByteRange>(), 8);
    }

    #[test]
    fn offset_ranges() {
        let range = ByteRange::new(2, 6).offset(10);
        assert_eq!(Range::<usize>::from(range), 12..16);
    }

    #[test]
    fn lines_track_offsets() {
        let lines = lines("ab\r\n\ncd").collect::<Vec<_>>();
        assert_eq!(lines, vec![(1, 0, "ab"), (2, 4, ""), (3, 5, "cd")]);
    }

    #[test]
    fn lines_of_empty_source() {
        assert_eq!(lines("").count(), 0);
    }
}
