//! Subresource range types.
//!
//! Image views select a window of array layers and mip levels out of their
//! subjacent image, buffer views select a byte window out of their buffer.
//! Both are half-open `[offset, offset + length)` ranges.

use std::fmt;

/// A half-open range of array layers or mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceRange {
    /// First slice covered by the range.
    pub offset: u32,
    /// Number of slices covered by the range.
    pub length: u32,
}

impl SliceRange {
    /// Create a range covering `[offset, offset + length)`.
    pub fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Range covering the first `length` slices.
    pub fn from_start(length: u32) -> Self {
        Self { offset: 0, length }
    }

    /// One past the last slice covered by the range.
    ///
    /// Widened to `u64` so degenerate offsets near `u32::MAX` cannot wrap.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }

    /// Whether the range covers no slices.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether two half-open ranges share at least one slice.
    ///
    /// Empty ranges overlap nothing, including themselves.
    pub fn overlaps(&self, other: &SliceRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && u64::from(self.offset) < other.end()
            && u64::from(other.offset) < self.end()
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &SliceRange) -> bool {
        self.offset <= other.offset && other.end() <= self.end()
    }
}

impl Default for SliceRange {
    fn default() -> Self {
        Self {
            offset: 0,
            length: 1,
        }
    }
}

impl fmt::Display for SliceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

/// A half-open byte range within a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteRange {
    /// First byte covered by the range.
    pub offset: u64,
    /// Number of bytes covered by the range.
    pub length: u64,
}

impl ByteRange {
    /// Create a range covering `[offset, offset + length)`.
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// One past the last byte covered by the range.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// Whether the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether two half-open byte ranges share at least one byte.
    ///
    /// Empty ranges overlap nothing, including themselves.
    pub fn overlaps(&self, other: &ByteRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.offset < other.end()
            && other.offset < self.end()
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SliceRange::new(0, 4), SliceRange::new(2, 6), true)]
    #[case(SliceRange::new(0, 4), SliceRange::new(4, 4), false)]
    #[case(SliceRange::new(4, 4), SliceRange::new(0, 4), false)]
    #[case(SliceRange::new(0, 8), SliceRange::new(2, 2), true)]
    #[case(SliceRange::new(3, 1), SliceRange::new(3, 1), true)]
    #[case(SliceRange::new(0, 0), SliceRange::new(0, 4), false)]
    #[case(SliceRange::new(2, 0), SliceRange::new(0, 4), false)]
    #[case(SliceRange::new(2, 0), SliceRange::new(2, 0), false)]
    fn test_slice_overlap(
        #[case] a: SliceRange,
        #[case] b: SliceRange,
        #[case] expected: bool,
    ) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn test_slice_containment() {
        let outer = SliceRange::new(2, 6);
        assert!(outer.contains(&SliceRange::new(2, 6)));
        assert!(outer.contains(&SliceRange::new(4, 2)));
        assert!(!outer.contains(&SliceRange::new(0, 4)));
        assert!(!outer.contains(&SliceRange::new(6, 4)));
    }

    #[test]
    fn test_slice_end() {
        assert_eq!(SliceRange::new(3, 5).end(), 8);
        assert_eq!(SliceRange::from_start(4).end(), 4);
    }

    #[test]
    fn test_slice_end_does_not_wrap() {
        let range = SliceRange::new(u32::MAX, u32::MAX);
        assert_eq!(range.end(), u64::from(u32::MAX) * 2);
        assert!(!range.overlaps(&SliceRange::new(0, 4)));
    }

    #[rstest]
    #[case(ByteRange::new(0, 64), ByteRange::new(32, 64), true)]
    #[case(ByteRange::new(0, 64), ByteRange::new(64, 64), false)]
    #[case(ByteRange::new(128, 0), ByteRange::new(0, 256), false)]
    fn test_byte_overlap(#[case] a: ByteRange, #[case] b: ByteRange, #[case] expected: bool) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(SliceRange::new(2, 4).to_string(), "[2, 6)");
        assert_eq!(ByteRange::new(0, 16).to_string(), "[0, 16)");
    }
}
