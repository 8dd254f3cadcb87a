use serde::Serialize;
use std::fmt;

/// A half-open range of zero-based page indices, `[start, end)`.
///
/// Construction is unchecked so that an impossible range can still be
/// reported; use [`PageRange::fits`] before extracting.
///
/// # Examples
///
/// ```
/// use pdfbind::plan::PageRange;
///
/// let range = PageRange::new(2, 10);
/// assert_eq!(range.len(), 8);
/// assert!(range.fits(10));
/// assert_eq!(range.to_string(), "[2, 10)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRange {
    /// First page index included.
    pub start: usize,
    /// First page index excluded.
    pub end: usize,
}

impl PageRange {
    /// Create a range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering every page of a document.
    pub fn all(total_pages: usize) -> Self {
        Self::new(0, total_pages)
    }

    /// Number of pages in the range; zero when `start >= end`.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range selects no pages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the range is well-formed and lies inside a document of
    /// `total_pages` pages. An empty range at the end is accepted.
    pub fn fits(&self, total_pages: usize) -> bool {
        self.start <= self.end && self.end <= total_pages
    }

    /// Whether a zero-based index lies inside the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Iterate over the selected indices.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end.max(self.start)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
