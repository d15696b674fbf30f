/// A contiguous span of text, `start` plus `length` in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextSpan {
    pub start: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Span covering `start..end`. `end` must not be before `start`.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end()
    }

    /// Same span moved forward by `delta`.
    pub fn shifted(self, delta: usize) -> Self {
        Self::new(self.start + delta, self.length)
    }
}

impl From<std::ops::Range<usize>> for TextSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}
