//! Claimed byte ranges of a segment.
//!
//! Higher-priority patterns claim their spans first; any later candidate that
//! touches a claimed range is dropped whole.

/// Sorted, non-overlapping set of half-open `[start, end)` ranges.
#[derive(Debug, Clone, Default)]
pub struct ClaimedSpans {
    spans: Vec<(usize, usize)>,
}

impl ClaimedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first span that ends after `pos`.
    fn first_ending_after(&self, pos: usize) -> usize {
        self.spans.partition_point(|&(_, end)| end <= pos)
    }

    /// Whether `[start, end)` intersects any claimed span.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        self.spans
            .get(self.first_ending_after(start))
            .is_some_and(|&(s, _)| s < end)
    }

    /// End of the claimed span containing `pos`, if any.
    pub fn covering(&self, pos: usize) -> Option<usize> {
        self.spans
            .get(self.first_ending_after(pos))
            .filter(|&&(s, _)| s <= pos)
            .map(|&(_, e)| e)
    }

    /// Claim `[start, end)`.
    ///
    /// Returns false (and claims nothing) for an empty range or one that
    /// overlaps an existing claim.
    pub fn claim(&mut self, start: usize, end: usize) -> bool {
        if start >= end || self.overlaps(start, end) {
            return false;
        }
        let at = self.spans.partition_point(|&(s, _)| s < start);
        self.spans.insert(at, (start, end));
        true
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.spans.iter().copied()
    }
}
