//! Range partitioning for dispatch calls
//!
//! Splits `[0, iterations)` into a fixed number of consecutive half-open
//! chunks. Chunk size is `iterations / pieces` (integer division); the last
//! chunk's upper bound is always exactly `iterations`, so the remainder is
//! absorbed at the tail and no element is ever dropped.

/// One half-open sub-range `[start, end)` of an iteration space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRange {
    pub start: i64,
    pub end: i64,
}

impl SubRange {
    #[inline]
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partition `[0, iterations)` into exactly `pieces` consecutive sub-ranges.
///
/// Always returns `pieces` entries, even when `iterations < pieces` - the
/// surplus entries are empty (`start == end`). Every submitted task must
/// still signal the completion barrier, so empty ranges are emitted rather
/// than skipped.
///
/// # Panics
///
/// Debug-asserts `pieces >= 1` and `iterations >= 0`; callers validate both
/// before dispatching.
pub fn partition(iterations: i64, pieces: usize) -> Vec<SubRange> {
    debug_assert!(pieces >= 1);
    debug_assert!(iterations >= 0);

    let chunk = iterations / pieces as i64;
    let mut ranges = Vec::with_capacity(pieces);
    for i in 0..pieces as i64 {
        let start = i * chunk;
        // Last chunk absorbs the remainder.
        let end = if i == pieces as i64 - 1 {
            iterations
        } else {
            (i + 1) * chunk
        };
        ranges.push(SubRange { start, end });
    }
    ranges
}
