//! Closed integer intervals

use std::ops::RangeInclusive;

/// Sort and coalesce ranges.
///
/// The result is sorted, non-overlapping and non-adjacent: ranges that
/// overlap or touch (`next.start <= prev.end + 1`) are merged.
pub fn merge(mut ranges: Vec<RangeInclusive<i64>>) -> Vec<RangeInclusive<i64>> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_unstable_by_key(|r| *r.start());

    let mut merged: Vec<RangeInclusive<i64>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if *range.start() <= last.end().saturating_add(1) => {
                if range.end() > last.end() {
                    *last = *last.start()..=*range.end();
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Intersection of `range` with `bound`, if any
pub fn clip(range: &RangeInclusive<i64>, bound: &RangeInclusive<i64>) -> Option<RangeInclusive<i64>> {
    let start = *range.start().max(bound.start());
    let end = *range.end().min(bound.end());
    (start <= end).then_some(start..=end)
}

/// Number of integers covered by `range`
pub fn width(range: &RangeInclusive<i64>) -> u64 {
    if range.is_empty() {
        0
    } else {
        range.end().abs_diff(*range.start()) + 1
    }
}
