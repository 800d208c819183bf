//! Reorders results streamed back from worker threads
//!
//! Workers finish in any order; output is released strictly by (year, day, part)
//! so that a day never prints before every earlier expected part has arrived.

use crate::executor::SolverResult;
use std::collections::{BTreeMap, BTreeSet};

/// Output position of one part, ascending so day 10 follows day 9
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

pub struct ResultAggregator {
    /// Keys not yet released
    expected: BTreeSet<ResultKey>,
    /// Arrived results held back behind an earlier missing key
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(expected_keys: Vec<ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Buffer `result` and release the run of results that is now contiguous
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(&next) = self.expected.first() {
            let Some(result) = self.pending.remove(&next) else {
                break;
            };
            self.expected.remove(&next);
            ready.push(result);
        }
        ready
    }

    /// Whatever is still buffered, in key order
    pub fn drain(&mut self) -> Vec<SolverResult> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn key(day: u8, part: u8) -> ResultKey {
        ResultKey {
            year: 2022,
            day,
            part,
        }
    }

    fn make_result(day: u8, part: u8) -> SolverResult {
        SolverResult {
            year: 2022,
            day,
            part,
            answer: Ok(format!("{}_{}", day, part)),
            parse_duration: Some(TimeDelta::milliseconds(5)),
            solve_duration: TimeDelta::milliseconds(10),
        }
    }

    #[test]
    fn test_in_order_results() {
        let mut agg = ResultAggregator::new(vec![key(1, 1), key(1, 2)]);

        let ready = agg.add(make_result(1, 1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 1);

        let ready = agg.add(make_result(1, 2));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 2);

        assert!(agg.is_complete());
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg = ResultAggregator::new(vec![key(9, 1), key(9, 2), key(10, 1)]);

        // Waiting for day 9 part 1
        assert!(agg.add(make_result(9, 2)).is_empty());
        assert!(agg.add(make_result(10, 1)).is_empty());

        let ready = agg.add(make_result(9, 1));
        let order: Vec<_> = ready.iter().map(|r| (r.day, r.part)).collect();
        assert_eq!(order, vec![(9, 1), (9, 2), (10, 1)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn test_day_order_is_numeric() {
        let mut agg = ResultAggregator::new(vec![key(10, 1), key(9, 1)]);
        assert!(agg.add(make_result(10, 1)).is_empty());
        assert_eq!(agg.add(make_result(9, 1)).len(), 2);
    }

    #[test]
    fn test_drain_remaining() {
        let mut agg = ResultAggregator::new(vec![key(1, 1), key(1, 2)]);

        agg.add(make_result(1, 2));

        let remaining = agg.drain();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].part, 2);
        assert!(!agg.is_complete());
    }

    proptest! {
        #[test]
        fn emits_every_result_in_key_order(
            arrival in Just((1u8..=25).flat_map(|d| [(d, 1u8), (d, 2u8)]).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let keys = arrival.iter().map(|&(d, p)| key(d, p)).collect();
            let mut agg = ResultAggregator::new(keys);
            let mut emitted = Vec::new();
            for &(day, part) in &arrival {
                emitted.extend(agg.add(make_result(day, part)).into_iter().map(|r| (r.day, r.part)));
            }
            let mut sorted = arrival.clone();
            sorted.sort_unstable();
            prop_assert_eq!(emitted, sorted);
            prop_assert!(agg.is_complete());
            prop_assert!(agg.drain().is_empty());
        }
    }
}
