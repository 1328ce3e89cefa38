//! Bracket search over timestamp-ordered samples.
//!
//! Replay mostly reads forward in small steps, so the common case is a short
//! linear scan from the previous position. Seeks and large jumps fall back to
//! a binary search over the half of the slice that contains the target.
//!
//! # Strategy Selection
//!
//! ```text
//! no hint                      -> binary over [0, n-1]
//! t < s[hint]                  -> binary over [0, hint]
//! t - threshold > s[hint]      -> binary over [hint, n-1]
//! otherwise                    -> linear from hint
//! ```
//!
//! Both strategies return the same bracket for the same input; the choice
//! only affects how many samples are visited.

/// Default forward jump beyond which binary search is used (milliseconds).
pub const DEFAULT_BINARY_SEARCH_THRESHOLD_MS: i64 = 3_000;

/// Anything carrying a millisecond timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

/// Outcome of a bracket search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The slice is empty.
    NoData,
    /// The query lies before the first sample.
    BeforeRange,
    /// Index of the last sample at or before the query.
    Index(usize),
}

impl SearchResult {
    pub fn index(self) -> Option<usize> {
        match self {
            SearchResult::Index(index) => Some(index),
            _ => None,
        }
    }
}

/// Which algorithm resolved a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    Binary,
    Linear,
}

/// Bracket finder with a configurable strategy threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSearch {
    binary_search_threshold_ms: i64,
}

impl Default for SampleSearch {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_SEARCH_THRESHOLD_MS)
    }
}

impl SampleSearch {
    pub fn new(binary_search_threshold_ms: i64) -> Self {
        Self {
            binary_search_threshold_ms: binary_search_threshold_ms.max(0),
        }
    }

    pub fn binary_search_threshold_ms(&self) -> i64 {
        self.binary_search_threshold_ms
    }

    /// Find the bracket start for `timestamp`, starting from `hint`.
    ///
    /// A query at or after the last sample resolves to the last index.
    pub fn find<T: Timestamped>(
        &self,
        samples: &[T],
        timestamp: i64,
        hint: Option<usize>,
    ) -> SearchResult {
        self.find_with_strategy(samples, timestamp, hint).0
    }

    /// Like [`find`](Self::find), also reporting the strategy used.
    pub fn find_with_strategy<T: Timestamped>(
        &self,
        samples: &[T],
        timestamp: i64,
        hint: Option<usize>,
    ) -> (SearchResult, Option<SearchStrategy>) {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return (SearchResult::NoData, None),
        };
        if timestamp < first.timestamp() {
            return (SearchResult::BeforeRange, None);
        }
        let last_index = samples.len() - 1;
        if timestamp >= last.timestamp() {
            return (SearchResult::Index(last_index), None);
        }

        let (strategy, found) = match hint.filter(|&h| h <= last_index) {
            None => (
                SearchStrategy::Binary,
                binary_search_bracket(samples, timestamp, 0, last_index),
            ),
            Some(h) if timestamp < samples[h].timestamp() => (
                SearchStrategy::Binary,
                binary_search_bracket(samples, timestamp, 0, h),
            ),
            Some(h)
                if timestamp.saturating_sub(self.binary_search_threshold_ms)
                    > samples[h].timestamp() =>
            {
                (
                    SearchStrategy::Binary,
                    binary_search_bracket(samples, timestamp, h, last_index),
                )
            }
            Some(h) => (
                SearchStrategy::Linear,
                linear_search_bracket(samples, timestamp, h),
            ),
        };

        tracing::trace!(timestamp, ?hint, ?strategy, ?found, "Bracket search");
        (
            found.map_or(SearchResult::BeforeRange, SearchResult::Index),
            Some(strategy),
        )
    }
}

/// Binary search for the last index in `[low, high]` at or before `timestamp`.
///
/// Returns `None` when the range is invalid or `timestamp` lies before
/// `s[low]`. A timestamp at or after `s[high]` resolves to `high`, the same
/// hold-last bracket [`linear_search_bracket`] reports.
pub fn binary_search_bracket<T: Timestamped>(
    samples: &[T],
    timestamp: i64,
    low: usize,
    high: usize,
) -> Option<usize> {
    if low > high || high >= samples.len() {
        return None;
    }
    if samples[low].timestamp() > timestamp {
        return None;
    }
    if samples[high].timestamp() <= timestamp {
        return Some(high);
    }

    let (mut lo, mut hi) = (low, high);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if samples[mid].timestamp() <= timestamp {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Some(lo)
}

/// Linear scan forward from `start` for the last index at or before `timestamp`.
///
/// Returns `None` when `start` is out of bounds or already past `timestamp`.
pub fn linear_search_bracket<T: Timestamped>(
    samples: &[T],
    timestamp: i64,
    start: usize,
) -> Option<usize> {
    if samples.get(start)?.timestamp() > timestamp {
        return None;
    }
    let mut index = start;
    while index + 1 < samples.len() && samples[index + 1].timestamp() <= timestamp {
        index += 1;
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    impl Timestamped for i64 {
        fn timestamp(&self) -> i64 {
            *self
        }
    }

    fn reference_bracket(samples: &[i64], timestamp: i64) -> SearchResult {
        if samples.is_empty() {
            return SearchResult::NoData;
        }
        match samples.partition_point(|&t| t <= timestamp) {
            0 => SearchResult::BeforeRange,
            n => SearchResult::Index(n - 1),
        }
    }

    #[test]
    fn test_empty_slice() {
        let samples: Vec<i64> = Vec::new();
        assert_eq!(SampleSearch::default().find(&samples, 10, None), SearchResult::NoData);
    }

    #[test]
    fn test_before_and_after_range() {
        let samples = vec![100, 200, 300];
        let search = SampleSearch::default();
        assert_eq!(search.find(&samples, 99, None), SearchResult::BeforeRange);
        assert_eq!(search.find(&samples, 300, None), SearchResult::Index(2));
        assert_eq!(search.find(&samples, 10_000, Some(0)), SearchResult::Index(2));
    }

    #[test]
    fn test_exact_hits() {
        let samples = vec![0, 10, 20, 30, 40];
        let search = SampleSearch::default();
        for (i, t) in samples.iter().enumerate() {
            assert_eq!(search.find(&samples, *t, None), SearchResult::Index(i));
        }
        assert_eq!(search.find(&samples, 25, None), SearchResult::Index(2));
    }

    #[test]
    fn test_strategy_selection() {
        let samples: Vec<i64> = (0..100).map(|i| i * 100).collect();
        let search = SampleSearch::new(3_000);

        let (_, strategy) = search.find_with_strategy(&samples, 550, None);
        assert_eq!(strategy, Some(SearchStrategy::Binary));

        let (result, strategy) = search.find_with_strategy(&samples, 750, Some(5));
        assert_eq!(result, SearchResult::Index(7));
        assert_eq!(strategy, Some(SearchStrategy::Linear));

        // Backward past the hint
        let (result, strategy) = search.find_with_strategy(&samples, 250, Some(5));
        assert_eq!(result, SearchResult::Index(2));
        assert_eq!(strategy, Some(SearchStrategy::Binary));

        // Forward jump beyond the threshold
        let (result, strategy) = search.find_with_strategy(&samples, 9_050, Some(5));
        assert_eq!(result, SearchResult::Index(90));
        assert_eq!(strategy, Some(SearchStrategy::Binary));
    }

    #[test]
    fn test_stale_hint_is_ignored() {
        let samples = vec![0, 10, 20];
        let search = SampleSearch::default();
        assert_eq!(search.find(&samples, 15, Some(42)), SearchResult::Index(1));
    }

    #[test]
    fn test_binary_search_window_bounds() {
        let samples = vec![0, 10, 20, 30];
        assert_eq!(binary_search_bracket(&samples, 5, 1, 3), None);
        assert_eq!(binary_search_bracket(&samples, 35, 0, 2), Some(2));
        assert_eq!(binary_search_bracket(&samples, 20, 0, 2), Some(2));
        assert_eq!(binary_search_bracket(&samples, 15, 2, 1), None);
        assert_eq!(binary_search_bracket(&samples, 15, 0, 3), Some(1));
    }

    #[test]
    fn test_strategies_agree_past_last_sample() {
        let samples = vec![0, 10];
        let search = SampleSearch::default();
        assert_eq!(binary_search_bracket(&samples, 15, 0, 1), Some(1));
        assert_eq!(linear_search_bracket(&samples, 15, 0), Some(1));
        assert_eq!(search.find(&samples, 15, None), SearchResult::Index(1));

        let single = vec![0];
        assert_eq!(binary_search_bracket(&single, 1, 0, 0), Some(0));
        assert_eq!(linear_search_bracket(&single, 1, 0), Some(0));
    }

    #[test]
    fn test_linear_search_from_start() {
        let samples = vec![0, 10, 20, 30];
        assert_eq!(linear_search_bracket(&samples, 25, 0), Some(2));
        assert_eq!(linear_search_bracket(&samples, 5, 1), None);
        assert_eq!(linear_search_bracket(&samples, 99, 1), Some(3));
        assert_eq!(linear_search_bracket(&samples, 5, 10), None);
    }

    fn sorted_timestamps() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::btree_set(0i64..50_000, 1..200)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn prop_strategies_agree(
            samples in sorted_timestamps(),
            queries in prop::collection::vec(-1_000i64..52_000, 1..50),
            threshold in 0i64..10_000,
        ) {
            let search = SampleSearch::new(threshold);
            let mut hint = None;
            for t in queries {
                let expected = reference_bracket(&samples, t);
                let found = search.find(&samples, t, hint);
                prop_assert_eq!(found, expected);

                // Linear from any valid start and binary over the whole slice agree
                if let SearchResult::Index(i) = expected {
                    prop_assert_eq!(binary_search_bracket(&samples, t, 0, samples.len() - 1), Some(i));
                    for start in 0..=i {
                        prop_assert_eq!(linear_search_bracket(&samples, t, start), Some(i));
                    }
                }
                hint = found.index().or(hint);
            }
        }

        #[test]
        fn prop_monotonic_runs_with_jumps(
            samples in sorted_timestamps(),
            steps in prop::collection::vec((1i64..200, any::<bool>(), 0i64..50_000), 1..100),
        ) {
            let search = SampleSearch::default();
            let mut t = 0;
            let mut hint = None;
            for (step, jump, target) in steps {
                t = if jump { target } else { t + step };
                let found = search.find(&samples, t, hint);
                prop_assert_eq!(found, reference_bracket(&samples, t));
                hint = found.index().or(hint);
            }
        }
    }
}
