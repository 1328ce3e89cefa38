//! Generic ordered sample store.
//!
//! A [`Channel`] holds the samples of one data category for one aircraft,
//! strictly ascending by timestamp with no duplicates. Reads go through
//! [`Channel::interpolate`], which resolves the bracketing samples with
//! [`SampleSearch`] and blends them according to the sample's field table.
//!
//! # Design
//!
//! - Sequential writers (recording) use [`Channel::append_or_replace`]
//! - Random-order writers (import, augmentation) use [`Channel::upsert`]
//! - The search cursor is an interior-mutable cache: it remembers the last
//!   bracket index as the hint for the next query, and the last result so
//!   that repeated reads of the same instant do not recompute
//! - Every mutation bumps [`Channel::revision`] and drops the cursor
//!
//! # Example
//!
//! ```ignore
//! let mut channel: Channel<PositionSample> = Channel::new();
//! channel.append_or_replace(PositionSample::at(0, 47.0, 8.0, 1500.0));
//! channel.append_or_replace(PositionSample::at(1000, 47.1, 8.0, 1600.0));
//!
//! let sample = channel.interpolate(500, Access::Linear);
//! assert!(!sample.is_null());
//! ```

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::sample::SampleKind;
use crate::search::{SampleSearch, SearchResult, Timestamped, DEFAULT_BINARY_SEARCH_THRESHOLD_MS};

/// How a query is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Access {
    /// Interpolate within the bracket (continuous playback).
    #[default]
    Linear,
    /// Snap to the last sample at or before the query (scrubbing).
    Seek,
    /// Interpolate on raw recorded timestamps, ignoring the time offset.
    Export,
}

/// What an unresolved query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldPolicy {
    /// Return the null sample.
    #[default]
    Null,
    /// Before the first sample, return the first sample.
    HoldFirst,
    /// Repeat the previously returned sample (re-stamped to the query time),
    /// as long as the sample itself asks to be repeated.
    RepeatPrevious,
}

/// Interpolation window of the engine, flight control and handle channels
/// (milliseconds).
pub const DEFAULT_INTERPOLATION_WINDOW_MS: i64 = 2_000;

/// Per-channel read behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    pub hold: HoldPolicy,
    /// Maximum distance (ms) between the query and a bracketing sample.
    ///
    /// `None` interpolates across any gap and holds the last sample forever.
    pub interpolation_window_ms: Option<i64>,
    pub binary_search_threshold_ms: i64,
}

impl Default for ChannelPolicy {
    fn default() -> Self {
        Self {
            hold: HoldPolicy::Null,
            interpolation_window_ms: None,
            binary_search_threshold_ms: DEFAULT_BINARY_SEARCH_THRESHOLD_MS,
        }
    }
}

impl ChannelPolicy {
    pub fn with_hold(mut self, hold: HoldPolicy) -> Self {
        self.hold = hold;
        self
    }

    pub fn with_interpolation_window(mut self, window_ms: Option<i64>) -> Self {
        self.interpolation_window_ms = window_ms.map(|w| w.max(0));
        self
    }

    pub fn with_binary_search_threshold(mut self, threshold_ms: i64) -> Self {
        self.binary_search_threshold_ms = threshold_ms;
        self
    }
}

/// Cached state of the last query.
#[derive(Debug, Clone)]
struct SearchCursor<S> {
    last_query: Option<(i64, Access)>,
    last_index: Option<usize>,
    last_result: Option<S>,
}

impl<S> Default for SearchCursor<S> {
    fn default() -> Self {
        Self {
            last_query: None,
            last_index: None,
            last_result: None,
        }
    }
}

/// Ordered store of one sample type.
#[derive(Debug, Clone)]
pub struct Channel<S: SampleKind> {
    samples: Vec<S>,
    cursor: RefCell<SearchCursor<S>>,
    policy: ChannelPolicy,
    search: SampleSearch,
    time_offset: i64,
    revision: u64,
}

impl<S: SampleKind> Default for Channel<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SampleKind> Channel<S> {
    /// Create an empty channel with the default policy.
    pub fn new() -> Self {
        Self::with_policy(ChannelPolicy::default())
    }

    pub fn with_policy(policy: ChannelPolicy) -> Self {
        Self {
            samples: Vec::new(),
            cursor: RefCell::new(SearchCursor::default()),
            search: SampleSearch::new(policy.binary_search_threshold_ms),
            policy,
            time_offset: 0,
            revision: 0,
        }
    }

    pub fn policy(&self) -> &ChannelPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: ChannelPolicy) {
        self.search = SampleSearch::new(policy.binary_search_threshold_ms);
        self.policy = policy;
        self.reset_cursor();
    }

    /// Time offset (ms) added to Linear and Seek queries.
    pub fn time_offset(&self) -> i64 {
        self.time_offset
    }

    pub fn set_time_offset(&mut self, time_offset: i64) {
        if self.time_offset != time_offset {
            self.time_offset = time_offset;
            self.reset_cursor();
        }
    }

    /// Mutation counter; changes whenever the stored samples change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&S> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.samples.last()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.samples.get(index)
    }

    pub fn as_slice(&self) -> &[S] {
        &self.samples
    }

    /// Stored samples in timestamp order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.samples.iter()
    }

    /// Append a sample, replacing the last one if the timestamps match.
    ///
    /// A sample older than the last stored one is inserted in order.
    pub fn append_or_replace(&mut self, sample: S) {
        if sample.is_null() {
            return;
        }
        match self.samples.last_mut() {
            Some(last) if last.timestamp() == sample.timestamp() => *last = sample,
            Some(last) if last.timestamp() > sample.timestamp() => {
                tracing::debug!(
                    channel = %S::CHANNEL,
                    last = last.timestamp(),
                    timestamp = sample.timestamp(),
                    "Out of order append, inserting in place"
                );
                self.upsert(sample);
                return;
            }
            _ => self.samples.push(sample),
        }
        self.touch();
    }

    /// Insert a sample in order, replacing any sample with the same timestamp.
    pub fn upsert(&mut self, sample: S) {
        if sample.is_null() {
            return;
        }
        match self
            .samples
            .binary_search_by_key(&sample.timestamp(), |s| s.timestamp())
        {
            Ok(index) => self.samples[index] = sample,
            Err(index) => self.samples.insert(index, sample),
        }
        self.touch();
    }

    /// Replace all samples. Null samples are dropped and duplicates resolved
    /// in favour of the later entry.
    pub fn replace_all(&mut self, samples: Vec<S>) {
        self.samples = samples;
        self.samples.retain(|s| !s.is_null());
        self.normalise();
        self.touch();
    }

    /// Stable sort by timestamp, keeping the last written sample per timestamp.
    pub fn sort(&mut self) {
        if self.is_sorted() {
            return;
        }
        self.normalise();
        self.touch();
    }

    /// Whether timestamps are strictly ascending.
    pub fn is_sorted(&self) -> bool {
        self.samples
            .windows(2)
            .all(|pair| pair[0].timestamp() < pair[1].timestamp())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.touch();
    }

    /// Sample rate over the `period_ms` leading up to `now`.
    ///
    /// Measured between the first sample inside the period and the last
    /// stored sample; 0.0 when that span is empty.
    pub fn samples_per_second(&self, now: i64, period_ms: i64) -> f64 {
        let Some(last) = self.samples.last() else {
            return 0.0;
        };
        let start = (now - period_ms).max(0).min(last.timestamp());
        let index = self.samples.partition_point(|s| s.timestamp() < start);
        let count = self.samples.len() - index;
        let span = last.timestamp() - self.samples[index].timestamp();
        if span > 0 {
            count as f64 * 1000.0 / span as f64
        } else {
            0.0
        }
    }

    /// Sample at `timestamp`, or the null sample if nothing resolves.
    pub fn interpolate(&self, timestamp: i64, access: Access) -> S {
        let adjusted = match access {
            Access::Export => timestamp,
            Access::Linear | Access::Seek => timestamp.saturating_add(self.time_offset).max(0),
        };

        let mut cursor = self.cursor.borrow_mut();
        if cursor.last_query == Some((adjusted, access)) {
            if let Some(result) = &cursor.last_result {
                return result.clone();
            }
        }

        let found = self.search.find(&self.samples, adjusted, cursor.last_index);
        if let SearchResult::Index(index) = found {
            cursor.last_index = Some(index);
        }

        let resolved = match access {
            Access::Seek => found.index().map(|index| self.samples[index].clone()),
            Access::Linear | Access::Export => self.blend_at(found, adjusted),
        };

        let result = match resolved {
            Some(sample) => sample,
            None => self.unresolved(found, adjusted, cursor.last_result.as_ref()),
        };

        cursor.last_query = Some((adjusted, access));
        cursor.last_result = Some(result.clone());
        result
    }

    fn blend_at(&self, found: SearchResult, timestamp: i64) -> Option<S> {
        let index = found.index()?;
        let p1 = &self.samples[index];
        let mut p2 = self.samples.get(index + 1).unwrap_or(p1);

        if let Some(window) = self.policy.interpolation_window_ms {
            if timestamp - p1.timestamp() > window {
                return None;
            }
            if p2.timestamp() - timestamp > window {
                p2 = p1;
            }
        }

        let mut sample = S::blend(p1, p2, normalised_time(p1, p2, timestamp));
        sample.set_timestamp(timestamp);
        Some(sample)
    }

    fn unresolved(&self, found: SearchResult, timestamp: i64, previous: Option<&S>) -> S {
        match self.policy.hold {
            HoldPolicy::Null => S::null(),
            HoldPolicy::HoldFirst => match (found, self.samples.first()) {
                (SearchResult::BeforeRange, Some(first)) => first.clone(),
                _ => S::null(),
            },
            HoldPolicy::RepeatPrevious => match previous {
                Some(previous) if !previous.is_null() && previous.repeats_when_unresolved() => {
                    let mut repeated = previous.clone();
                    repeated.set_timestamp(timestamp);
                    repeated
                }
                _ => S::null(),
            },
        }
    }

    fn normalise(&mut self) {
        // Reverse first so that, after the stable sort, the most recently
        // written duplicate comes first and survives dedup.
        self.samples.reverse();
        self.samples.sort_by_key(|s| s.timestamp());
        self.samples.dedup_by_key(|s| s.timestamp());
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        *self.cursor.get_mut() = SearchCursor::default();
    }
}

impl<'a, S: SampleKind> IntoIterator for &'a Channel<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalised position of `timestamp` between `p1` and `p2`, in [0, 1].
///
/// Returns 0.0 when both samples share a timestamp.
pub fn normalised_time<S: Timestamped>(p1: &S, p2: &S, timestamp: i64) -> f64 {
    let span = p2.timestamp() - p1.timestamp();
    if span == 0 {
        return 0.0;
    }
    ((timestamp - p1.timestamp()) as f64 / span as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{AircraftHandleSample, EngineSample, LightSample, LightStates, PositionSample};
    use proptest::prelude::*;

    fn position_channel(points: &[(i64, f64)]) -> Channel<PositionSample> {
        let mut channel = Channel::new();
        for &(t, altitude) in points {
            channel.append_or_replace(PositionSample::at(t, 0.0, 0.0, altitude));
        }
        channel
    }

    fn timestamps<S: SampleKind>(channel: &Channel<S>) -> Vec<i64> {
        channel.iter().map(|s| s.timestamp()).collect()
    }

    #[test]
    fn test_new_channel_is_empty() {
        let channel: Channel<PositionSample> = Channel::new();
        assert!(channel.is_empty());
        assert!(channel.interpolate(0, Access::Linear).is_null());
        assert!(channel.interpolate(0, Access::Seek).is_null());
    }

    #[test]
    fn test_append_or_replace_same_timestamp() {
        let mut channel = position_channel(&[(0, 100.0), (1000, 200.0)]);
        channel.append_or_replace(PositionSample::at(1000, 0.0, 0.0, 300.0));

        assert_eq!(channel.len(), 2);
        assert_eq!(channel.last().unwrap().altitude, 300.0);
    }

    #[test]
    fn test_append_out_of_order_keeps_ordering() {
        let mut channel = position_channel(&[(0, 100.0), (1000, 200.0), (2000, 300.0)]);
        channel.append_or_replace(PositionSample::at(500, 0.0, 0.0, 150.0));

        assert_eq!(timestamps(&channel), vec![0, 500, 1000, 2000]);
        assert!(channel.is_sorted());
    }

    #[test]
    fn test_upsert_replaces_and_inserts() {
        let mut channel = position_channel(&[(0, 100.0), (2000, 300.0)]);
        channel.upsert(PositionSample::at(1000, 0.0, 0.0, 200.0));
        channel.upsert(PositionSample::at(0, 0.0, 0.0, 50.0));

        assert_eq!(timestamps(&channel), vec![0, 1000, 2000]);
        assert_eq!(channel.first().unwrap().altitude, 50.0);
    }

    #[test]
    fn test_null_samples_are_not_stored() {
        let mut channel: Channel<PositionSample> = Channel::new();
        channel.append_or_replace(PositionSample::null());
        channel.upsert(PositionSample::null());
        assert!(channel.is_empty());
        assert_eq!(channel.revision(), 0);
    }

    #[test]
    fn test_linear_interpolation_between_samples() {
        let channel = position_channel(&[(1000, 100.0), (2000, 300.0)]);

        let sample = channel.interpolate(1250, Access::Linear);
        assert_eq!(sample.timestamp, 1250);
        assert!(
            (sample.altitude - 150.0).abs() < 1e-9,
            "Expected 150ft, got {}",
            sample.altitude
        );
    }

    #[test]
    fn test_discrete_field_takes_left_value() {
        let mut channel: Channel<LightSample> = Channel::new();
        channel.append_or_replace(LightSample::new(0, LightStates::NAVIGATION));
        channel.append_or_replace(LightSample::new(1000, LightStates::LANDING));

        let sample = channel.interpolate(999, Access::Linear);
        assert_eq!(sample.light_states, LightStates::NAVIGATION);
        let sample = channel.interpolate(1000, Access::Linear);
        assert_eq!(sample.light_states, LightStates::LANDING);
    }

    #[test]
    fn test_seek_snaps_to_previous_sample() {
        let channel = position_channel(&[(0, 100.0), (1000, 200.0), (2000, 300.0)]);

        let sample = channel.interpolate(1999, Access::Seek);
        assert_eq!(sample.timestamp, 1000);
        assert_eq!(sample.altitude, 200.0);
    }

    #[test]
    fn test_boundaries() {
        let channel = position_channel(&[(1000, 100.0), (2000, 300.0)]);

        assert!(channel.interpolate(999, Access::Linear).is_null());
        let after = channel.interpolate(60_000, Access::Linear);
        assert!(!after.is_null());
        assert_eq!(after.altitude, 300.0);
        assert_eq!(after.timestamp, 60_000);
    }

    #[test]
    fn test_single_sample_has_no_divide_by_zero() {
        let channel = position_channel(&[(500, 42.0)]);
        let sample = channel.interpolate(500, Access::Linear);
        assert_eq!(sample.altitude, 42.0);
        assert!(sample.altitude.is_finite());
    }

    #[test]
    fn test_hold_first_policy() {
        let mut channel: Channel<PositionSample> =
            Channel::with_policy(ChannelPolicy::default().with_hold(HoldPolicy::HoldFirst));
        channel.append_or_replace(PositionSample::at(1000, 0.0, 0.0, 100.0));

        let sample = channel.interpolate(10, Access::Linear);
        assert!(!sample.is_null());
        assert_eq!(sample.altitude, 100.0);
    }

    #[test]
    fn test_interpolation_window() {
        let mut channel: Channel<EngineSample> = Channel::with_policy(
            ChannelPolicy::default().with_interpolation_window(Some(2_000)),
        );
        channel.append_or_replace(EngineSample::default().with_levers(0, 0, 0));
        let mut late = EngineSample::default().with_levers(10_000, 0, 0);
        late.timestamp = 10_000;
        channel.append_or_replace(late);

        // Far from both samples: nothing resolves
        assert!(channel.interpolate(5_000, Access::Linear).is_null());

        // Close to p1, p2 too far away: p1 is held instead of blending
        let near = channel.interpolate(1_000, Access::Linear);
        assert_eq!(near.throttle_lever_position[0], 0);

        // Past the end, only within the window
        assert!(!channel.interpolate(11_000, Access::Linear).is_null());
        assert!(channel.interpolate(12_001, Access::Linear).is_null());
    }

    #[test]
    fn test_repeat_previous_while_canopy_open() {
        let mut channel: Channel<AircraftHandleSample> = Channel::with_policy(
            ChannelPolicy::default()
                .with_hold(HoldPolicy::RepeatPrevious)
                .with_interpolation_window(Some(1_000)),
        );
        channel.append_or_replace(AircraftHandleSample {
            timestamp: 0,
            canopy_open: 200,
            ..Default::default()
        });

        let first = channel.interpolate(500, Access::Linear);
        assert_eq!(first.canopy_open, 200);

        // Outside the window, the previous value is repeated with the query time
        let repeated = channel.interpolate(5_000, Access::Linear);
        assert!(!repeated.is_null());
        assert_eq!(repeated.timestamp, 5_000);
        assert_eq!(repeated.canopy_open, 200);
    }

    #[test]
    fn test_repeat_previous_requires_open_canopy() {
        let mut channel: Channel<AircraftHandleSample> = Channel::with_policy(
            ChannelPolicy::default()
                .with_hold(HoldPolicy::RepeatPrevious)
                .with_interpolation_window(Some(1_000)),
        );
        channel.append_or_replace(AircraftHandleSample::with_gear_down(0, true));

        assert!(!channel.interpolate(500, Access::Linear).is_null());
        assert!(channel.interpolate(5_000, Access::Linear).is_null());
    }

    #[test]
    fn test_time_offset_applies_to_linear_not_export() {
        let mut channel = position_channel(&[(0, 0.0), (10_000, 1000.0)]);
        channel.set_time_offset(5_000);

        let linear = channel.interpolate(0, Access::Linear);
        assert!((linear.altitude - 500.0).abs() < 1e-9);

        let export = channel.interpolate(0, Access::Export);
        assert!(export.altitude.abs() < 1e-9);

        // Negative adjusted timestamps clamp to zero
        channel.set_time_offset(-5_000);
        let clamped = channel.interpolate(1_000, Access::Linear);
        assert_eq!(clamped.timestamp, 0);
    }

    #[test]
    fn test_cached_result_invalidated_by_mutation() {
        let mut channel = position_channel(&[(0, 0.0), (1000, 100.0)]);
        let before = channel.interpolate(500, Access::Linear);
        assert!((before.altitude - 50.0).abs() < 1e-9);

        channel.upsert(PositionSample::at(500, 0.0, 0.0, 999.0));
        let after = channel.interpolate(500, Access::Linear);
        assert_eq!(after.altitude, 999.0);
    }

    #[test]
    fn test_replace_all_sorts_and_keeps_last_duplicate() {
        let mut channel: Channel<PositionSample> = Channel::new();
        channel.replace_all(vec![
            PositionSample::at(2000, 0.0, 0.0, 1.0),
            PositionSample::at(0, 0.0, 0.0, 2.0),
            PositionSample::at(2000, 0.0, 0.0, 3.0),
            PositionSample::null(),
        ]);

        assert_eq!(timestamps(&channel), vec![0, 2000]);
        assert_eq!(channel.last().unwrap().altitude, 3.0);
    }

    #[test]
    fn test_clear_bumps_revision() {
        let mut channel = position_channel(&[(0, 0.0)]);
        let revision = channel.revision();
        channel.clear();
        assert!(channel.is_empty());
        assert_ne!(channel.revision(), revision);
        assert!(channel.interpolate(0, Access::Linear).is_null());
    }

    #[test]
    fn test_iter_is_restartable() {
        let channel = position_channel(&[(0, 1.0), (10, 2.0)]);
        assert_eq!(channel.iter().count(), 2);
        assert_eq!(channel.iter().count(), 2);
        let total: f64 = (&channel).into_iter().map(|s| s.altitude).sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn test_samples_per_second() {
        let points: Vec<(i64, f64)> = (0..=40).map(|i| (i * 250, 0.0)).collect();
        let channel = position_channel(&points);

        // 41 samples at 4 Hz; the last ten seconds hold 41 samples over 10 s
        let rate = channel.samples_per_second(10_000, 10_000);
        assert!((rate - 4.1).abs() < 1e-9, "Expected 4.1, got {}", rate);

        let recent = channel.samples_per_second(10_000, 2_000);
        assert!((recent - 4.5).abs() < 1e-9, "Expected 4.5, got {}", recent);

        assert_eq!(Channel::<PositionSample>::new().samples_per_second(0, 10_000), 0.0);
        assert_eq!(position_channel(&[(5, 0.0)]).samples_per_second(5, 10_000), 0.0);
    }

    proptest! {
        #[test]
        fn prop_writes_keep_strict_ordering(
            writes in prop::collection::vec((0i64..5_000, any::<bool>()), 0..300),
        ) {
            let mut channel: Channel<PositionSample> = Channel::new();
            for (t, append) in writes {
                let sample = PositionSample::at(t, 0.0, 0.0, t as f64);
                if append {
                    channel.append_or_replace(sample);
                } else {
                    channel.upsert(sample);
                }
            }
            let ts = timestamps(&channel);
            prop_assert!(ts.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_linear_blend_is_exact(
            t1 in 0i64..10_000,
            gap in 1i64..10_000,
            offset in 0i64..10_000,
            a1 in -10_000.0f64..10_000.0,
            a2 in -10_000.0f64..10_000.0,
        ) {
            let t2 = t1 + gap;
            let t = t1 + offset % gap;
            let channel = position_channel(&[(t1, a1), (t2, a2)]);
            let expected = a1 + (a2 - a1) * ((t - t1) as f64 / gap as f64);
            let sample = channel.interpolate(t, Access::Linear);
            prop_assert!((sample.altitude - expected).abs() < 1e-6);
        }
    }
}
