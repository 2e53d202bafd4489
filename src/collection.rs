use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::DayDate;
use crate::error::IntervalError;
use crate::interval::{Spliced, ValueInterval};

/// Point-in-time value map: each key is an ISO date string whose value
/// holds from that date until the next key, or forever for the last key.
pub type ValuesList<V> = BTreeMap<String, V>;

/// A set of non-overlapping value intervals, sorted by start date.
///
/// Inserting an interval always wins over the dates it covers: existing
/// intervals are trimmed, split, or removed so that no two intervals
/// overlap. Gaps between intervals are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalCollection<V> {
    intervals: Vec<ValueInterval<V>>,
}

impl<V> Default for IntervalCollection<V> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

/// The intervals are stored as given. Callers are trusted to supply
/// disjoint sorted input; every insertion re-establishes the invariant
/// against whatever is currently stored.
impl<V> From<Vec<ValueInterval<V>>> for IntervalCollection<V> {
    fn from(intervals: Vec<ValueInterval<V>>) -> Self {
        Self { intervals }
    }
}

impl<V: Clone> FromIterator<ValueInterval<V>> for IntervalCollection<V> {
    fn from_iter<I: IntoIterator<Item = ValueInterval<V>>>(iter: I) -> Self {
        let mut collection = Self::new();
        for interval in iter {
            collection.add_interval(interval);
        }
        collection
    }
}

impl<V> IntervalCollection<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Read-only view of the current intervals, sorted by start date.
    pub fn intervals(&self) -> &[ValueInterval<V>] {
        &self.intervals
    }

    pub fn into_intervals(self) -> Vec<ValueInterval<V>> {
        self.intervals
    }

    pub fn start_dates(&self) -> Vec<DayDate> {
        self.intervals
            .iter()
            .map(|interval| interval.start_date())
            .collect()
    }

    pub fn end_dates(&self) -> Vec<DayDate> {
        self.intervals
            .iter()
            .map(|interval| interval.end_date())
            .collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.intervals
            .iter()
            .map(|interval| interval.value())
            .collect()
    }

    /// The value in effect on the given day, if any interval covers it.
    pub fn value_at(&self, date: DayDate) -> Option<&V> {
        self.intervals
            .iter()
            .find(|interval| interval.contains(date))
            .map(|interval| interval.value())
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

impl<V: Clone> IntervalCollection<V> {
    pub fn from_values_list(values: &ValuesList<V>) -> Result<Self, IntervalError> {
        let mut collection = Self::new();
        collection.add_values_list(values)?;
        Ok(collection)
    }

    /// Inserts `interval`, trimming, splitting, or removing whatever it
    /// overlaps. The inserted interval wins over any part of an existing
    /// one that it covers.
    pub fn add_interval(&mut self, interval: ValueInterval<V>) {
        debug!(
            start = %interval.start_date(),
            end = %interval.end_date(),
            "inserting interval"
        );
        let mut intervals = Vec::with_capacity(self.intervals.len() + 1);
        for existing in self.intervals.drain(..) {
            match existing.spliced_around(&interval) {
                Spliced::Kept(kept) => intervals.push(kept),
                Spliced::Split(left, right) => {
                    intervals.push(left);
                    intervals.push(right);
                }
                Spliced::Removed => {}
            }
        }
        intervals.push(interval);
        intervals.sort_by_key(|interval| interval.start_date());
        self.intervals = intervals;
    }

    /// Validates both date strings and their ordering, then inserts.
    /// Nothing is mutated on failure.
    pub fn add(&mut self, start: &str, end: &str, value: V) -> Result<(), IntervalError> {
        let interval = ValueInterval::parse(start, end, value)?;
        self.add_interval(interval);
        Ok(())
    }

    /// Expands a point-in-time map into intervals and inserts them all in
    /// ascending date order: each value holds until the day before the
    /// next key, the last one until [`DayDate::forever`]. Any invalid key
    /// fails the whole call before anything is inserted.
    pub fn add_values_list(&mut self, values: &ValuesList<V>) -> Result<(), IntervalError> {
        let dated: Vec<(DayDate, &V)> = values
            .iter()
            .map(|(key, value)| Ok((key.parse()?, value)))
            .collect::<Result<Vec<_>, IntervalError>>()?
            .into_iter()
            .sorted_by_key(|(date, _)| *date)
            .collect();

        let mut synthesized = Vec::with_capacity(dated.len());
        for (i, &(date, value)) in dated.iter().enumerate() {
            let end = match dated.get(i + 1) {
                Some((next, _)) => match next.day_before() {
                    Some(end) => end,
                    // keys are strictly increasing, so `next` has a predecessor
                    None => unreachable!(),
                },
                None => DayDate::forever(),
            };
            synthesized.push(ValueInterval::new(date, end, value.clone())?);
        }

        debug!(count = synthesized.len(), "expanding values list");
        for interval in synthesized {
            self.add_interval(interval);
        }
        Ok(())
    }
}

impl<V: PartialEq> IntervalCollection<V> {
    /// Merges runs of adjacent intervals holding equal values into single
    /// intervals. Two intervals are adjacent when the second starts on
    /// the day after the first ends; intervals separated by a gap are
    /// left alone.
    pub fn coalesce(&mut self) {
        let mut merged: Vec<ValueInterval<V>> = Vec::with_capacity(self.intervals.len());
        for interval in self.intervals.drain(..) {
            match merged.last_mut() {
                Some(last)
                    if last.end_date().day_after() == Some(interval.start_date())
                        && last.value() == interval.value() =>
                {
                    last.extend_through(interval.end_date());
                }
                _ => merged.push(interval),
            }
        }
        self.intervals = merged;
    }
}
