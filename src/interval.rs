use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::DayDate;
use crate::error::IntervalError;

/// A date range paired with the value holding over it. Both bounds are
/// inclusive calendar days; `start_date` is strictly before `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawValueInterval<V>")]
pub struct ValueInterval<V> {
    start_date: DayDate,
    end_date: DayDate,
    value: V,
}

/// Wire shape of an interval before the ordering invariant is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValueInterval<V> {
    start_date: DayDate,
    end_date: DayDate,
    value: V,
}

impl<V> TryFrom<RawValueInterval<V>> for ValueInterval<V> {
    type Error = IntervalError;

    fn try_from(raw: RawValueInterval<V>) -> Result<Self, Self::Error> {
        Self::new(raw.start_date, raw.end_date, raw.value)
    }
}

impl<V> ValueInterval<V> {
    pub fn new(start_date: DayDate, end_date: DayDate, value: V) -> Result<Self, IntervalError> {
        if start_date >= end_date {
            return Err(IntervalError::EmptyInterval {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            value,
        })
    }

    /// Validates both date strings, then the ordering invariant.
    pub fn parse(start: &str, end: &str, value: V) -> Result<Self, IntervalError> {
        Self::new(start.parse()?, end.parse()?, value)
    }

    pub fn start_date(&self) -> DayDate {
        self.start_date
    }

    pub fn end_date(&self) -> DayDate {
        self.end_date
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn contains(&self, date: DayDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Extends the end date; `end` must not precede the current end.
    pub(crate) fn extend_through(&mut self, end: DayDate) {
        debug_assert!(end >= self.end_date);
        self.end_date = end;
    }

    /// The days of `self` strictly before `date`, if any survive.
    fn clipped_before(self, date: DayDate) -> Option<Self> {
        let end = date.day_before()?;
        (self.start_date < end).then_some(Self { end_date: end, ..self })
    }

    /// The days of `self` strictly after `date`, if any survive.
    fn clipped_after(self, date: DayDate) -> Option<Self> {
        let start = date.day_after()?;
        (start < self.end_date).then_some(Self {
            start_date: start,
            ..self
        })
    }
}

impl<V: Clone> ValueInterval<V> {
    /// Trims this interval around `new`, which wins over any overlap.
    pub(crate) fn spliced_around(self, new: &ValueInterval<V>) -> Spliced<V> {
        match classify(&self, new) {
            Overlap::Before | Overlap::After => Spliced::Kept(self),
            Overlap::ContainsExisting => Spliced::Removed,
            Overlap::CoversStart => self.clipped_after(new.end_date).into(),
            Overlap::CoversEnd => self.clipped_before(new.start_date).into(),
            Overlap::InsideExisting => {
                let left = self.clone().clipped_before(new.start_date);
                let right = self.clipped_after(new.end_date);
                match (left, right) {
                    (Some(left), Some(right)) => Spliced::Split(left, right),
                    (Some(kept), None) | (None, Some(kept)) => Spliced::Kept(kept),
                    (None, None) => Spliced::Removed,
                }
            }
        }
    }
}

impl<V> fmt::Display for ValueInterval<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}

/// Outcome of splicing a candidate interval over one existing interval.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Spliced<V> {
    Kept(ValueInterval<V>),
    Split(ValueInterval<V>, ValueInterval<V>),
    Removed,
}

impl<V> From<Option<ValueInterval<V>>> for Spliced<V> {
    fn from(fragment: Option<ValueInterval<V>>) -> Self {
        match fragment {
            Some(interval) => Spliced::Kept(interval),
            None => Spliced::Removed,
        }
    }
}

/// How a candidate interval relates to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlap {
    /// Candidate ends before the existing interval starts.
    Before,
    /// Candidate starts after the existing interval ends.
    After,
    /// Candidate covers the existing interval entirely.
    ContainsExisting,
    /// Existing interval sticks out on both sides of the candidate.
    InsideExisting,
    /// Candidate covers the start of the existing interval.
    CoversStart,
    /// Candidate covers the end of the existing interval.
    CoversEnd,
}

pub(crate) fn classify<V>(existing: &ValueInterval<V>, new: &ValueInterval<V>) -> Overlap {
    if new.end_date < existing.start_date {
        return Overlap::Before;
    }
    if new.start_date > existing.end_date {
        return Overlap::After;
    }
    if new.start_date <= existing.start_date && new.end_date >= existing.end_date {
        return Overlap::ContainsExisting;
    }
    if existing.start_date < new.start_date && existing.end_date > new.end_date {
        return Overlap::InsideExisting;
    }
    // The remaining candidates straddle exactly one edge of the existing
    // interval; which edge is decided by where the candidate ends.
    if new.end_date < existing.end_date {
        Overlap::CoversStart
    } else {
        Overlap::CoversEnd
    }
}
