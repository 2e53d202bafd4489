use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IntervalError;

const DAY_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref DAY_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref FOREVER: DayDate = DayDate(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());
}

/// A calendar day, serialized as `YYYY-MM-DD`.
#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[repr(transparent)]
pub struct DayDate(NaiveDate);

impl DayDate {
    /// Sentinel end date meaning "holds indefinitely, no known supersession".
    pub fn forever() -> Self {
        *FOREVER
    }

    pub fn day_before(self) -> Option<Self> {
        self.0.pred_opt().map(DayDate)
    }

    pub fn day_after(self) -> Option<Self> {
        self.0.succ_opt().map(DayDate)
    }
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl TryFrom<&str> for DayDate {
    type Error = IntervalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if !DAY_RE.is_match(s) {
            return Err(IntervalError::BadFormat(s.to_owned()));
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(DayDate)
            .map_err(|_| IntervalError::BadDate(s.to_owned()))
    }
}

impl FromStr for DayDate {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<NaiveDate> for DayDate {
    fn from(value: NaiveDate) -> Self {
        DayDate(value)
    }
}

impl AsRef<NaiveDate> for DayDate {
    fn as_ref(&self) -> &NaiveDate {
        &self.0
    }
}

impl Deref for DayDate {
    type Target = NaiveDate;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for DayDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
