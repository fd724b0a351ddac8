//! Exact worked-time quantities.
//!
//! Durations arrive as `HH:MM` strings and are summed, split into regular and
//! overtime buckets and compared against thresholds. Holding them as whole
//! minutes keeps every one of those operations exact; decimal hours are only
//! derived at the point where a rate is applied.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;
use crate::parsing::parse_hours_minutes;

const MINUTES_PER_HOUR: u32 = 60;

/// A non-negative span of worked time with minute precision.
///
/// Serializes as an `HH:MM` string.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::WorkedTime;
/// use rust_decimal::Decimal;
///
/// let time: WorkedTime = "07:30".parse().unwrap();
/// assert_eq!(time.minutes(), 450);
/// assert_eq!(time.hours(), Decimal::new(75, 1));
/// assert_eq!(time.to_string(), "07:30");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkedTime {
    minutes: u32,
}

impl WorkedTime {
    /// Zero worked time.
    pub const ZERO: WorkedTime = WorkedTime { minutes: 0 };

    /// Creates a worked time from a whole number of minutes.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Creates a worked time from whole hours.
    pub const fn from_hours(hours: u32) -> Self {
        Self {
            minutes: hours * MINUTES_PER_HOUR,
        }
    }

    /// Returns the total number of minutes.
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns the worked time as decimal hours (`hours + minutes / 60`).
    pub fn hours(&self) -> Decimal {
        Decimal::from(self.minutes) / Decimal::from(MINUTES_PER_HOUR)
    }

    /// Returns true if no time was worked.
    pub const fn is_zero(&self) -> bool {
        self.minutes == 0
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    pub fn checked_sub(self, other: WorkedTime) -> Option<WorkedTime> {
        self.minutes.checked_sub(other.minutes).map(Self::from_minutes)
    }

    /// Subtracts `other`, clamping at zero.
    pub fn saturating_sub(self, other: WorkedTime) -> WorkedTime {
        Self::from_minutes(self.minutes.saturating_sub(other.minutes))
    }

    /// Returns the amount earned for this time at an hourly `rate`.
    ///
    /// The multiplication happens before the division by 60 so whole and
    /// half-hour quantities produce exact results.
    pub fn cost_at(&self, rate: Decimal) -> Decimal {
        rate * Decimal::from(self.minutes) / Decimal::from(MINUTES_PER_HOUR)
    }
}

impl Add for WorkedTime {
    type Output = WorkedTime;

    /// Saturates at `u32::MAX` minutes.
    fn add(self, rhs: WorkedTime) -> WorkedTime {
        WorkedTime::from_minutes(self.minutes.saturating_add(rhs.minutes))
    }
}

impl AddAssign for WorkedTime {
    fn add_assign(&mut self, rhs: WorkedTime) {
        self.minutes = self.minutes.saturating_add(rhs.minutes);
    }
}

impl Sum for WorkedTime {
    fn sum<I: Iterator<Item = WorkedTime>>(iter: I) -> WorkedTime {
        iter.fold(WorkedTime::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a WorkedTime> for WorkedTime {
    fn sum<I: Iterator<Item = &'a WorkedTime>>(iter: I) -> WorkedTime {
        iter.copied().sum()
    }
}

impl fmt::Display for WorkedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.minutes / MINUTES_PER_HOUR,
            self.minutes % MINUTES_PER_HOUR
        )
    }
}

impl FromStr for WorkedTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hours_minutes(s)
    }
}

impl Serialize for WorkedTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkedTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
