use std::str::FromStr;

use chrono::{Days, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Calendar unit of a grid-spacing descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// Grid spacing parsed from a pandas-style offset alias, e.g. `"3MS"` or `"D"`.
///
/// Month- and year-based spacings step by calendar arithmetic, so grids built
/// from them stay aligned to the anchor's day-of-month across month lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    count: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    pub fn new(count: u32, unit: FrequencyUnit) -> ChartResult<Self> {
        if count == 0 {
            return Err(ChartError::Configuration(
                "frequency count must be > 0".to_owned(),
            ));
        }
        Ok(Self { count, unit })
    }

    #[must_use]
    pub fn count(self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn unit(self) -> FrequencyUnit {
        self.unit
    }

    /// Advances a timestamp by one grid step.
    pub fn advance(self, t: NaiveDateTime) -> ChartResult<NaiveDateTime> {
        let stepped = match self.unit {
            FrequencyUnit::Years => 12_u32
                .checked_mul(self.count)
                .and_then(|months| t.checked_add_months(Months::new(months))),
            FrequencyUnit::Months => t.checked_add_months(Months::new(self.count)),
            FrequencyUnit::Weeks => t.checked_add_days(Days::new(7 * u64::from(self.count))),
            FrequencyUnit::Days => t.checked_add_days(Days::new(u64::from(self.count))),
            FrequencyUnit::Hours => t.checked_add_signed(Duration::hours(i64::from(self.count))),
            FrequencyUnit::Minutes => {
                t.checked_add_signed(Duration::minutes(i64::from(self.count)))
            }
            FrequencyUnit::Seconds => {
                t.checked_add_signed(Duration::seconds(i64::from(self.count)))
            }
        };
        stepped.ok_or_else(|| {
            ChartError::InvalidData(format!("timestamp overflow while stepping from {t}"))
        })
    }
}

impl FromStr for Frequency {
    type Err = ChartError;

    fn from_str(descriptor: &str) -> ChartResult<Self> {
        let trimmed = descriptor.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, alias) = trimmed.split_at(digits_end);

        let count = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| {
                ChartError::Configuration(format!("invalid frequency count in {descriptor:?}"))
            })?
        };

        let unit = match alias {
            "Y" | "YS" | "A" | "AS" => FrequencyUnit::Years,
            "M" | "MS" => FrequencyUnit::Months,
            "W" => FrequencyUnit::Weeks,
            "D" => FrequencyUnit::Days,
            "H" | "h" => FrequencyUnit::Hours,
            "T" | "min" => FrequencyUnit::Minutes,
            "S" | "s" => FrequencyUnit::Seconds,
            _ => {
                return Err(ChartError::Configuration(format!(
                    "unknown frequency alias {descriptor:?}"
                )));
            }
        };

        Frequency::new(count, unit)
    }
}

/// Strictly increasing timestamp sequence used as the animation's frame axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvenGrid {
    times: Vec<NaiveDateTime>,
}

impl EvenGrid {
    /// Builds the evenly spaced sequence `[start, start+freq, ..] <= end`.
    ///
    /// The grid is anchored at `start`; callers that need the raw bounds
    /// represented exactly union the raw index in afterwards.
    pub fn span(start: NaiveDateTime, end: NaiveDateTime, freq: Frequency) -> ChartResult<Self> {
        if start > end {
            return Err(ChartError::InvalidData(format!(
                "grid span start {start} is after end {end}"
            )));
        }

        let mut times = Vec::new();
        let mut current = start;
        while current <= end {
            times.push(current);
            current = freq.advance(current)?;
        }
        Ok(Self { times })
    }

    /// Grid consisting of exactly the given (sorted, unique) timestamps.
    #[must_use]
    pub fn from_times(times: Vec<NaiveDateTime>) -> Self {
        Self { times }
    }

    /// Merges additional timestamps into the grid, keeping it sorted and unique.
    #[must_use]
    pub fn union(self, extra: &[NaiveDateTime]) -> Self {
        let mut times = self.times;
        times.extend_from_slice(extra);
        times.sort();
        times.dedup();
        Self { times }
    }

    #[must_use]
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Position of a timestamp on the grid, if it lies exactly on a grid point.
    #[must_use]
    pub fn position_of(&self, t: NaiveDateTime) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }
}
