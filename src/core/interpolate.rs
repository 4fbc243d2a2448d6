use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Gap-fill method for numeric series reindexed onto a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    #[default]
    Linear,
}

impl FromStr for InterpolationMethod {
    type Err = ChartError;

    fn from_str(name: &str) -> ChartResult<Self> {
        match name {
            "linear" => Ok(Self::Linear),
            _ => Err(ChartError::Configuration(format!(
                "unknown interpolation method {name:?}"
            ))),
        }
    }
}

/// Direction of the bounded fill pass used by rank smoothing.
///
/// Serialized under the same names `FromStr` accepts, so config files read
/// `"bfill"` / `"ffill"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMethod {
    /// Propagate the next defined value backward over a gap.
    #[default]
    #[serde(rename = "bfill", alias = "backfill")]
    Backward,
    /// Propagate the previous defined value forward over a gap.
    #[serde(rename = "ffill", alias = "pad")]
    Forward,
}

impl FromStr for FillMethod {
    type Err = ChartError;

    fn from_str(name: &str) -> ChartResult<Self> {
        match name {
            "bfill" | "backfill" => Ok(Self::Backward),
            "ffill" | "pad" => Ok(Self::Forward),
            _ => Err(ChartError::Configuration(format!(
                "unknown fill method {name:?}"
            ))),
        }
    }
}

/// Fills gaps by linear interpolation over slot positions.
///
/// Positional, not time-weighted: two defined cells `k` slots apart are bridged
/// in `k` equal increments regardless of the timestamps behind the slots.
/// Interior gaps are interpolated, trailing gaps hold the last defined value,
/// and leading gaps are left untouched for the caller to resolve.
pub fn interpolate_slots(cells: &mut [Option<f64>]) {
    let Some(first_defined) = cells.iter().position(Option::is_some) else {
        return;
    };

    let mut last_defined = first_defined;
    for i in (first_defined + 1)..cells.len() {
        let Some(end_value) = cells[i] else {
            continue;
        };
        if i > last_defined + 1 {
            if let Some(start_value) = cells[last_defined] {
                let span = (i - last_defined) as f64;
                for j in (last_defined + 1)..i {
                    let ratio = (j - last_defined) as f64 / span;
                    cells[j] = Some(start_value + ratio * (end_value - start_value));
                }
            }
        }
        last_defined = i;
    }

    let held = cells[last_defined];
    for cell in cells.iter_mut().skip(last_defined + 1) {
        *cell = held;
    }
}

/// Fills at most `limit` consecutive missing cells per gap.
///
/// `Backward` fills the cells adjacent to the next defined value, `Forward`
/// the cells adjacent to the previous one. Gaps with no defined value on the
/// filling side are left untouched.
pub fn fill_limited(cells: &mut [Option<f64>], method: FillMethod, limit: usize) {
    if limit == 0 {
        return;
    }

    match method {
        FillMethod::Forward => {
            let mut previous = None;
            let mut gap_len = 0_usize;
            for cell in cells.iter_mut() {
                match cell {
                    Some(value) => {
                        previous = Some(*value);
                        gap_len = 0;
                    }
                    None => {
                        gap_len += 1;
                        if gap_len <= limit {
                            *cell = previous;
                        }
                    }
                }
            }
        }
        FillMethod::Backward => {
            let mut next = None;
            let mut gap_len = 0_usize;
            for cell in cells.iter_mut().rev() {
                match cell {
                    Some(value) => {
                        next = Some(*value);
                        gap_len = 0;
                    }
                    None => {
                        gap_len += 1;
                        if gap_len <= limit {
                            *cell = next;
                        }
                    }
                }
            }
        }
    }
}

/// Fills every gap by back-fill, then forward-fill for trailing gaps.
///
/// The policy for non-numeric columns: a value is available at every slot,
/// preferring the next observation and falling back to the previous one.
/// A slice with no defined cell at all is left untouched.
pub fn backfill_then_forwardfill<T: Clone>(cells: &mut [Option<T>]) {
    let mut next: Option<T> = None;
    for cell in cells.iter_mut().rev() {
        match cell {
            Some(value) => next = Some(value.clone()),
            None => *cell = next.clone(),
        }
    }

    let mut previous: Option<T> = None;
    for cell in cells.iter_mut() {
        match cell {
            Some(value) => previous = Some(value.clone()),
            None => *cell = previous.clone(),
        }
    }
}
