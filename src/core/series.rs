use chrono::NaiveDateTime;
use chrono::format::{Parsed, StrftimeItems, parse};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

/// Parses a timestamp string under a strftime-style format.
///
/// Partial formats are accepted: fields the format does not mention default to
/// January 1st / midnight, so `"2012"` under `"%Y"` parses to 2012-01-01 00:00.
pub fn parse_timestamp(value: &str, format: &str) -> ChartResult<NaiveDateTime> {
    let format_error = || ChartError::Format {
        value: value.to_owned(),
        format: format.to_owned(),
    };

    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(format)).map_err(|_| format_error())?;

    if parsed.month.is_none() {
        parsed.set_month(1).map_err(|_| format_error())?;
    }
    if parsed.day.is_none() {
        parsed.set_day(1).map_err(|_| format_error())?;
    }
    if parsed.hour_div_12.is_none() && parsed.hour_mod_12.is_none() {
        parsed.set_hour(0).map_err(|_| format_error())?;
    }
    if parsed.minute.is_none() {
        parsed.set_minute(0).map_err(|_| format_error())?;
    }
    if parsed.second.is_none() {
        parsed.set_second(0).map_err(|_| format_error())?;
    }

    let date = parsed.to_naive_date().map_err(|_| format_error())?;
    let time = parsed.to_naive_time().map_err(|_| format_error())?;
    Ok(NaiveDateTime::new(date, time))
}

/// Time-indexed input table with a fixed column set.
///
/// Numeric columns carry the animated magnitudes; label columns carry
/// non-numeric per-row attributes. Column order is preserved because the rank
/// tie-break and decoration resolution both depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    times: Vec<NaiveDateTime>,
    values: IndexMap<String, Vec<Option<f64>>>,
    labels: IndexMap<String, Vec<Option<String>>>,
}

impl RawSeries {
    #[must_use]
    pub fn builder() -> RawSeriesBuilder {
        RawSeriesBuilder::new()
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

    #[must_use]
    pub fn numeric_columns(&self) -> &IndexMap<String, Vec<Option<f64>>> {
        &self.values
    }

    #[must_use]
    pub fn label_columns(&self) -> &IndexMap<String, Vec<Option<String>>> {
        &self.labels
    }

    #[must_use]
    pub fn numeric_column_count(&self) -> usize {
        self.values.len()
    }

    /// First and last timestamp of the (sorted) index.
    #[must_use]
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    /// Returns a copy with missing or non-finite numeric cells replaced by zero.
    ///
    /// This is the orchestrator's missing-observation policy, applied after
    /// ranking so absent cells still rank as the sentinel rather than as zeros.
    #[must_use]
    pub fn with_missing_zeroed(&self) -> Self {
        let mut zeroed_count = 0_usize;
        let values = self
            .values
            .iter()
            .map(|(name, cells)| {
                let cells = cells
                    .iter()
                    .map(|cell| match cell {
                        Some(v) if v.is_finite() => Some(*v),
                        _ => {
                            zeroed_count += 1;
                            Some(0.0)
                        }
                    })
                    .collect();
                (name.clone(), cells)
            })
            .collect();

        if zeroed_count > 0 {
            debug!(zeroed_count, "replaced missing numeric cells with zero");
        }

        Self {
            times: self.times.clone(),
            values,
            labels: self.labels.clone(),
        }
    }
}

/// Builder for [`RawSeries`]; validates and canonicalizes on `build`.
#[derive(Debug, Clone, Default)]
pub struct RawSeriesBuilder {
    times: Vec<String>,
    values: IndexMap<String, Vec<Option<f64>>>,
    labels: IndexMap<String, Vec<Option<String>>>,
}

impl RawSeriesBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw timestamp strings forming the time index.
    #[must_use]
    pub fn timestamps<I, S>(mut self, times: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.times = times.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a numeric column; `None` cells are missing observations.
    #[must_use]
    pub fn numeric_column(mut self, name: impl Into<String>, cells: Vec<Option<f64>>) -> Self {
        self.values.insert(name.into(), cells);
        self
    }

    /// Adds a fully observed numeric column.
    #[must_use]
    pub fn numeric_values(self, name: impl Into<String>, cells: Vec<f64>) -> Self {
        self.numeric_column(name, cells.into_iter().map(Some).collect())
    }

    /// Adds a non-numeric column carried alongside the animated values.
    #[must_use]
    pub fn label_column(mut self, name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        self.labels.insert(name.into(), cells);
        self
    }

    /// Parses timestamps under `time_format`, validates column shapes, and
    /// sorts rows by time.
    pub fn build(self, time_format: &str) -> ChartResult<RawSeries> {
        if self.times.is_empty() {
            return Err(ChartError::InvalidData(
                "series cannot be built from an empty time index".to_owned(),
            ));
        }

        let row_count = self.times.len();
        for (name, cells) in &self.values {
            if cells.len() != row_count {
                return Err(ChartError::Configuration(format!(
                    "column {name:?} has {} cells but the time index has {row_count} rows",
                    cells.len()
                )));
            }
        }
        for (name, cells) in &self.labels {
            if cells.len() != row_count {
                return Err(ChartError::Configuration(format!(
                    "label column {name:?} has {} cells but the time index has {row_count} rows",
                    cells.len()
                )));
            }
            if self.values.contains_key(name) {
                return Err(ChartError::Configuration(format!(
                    "column name {name:?} used for both a numeric and a label column"
                )));
            }
        }

        let mut times = Vec::with_capacity(row_count);
        for value in &self.times {
            times.push(parse_timestamp(value, time_format)?);
        }

        let mut order: Vec<usize> = (0..row_count).collect();
        order.sort_by_key(|&i| times[i]);
        for window in order.windows(2) {
            if times[window[0]] == times[window[1]] {
                return Err(ChartError::InvalidData(format!(
                    "duplicate timestamp {} in time index",
                    times[window[0]]
                )));
            }
        }

        let was_sorted = order.iter().enumerate().all(|(slot, &i)| slot == i);
        if !was_sorted {
            warn!(rows = row_count, "time index was unsorted; rows reordered");
        }

        let times = order.iter().map(|&i| times[i]).collect();
        let values = self
            .values
            .into_iter()
            .map(|(name, cells)| (name, reorder(cells, &order)))
            .collect();
        let labels = self
            .labels
            .into_iter()
            .map(|(name, cells)| (name, reorder(cells, &order)))
            .collect();

        Ok(RawSeries {
            times,
            values,
            labels,
        })
    }
}

fn reorder<T: Clone>(cells: Vec<T>, order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| cells[i].clone()).collect()
}
