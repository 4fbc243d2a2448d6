use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::grid::{EvenGrid, Frequency};
use crate::core::interpolate::{InterpolationMethod, backfill_then_forwardfill, interpolate_slots};
use crate::core::series::RawSeries;
use crate::error::{ChartError, ChartResult};

/// A raw series reindexed onto an even time grid with every gap filled.
///
/// Numeric columns are complete (no missing cells); label columns carry a
/// value at every grid point. `observed` marks grid rows that coincide with a
/// raw timestamp, which line renderers use to place markers on real
/// observations only.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    times: Vec<NaiveDateTime>,
    values: IndexMap<String, Vec<f64>>,
    labels: IndexMap<String, Vec<String>>,
    observed: Vec<bool>,
}

impl ResampledSeries {
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
    pub fn values(&self) -> &IndexMap<String, Vec<f64>> {
        &self.values
    }

    #[must_use]
    pub fn labels(&self) -> &IndexMap<String, Vec<String>> {
        &self.labels
    }

    #[must_use]
    pub fn observed(&self) -> &[bool] {
        &self.observed
    }

    /// Largest value across all numeric columns, useful for fixed axis limits.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .values()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
    }
}

/// Converts a raw, irregularly-timed series into an evenly spaced one.
///
/// Builds the even grid spanning the raw bounds (merged with the raw index so
/// both bounds are represented exactly), interpolates numeric columns, and
/// carries label columns by back-fill then forward-fill. With `freq` unset no
/// grid is built and the raw index is gap-filled in place.
pub fn resample(
    raw: &RawSeries,
    freq: Option<Frequency>,
    method: InterpolationMethod,
) -> ChartResult<ResampledSeries> {
    let Some((start, end)) = raw.bounds() else {
        return Err(ChartError::InvalidData(
            "cannot resample an empty series".to_owned(),
        ));
    };

    if raw.len() < 2 {
        warn!(
            rows = raw.len(),
            "fewer than 2 timestamps; resampled data degenerates to a constant"
        );
    }

    let grid = match freq {
        Some(freq) => EvenGrid::span(start, end, freq)?.union(raw.times()),
        None => EvenGrid::from_times(raw.times().to_vec()),
    };

    let observed: Vec<bool> = grid
        .times()
        .iter()
        .map(|t| raw.times().binary_search(t).is_ok())
        .collect();
    let raw_row: Vec<Option<usize>> = grid
        .times()
        .iter()
        .map(|t| raw.times().binary_search(t).ok())
        .collect();

    let mut values = IndexMap::with_capacity(raw.numeric_column_count());
    for (name, raw_cells) in raw.numeric_columns() {
        let mut cells: Vec<Option<f64>> = raw_row
            .iter()
            .map(|row| row.and_then(|i| raw_cells[i]).filter(|v| v.is_finite()))
            .collect();

        if cells.iter().all(Option::is_none) {
            warn!(column = %name, "column has no defined values; filling with zero");
            values.insert(name.clone(), vec![0.0; grid.len()]);
            continue;
        }

        match method {
            InterpolationMethod::Linear => interpolate_slots(&mut cells),
        }
        backfill_leading(&mut cells);

        values.insert(
            name.clone(),
            cells.into_iter().map(Option::unwrap_or_default).collect(),
        );
    }

    let mut labels = IndexMap::with_capacity(raw.label_columns().len());
    for (name, raw_cells) in raw.label_columns() {
        let mut cells: Vec<Option<String>> = raw_row
            .iter()
            .map(|row| row.and_then(|i| raw_cells[i].clone()))
            .collect();

        if cells.iter().all(Option::is_none) {
            warn!(column = %name, "label column has no defined values");
        }
        backfill_then_forwardfill(&mut cells);

        labels.insert(
            name.clone(),
            cells.into_iter().map(Option::unwrap_or_default).collect(),
        );
    }

    debug!(
        raw_rows = raw.len(),
        grid_rows = grid.len(),
        columns = values.len(),
        "resampled series onto even grid"
    );

    Ok(ResampledSeries {
        times: grid.times().to_vec(),
        values,
        labels,
        observed,
    })
}

fn backfill_leading(cells: &mut [Option<f64>]) {
    let Some(first_defined) = cells.iter().position(Option::is_some) else {
        return;
    };
    let fill = cells[first_defined];
    for cell in cells.iter_mut().take(first_defined) {
        *cell = fill;
    }
}
