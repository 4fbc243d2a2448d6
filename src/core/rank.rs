use chrono::NaiveDateTime;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::core::interpolate::{FillMethod, fill_limited, interpolate_slots};
use crate::core::series::RawSeries;

/// Sentinel stored for cells that have no ranked value at a timestamp.
pub const MISSING_RANK: f64 = -1.0;

/// Jitter-smoothing controls for rank resampling.
///
/// `ip_frac` is the fraction of each rank gap eligible for the bounded fill
/// pass before linear interpolation takes over. `0.0` disables the pass, so a
/// reindexed rank series is interpolated directly; `1.0` step-holds entire
/// gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSmoothing {
    pub ip_frac: f64,
    pub fill_method: FillMethod,
}

impl Default for RankSmoothing {
    fn default() -> Self {
        Self {
            ip_frac: 0.5,
            fill_method: FillMethod::Backward,
        }
    }
}

/// Computes displayed ranks for every raw timestamp.
///
/// Per row, numeric cells are ranked descending with ties broken by original
/// column order, clipped to `n_bars + 1`, then inverted so the largest value
/// lands on `n_bars` (the topmost chart slot) and everything past the visible
/// band collapses to `0`. Missing cells get [`MISSING_RANK`].
#[must_use]
pub fn displayed_ranks(raw: &RawSeries, n_bars: usize) -> IndexMap<String, Vec<f64>> {
    let rows = raw.len();
    let mut ranks: IndexMap<String, Vec<f64>> = raw
        .numeric_columns()
        .keys()
        .map(|name| (name.clone(), vec![MISSING_RANK; rows]))
        .collect();

    let ceiling = n_bars + 1;
    let mut entries: Vec<(usize, f64)> = Vec::with_capacity(raw.numeric_column_count());
    for row in 0..rows {
        entries.clear();
        for (col, cells) in raw.numeric_columns().values().enumerate() {
            if let Some(value) = cells[row].filter(|v| v.is_finite()) {
                entries.push((col, value));
            }
        }
        // Stable sort: equal values keep original column order ("first" ties).
        entries.sort_by_key(|&(_, value)| std::cmp::Reverse(OrderedFloat(value)));

        for (position, &(col, _)) in entries.iter().enumerate() {
            let clipped = (position + 1).min(ceiling);
            let displayed = (ceiling - clipped) as f64;
            if let Some((_, column)) = ranks.get_index_mut(col) {
                column[row] = displayed;
            }
        }
    }

    ranks
}

/// Reindexes displayed ranks onto the even grid and smooths the gaps.
///
/// Grid rows introduced between raw timestamps start undefined. When
/// smoothing is enabled, up to `ceil(w * ip_frac)` consecutive cells per gap
/// are filled with the configured fill method, where `w` is the column's
/// missing-to-defined gap ratio; the remainder is filled by slot-linear
/// interpolation. Every cell is defined on return.
#[must_use]
pub fn resample_ranks(
    ranks: &IndexMap<String, Vec<f64>>,
    raw_times: &[NaiveDateTime],
    grid_times: &[NaiveDateTime],
    smoothing: RankSmoothing,
) -> IndexMap<String, Vec<f64>> {
    let raw_row: Vec<Option<usize>> = grid_times
        .iter()
        .map(|t| raw_times.binary_search(t).ok())
        .collect();

    let mut resampled = IndexMap::with_capacity(ranks.len());
    for (name, column) in ranks {
        let mut cells: Vec<Option<f64>> = raw_row
            .iter()
            .map(|row| row.map(|i| column[i]))
            .collect();

        if smoothing.ip_frac > 0.0 {
            let defined = cells.iter().filter(|c| c.is_some()).count();
            let missing = cells.len() - defined;
            if missing > 0 && defined > 0 {
                let gap_ratio = missing as f64 / (defined as f64 - 1.0);
                let budget = gap_ratio * smoothing.ip_frac;
                if budget > 0.0 {
                    // f64-to-usize casts saturate, so a single-point column
                    // (infinite ratio) step-holds the whole gap.
                    let limit = budget.ceil() as usize;
                    fill_limited(&mut cells, smoothing.fill_method, limit);
                }
            }
        }
        interpolate_slots(&mut cells);

        resampled.insert(
            name.clone(),
            cells.into_iter().map(Option::unwrap_or_default).collect(),
        );
    }

    resampled
}
