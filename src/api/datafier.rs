use std::str::FromStr;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::grid::Frequency;
use crate::core::interpolate::{FillMethod, InterpolationMethod, backfill_then_forwardfill};
use crate::core::rank::{RankSmoothing, displayed_ranks, resample_ranks};
use crate::core::resample::{ResampledSeries, resample};
use crate::core::series::{RawSeries, RawSeriesBuilder};
use crate::error::{ChartError, ChartResult};

/// Data-preparation configuration.
///
/// This type is serializable so host applications can persist/load animation
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatafierConfig {
    /// strftime format for parsing the raw time index.
    pub time_format: String,
    /// Grid-spacing descriptor (e.g. `"3MS"`); `None` skips grid construction
    /// and only gap-fills the original index.
    #[serde(default)]
    pub resample_freq: Option<String>,
    /// Fraction of each rank gap eligible for the bounded fill pass.
    #[serde(default = "default_ip_frac")]
    pub ip_frac: f64,
    /// Number of bars visible on the chart; clamped to the column count.
    #[serde(default = "default_n_bars")]
    pub n_bars: usize,
    #[serde(default)]
    pub interpolation_method: InterpolationMethod,
    #[serde(default)]
    pub fill_method: FillMethod,
}

impl DatafierConfig {
    #[must_use]
    pub fn new(time_format: impl Into<String>) -> Self {
        Self {
            time_format: time_format.into(),
            resample_freq: None,
            ip_frac: default_ip_frac(),
            n_bars: default_n_bars(),
            interpolation_method: InterpolationMethod::default(),
            fill_method: FillMethod::default(),
        }
    }

    /// Sets the resampling frequency descriptor.
    #[must_use]
    pub fn with_resample_freq(mut self, freq: impl Into<String>) -> Self {
        self.resample_freq = Some(freq.into());
        self
    }

    /// Sets the rank-smoothing fraction.
    #[must_use]
    pub fn with_ip_frac(mut self, ip_frac: f64) -> Self {
        self.ip_frac = ip_frac;
        self
    }

    /// Sets the requested visible-bar count.
    #[must_use]
    pub fn with_n_bars(mut self, n_bars: usize) -> Self {
        self.n_bars = n_bars;
        self
    }

    /// Sets the numeric interpolation method by name (`"linear"`).
    pub fn with_interpolation_method(mut self, name: &str) -> ChartResult<Self> {
        self.interpolation_method = InterpolationMethod::from_str(name)?;
        Ok(self)
    }

    /// Sets the bounded fill method by name (`"bfill"` / `"ffill"`).
    pub fn with_fill_method(mut self, name: &str) -> ChartResult<Self> {
        self.fill_method = FillMethod::from_str(name)?;
        Ok(self)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.n_bars == 0 {
            return Err(ChartError::Configuration(
                "n_bars must be >= 1".to_owned(),
            ));
        }
        if !self.ip_frac.is_finite() || !(0.0..=1.0).contains(&self.ip_frac) {
            return Err(ChartError::Configuration(format!(
                "ip_frac must be within [0.0, 1.0], got {}",
                self.ip_frac
            )));
        }
        self.frequency()?;
        Ok(())
    }

    /// Parses the configured frequency descriptor, if any.
    pub fn frequency(&self) -> ChartResult<Option<Frequency>> {
        self.resample_freq
            .as_deref()
            .map(Frequency::from_str)
            .transpose()
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_ip_frac() -> f64 {
    0.5
}

fn default_n_bars() -> usize {
    10
}

/// Auxiliary row-indexed metadata reindexed onto the animation grid.
///
/// Both numeric and label columns follow the non-numeric gap policy
/// (back-fill then forward-fill), so a value is available at every frame for
/// annotation callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct SideTable {
    values: IndexMap<String, Vec<f64>>,
    labels: IndexMap<String, Vec<String>>,
}

impl SideTable {
    #[must_use]
    pub fn values(&self) -> &IndexMap<String, Vec<f64>> {
        &self.values
    }

    #[must_use]
    pub fn labels(&self) -> &IndexMap<String, Vec<String>> {
        &self.labels
    }
}

/// Owns the prepared animation dataset: resampled values, resampled ranks,
/// and the stable set of columns that are ever visible.
///
/// All preparation happens eagerly at construction; the numeric data is an
/// immutable snapshot afterwards. Frame views read from it without mutation.
#[derive(Debug)]
pub struct Datafier {
    raw: RawSeries,
    data: ResampledSeries,
    ranks: IndexMap<String, Vec<f64>>,
    visible_columns: Vec<String>,
    n_bars: usize,
    row_tables: IndexMap<String, SideTable>,
    column_tables: IndexMap<String, IndexMap<String, String>>,
}

impl Datafier {
    /// Prepares an already-parsed raw series for animation.
    pub fn new(raw: RawSeries, config: &DatafierConfig) -> ChartResult<Self> {
        config.validate()?;

        if raw.numeric_column_count() == 0 {
            return Err(ChartError::Configuration(
                "series must have at least one numeric column".to_owned(),
            ));
        }

        // n_bars cannot exceed the number of available columns.
        let n_bars = config.n_bars.min(raw.numeric_column_count());

        // Rank before zeroing so missing cells keep the sentinel instead of
        // competing as zeros.
        let raw_ranks = displayed_ranks(&raw, n_bars);
        let zeroed = raw.with_missing_zeroed();
        let data = resample(&zeroed, config.frequency()?, config.interpolation_method)?;

        let smoothing = RankSmoothing {
            ip_frac: config.ip_frac,
            fill_method: config.fill_method,
        };
        let ranks = resample_ranks(&raw_ranks, raw.times(), data.times(), smoothing);

        let visible_columns: Vec<String> = ranks
            .iter()
            .filter(|(_, column)| column.iter().any(|&rank| rank >= 1.0))
            .map(|(name, _)| name.clone())
            .collect();

        debug!(
            frames = data.len(),
            n_bars,
            visible = visible_columns.len(),
            "prepared animation dataset"
        );

        Ok(Self {
            raw,
            data,
            ranks,
            visible_columns,
            n_bars,
            row_tables: IndexMap::new(),
            column_tables: IndexMap::new(),
        })
    }

    /// Builds the raw series with the config's time format, then prepares it.
    pub fn from_builder(builder: RawSeriesBuilder, config: &DatafierConfig) -> ChartResult<Self> {
        let raw = builder.build(&config.time_format)?;
        Self::new(raw, config)
    }

    #[must_use]
    pub fn raw(&self) -> &RawSeries {
        &self.raw
    }

    /// Resampled values on the even grid.
    #[must_use]
    pub fn data(&self) -> &ResampledSeries {
        &self.data
    }

    /// Resampled displayed ranks, one complete column per numeric column.
    #[must_use]
    pub fn ranks(&self) -> &IndexMap<String, Vec<f64>> {
        &self.ranks
    }

    /// Columns that ever enter the visible band (rank >= 1).
    #[must_use]
    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    /// Effective visible-bar count after clamping.
    #[must_use]
    pub fn n_bars(&self) -> usize {
        self.n_bars
    }

    /// The time axis: one timestamp per animation frame.
    #[must_use]
    pub fn times(&self) -> &[NaiveDateTime] {
        self.data.times()
    }

    /// Number of animation frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric column names in original order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.data.values().keys().map(String::as_str)
    }

    /// Displayed rank of `column` at frame `frame`, if both exist.
    #[must_use]
    pub fn rank_at(&self, frame: usize, column: &str) -> Option<f64> {
        self.ranks.get(column).and_then(|cells| cells.get(frame)).copied()
    }

    /// Attaches row-indexed metadata, reindexed onto the animation grid with
    /// the back-fill-then-forward-fill policy.
    ///
    /// The metadata must share at least one timestamp with the grid.
    pub fn attach_row_table(&mut self, key: impl Into<String>, table: RawSeries) -> ChartResult<()> {
        let key = key.into();
        let grid = self.data.times();
        let rows: Vec<Option<usize>> = grid
            .iter()
            .map(|t| table.times().binary_search(t).ok())
            .collect();

        if rows.iter().all(Option::is_none) {
            return Err(ChartError::Configuration(format!(
                "row table {key:?} shares no timestamps with the animation grid"
            )));
        }

        let mut values = IndexMap::with_capacity(table.numeric_column_count());
        for (name, cells) in table.numeric_columns() {
            let mut reindexed: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.and_then(|i| cells[i]).filter(|v| v.is_finite()))
                .collect();
            backfill_then_forwardfill(&mut reindexed);
            values.insert(
                name.clone(),
                reindexed.into_iter().map(Option::unwrap_or_default).collect(),
            );
        }

        let mut labels = IndexMap::with_capacity(table.label_columns().len());
        for (name, cells) in table.label_columns() {
            let mut reindexed: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.and_then(|i| cells[i].clone()))
                .collect();
            backfill_then_forwardfill(&mut reindexed);
            labels.insert(
                name.clone(),
                reindexed.into_iter().map(Option::unwrap_or_default).collect(),
            );
        }

        self.row_tables.insert(key, SideTable { values, labels });
        Ok(())
    }

    /// Attaches column-indexed metadata keyed by series name.
    ///
    /// Every key must name a live numeric column.
    pub fn attach_column_table(
        &mut self,
        key: impl Into<String>,
        table: IndexMap<String, String>,
    ) -> ChartResult<()> {
        for name in table.keys() {
            if !self.data.values().contains_key(name) {
                return Err(ChartError::Configuration(format!(
                    "column table references unknown column {name:?}"
                )));
            }
        }
        self.column_tables.insert(key.into(), table);
        Ok(())
    }

    #[must_use]
    pub fn row_table(&self, key: &str) -> Option<&SideTable> {
        self.row_tables.get(key)
    }

    #[must_use]
    pub fn column_table(&self, key: &str) -> Option<&IndexMap<String, String>> {
        self.column_tables.get(key)
    }
}
