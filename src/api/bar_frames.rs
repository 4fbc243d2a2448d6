use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::api::annotations::{AnnotationSet, ResolvedText, TextStyle};
use crate::api::datafier::Datafier;
use crate::api::decoration::{self, DecorationInput};
use crate::api::label_format::human_readable;
use crate::error::{ChartError, ChartResult};

const DEFAULT_BAR_COLOR: &str = "#777777";

/// Everything a renderer needs to draw one bar-race frame.
///
/// The four vectors are parallel: entry `k` describes one visible bar.
/// `positions` are displayed ranks in `[1, n_bars]` (higher is nearer the
/// top), `magnitudes` are the interpolated values that set bar lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAttributes {
    pub positions: Vec<f64>,
    pub magnitudes: Vec<f64>,
    pub columns: Vec<String>,
    pub colors: Vec<String>,
}

impl FrameAttributes {
    /// Number of bars drawn this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Bar-chart-race frame generator over a prepared dataset.
///
/// Holds per-column presentation state (colors, annotations, label precision)
/// and produces [`FrameAttributes`] per frame without mutating the data.
pub struct BarRace {
    datafier: Datafier,
    column_colors: IndexMap<String, String>,
    annotations: AnnotationSet,
    label_precision: usize,
}

impl BarRace {
    #[must_use]
    pub fn new(datafier: Datafier) -> Self {
        let column_colors = datafier
            .column_names()
            .map(|name| (name.to_owned(), DEFAULT_BAR_COLOR.to_owned()))
            .collect();
        Self {
            datafier,
            column_colors,
            annotations: AnnotationSet::new(),
            label_precision: 2,
        }
    }

    #[must_use]
    pub fn datafier(&self) -> &Datafier {
        &self.datafier
    }

    /// Number of frames in the animation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datafier.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datafier.is_empty()
    }

    /// Sets bar colors from any decoration shape.
    pub fn set_column_colors(&mut self, input: impl Into<DecorationInput>) -> ChartResult<()> {
        self.column_colors = decoration::resolve(input.into(), &self.column_colors)?;
        Ok(())
    }

    #[must_use]
    pub fn column_colors(&self) -> &IndexMap<String, String> {
        &self.column_colors
    }

    /// Sets the fractional precision of magnitude labels.
    pub fn set_label_precision(&mut self, precision: usize) {
        self.label_precision = precision;
    }

    #[must_use]
    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationSet {
        &mut self.annotations
    }

    /// Formats a bar magnitude for display next to the bar head.
    #[must_use]
    pub fn magnitude_label(&self, value: f64) -> String {
        human_readable(value, self.label_precision)
    }

    /// Computes the draw attributes for frame `frame`.
    ///
    /// Only columns whose displayed rank falls within `[1, n_bars]` are
    /// included, in original column order. The selection reads from the
    /// prepared dataset, so asking for the same frame twice yields identical
    /// attributes.
    pub fn attributes_for_frame(&self, frame: usize) -> ChartResult<FrameAttributes> {
        if frame >= self.datafier.len() {
            return Err(ChartError::InvalidData(format!(
                "frame {frame} out of range for {} frames",
                self.datafier.len()
            )));
        }

        let band_top = self.datafier.n_bars() as f64;
        let mut selected: SmallVec<[usize; 16]> = SmallVec::new();
        for (col, column) in self.datafier.ranks().values().enumerate() {
            let rank = column[frame];
            if (1.0..=band_top).contains(&rank) {
                selected.push(col);
            }
        }

        let ranks = self.datafier.ranks();
        let values = self.datafier.data().values();
        let mut positions = Vec::with_capacity(selected.len());
        let mut magnitudes = Vec::with_capacity(selected.len());
        let mut columns = Vec::with_capacity(selected.len());
        let mut colors = Vec::with_capacity(selected.len());
        for &col in &selected {
            let (name, rank_column) = ranks
                .get_index(col)
                .ok_or_else(|| ChartError::InvalidData(format!("missing rank column {col}")))?;
            let value_column = values
                .get(name)
                .ok_or_else(|| ChartError::InvalidData(format!("missing data column {name:?}")))?;
            positions.push(rank_column[frame]);
            magnitudes.push(value_column[frame]);
            columns.push(name.clone());
            colors.push(
                self.column_colors
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_BAR_COLOR.to_owned()),
            );
        }

        debug!(frame, bars = columns.len(), "computed bar frame attributes");

        Ok(FrameAttributes {
            positions,
            magnitudes,
            columns,
            colors,
        })
    }

    /// Materializes annotations for one frame.
    #[must_use]
    pub fn annotations_for_frame(&self, frame: usize) -> Vec<ResolvedText> {
        self.annotations.resolve_for_frame(frame, &self.datafier)
    }

    /// Adds the running clock annotation at the default lower-right spot.
    pub fn set_time_annotation(&mut self) {
        self.annotations.set_time_annotation(
            TextStyle::at(0.97, 0.27).with_size(46.0).with_weight(800.0),
        );
    }

    /// Iterates over all frames in order.
    #[must_use]
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            race: self,
            next: 0,
        }
    }
}

impl std::fmt::Debug for BarRace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarRace")
            .field("frames", &self.datafier.len())
            .field("n_bars", &self.datafier.n_bars())
            .finish()
    }
}

/// Iterator over [`FrameAttributes`] for every frame of a [`BarRace`].
#[derive(Debug)]
pub struct Frames<'a> {
    race: &'a BarRace,
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = ChartResult<FrameAttributes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.race.len() {
            return None;
        }
        let attributes = self.race.attributes_for_frame(self.next);
        self.next += 1;
        Some(attributes)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.race.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}
