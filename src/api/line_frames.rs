use indexmap::IndexMap;
use tracing::debug;

use crate::api::annotations::{AnnotationSet, ResolvedText};
use crate::api::datafier::Datafier;
use crate::api::decoration::{self, DecorationInput};
use crate::error::{ChartError, ChartResult};

const DEFAULT_LINE_COLOR: &str = "#777777";
const DEFAULT_LINESTYLE: &str = "solid";

/// Everything a renderer needs to draw one line-plot frame.
///
/// All numeric columns are drawn every frame; for column `k`, `series[k]` is
/// the value prefix up to and including the current frame, `head_values[k]`
/// is the newest point (where a head dot or value label goes), and
/// `markers[k]` carries a value only at grid rows backed by a real
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFrameAttributes {
    pub columns: Vec<String>,
    pub colors: Vec<String>,
    pub linestyles: Vec<String>,
    pub series: Vec<Vec<f64>>,
    pub head_values: Vec<f64>,
    pub markers: Vec<Vec<Option<f64>>>,
}

impl LineFrameAttributes {
    /// Number of lines drawn this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Line-plot frame generator over a prepared dataset.
///
/// Unlike the bar race there is no visibility band: every numeric column gets
/// a line, growing by one grid point per frame.
pub struct LinePlot {
    datafier: Datafier,
    column_colors: IndexMap<String, String>,
    column_linestyles: IndexMap<String, String>,
    annotations: AnnotationSet,
}

impl LinePlot {
    #[must_use]
    pub fn new(datafier: Datafier) -> Self {
        let column_colors = datafier
            .column_names()
            .map(|name| (name.to_owned(), DEFAULT_LINE_COLOR.to_owned()))
            .collect();
        let column_linestyles = datafier
            .column_names()
            .map(|name| (name.to_owned(), DEFAULT_LINESTYLE.to_owned()))
            .collect();
        Self {
            datafier,
            column_colors,
            column_linestyles,
            annotations: AnnotationSet::new(),
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

    /// Sets line colors from any decoration shape.
    pub fn set_column_colors(&mut self, input: impl Into<DecorationInput>) -> ChartResult<()> {
        self.column_colors = decoration::resolve(input.into(), &self.column_colors)?;
        Ok(())
    }

    /// Sets line styles (e.g. `"solid"`, `"dashed"`) from any decoration shape.
    pub fn set_column_linestyles(&mut self, input: impl Into<DecorationInput>) -> ChartResult<()> {
        self.column_linestyles = decoration::resolve(input.into(), &self.column_linestyles)?;
        Ok(())
    }

    #[must_use]
    pub fn column_colors(&self) -> &IndexMap<String, String> {
        &self.column_colors
    }

    #[must_use]
    pub fn column_linestyles(&self) -> &IndexMap<String, String> {
        &self.column_linestyles
    }

    #[must_use]
    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationSet {
        &mut self.annotations
    }

    /// Computes the draw attributes for frame `frame`.
    ///
    /// The per-column prefixes cover grid rows `0..=frame`; markers appear
    /// only at rows flagged as real observations.
    pub fn attributes_for_frame(&self, frame: usize) -> ChartResult<LineFrameAttributes> {
        if frame >= self.datafier.len() {
            return Err(ChartError::InvalidData(format!(
                "frame {frame} out of range for {} frames",
                self.datafier.len()
            )));
        }

        let observed = self.datafier.data().observed();
        let columns_count = self.datafier.data().values().len();
        let mut columns = Vec::with_capacity(columns_count);
        let mut colors = Vec::with_capacity(columns_count);
        let mut linestyles = Vec::with_capacity(columns_count);
        let mut series = Vec::with_capacity(columns_count);
        let mut head_values = Vec::with_capacity(columns_count);
        let mut markers = Vec::with_capacity(columns_count);

        for (name, values) in self.datafier.data().values() {
            let prefix = &values[..=frame];
            series.push(prefix.to_vec());
            head_values.push(values[frame]);
            markers.push(
                prefix
                    .iter()
                    .zip(observed)
                    .map(|(&value, &real)| real.then_some(value))
                    .collect(),
            );
            colors.push(
                self.column_colors
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_LINE_COLOR.to_owned()),
            );
            linestyles.push(
                self.column_linestyles
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_LINESTYLE.to_owned()),
            );
            columns.push(name.clone());
        }

        debug!(frame, lines = columns.len(), "computed line frame attributes");

        Ok(LineFrameAttributes {
            columns,
            colors,
            linestyles,
            series,
            head_values,
            markers,
        })
    }

    /// Materializes annotations for one frame.
    #[must_use]
    pub fn annotations_for_frame(&self, frame: usize) -> Vec<ResolvedText> {
        self.annotations.resolve_for_frame(frame, &self.datafier)
    }
}

impl std::fmt::Debug for LinePlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePlot")
            .field("frames", &self.datafier.len())
            .field("lines", &self.column_colors.len())
            .finish()
    }
}
