pub mod grid;
pub mod interpolate;
pub mod rank;
pub mod resample;
pub mod series;

pub use grid::{EvenGrid, Frequency, FrequencyUnit};
pub use interpolate::{FillMethod, InterpolationMethod};
pub use rank::{MISSING_RANK, RankSmoothing};
pub use resample::ResampledSeries;
pub use series::{RawSeries, RawSeriesBuilder, parse_timestamp};
