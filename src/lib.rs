//! chart-race-rs: data preparation and frame updates for animated ranked charts.
//!
//! This crate turns irregularly-timed tabular data into an evenly spaced,
//! rank-smoothed animation dataset and hands renderers one ordered attribute
//! set per frame. Drawing itself is left to the consuming backend.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{BarRace, Datafier, DatafierConfig, FrameAttributes, LinePlot};
pub use error::{ChartError, ChartResult};
