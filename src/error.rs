use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot parse timestamp {value:?} with format {format:?}")]
    Format { value: String, format: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
