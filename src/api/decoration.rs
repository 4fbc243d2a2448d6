use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};

/// Per-column decoration in one of three shapes.
///
/// A single value applies to every column, a sequence is matched positionally
/// against the current column order, and a map overrides individual columns by
/// name while leaving the rest untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationInput {
    Uniform(String),
    Sequence(Vec<String>),
    ByColumn(IndexMap<String, String>),
}

impl From<&str> for DecorationInput {
    fn from(value: &str) -> Self {
        Self::Uniform(value.to_owned())
    }
}

impl From<String> for DecorationInput {
    fn from(value: String) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<String>> for DecorationInput {
    fn from(values: Vec<String>) -> Self {
        Self::Sequence(values)
    }
}

impl From<Vec<&str>> for DecorationInput {
    fn from(values: Vec<&str>) -> Self {
        Self::Sequence(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<IndexMap<String, String>> for DecorationInput {
    fn from(map: IndexMap<String, String>) -> Self {
        Self::ByColumn(map)
    }
}

/// Resolves a decoration input against the current per-column assignment.
///
/// The result always covers exactly the columns of `current`, in the same
/// order. Sequences must match the column count; map keys must name known
/// columns.
pub fn resolve(
    input: DecorationInput,
    current: &IndexMap<String, String>,
) -> ChartResult<IndexMap<String, String>> {
    match input {
        DecorationInput::Uniform(value) => Ok(current
            .keys()
            .map(|name| (name.clone(), value.clone()))
            .collect()),
        DecorationInput::Sequence(values) => {
            if values.len() != current.len() {
                return Err(ChartError::Configuration(format!(
                    "decoration sequence has {} entries but there are {} columns",
                    values.len(),
                    current.len()
                )));
            }
            Ok(current
                .keys()
                .zip(values)
                .map(|(name, value)| (name.clone(), value))
                .collect())
        }
        DecorationInput::ByColumn(map) => {
            for name in map.keys() {
                if !current.contains_key(name) {
                    return Err(ChartError::Configuration(format!(
                        "decoration references unknown column {name:?}"
                    )));
                }
            }
            let mut resolved = current.clone();
            for (name, value) in map {
                resolved.insert(name, value);
            }
            Ok(resolved)
        }
    }
}
