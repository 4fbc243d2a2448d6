use std::fmt;

use indexmap::IndexMap;

use crate::api::datafier::Datafier;
use crate::error::{ChartError, ChartResult};

/// Placement and styling for a single text annotation in axes coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub weight: Option<f64>,
    pub horizontal_alignment: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size: 13.0,
            color: "#777777".to_owned(),
            weight: None,
            horizontal_alignment: "left".to_owned(),
        }
    }
}

impl TextStyle {
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_horizontal_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.horizontal_alignment = alignment.into();
        self
    }
}

/// Callback producing per-frame annotation text.
pub type TextCallback = Box<dyn Fn(usize, &Datafier) -> String + Send + Sync>;

enum TextContent {
    Static(String),
    Dynamic(TextCallback),
}

impl fmt::Debug for TextContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<callback>").finish(),
        }
    }
}

struct Annotation {
    content: TextContent,
    style: TextStyle,
}

/// A keyed collection of text annotations, static or frame-dependent.
///
/// Well-known keys (`"title"`, `"xlabel"`, `"time"`) have dedicated setters
/// with sensible default placement; arbitrary keys go through
/// [`AnnotationSet::set_text`] and [`AnnotationSet::set_text_callback`].
pub struct AnnotationSet {
    entries: IndexMap<String, Annotation>,
    time_format: String,
}

impl Default for AnnotationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnnotationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationSet")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One annotation materialized for a specific frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedText {
    pub key: String,
    pub text: String,
    pub style: TextStyle,
}

impl AnnotationSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            time_format: "%Y-%m-%d".to_owned(),
        }
    }

    /// Sets the strftime format used by the default time annotation.
    pub fn set_time_display_format(&mut self, format: impl Into<String>) {
        self.time_format = format.into();
    }

    /// Sets the chart title.
    pub fn set_title(&mut self, text: impl Into<String>) {
        self.set_text_styled(
            "title",
            text,
            TextStyle::at(0.0, 1.05).with_size(18.0).with_color("#333333"),
        );
    }

    /// Sets the x-axis label.
    pub fn set_xlabel(&mut self, text: impl Into<String>) {
        self.set_text_styled(
            "xlabel",
            text,
            TextStyle::at(0.45, -0.12).with_size(14.0),
        );
    }

    /// Adds the running clock annotation, rendering each frame's timestamp
    /// with the configured display format.
    pub fn set_time_annotation(&mut self, style: TextStyle) {
        let format = self.time_format.clone();
        self.entries.insert(
            "time".to_owned(),
            Annotation {
                content: TextContent::Dynamic(Box::new(move |frame, datafier| {
                    datafier
                        .times()
                        .get(frame)
                        .map(|t| t.format(&format).to_string())
                        .unwrap_or_default()
                })),
                style,
            },
        );
    }

    /// Adds or replaces a static annotation with default styling.
    pub fn set_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.set_text_styled(key, text, TextStyle::default());
    }

    /// Adds or replaces a static annotation with explicit styling.
    pub fn set_text_styled(
        &mut self,
        key: impl Into<String>,
        text: impl Into<String>,
        style: TextStyle,
    ) {
        self.entries.insert(
            key.into(),
            Annotation {
                content: TextContent::Static(text.into()),
                style,
            },
        );
    }

    /// Adds or replaces a frame-dependent annotation.
    pub fn set_text_callback(
        &mut self,
        key: impl Into<String>,
        callback: TextCallback,
        style: TextStyle,
    ) {
        self.entries.insert(
            key.into(),
            Annotation {
                content: TextContent::Dynamic(callback),
                style,
            },
        );
    }

    /// Removes an annotation by key.
    pub fn remove(&mut self, key: &str) -> ChartResult<()> {
        self.entries
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| ChartError::Configuration(format!("no annotation with key {key:?}")))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Materializes all annotations for one frame, callbacks included.
    #[must_use]
    pub fn resolve_for_frame(&self, frame: usize, datafier: &Datafier) -> Vec<ResolvedText> {
        self.entries
            .iter()
            .map(|(key, annotation)| {
                let text = match &annotation.content {
                    TextContent::Static(text) => text.clone(),
                    TextContent::Dynamic(callback) => callback(frame, datafier),
                };
                ResolvedText {
                    key: key.clone(),
                    text,
                    style: annotation.style.clone(),
                }
            })
            .collect()
    }
}
