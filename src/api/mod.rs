pub mod annotations;
pub mod bar_frames;
pub mod datafier;
pub mod decoration;
pub mod label_format;
pub mod line_frames;

pub use annotations::{AnnotationSet, ResolvedText, TextCallback, TextStyle};
pub use bar_frames::{BarRace, FrameAttributes, Frames};
pub use datafier::{Datafier, DatafierConfig, SideTable};
pub use decoration::DecorationInput;
pub use label_format::human_readable;
pub use line_frames::{LineFrameAttributes, LinePlot};
