//! Grid reduction module for converting bitmaps to stitch charts.
//!
//! The pipeline runs on an already normalized (resized, binarized,
//! grayscale) bitmap:
//!
//! 1. **Classification** - each grayscale sample is active or inactive
//! 2. **Row reduction** - each row becomes at most one [`Segment`]
//! 3. **Rendering** - a bordered text chart for the terminal
//! 4. **Serialization** - an indented tag document for persistence
//!
//! Rows without active cells produce no segment and are not rendered.

mod classify;
mod model;
mod reduce;
mod render;
mod xml;

pub use classify::{GraySample, ACTIVE_THRESHOLD, ACTIVE_THRESHOLD_16};
pub use model::{GridModel, Segment, SpanPolicy};
pub use reduce::{reduce, reduce_samples, reduce_with, GridError};
pub use render::{render, CELL_GLYPH};
pub use xml::{from_xml, to_xml, XmlError};
