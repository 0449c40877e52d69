//! stitch-chart library crate.
//!
//! Converts a normalized bitmap into a row-oriented stitch chart: a grid
//! model of per-row active segments, a bordered text rendering and an
//! indented tag document.

pub mod chart;
pub mod config;
pub mod error;
pub mod grid;
pub mod normalize;
pub mod output;
