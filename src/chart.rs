//! One conversion run: normalize, reduce, print, persist.

use std::io::Write;
use std::path::PathBuf;

use image::DynamicImage;

use crate::error::AppError;
use crate::grid::{self, GridModel};
use crate::normalize::{self, NormalizeSettings};
use crate::output;

/// A reduced image together with both of its projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub grid: GridModel,
    /// Bordered text rendering
    pub text: String,
    /// Serialized tag document
    pub xml: String,
}

impl Chart {
    /// Reduce a normalized bitmap and build both projections.
    ///
    /// Fails before anything is produced if the bitmap is not grayscale.
    pub fn from_image(image: &DynamicImage) -> Result<Self, grid::GridError> {
        let grid = grid::reduce(image)?;
        Ok(Self::from_grid(grid))
    }

    /// Build both projections of an existing grid.
    pub fn from_grid(grid: GridModel) -> Self {
        let text = grid::render(&grid);
        let xml = grid::to_xml(&grid);
        Self { grid, text, xml }
    }
}

/// Everything needed for one conversion.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub settings: NormalizeSettings,
    /// Print the text rendering before writing the file
    pub print_grid: bool,
}

impl Job {
    /// Job with the output path derived from the input.
    pub fn new(input: PathBuf, settings: NormalizeSettings) -> Self {
        let output = output::output_path(&input);
        Self {
            input,
            output,
            settings,
            print_grid: true,
        }
    }

    /// Run the external normalizer, then [`Job::finish`].
    pub fn run(&self, out: &mut impl Write) -> Result<Chart, AppError> {
        let image = normalize::normalize(&self.input, &self.settings)?;
        self.finish(&image, out)
    }

    /// Reduce an already normalized bitmap, print the chart and write the
    /// document.
    ///
    /// Nothing is printed or written if reduction fails. A persistence
    /// failure happens after the chart was printed. Failing to print (e.g.
    /// a closed pipe) is logged and does not stop the file from being
    /// written.
    pub fn finish(&self, image: &DynamicImage, out: &mut impl Write) -> Result<Chart, AppError> {
        let chart = Chart::from_image(image)?;
        log::info!(
            "{}: {}x{} cells, {} segment(s)",
            self.input.display(),
            chart.grid.cells_x(),
            chart.grid.cells_y(),
            chart.grid.segments().len()
        );

        if self.print_grid {
            if let Err(e) = writeln!(out, "{}", chart.text).and_then(|_| out.flush()) {
                log::warn!("Failed to print chart: {}", e);
            }
        }

        output::write_atomic(&self.output, chart.xml.as_bytes())?;
        Ok(chart)
    }
}
