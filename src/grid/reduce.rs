//! Row reduction: bitmap rows to per-row segments.

use image::{ColorType, DynamicImage};

use super::classify::GraySample;
use super::model::{GridModel, Segment, SpanPolicy};

/// Errors that can occur while reducing a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The bitmap is not grayscale, so the normalizer contract was broken.
    #[error("unsupported color model {0:?}, expected 8 or 16 bit grayscale")]
    UnsupportedColorModel(ColorType),
}

/// Reduce a decoded bitmap to a grid model using the default span policy.
///
/// # Errors
/// * `GridError::UnsupportedColorModel` - If the bitmap is not grayscale.
///   No segment is produced in that case.
pub fn reduce(image: &DynamicImage) -> Result<GridModel, GridError> {
    reduce_with(image, SpanPolicy::default())
}

/// Reduce a decoded bitmap to a grid model with an explicit span policy.
pub fn reduce_with(image: &DynamicImage, policy: SpanPolicy) -> Result<GridModel, GridError> {
    let grid = match image {
        DynamicImage::ImageLuma8(buf) => {
            reduce_samples(buf.as_raw(), buf.width(), buf.height(), policy)
        }
        DynamicImage::ImageLuma16(buf) => {
            reduce_samples(buf.as_raw(), buf.width(), buf.height(), policy)
        }
        other => return Err(GridError::UnsupportedColorModel(other.color())),
    };

    log::debug!(
        "Reduced {}x{} bitmap to {} segment(s) ({})",
        grid.cells_x(),
        grid.cells_y(),
        grid.segments().len(),
        policy.name()
    );

    Ok(grid)
}

/// Reduce row-major grayscale samples to a grid model.
///
/// Rows are scanned top to bottom. Rows without an active sample produce
/// no segment.
///
/// # Arguments
/// * `samples` - Grayscale samples, exactly `width * height` of them,
///   row-major order
/// * `width` - Bitmap width in pixels
/// * `height` - Bitmap height in pixels
/// * `policy` - How a row is reduced to segments
pub fn reduce_samples<T: GraySample>(
    samples: &[T],
    width: u32,
    height: u32,
    policy: SpanPolicy,
) -> GridModel {
    debug_assert_eq!(
        samples.len(),
        width as usize * height as usize,
        "sample count does not match a {}x{} bitmap",
        width,
        height
    );

    let mut grid = GridModel::new(width, height);
    if width == 0 || height == 0 {
        return grid;
    }

    for (y, row) in samples
        .chunks_exact(width as usize)
        .take(height as usize)
        .enumerate()
    {
        let row_number = y as u32 + 1;
        match policy {
            SpanPolicy::BoundingInterval => {
                if let Some((x1, x2)) = bounding_interval(row) {
                    grid.push(Segment::row(row_number, x1, x2));
                }
            }
        }
    }

    grid
}

/// 1-based columns of the first and last active sample in a row.
fn bounding_interval<T: GraySample>(row: &[T]) -> Option<(u32, u32)> {
    let mut first = None;
    let mut last = 0;

    for (x, sample) in row.iter().enumerate() {
        if sample.is_active() {
            let column = x as u32 + 1;
            first.get_or_insert(column);
            last = column;
        }
    }

    first.map(|first| (first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage};

    const B: u8 = 0;
    const W: u8 = 255;

    #[test]
    fn test_bounding_interval_empty_row() {
        assert_eq!(bounding_interval(&[W, W, W]), None);
    }

    #[test]
    fn test_bounding_interval_single_pixel() {
        assert_eq!(bounding_interval(&[W, B, W]), Some((2, 2)));
    }

    #[test]
    fn test_bounding_interval_first_and_last_column() {
        assert_eq!(bounding_interval(&[B, W, W]), Some((1, 1)));
        assert_eq!(bounding_interval(&[W, W, B]), Some((3, 3)));
    }

    #[test]
    fn test_bounding_interval_spans_gap() {
        let row = [W, W, B, W, W, W, W, B, W, W];
        assert_eq!(bounding_interval(&row), Some((3, 8)));
    }

    #[test]
    fn test_state_does_not_leak_between_rows() {
        // Row 1 ends active, row 2 starts active only at the last column.
        let samples = [W, B, W, W, W, B];
        let grid = reduce_samples(&samples, 3, 2, SpanPolicy::BoundingInterval);
        assert_eq!(
            grid.segments(),
            &[Segment::row(1, 2, 2), Segment::row(2, 3, 3)]
        );
    }

    #[test]
    fn test_zero_width() {
        let grid = reduce_samples::<u8>(&[], 0, 4, SpanPolicy::BoundingInterval);
        assert_eq!(grid.cells_x(), 0);
        assert_eq!(grid.cells_y(), 4);
        assert!(grid.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "sample count does not match a 3x2 bitmap")]
    fn test_short_sample_buffer_is_rejected() {
        reduce_samples(&[W, B, W, W], 3, 2, SpanPolicy::BoundingInterval);
    }

    #[test]
    fn test_reduce_luma8() {
        let img = GrayImage::from_fn(3, 2, |x, y| if x == y { Luma([B]) } else { Luma([W]) });
        let grid = reduce(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(
            grid.segments(),
            &[Segment::row(1, 1, 1), Segment::row(2, 2, 2)]
        );
    }

    #[test]
    fn test_reduce_luma16() {
        let img = image::ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 1 {
                Luma([0u16])
            } else {
                Luma([u16::MAX])
            }
        });
        let grid = reduce(&DynamicImage::ImageLuma16(img)).unwrap();
        assert_eq!(grid.segments(), &[Segment::row(1, 2, 2)]);
    }

    #[test]
    fn test_reduce_rejects_rgb() {
        let img = RgbImage::new(2, 2);
        let err = reduce(&DynamicImage::ImageRgb8(img)).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedColorModel(ColorType::Rgb8)));
    }
}
