//! Active/inactive classification of grayscale samples.

/// 8-bit intensity below which a sample counts as active (black).
///
/// Roughly 98% of the range: only the near-white level produced by the
/// normalizer is inactive.
pub const ACTIVE_THRESHOLD: u8 = 0xFA;

/// 16-bit equivalent of [`ACTIVE_THRESHOLD`].
pub const ACTIVE_THRESHOLD_16: u16 = ACTIVE_THRESHOLD as u16 * 257;

/// A grayscale sample that can be classified as active or inactive.
pub trait GraySample: Copy {
    /// True if the sample is dark enough to count as an active cell.
    fn is_active(self) -> bool;
}

impl GraySample for u8 {
    fn is_active(self) -> bool {
        self < ACTIVE_THRESHOLD
    }
}

impl GraySample for u16 {
    fn is_active(self) -> bool {
        self < ACTIVE_THRESHOLD_16
    }
}
