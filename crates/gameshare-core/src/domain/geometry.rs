//! Screen geometry and normalized-to-pixel conversion.
//!
//! The browser reports absolute cursor positions as fractions of its video
//! element (0.0 = left/top edge, 1.0 = right/bottom edge).  The injector needs
//! pixel coordinates on the host display, so the bridge multiplies by the
//! display size and clamps the result onto the screen.

use thiserror::Error;

/// Errors constructing a [`ScreenGeometry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Width or height was zero.
    #[error("screen dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Pixel dimensions of the target display.  Both dimensions are > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    width: u32,
    height: u32,
}

impl ScreenGeometry {
    /// Creates a geometry, rejecting zero-sized dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroDimension`] when either dimension is 0.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Converts a normalized position to pixel coordinates on this display.
    ///
    /// `x_px = round(x_norm * width)`, clamped to `[0, width - 1]`; likewise
    /// for `y`.  Out-of-range and non-finite inputs never escape the screen:
    /// NaN maps to 0 and infinities clamp to the nearest edge.
    pub fn to_pixels(&self, x_norm: f64, y_norm: f64) -> (i32, i32) {
        (
            scale_axis(x_norm, self.width),
            scale_axis(y_norm, self.height),
        )
    }
}

/// Free-function form of [`ScreenGeometry::to_pixels`].
pub fn to_pixels(x_norm: f64, y_norm: f64, geometry: &ScreenGeometry) -> (i32, i32) {
    geometry.to_pixels(x_norm, y_norm)
}

fn scale_axis(norm: f64, dimension: u32) -> i32 {
    let max = i64::from(dimension) - 1;
    // `as` saturates for out-of-range floats and maps NaN to 0.
    let scaled = (norm * f64::from(dimension)).round() as i64;
    // Display sizes are far below i32::MAX.
    scaled.clamp(0, max) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd() -> ScreenGeometry {
        ScreenGeometry::new(1920, 1080).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_width() {
        assert_eq!(
            ScreenGeometry::new(0, 1080),
            Err(GeometryError::ZeroDimension { width: 0, height: 1080 })
        );
    }

    #[test]
    fn test_new_rejects_zero_height() {
        assert!(ScreenGeometry::new(1920, 0).is_err());
    }

    #[test]
    fn test_origin_maps_to_origin() {
        assert_eq!(hd().to_pixels(0.0, 0.0), (0, 0));
    }

    #[test]
    fn test_full_extent_clamps_to_last_pixel() {
        assert_eq!(hd().to_pixels(1.0, 1.0), (1919, 1079));
    }

    #[test]
    fn test_center_rounds_to_nearest_pixel() {
        assert_eq!(hd().to_pixels(0.5, 0.5), (960, 540));
        // 0.25 * 1080 = 270 exactly; 0.3333 * 1920 = 639.94 -> 640
        assert_eq!(hd().to_pixels(0.3333, 0.25), (640, 270));
    }

    #[test]
    fn test_out_of_range_input_clamps_to_screen() {
        let g = hd();
        assert_eq!(g.to_pixels(-0.5, -0.5), (0, 0));
        assert_eq!(g.to_pixels(1.5, 1.5), (1919, 1079));
        assert_eq!(g.to_pixels(-0.5, 1.5), (0, 1079));
    }

    #[test]
    fn test_non_finite_input_stays_on_screen() {
        let g = hd();
        assert_eq!(g.to_pixels(f64::NAN, f64::NAN), (0, 0));
        assert_eq!(g.to_pixels(f64::INFINITY, f64::NEG_INFINITY), (1919, 0));
    }

    #[test]
    fn test_free_function_matches_method() {
        let g = ScreenGeometry::new(800, 600).unwrap();
        assert_eq!(to_pixels(0.1, 0.9, &g), g.to_pixels(0.1, 0.9));
    }

    #[test]
    fn test_single_pixel_screen_always_maps_to_zero() {
        let g = ScreenGeometry::new(1, 1).unwrap();
        assert_eq!(g.to_pixels(0.7, 1.0), (0, 0));
    }
}
