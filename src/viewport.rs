/// Size and pixel density of the drawing surface.
///
/// `width` and `height` are logical units; the backing buffer holds
/// `pixel_ratio` device pixels per logical unit along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio,
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Center in logical coordinates
    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    /// Size of the backing buffer in device pixels
    pub fn device_size(&self) -> (usize, usize) {
        (
            (self.width * self.pixel_ratio).ceil() as usize,
            (self.height * self.pixel_ratio).ceil() as usize,
        )
    }
}
