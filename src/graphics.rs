use crate::frame::{DrawCommand, Frame, Rgba, StrokeStyle};

/// Largest backing buffer the widget will allocate, in bytes
pub const MAX_SURFACE_BYTES: usize = 256 * 1024 * 1024;

/// Number of halo rings drawn for a glowing stroke
const GLOW_RINGS: usize = 4;
/// Combined opacity of all halo rings at the stroke's core
const GLOW_STRENGTH: f64 = 0.6;

/// Anything a frame can be painted onto
pub trait Surface {
    /// Clear every pixel to transparent
    fn clear(&mut self);
    /// Stroke a line given in logical coordinates
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], style: &StrokeStyle);
}

/// Replays a frame's commands onto a surface, in order
pub fn paint<S: Surface + ?Sized>(frame: &Frame, surface: &mut S) {
    for command in &frame.commands {
        match command {
            DrawCommand::Clear => surface.clear(),
            DrawCommand::Line { from, to, style } => surface.stroke_line(*from, *to, style),
        }
    }
}

/// RGBA8 raster in device pixels
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixel_ratio: f64,
    pixel_data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a transparent buffer, or `None` when the surface cannot
    /// exist (zero area or too large).
    pub fn new(width: usize, height: usize, pixel_ratio: f64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let bytes = width.checked_mul(height)?.checked_mul(4)?;
        if bytes > MAX_SURFACE_BYTES {
            return None;
        }
        Some(PixelBuffer {
            width,
            height,
            pixel_ratio,
            pixel_data: vec![0u8; bytes],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// RGBA of the device pixel at (x, y), or `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let rgba = self.pixel_data.get(offset..offset + 4)?;
        Some([rgba[0], rgba[1], rgba[2], rgba[3]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixel_data
    }

    /// Source-over blend of `color` into one device pixel
    fn blend(&mut self, x: isize, y: isize, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let offset = (y as usize * self.width + x as usize) * 4;
        let src_a = color.a.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst_a = f64::from(self.pixel_data[offset + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |src: u8, dst: u8| -> u8 {
            let value = (f64::from(src) * src_a + f64::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };
        self.pixel_data[offset] = mix(color.r, self.pixel_data[offset]);
        self.pixel_data[offset + 1] = mix(color.g, self.pixel_data[offset + 1]);
        self.pixel_data[offset + 2] = mix(color.b, self.pixel_data[offset + 2]);
        self.pixel_data[offset + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Strokes a device-space segment `half_width` pixels either side of its axis.
    fn stroke_device(&mut self, from: [f64; 2], to: [f64; 2], half_width: f64, color: Rgba) {
        if half_width <= 0.5 {
            self.draw_line(from, to, color);
        } else {
            self.fill_segment(from, to, half_width, color);
        }
    }

    /// Draws a one-pixel line using Bresenham's algorithm
    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], color: Rgba) {
        let (mut x0, mut y0, x1, y1) = (
            from[0].round() as isize,
            from[1].round() as isize,
            to[0].round() as isize,
            to[1].round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.blend(x0, y0, color);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fills every pixel whose center lies within `half_width` of the segment
    fn fill_segment(&mut self, from: [f64; 2], to: [f64; 2], half_width: f64, color: Rgba) {
        let min_x = (from[0].min(to[0]) - half_width).floor().max(0.0);
        let max_x = (from[0].max(to[0]) + half_width)
            .ceil()
            .min(self.width as f64 - 1.0);
        let min_y = (from[1].min(to[1]) - half_width).floor().max(0.0);
        let max_y = (from[1].max(to[1]) + half_width)
            .ceil()
            .min(self.height as f64 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y as isize..=max_y as isize {
            for x in min_x as isize..=max_x as isize {
                let p = [x as f64 + 0.5, y as f64 + 0.5];
                if distance_to_segment(p, from, to) <= half_width {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

impl Surface for PixelBuffer {
    fn clear(&mut self) {
        self.pixel_data.fill(0);
    }

    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], style: &StrokeStyle) {
        let ratio = self.pixel_ratio;
        let from = [from[0] * ratio, from[1] * ratio];
        let to = [to[0] * ratio, to[1] * ratio];
        let half_width = (style.width * ratio).round().max(1.0) / 2.0;

        if let Some(glow) = style.glow {
            // Widest ring first; overlapping rings build up toward the core.
            let reach = glow.blur / 2.0 * ratio;
            let ring_color = glow.color.fade(GLOW_STRENGTH / GLOW_RINGS as f64);
            for ring in (1..=GLOW_RINGS).rev() {
                let spread = reach * ring as f64 / GLOW_RINGS as f64;
                self.fill_segment(from, to, half_width + spread, ring_color);
            }
        }

        self.stroke_device(from, to, half_width, style.color);
    }
}

/// Euclidean distance from `p` to the segment `a`-`b`
fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let length_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if length_sq > 0.0 {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = [a[0] + ab[0] * t, a[1] + ab[1] * t];
    ((p[0] - closest[0]).powi(2) + (p[1] - closest[1]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Glow, EDGE_COLOR, GRID_COLOR};

    const HAIRLINE: StrokeStyle = StrokeStyle {
        color: GRID_COLOR,
        width: 1.0,
        glow: None,
    };

    #[test]
    fn refuses_unusable_sizes() {
        assert!(PixelBuffer::new(0, 10, 1.0).is_none());
        assert!(PixelBuffer::new(10, 0, 1.0).is_none());
        assert!(PixelBuffer::new(usize::MAX, 2, 1.0).is_none());
        assert!(PixelBuffer::new(20_000, 20_000, 1.0).is_none());
        assert!(PixelBuffer::new(4, 4, 1.0).is_some());
    }

    #[test]
    fn hairline_blends_alpha() {
        let mut buffer = PixelBuffer::new(10, 10, 1.0).unwrap();
        buffer.stroke_line([0.0, 5.0], [9.0, 5.0], &HAIRLINE);
        let [r, g, b, a] = buffer.pixel(3, 5).unwrap();
        assert_eq!((r, g, b), (0, 255, 255));
        assert_eq!(a, 77); // 0.3 * 255
        assert_eq!(buffer.pixel(3, 4).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn pixel_ratio_scales_coordinates() {
        let mut buffer = PixelBuffer::new(20, 20, 2.0).unwrap();
        buffer.stroke_line([0.0, 5.0], [9.0, 5.0], &HAIRLINE);
        // width 1 at ratio 2 covers device rows 9 and 10
        assert_ne!(buffer.pixel(6, 9).unwrap()[3], 0);
        assert_ne!(buffer.pixel(6, 10).unwrap()[3], 0);
        assert_eq!(buffer.pixel(6, 5).unwrap()[3], 0);
    }

    #[test]
    fn clipped_lines_do_not_panic() {
        let mut buffer = PixelBuffer::new(8, 8, 1.0).unwrap();
        buffer.stroke_line([-300.0, -40.0], [300.0, 90.0], &HAIRLINE);
        let thick = StrokeStyle {
            color: EDGE_COLOR,
            width: 2.0,
            glow: None,
        };
        buffer.stroke_line([-50.0, -50.0], [-10.0, -10.0], &thick);
        buffer.stroke_line([100.0, 100.0], [200.0, 200.0], &thick);
    }

    #[test]
    fn glow_spreads_beyond_the_core() {
        let plain = StrokeStyle {
            color: EDGE_COLOR,
            width: 2.0,
            glow: None,
        };
        let glowing = StrokeStyle {
            glow: Some(Glow {
                blur: 20.0,
                color: EDGE_COLOR,
            }),
            ..plain
        };

        let mut without = PixelBuffer::new(40, 40, 1.0).unwrap();
        without.stroke_line([5.0, 20.0], [35.0, 20.0], &plain);
        let mut with = PixelBuffer::new(40, 40, 1.0).unwrap();
        with.stroke_line([5.0, 20.0], [35.0, 20.0], &glowing);

        assert_eq!(without.pixel(20, 26).unwrap()[3], 0);
        assert!(with.pixel(20, 26).unwrap()[3] > 0);
        // halo fades with distance
        assert!(with.pixel(20, 23).unwrap()[3] > with.pixel(20, 28).unwrap()[3]);
    }

    #[test]
    fn pixel_outside_buffer_is_none() {
        let buffer = PixelBuffer::new(4, 3, 1.0).unwrap();
        assert_eq!(buffer.pixel(3, 2), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixel(0, 3), None);
        assert_eq!(buffer.pixel(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn paint_replays_clear() {
        let mut buffer = PixelBuffer::new(10, 10, 1.0).unwrap();
        buffer.stroke_line([0.0, 0.0], [9.0, 9.0], &HAIRLINE);
        assert!(buffer.as_bytes().iter().any(|&b| b != 0));
        paint(
            &Frame {
                commands: vec![DrawCommand::Clear],
            },
            &mut buffer,
        );
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }
}
