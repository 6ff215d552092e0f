//! Pure frame construction: state and viewport in, draw commands out.

use crate::state::ViewerState;
use crate::vertex::{project_cube, CUBE_EDGES};
use crate::viewport::Viewport;

/// Grid lines on each side of the center line
pub const GRID_HALF_COUNT: i32 = 10;
/// Grid spacing at the default zoom, in logical units
pub const BASE_GRID_SPACING: f64 = 30.0;
/// Amplitude of the grid's orientation-dependent offset
pub const GRID_SWAY: f64 = 20.0;

pub const GRID_COLOR: Rgba = Rgba::new(0, 255, 255, 0.3);
pub const EDGE_COLOR: Rgba = Rgba::new(0, 255, 255, 0.8);
pub const GLOW_COLOR: Rgba = Rgba::new(0, 255, 255, 0.5);
pub const GLOW_BLUR: f64 = 20.0;

/// Straight RGB color with a fractional alpha, like a CSS `rgba()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn fade(self, factor: f64) -> Self {
        Rgba {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Blurred halo drawn around a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub glow: Option<Glow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear,
    /// Stroke a line between two points in logical coordinates
    Line {
        from: [f64; 2],
        to: [f64; 2],
        style: StrokeStyle,
    },
}

/// Ordered draw commands for one redraw
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    fn line(&mut self, from: [f64; 2], to: [f64; 2], style: StrokeStyle) {
        self.commands.push(DrawCommand::Line { from, to, style });
    }

    /// Iterate over the line commands only
    #[cfg(test)]
    pub(crate) fn lines(&self) -> impl Iterator<Item = (&[f64; 2], &[f64; 2], &StrokeStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, style } => Some((from, to, style)),
            DrawCommand::Clear => None,
        })
    }
}

/// Builds the frame for `state` drawn into `viewport`.
pub fn render_frame(viewport: &Viewport, state: &ViewerState) -> Frame {
    let grid_lines = 2 * (2 * GRID_HALF_COUNT as usize + 1);
    let mut frame = Frame {
        commands: Vec::with_capacity(1 + grid_lines + 2 * CUBE_EDGES.len()),
    };
    frame.commands.push(DrawCommand::Clear);

    let [center_x, center_y] = viewport.center();
    let zoom_factor = state.zoom_factor();

    // Grid. The sway is a flat offset, not a real rotation of the grid plane.
    let grid_style = StrokeStyle {
        color: GRID_COLOR,
        width: 1.0,
        glow: None,
    };
    let spacing = BASE_GRID_SPACING * zoom_factor;
    let half_extent = f64::from(GRID_HALF_COUNT) * spacing;
    let sway_y = state.angle_x.sin() * GRID_SWAY;
    let sway_x = state.angle_y.sin() * GRID_SWAY;

    for i in -GRID_HALF_COUNT..=GRID_HALF_COUNT {
        let offset = f64::from(i) * spacing;

        let y = center_y + offset + sway_y;
        frame.line(
            [center_x - half_extent, y],
            [center_x + half_extent, y],
            grid_style,
        );

        let x = center_x + offset + sway_x;
        frame.line(
            [x, center_y - half_extent],
            [x, center_y + half_extent],
            grid_style,
        );
    }

    // Cube
    let projected = project_cube(
        state.angle_x,
        state.angle_y,
        [center_x, center_y],
        zoom_factor,
    );
    let edge_style = StrokeStyle {
        color: EDGE_COLOR,
        width: 2.0,
        glow: None,
    };
    let glow_style = StrokeStyle {
        glow: Some(Glow {
            blur: GLOW_BLUR,
            color: GLOW_COLOR,
        }),
        ..edge_style
    };

    for style in [edge_style, glow_style] {
        for &(start, end) in &CUBE_EDGES {
            frame.line(
                projected[start].screen_position,
                projected[end].screen_position,
                style,
            );
        }
    }

    frame
}
