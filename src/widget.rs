use crate::frame::render_frame;
use crate::graphics::{paint, PixelBuffer};
use crate::state::{DragState, ViewerState};
use crate::viewport::Viewport;
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Everything the host can ask the widget to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Primary pointer pressed at logical (x, y)
    PointerDown { x: f64, y: f64 },
    /// Pointer moved to logical (x, y)
    PointerMove { x: f64, y: f64 },
    /// Primary pointer released
    PointerUp,
    /// Pointer left the surface
    PointerLeave,
    ZoomIn,
    ZoomOut,
    Reset,
    /// The mount point changed size or density
    Resize(Viewport),
}

/// Pseudo-3D navigation cube widget
pub struct NavigationWidget {
    state: ViewerState,
    drag: DragState,
    viewport: Option<Viewport>,
    /// Backing surface; `None` when unmounted or when it could not be allocated
    surface: Option<PixelBuffer>,
    redraws: u64,
    debug: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    last_redraw: Instant,
    fps: f64,
}

/// Redraw rate falls back to zero after this long without a redraw
const FPS_IDLE_AFTER: Duration = Duration::from_secs(1);

impl Default for NavigationWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationWidget {
    pub fn new() -> Self {
        Self::with_state(ViewerState::default())
    }

    /// Widget starting from a given orientation and zoom instead of the defaults
    pub fn with_state(state: ViewerState) -> Self {
        NavigationWidget {
            state,
            drag: DragState::Idle,
            viewport: None,
            surface: None,
            redraws: 0,
            debug: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            last_redraw: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// The painted backing buffer, if a surface is available
    pub fn surface(&self) -> Option<&PixelBuffer> {
        self.surface.as_ref()
    }

    /// Number of redraws issued since creation
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }

    pub fn mount(&mut self, viewport: Viewport) {
        self.resize(viewport);
    }

    /// Reallocates the backing buffer for `viewport` and redraws.
    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.device_size();
        self.surface = PixelBuffer::new(width, height, viewport.pixel_ratio());
        if self.surface.is_none() {
            debug!("no drawing surface for {width}x{height} device pixels, drawing disabled");
        } else {
            debug!(
                "surface resized to {width}x{height} (ratio {:.2})",
                viewport.pixel_ratio()
            );
        }
        self.viewport = Some(viewport);
        self.redraw();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag.press(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(delta) = self.drag.motion(x, y) {
            self.state.rotate_by(delta);
            self.redraw();
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.release();
    }

    pub fn pointer_leave(&mut self) {
        if self.drag.is_dragging() {
            debug!("pointer left the surface mid-drag");
        }
        self.drag.release();
    }

    pub fn zoom_in(&mut self) {
        self.state.zoom_in();
        self.redraw();
    }

    pub fn zoom_out(&mut self) {
        self.state.zoom_out();
        self.redraw();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.redraw();
    }

    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::PointerDown { x, y } => self.pointer_down(x, y),
            Interaction::PointerMove { x, y } => self.pointer_move(x, y),
            Interaction::PointerUp => self.pointer_up(),
            Interaction::PointerLeave => self.pointer_leave(),
            Interaction::ZoomIn => self.zoom_in(),
            Interaction::ZoomOut => self.zoom_out(),
            Interaction::Reset => self.reset(),
            Interaction::Resize(viewport) => self.resize(viewport),
        }
    }

    /// Rebuilds the frame from the current state and paints it, if there is
    /// anything to paint on.
    pub fn redraw(&mut self) {
        self.redraws += 1;

        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        self.last_redraw = now;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let (Some(viewport), Some(surface)) = (self.viewport.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let frame = render_frame(viewport, &self.state);
        trace!(
            "redraw #{}: angles ({:.3}, {:.3}), zoom {}",
            self.redraws,
            self.state.angle_x,
            self.state.angle_y,
            self.state.zoom()
        );
        paint(&frame, surface);
    }

    /// Redraws per second as seen at `now`; zero once redraws have stopped
    fn fps_at(&self, now: Instant) -> f64 {
        if now.saturating_duration_since(self.last_redraw) > FPS_IDLE_AFTER {
            0.0
        } else {
            self.fps
        }
    }

    /// One-line summary shown in debug mode
    pub fn status_line(&self) -> String {
        format!(
            "{} {} | Angle X: {:.2}, Angle Y: {:.2} | Zoom: {} | Redraws: {} | FPS: {:.2}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.state.angle_x,
            self.state.angle_y,
            self.state.zoom(),
            self.redraws,
            self.fps_at(Instant::now())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DEFAULT_ZOOM, MAX_ZOOM};

    fn mounted() -> NavigationWidget {
        let mut widget = NavigationWidget::new();
        widget.mount(Viewport::new(300.0, 192.0, 1.0));
        widget
    }

    #[test]
    fn mount_allocates_and_draws() {
        let mut widget = NavigationWidget::new();
        assert_eq!(widget.redraw_count(), 0);
        widget.mount(Viewport::new(300.0, 192.0, 2.0));
        assert_eq!(widget.redraw_count(), 1);

        let surface = widget.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (600, 384));
        assert!(surface.as_bytes().iter().any(|&b| b != 0));
    }

    #[test]
    fn resize_reallocates_and_redraws() {
        let mut widget = mounted();
        widget.handle(Interaction::Resize(Viewport::new(100.0, 50.0, 1.5)));
        assert_eq!(widget.redraw_count(), 2);
        let surface = widget.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (150, 75));
    }

    #[test]
    fn missing_surface_is_silent() {
        let mut widget = NavigationWidget::new();
        widget.mount(Viewport::new(0.0, 0.0, 1.0));
        assert!(widget.surface().is_none());

        widget.pointer_down(0.0, 0.0);
        widget.pointer_move(10.0, 10.0);
        widget.zoom_in();
        assert_eq!(widget.state().zoom(), DEFAULT_ZOOM + 1);
        assert_eq!(widget.redraw_count(), 3);
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut widget = mounted();
        widget.pointer_move(40.0, 40.0);
        assert_eq!(*widget.state(), ViewerState::default());
        assert_eq!(widget.redraw_count(), 1);
    }

    #[test]
    fn drag_rotates_and_redraws_per_move() {
        let mut widget = mounted();
        widget.pointer_down(100.0, 100.0);
        widget.pointer_move(120.0, 110.0);
        widget.pointer_move(150.0, 130.0);
        assert_eq!(widget.redraw_count(), 3);
        assert!((widget.state().angle_x - 0.30).abs() < 1e-12);
        assert!((widget.state().angle_y - 0.50).abs() < 1e-12);

        widget.pointer_up();
        assert_eq!(*widget.drag(), DragState::Idle);
        assert_eq!(widget.redraw_count(), 3);

        widget.pointer_move(300.0, 300.0);
        assert!((widget.state().angle_y - 0.50).abs() < 1e-12);
    }

    #[test]
    fn leave_ends_drag() {
        let mut widget = mounted();
        widget.handle(Interaction::PointerDown { x: 1.0, y: 1.0 });
        widget.handle(Interaction::PointerLeave);
        assert!(!widget.drag().is_dragging());
        assert_eq!(widget.redraw_count(), 1);
    }

    #[test]
    fn zoom_buttons_always_redraw() {
        let mut widget = mounted();
        for _ in 0..7 {
            widget.handle(Interaction::ZoomIn);
        }
        assert_eq!(widget.state().zoom(), MAX_ZOOM);
        assert_eq!(widget.redraw_count(), 8);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut widget = NavigationWidget::with_state(ViewerState::new(3.0, -1.0, 9));
        widget.mount(Viewport::new(64.0, 64.0, 1.0));
        widget.handle(Interaction::Reset);
        assert_eq!(*widget.state(), ViewerState::default());
    }

    #[test]
    fn fps_drops_to_zero_when_idle() {
        let mut widget = mounted();
        widget.fps = 42.0;
        let now = widget.last_redraw;
        assert_eq!(widget.fps_at(now), 42.0);
        assert_eq!(widget.fps_at(now + Duration::from_secs(2)), 0.0);
    }

    #[test]
    fn second_press_reanchors() {
        let mut widget = mounted();
        widget.pointer_down(0.0, 0.0);
        widget.pointer_down(50.0, 50.0);
        widget.pointer_move(60.0, 55.0);
        assert!((widget.state().angle_y - 0.10).abs() < 1e-12);
        assert!((widget.state().angle_x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn status_line_reports_state() {
        let mut widget = mounted();
        widget.toggle_debug();
        assert!(widget.debug());
        widget.zoom_out();
        let status = widget.status_line();
        assert!(status.starts_with(env!("CARGO_PKG_NAME")));
        assert!(status.contains("Zoom: 4"));
        assert!(status.contains("Redraws: 2"));
    }
}
