/// Radians of rotation per pixel of pointer drag
pub const DRAG_SENSITIVITY: f64 = 0.01;
/// Smallest zoom level
pub const MIN_ZOOM: i32 = 2;
/// Largest zoom level
pub const MAX_ZOOM: i32 = 10;
/// Zoom level on mount and after reset
pub const DEFAULT_ZOOM: i32 = 5;

/// Viewer state: the only inputs of a rendered frame besides the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    /// Accumulated rotation around the horizontal axis, in radians
    pub angle_x: f64,
    /// Accumulated rotation around the vertical axis, in radians
    pub angle_y: f64,
    /// Zoom level, always within `MIN_ZOOM..=MAX_ZOOM`
    zoom: i32,
}

impl Default for ViewerState {
    fn default() -> Self {
        ViewerState {
            angle_x: 0.0,
            angle_y: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewerState {
    pub fn new(angle_x: f64, angle_y: f64, zoom: i32) -> Self {
        ViewerState {
            angle_x,
            angle_y,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    /// Zoom level relative to the default, used for grid spacing and cube scale
    pub fn zoom_factor(&self) -> f64 {
        f64::from(self.zoom) / f64::from(DEFAULT_ZOOM)
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - 1).max(MIN_ZOOM);
    }

    /// Applies a pointer delta: vertical motion pitches, horizontal motion yaws.
    pub fn rotate_by(&mut self, delta: PointerDelta) {
        self.angle_x += delta.dy * DRAG_SENSITIVITY;
        self.angle_y += delta.dx * DRAG_SENSITIVITY;
    }

    pub fn reset(&mut self) {
        *self = ViewerState::default();
    }
}

/// Pointer movement between two consecutive drag positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Drag session state machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last_x: f64, last_y: f64 },
}

impl DragState {
    /// Pointer pressed: (re)anchor the drag at the pointer position.
    pub fn press(&mut self, x: f64, y: f64) {
        *self = DragState::Dragging {
            last_x: x,
            last_y: y,
        };
    }

    /// Pointer moved. Returns the delta since the last position when dragging.
    pub fn motion(&mut self, x: f64, y: f64) -> Option<PointerDelta> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging { last_x, last_y } => {
                *self = DragState::Dragging {
                    last_x: x,
                    last_y: y,
                };
                Some(PointerDelta {
                    dx: x - last_x,
                    dy: y - last_y,
                })
            }
        }
    }

    /// Pointer released or left the surface.
    pub fn release(&mut self) {
        *self = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}
