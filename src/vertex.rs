use crate::math::{perspective_scale, rotate_point};

/// Half the edge length of the cube
pub const CUBE_HALF_EDGE: f64 = 40.0;

/// Cube vertices: back face (z < 0) first, then the front face
pub const CUBE_VERTICES: [[f64; 3]; 8] = [
    [-CUBE_HALF_EDGE, -CUBE_HALF_EDGE, -CUBE_HALF_EDGE], // 0
    [CUBE_HALF_EDGE, -CUBE_HALF_EDGE, -CUBE_HALF_EDGE],  // 1
    [CUBE_HALF_EDGE, CUBE_HALF_EDGE, -CUBE_HALF_EDGE],   // 2
    [-CUBE_HALF_EDGE, CUBE_HALF_EDGE, -CUBE_HALF_EDGE],  // 3
    [-CUBE_HALF_EDGE, -CUBE_HALF_EDGE, CUBE_HALF_EDGE],  // 4
    [CUBE_HALF_EDGE, -CUBE_HALF_EDGE, CUBE_HALF_EDGE],   // 5
    [CUBE_HALF_EDGE, CUBE_HALF_EDGE, CUBE_HALF_EDGE],    // 6
    [-CUBE_HALF_EDGE, CUBE_HALF_EDGE, CUBE_HALF_EDGE],   // 7
];

/// Cube edges (pairs of vertex indices)
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0), // Back face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4), // Front face
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7), // Connecting edges
];

/// Cube vertex projected onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub screen_position: [f64; 2],
}

impl Vertex {
    /// Rotates `point` and projects it onto the screen around `center`.
    ///
    /// `zoom_factor` is the zoom level relative to the default zoom.
    pub fn project(
        point: &[f64; 3],
        angle_x: f64,
        angle_y: f64,
        center: [f64; 2],
        zoom_factor: f64,
    ) -> Self {
        let position = rotate_point(point, angle_x, angle_y);
        let scale = perspective_scale(position[2]);
        Vertex {
            screen_position: [
                center[0] + position[0] * scale * zoom_factor,
                center[1] + position[1] * scale * zoom_factor,
            ],
        }
    }
}

/// Projects all cube vertices for the given orientation
pub fn project_cube(angle_x: f64, angle_y: f64, center: [f64; 2], zoom_factor: f64) -> [Vertex; 8] {
    CUBE_VERTICES.map(|v| Vertex::project(&v, angle_x, angle_y, center, zoom_factor))
}
