/// Distance from the eye to the projection plane
pub const CAMERA_DISTANCE: f64 = 200.0;

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Rotation around the vertical axis, in the X-Z plane
pub fn rotation_yaw(angle: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    [[cos, 0.0, -sin], [0.0, 1.0, 0.0], [sin, 0.0, cos]]
}

/// Rotation around the horizontal axis, in the Y-Z plane
pub fn rotation_pitch(angle: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Rotates a point by `angle_y` around the vertical axis, then rotates the
/// result by `angle_x` around the horizontal axis.
///
/// The two rotations do not commute; yaw always goes first.
pub fn rotate_point(point: &[f64; 3], angle_x: f64, angle_y: f64) -> [f64; 3] {
    let yawed = multiply_matrix_vector(&rotation_yaw(angle_y), point);
    multiply_matrix_vector(&rotation_pitch(angle_x), &yawed)
}

/// Perspective divide for a point at depth `z`
pub fn perspective_scale(z: f64) -> f64 {
    CAMERA_DISTANCE / (CAMERA_DISTANCE + z)
}
