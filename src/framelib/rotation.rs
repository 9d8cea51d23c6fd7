//! Elementary coordinate rotations
//!
//! These rotate the coordinate axes, not the vector: `rot_z(a) * v` expresses
//! `v` in axes turned by `a` about +Z. Positive angles are counterclockwise
//! seen from the positive end of the axis.

use nalgebra::Matrix3;

/// Rotation of the axes about X (R1)
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation of the axes about Y (R2)
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation of the axes about Z (R3)
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Largest deviation of `m * m^T` from the identity and of `det(m)` from one
pub fn orthogonality_error(m: &Matrix3<f64>) -> f64 {
    let gram = m * m.transpose() - Matrix3::identity();
    gram.amax().max((m.determinant() - 1.0).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rot_z_identity() {
        let v = rot_z(0.0) * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_rot_z_quarter_turn_moves_axes() {
        // Turning the axes +90 degrees puts the old +X on the new -Y
        let v = rot_z(FRAC_PI_2) * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_rot_x_and_rot_y_quarter_turns() {
        let v = rot_x(FRAC_PI_2) * Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(v, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-15);
        let v = rot_y(FRAC_PI_2) * Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(v, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_composed_rotation_is_orthogonal() {
        let m = rot_z(0.3) * rot_x(-1.1) * rot_y(2.5);
        assert!(orthogonality_error(&m) < 1e-15);
    }
}
