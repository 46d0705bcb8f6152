use crate::math::vec::Vec3;

/// 4x4 affine matrix using the row-vector convention: points are transformed as
/// `p * M`, so the translation lives in the last row.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis. Positive angles turn +X toward -Z (right-handed, Y up).
    pub fn rotation_y(angle_in_radians: f32) -> Mat4 {
        let c = angle_in_radians.cos();
        let s = angle_in_radians.sin();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Matrix product `self · next`.
    ///
    /// With row vectors this applies `self` first and `next` second, so a child's
    /// world matrix is `child_local.multiply(&parent_world)`.
    pub fn multiply(&self, next: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * next.0[k][j]).sum();
            }
        }
        Mat4(result)
    }

    /// Transforms a point (w = 1).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            p.x() * m[0][0] + p.y() * m[1][0] + p.z() * m[2][0] + m[3][0],
            p.x() * m[0][1] + p.y() * m[1][1] + p.z() * m[2][1] + m[3][1],
            p.x() * m[0][2] + p.y() * m[1][2] + p.z() * m[2][2] + m[3][2],
        )
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_translation_moves_point() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_multiply_applies_left_first() {
        // scale then translate: (1,0,0) -> (2,0,0) -> (12,0,0)
        let m = Mat4::scaling(2.0, 2.0, 2.0).multiply(&Mat4::translation(10.0, 0.0, 0.0));
        assert_eq!(
            m.transform_point(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(12.0, 0.0, 0.0)
        );

        // translate then scale: (1,0,0) -> (11,0,0) -> (22,0,0)
        let m = Mat4::translation(10.0, 0.0, 0.0).multiply(&Mat4::scaling(2.0, 2.0, 2.0));
        assert_eq!(
            m.transform_point(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(22.0, 0.0, 0.0)
        );
    }
}
