use cgmath::{Matrix4, Rad};

///
/// Spin-and-pulse transform of the square: rotates about Z by `t` radians while the
/// uniform scale oscillates between 0.5 and 1.5.
///
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub angle: Rad<f32>,
    pub scale: f32,
}

impl Transform {
    pub fn at(elapsed: f32) -> Self {
        Self {
            angle: Rad(elapsed),
            scale: 0.5 * elapsed.sin() + 1.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(self.angle) * Matrix4::from_scale(self.scale)
    }

    /// Column-major floats, ready for `glUniformMatrix4fv` without transposition.
    pub fn to_columns(&self) -> [f32; 16] {
        let columns: [[f32; 4]; 4] = self.matrix().into();

        let mut out = [0.0; 16];
        for (i, column) in columns.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(column);
        }
        out
    }
}
