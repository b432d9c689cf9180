use crate::backend::GlBackend;
use crate::geometry::{DrawCall, Geometry};
use crate::program::{Program, UniformLocation};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Uniform {
    Mat4(UniformLocation, [f32; 16]),
}

pub struct GlRenderer {
    clear_color: Color,
}

impl GlRenderer {
    pub fn new(clear_color: Color) -> Self {
        Self { clear_color }
    }

    /// Sets the clear color on the context, done once at load.
    pub fn apply_clear_color(&self, gl: &impl GlBackend) {
        let Color { r, g, b, a } = self.clear_color;
        gl.clear_color(r, g, b, a);
    }

    pub fn clear(&self, gl: &impl GlBackend) {
        gl.clear();
    }

    ///
    /// Binds `program` and `geometry`, uploads `uniforms` and issues the single draw covering
    /// the geometry. The vertex array is unbound afterwards.
    ///
    pub fn draw(
        &self,
        gl: &impl GlBackend,
        geometry: &Geometry,
        program: &Program,
        uniforms: &[Uniform],
    ) -> DrawCall {
        gl.use_program(program.get_id());
        gl.bind_vertex_array(geometry.vao());

        for uniform in uniforms {
            match uniform {
                Uniform::Mat4(location, value) => gl.uniform_matrix4(location.get(), value),
            }
        }

        let call = geometry.draw_call();
        match call {
            DrawCall::Arrays { first, count } => gl.draw_arrays(first, count),
            DrawCall::Elements { count } => gl.draw_elements(count),
        }

        gl.bind_vertex_array(0);

        call
    }

    pub fn resize(&self, gl: &impl GlBackend, width: u32, height: u32) {
        gl.viewport(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryBuilder, VertexAttribute};
    use crate::program::ProgramBuilder;
    use crate::recording::{GlCall, RecordingGl};

    const VERT: &str = "uniform mat4 transform;\nvoid main() {}";
    const FRAG: &str = "void main() {}";

    #[test]
    fn draw_order() {
        let gl = RecordingGl::new();
        let geometry = GeometryBuilder::new(&[0.0; 8])
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 2, 0, 2, 3])
            .build(&gl)
            .unwrap();
        let program = ProgramBuilder::new(VERT, FRAG).build(&gl).unwrap();
        let location = program.uniform_location(&gl, "transform").unwrap();

        let renderer = GlRenderer::new(Color::BLACK);
        gl.clear_log();

        let mut identity = [0.0; 16];
        identity[0] = 1.0;
        identity[5] = 1.0;
        identity[10] = 1.0;
        identity[15] = 1.0;

        renderer.clear(&gl);
        let call = renderer.draw(&gl, &geometry, &program, &[Uniform::Mat4(location, identity)]);

        assert_eq!(call, DrawCall::Elements { count: 6 });
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::Clear,
                GlCall::UseProgram(program.get_id()),
                GlCall::BindVertexArray(geometry.vao()),
                GlCall::UniformMatrix4(location.get(), identity),
                GlCall::DrawElements(6),
                GlCall::BindVertexArray(0),
            ]
        );
    }

    #[test]
    fn clear_color_and_viewport() {
        let gl = RecordingGl::new();
        let renderer = GlRenderer::new(Color::from([0.4, 0.2, 0.5, 1.0]));

        renderer.apply_clear_color(&gl);
        renderer.resize(&gl, 1280, 768);

        assert_eq!(
            gl.calls(),
            vec![
                GlCall::ClearColor([0.4, 0.2, 0.5, 1.0]),
                GlCall::Viewport(1280, 768),
            ]
        );
    }
}
