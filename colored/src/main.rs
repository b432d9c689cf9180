use clap::Parser;

use gl_wrapper::geometry::VertexAttribute;
use gl_wrapper::renderer::Color;

use gl_lab_common::args::Args;
use gl_lab_common::config::ExerciseConfig;
use gl_lab_common::exercise::{Exercise, ExerciseApp};
use gl_lab_common::logging::{init_logging, LoggingConfig};
use gl_lab_common::window;

/// Two triangles forming a quad, every corner spelled out with its own color.
#[rustfmt::skip]
static EXERCISE: Exercise = Exercise {
    title: "Colored Quad",
    width: 1280,
    height: 768,
    centered: true,
    clear_color: Color::new(0.4, 0.2, 0.5, 1.0),
    vertices: &[
        // position          color
        -0.2, 0.5, 0.0,      1.0, 0.0, 1.0,
        0.2, 0.5, 0.0,       0.0, 0.0, 1.0,
        -0.2, -0.5, 0.0,     1.0, 1.0, 1.0,

        0.2, 0.5, 0.0,       0.0, 0.0, 1.0,
        0.2, -0.5, 0.0,      0.0, 1.0, 0.0,
        -0.2, -0.5, 0.0,     1.0, 1.0, 1.0,
    ],
    attributes: &[VertexAttribute::Vec3, VertexAttribute::Vec3],
    indices: None,
    vertex_shader: include_str!("gl_shaders/vertex.glsl"),
    fragment_shader: include_str!("gl_shaders/fragment.glsl"),
    transform_uniform: None,
};

fn main() {
    init_logging(LoggingConfig::default());

    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    let config = match ExerciseConfig::resolve(&EXERCISE, &args) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(-1);
        }
    };

    if let Err(e) = window::run(&config.window, |gl| {
        ExerciseApp::new(gl, &EXERCISE, &config)
    }) {
        log::error!("{e}");
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gl_lab_common::app::Application;
    use gl_lab_common::clock::FrameTime;
    use gl_lab_common::context::ContextState;
    use gl_wrapper::geometry::{AttributeLayout, DrawCall};
    use gl_wrapper::recording::{GlCall, RecordingGl};

    #[test]
    fn draws_six_raw_vertices() {
        let gl = RecordingGl::new();
        let config = ExerciseConfig::from_exercise(&EXERCISE);
        let mut app = ExerciseApp::new(gl.clone(), &EXERCISE, &config);

        app.on_load().unwrap();
        assert_eq!(app.context().state(), ContextState::Loaded);

        let call = app.context().render(FrameTime::at(0.0)).unwrap();
        assert_eq!(call, DrawCall::Arrays { first: 0, count: 6 });

        let calls = gl.calls();
        assert!(calls.contains(&GlCall::VertexAttribPointer(AttributeLayout {
            slot: 1,
            components: 3,
            stride: 24,
            offset: 12,
        })));
        assert!(!calls
            .iter()
            .any(|c| matches!(c, GlCall::UniformMatrix4(..))));
    }
}
