use clap::Parser;

use gl_wrapper::geometry::VertexAttribute;
use gl_wrapper::renderer::Color;

use gl_lab_common::args::Args;
use gl_lab_common::config::ExerciseConfig;
use gl_lab_common::exercise::{Exercise, ExerciseApp};
use gl_lab_common::logging::{init_logging, LoggingConfig};
use gl_lab_common::window;

/// The same quad from four shared corners and an index list, in one flat color.
#[rustfmt::skip]
static EXERCISE: Exercise = Exercise {
    title: "Indexed Quad",
    width: 1280,
    height: 768,
    centered: true,
    clear_color: Color::new(0.5, 0.7, 0.8, 1.0),
    vertices: &[
        -0.5, 0.5, 0.0,     // top left
        0.5, 0.5, 0.0,      // top right
        0.5, -0.5, 0.0,     // bottom right
        -0.5, -0.5, 0.0,    // bottom left
    ],
    attributes: &[VertexAttribute::Vec3],
    indices: Some(&[
        0, 1, 2,
        0, 2, 3,
    ]),
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
    use gl_wrapper::backend::BufferTarget;
    use gl_wrapper::geometry::DrawCall;
    use gl_wrapper::recording::{GlCall, RecordingGl};

    #[test]
    fn draws_two_indexed_triangles() {
        let gl = RecordingGl::new();
        let config = ExerciseConfig::from_exercise(&EXERCISE);
        let mut app = ExerciseApp::new(gl.clone(), &EXERCISE, &config);

        app.on_load().unwrap();

        assert!(gl.calls().contains(&GlCall::BufferDataU32(
            BufferTarget::ElementArray,
            vec![0, 1, 2, 0, 2, 3],
        )));

        gl.clear_log();
        app.on_render(FrameTime::at(0.0));

        assert_eq!(gl.count(&GlCall::DrawElements(6)), 1);
        assert!(!gl
            .calls()
            .iter()
            .any(|c| matches!(c, GlCall::DrawArrays(..))));
    }

    #[test]
    fn resize_updates_viewport() {
        let gl = RecordingGl::new();
        let config = ExerciseConfig::from_exercise(&EXERCISE);
        let mut app = ExerciseApp::new(gl.clone(), &EXERCISE, &config);

        app.on_resize(640, 480);

        assert_eq!(gl.calls(), vec![GlCall::Viewport(640, 480)]);
    }

    #[test]
    fn unload_is_final() {
        let gl = RecordingGl::new();
        let config = ExerciseConfig::from_exercise(&EXERCISE);
        let mut app = ExerciseApp::new(gl.clone(), &EXERCISE, &config);

        app.on_load().unwrap();
        app.on_unload();
        app.on_unload();

        let programs_deleted = gl
            .calls()
            .iter()
            .filter(|c| matches!(c, GlCall::DeleteProgram(_)))
            .count();
        assert_eq!(programs_deleted, 1);

        gl.clear_log();
        app.on_render(FrameTime::at(1.0));
        assert!(gl.calls().is_empty());
    }
}
