use clap::Parser;

use gl_wrapper::geometry::VertexAttribute;
use gl_wrapper::renderer::Color;

use gl_lab_common::args::Args;
use gl_lab_common::config::ExerciseConfig;
use gl_lab_common::exercise::{Exercise, ExerciseApp};
use gl_lab_common::logging::{init_logging, LoggingConfig};
use gl_lab_common::window;

/// A colored square spinning about Z while its scale pulses with time.
#[rustfmt::skip]
static EXERCISE: Exercise = Exercise {
    title: "Square Transform Shader",
    width: 800,
    height: 600,
    centered: false,
    clear_color: Color::BLACK,
    vertices: &[
        // position    color
        -0.5, -0.5,    1.0, 0.0, 0.0,  // bottom left
        0.5, -0.5,     0.0, 1.0, 0.0,  // bottom right
        0.5, 0.5,      0.0, 0.0, 1.0,  // top right
        -0.5, 0.5,     1.0, 1.0, 0.0,  // top left
    ],
    attributes: &[VertexAttribute::Vec2, VertexAttribute::Vec3],
    indices: Some(&[
        0, 1, 2,
        0, 2, 3,
    ]),
    vertex_shader: include_str!("gl_shaders/vertex.glsl"),
    fragment_shader: include_str!("gl_shaders/fragment.glsl"),
    transform_uniform: Some("transform"),
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
