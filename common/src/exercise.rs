use gl_wrapper::backend::GlBackend;
use gl_wrapper::geometry::VertexAttribute;
use gl_wrapper::renderer::Color;

use crate::app::Application;
use crate::clock::FrameTime;
use crate::config::ExerciseConfig;
use crate::context::{ContextError, RenderContext};

///
/// Everything one exercise bakes into its binary.
///
/// `attributes` describes the interleaving of `vertices`; the layout handed to GL is derived
/// from it.
///
#[derive(Debug)]
pub struct Exercise {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    pub centered: bool,
    pub clear_color: Color,
    pub vertices: &'static [f32],
    pub attributes: &'static [VertexAttribute],
    pub indices: Option<&'static [u32]>,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
    /// Name of the `mat4` uniform that receives the animated transform, if any.
    pub transform_uniform: Option<&'static str>,
}

impl Exercise {
    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.size()).sum()
    }
}

pub struct ExerciseApp<B: GlBackend> {
    context: RenderContext<B>,
    render_failed: bool,
}

impl<B: GlBackend> ExerciseApp<B> {
    pub fn new(gl: B, exercise: &'static Exercise, config: &ExerciseConfig) -> Self {
        Self {
            context: RenderContext::new(gl, exercise, config),
            render_failed: false,
        }
    }

    pub fn context(&self) -> &RenderContext<B> {
        &self.context
    }
}

impl<B: GlBackend> Application for ExerciseApp<B> {
    fn on_load(&mut self) -> Result<(), ContextError> {
        self.context.load()
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    fn on_render(&mut self, frame: FrameTime) {
        if let Err(e) = self.context.render(frame) {
            if !self.render_failed {
                log::error!("Could not render frame {}: {e}", frame.frame_index);
                self.render_failed = true;
            }
        }
    }

    fn on_unload(&mut self) {
        self.context.shutdown();
    }
}
