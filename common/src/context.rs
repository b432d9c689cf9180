use thiserror::Error;

use gl_wrapper::backend::GlBackend;
use gl_wrapper::geometry::{DrawCall, GBError, Geometry, GeometryBuilder};
use gl_wrapper::program::{PBError, Program, ProgramBuilder, ShaderErrorPolicy, UniformLocation};
use gl_wrapper::renderer::{GlRenderer, Uniform};

use crate::clock::FrameTime;
use crate::config::ExerciseConfig;
use crate::exercise::Exercise;
use crate::transform::Transform;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Loaded,
    Unloaded,
}

struct Resources {
    geometry: Geometry,
    program: Program,
    transform: Option<UniformLocation>,
}

///
/// Owns every GL object of one exercise.
///
/// Moves `Uninitialized -> Loaded -> Unloaded`; frames can only be rendered while loaded and
/// all objects are released exactly once, at the latest when the context is dropped.
///
pub struct RenderContext<B: GlBackend> {
    gl: B,
    exercise: &'static Exercise,
    policy: ShaderErrorPolicy,
    renderer: GlRenderer,
    state: ContextState,
    resources: Option<Resources>,
}

impl<B: GlBackend> RenderContext<B> {
    pub fn new(gl: B, exercise: &'static Exercise, config: &ExerciseConfig) -> Self {
        Self {
            gl,
            exercise,
            policy: config.shader_errors,
            renderer: GlRenderer::new(config.clear_color),
            state: ContextState::Uninitialized,
            resources: None,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn load(&mut self) -> Result<(), ContextError> {
        if self.state != ContextState::Uninitialized {
            return Err(ContextError::AlreadyLoaded(self.state));
        }

        let exercise = self.exercise;

        self.renderer.apply_clear_color(&self.gl);

        let mut builder =
            GeometryBuilder::new(exercise.vertices).with_attributes(exercise.attributes);
        if let Some(indices) = exercise.indices {
            builder = builder.with_indices(indices);
        }
        let geometry = builder.build(&self.gl)?;

        log::debug!("Vertices:");
        for row in exercise.vertices.chunks(exercise.floats_per_vertex()) {
            log::debug!("  {row:?}");
        }

        let program = ProgramBuilder::new(exercise.vertex_shader, exercise.fragment_shader)
            .with_error_policy(self.policy)
            .build(&self.gl);

        let program = match program {
            Ok(p) => p,
            Err(e) => {
                geometry.delete(&self.gl);
                return Err(e.into());
            }
        };

        let transform = exercise.transform_uniform.and_then(|name| {
            let location = program.uniform_location(&self.gl, name);
            if location.is_none() {
                log::warn!("Uniform `{name}` is not active in the program");
            }
            location
        });

        log::info!(
            "Loaded {} vertices, draw call {:?}",
            geometry.vertices(),
            geometry.draw_call()
        );

        self.resources = Some(Resources {
            geometry,
            program,
            transform,
        });
        self.state = ContextState::Loaded;

        Ok(())
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.renderer.resize(&self.gl, width, height);
    }

    pub fn render(&self, frame: FrameTime) -> Result<DrawCall, ContextError> {
        let res = match (&self.resources, self.state) {
            (Some(res), ContextState::Loaded) => res,
            (_, state) => return Err(ContextError::NotLoaded(state)),
        };

        self.renderer.clear(&self.gl);

        let uniforms: Vec<Uniform> = res
            .transform
            .map(|location| Uniform::Mat4(location, Transform::at(frame.elapsed).to_columns()))
            .into_iter()
            .collect();

        Ok(self
            .renderer
            .draw(&self.gl, &res.geometry, &res.program, &uniforms))
    }

    ///
    /// Releases the vertex buffer, the vertex layout and the program, in that order.
    /// Further calls do nothing.
    ///
    pub fn shutdown(&mut self) {
        if let Some(res) = self.resources.take() {
            res.geometry.delete(&self.gl);
            res.program.delete(&self.gl);
            log::info!("Released GL resources");
        }

        self.state = ContextState::Unloaded;
    }
}

impl<B: GlBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Program(#[from] PBError),
    #[error("Render context is {0:?}, not loaded")]
    NotLoaded(ContextState),
    #[error("Render context is already {0:?}")]
    AlreadyLoaded(ContextState),
}
