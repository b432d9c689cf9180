use std::ffi::{CStr, CString};
use std::fmt;

use thiserror::Error;

use crate::backend::GlBackend;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex Shader"),
            ShaderStage::Fragment => f.write_str("Fragment Shader"),
        }
    }
}

/// What [`ProgramBuilder::build`] does when a stage fails to compile or the program fails to link.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ShaderErrorPolicy {
    /// Release everything created so far and return the error.
    #[default]
    Abort,
    /// Log the error and hand back the broken program anyway.
    Continue,
}

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
    policy: ShaderErrorPolicy,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
            policy: ShaderErrorPolicy::default(),
        }
    }

    pub fn with_error_policy(mut self, policy: ShaderErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self, gl: &impl GlBackend) -> Result<Program, PBError> {
        let vert_src =
            CString::new(self.vert).map_err(|_| PBError::InteriorNul(ShaderStage::Vertex))?;
        let frag_src =
            CString::new(self.frag).map_err(|_| PBError::InteriorNul(ShaderStage::Fragment))?;

        let mut valid = true;

        let vert = compile(gl, ShaderStage::Vertex, &vert_src);
        if let Err(e) = vert.1 {
            match self.policy {
                ShaderErrorPolicy::Abort => {
                    gl.delete_shader(vert.0);
                    return Err(e);
                }
                ShaderErrorPolicy::Continue => {
                    log::error!("{e}");
                    valid = false;
                }
            }
        }

        let frag = compile(gl, ShaderStage::Fragment, &frag_src);
        if let Err(e) = frag.1 {
            match self.policy {
                ShaderErrorPolicy::Abort => {
                    gl.delete_shader(vert.0);
                    gl.delete_shader(frag.0);
                    return Err(e);
                }
                ShaderErrorPolicy::Continue => {
                    log::error!("{e}");
                    valid = false;
                }
            }
        }

        let program = gl.create_program();
        gl.attach_shader(program, vert.0);
        gl.attach_shader(program, frag.0);
        gl.link_program(program);

        let linked = if gl.link_status(program) {
            Ok(())
        } else {
            Err(PBError::Linking(gl.program_info_log(program)))
        };

        gl.detach_shader(program, vert.0);
        gl.detach_shader(program, frag.0);
        gl.delete_shader(vert.0);
        gl.delete_shader(frag.0);

        if let Err(e) = linked {
            match self.policy {
                ShaderErrorPolicy::Abort => {
                    gl.delete_program(program);
                    return Err(e);
                }
                ShaderErrorPolicy::Continue => {
                    // compile errors were already reported, the link error just repeats them
                    if valid {
                        log::error!("{e}");
                    }
                    valid = false;
                }
            }
        }

        Ok(Program { id: program, valid })
    }
}

fn compile(
    gl: &impl GlBackend,
    stage: ShaderStage,
    source: &CStr,
) -> (u32, Result<(), PBError>) {
    let shader = gl.create_shader(stage);
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.compile_status(shader) {
        (shader, Ok(()))
    } else {
        let log = gl.shader_info_log(shader);
        (shader, Err(PBError::Compilation { stage, log }))
    }
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{0} source contains a NUL byte")]
    InteriorNul(ShaderStage),
    #[error("Error compiling {stage}: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Error linking program: {0}")]
    Linking(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation(i32);

impl UniformLocation {
    pub fn get(&self) -> i32 {
        self.0
    }
}

#[derive(Debug)]
pub struct Program {
    id: u32,
    valid: bool,
}

impl Program {
    pub fn get_id(&self) -> u32 {
        self.id
    }

    /// `false` when the program was kept despite a compile or link error.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn uniform_location(&self, gl: &impl GlBackend, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        gl.uniform_location(self.id, &name).map(UniformLocation)
    }

    pub fn delete(self, gl: &impl GlBackend) {
        gl.use_program(0);
        gl.delete_program(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{GlCall, RecordingGl};

    const VERT: &str = r"
        #version 330 core
        layout(location = 0) in vec2 aPos;
        uniform mat4 transform;
        void main()
        {
            gl_Position = transform * vec4(aPos, 0.0, 1.0);
        }
    ";

    const FRAG: &str = r"
        #version 330 core
        out vec4 FragColor;
        void main()
        {
            FragColor = vec4(1.0);
        }
    ";

    const BROKEN: &str = "#version 330 core\nvoid mian() {}";

    #[test]
    fn links_valid_pair() {
        let gl = RecordingGl::new();
        let program = ProgramBuilder::new(VERT, FRAG).build(&gl).unwrap();

        assert_ne!(program.get_id(), 0);
        assert!(program.is_valid());
        assert!(program.uniform_location(&gl, "transform").is_some());
        assert!(program.uniform_location(&gl, "missing").is_none());

        // both stages are gone once linked
        let deleted = gl
            .calls()
            .iter()
            .filter(|c| matches!(c, GlCall::DeleteShader(_)))
            .count();
        assert_eq!(deleted, 2);
    }

    #[test]
    fn reports_failing_vertex_stage() {
        let gl = RecordingGl::new();
        let err = ProgramBuilder::new(BROKEN, FRAG).build(&gl).unwrap_err();

        assert!(matches!(
            err,
            PBError::Compilation {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Error compiling Vertex Shader: "));

        // nothing is left behind on abort
        assert!(!gl.calls().iter().any(|c| matches!(c, GlCall::CreateProgram(_))));
        assert!(gl.calls().contains(&GlCall::DeleteShader(1)));
    }

    #[test]
    fn reports_failing_fragment_stage() {
        let gl = RecordingGl::new();
        let err = ProgramBuilder::new(VERT, BROKEN).build(&gl).unwrap_err();

        assert!(err.to_string().contains("Fragment Shader"));
    }

    #[test]
    fn continue_policy_keeps_broken_program() {
        let gl = RecordingGl::new();
        let program = ProgramBuilder::new(VERT, BROKEN)
            .with_error_policy(ShaderErrorPolicy::Continue)
            .build(&gl)
            .unwrap();

        assert!(!program.is_valid());
        assert!(gl.calls().iter().any(|c| matches!(c, GlCall::LinkProgram(_))));
    }

    #[test]
    fn rejects_nul_in_source() {
        let gl = RecordingGl::new();
        let err = ProgramBuilder::new("void main() {}\0", FRAG)
            .build(&gl)
            .unwrap_err();

        assert!(matches!(err, PBError::InteriorNul(ShaderStage::Vertex)));
    }

    #[test]
    fn delete_unbinds_first() {
        let gl = RecordingGl::new();
        let program = ProgramBuilder::new(VERT, FRAG).build(&gl).unwrap();
        let id = program.get_id();

        gl.clear_log();
        program.delete(&gl);

        assert_eq!(gl.calls(), vec![GlCall::UseProgram(0), GlCall::DeleteProgram(id)]);
    }
}
