use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::rc::Rc;

use crate::backend::{BufferTarget, GlBackend};
use crate::geometry::AttributeLayout;
use crate::program::ShaderStage;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    GenBuffer(u32),
    BindBuffer(BufferTarget, u32),
    BufferDataF32(BufferTarget, usize),
    BufferDataU32(BufferTarget, Vec<u32>),
    DeleteBuffer(u32),
    GenVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    VertexAttribPointer(AttributeLayout),
    EnableVertexAttribArray(u32),
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    UniformMatrix4(i32, [f32; 16]),
    ClearColor([f32; 4]),
    Clear,
    Viewport(u32, u32),
    DrawArrays(i32, i32),
    DrawElements(i32),
}

#[derive(Default)]
struct State {
    calls: Vec<GlCall>,
    next_id: u32,
    sources: HashMap<u32, String>,
    attached: HashMap<u32, Vec<u32>>,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn compiles(&self, shader: u32) -> bool {
        self.sources.get(&shader).map_or(false, |s| s.contains("main("))
    }
}

///
/// Headless backend that records every call.
///
/// Handles are handed out from one counter starting at 1. A shader compiles when its
/// source contains a `main(` entry point, a program links when both attached stages
/// compiled, and a uniform exists when some attached source declares it.
/// Clones share the same log.
///
#[derive(Clone, Default)]
pub struct RecordingGl {
    state: Rc<RefCell<State>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &GlCall) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn gen(&self, call: impl FnOnce(u32) -> GlCall) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.calls.push(call(id));
        id
    }
}

impl GlBackend for RecordingGl {
    fn gen_buffer(&self) -> u32 {
        self.gen(GlCall::GenBuffer)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data_f32(&self, target: BufferTarget, data: &[f32]) {
        self.record(GlCall::BufferDataF32(target, data.len()));
    }

    fn buffer_data_u32(&self, target: BufferTarget, data: &[u32]) {
        self.record(GlCall::BufferDataU32(target, data.to_vec()));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn gen_vertex_array(&self) -> u32 {
        self.gen(GlCall::GenVertexArray)
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.record(GlCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.record(GlCall::DeleteVertexArray(vao));
    }

    fn vertex_attrib_pointer(&self, layout: &AttributeLayout) {
        self.record(GlCall::VertexAttribPointer(*layout));
    }

    fn enable_vertex_attrib_array(&self, slot: u32) {
        self.record(GlCall::EnableVertexAttribArray(slot));
    }

    fn create_shader(&self, stage: ShaderStage) -> u32 {
        self.gen(|id| GlCall::CreateShader(stage, id))
    }

    fn shader_source(&self, shader: u32, source: &CStr) {
        let mut state = self.state.borrow_mut();
        state
            .sources
            .insert(shader, source.to_string_lossy().into_owned());
        state.calls.push(GlCall::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(GlCall::CompileShader(shader));
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.state.borrow().compiles(shader)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.compile_status(shader) {
            String::new()
        } else {
            "0:1(1): error: entry point `main` not found".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> u32 {
        self.gen(GlCall::CreateProgram)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.attached.entry(program).or_default().push(shader);
        state.calls.push(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(GlCall::LinkProgram(program));
    }

    fn link_status(&self, program: u32) -> bool {
        let state = self.state.borrow();
        state
            .attached
            .get(&program)
            .map_or(false, |s| s.len() == 2 && s.iter().all(|id| state.compiles(*id)))
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled/unspecialized shader".to_string()
        }
    }

    fn use_program(&self, program: u32) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32> {
        let name = name.to_string_lossy();
        let state = self.state.borrow();
        let shaders = state.attached.get(&program)?;

        let declared = shaders
            .iter()
            .filter_map(|id| state.sources.get(id))
            .flat_map(|src| src.lines())
            .any(|line| {
                let line = line.trim_start();
                line.starts_with("uniform ")
                    && line
                        .trim_end_matches(';')
                        .split_whitespace()
                        .last()
                        .map_or(false, |n| n.trim_end_matches(';') == name)
            });

        declared.then_some(0)
    }

    fn uniform_matrix4(&self, location: i32, value: &[f32; 16]) {
        self.record(GlCall::UniformMatrix4(location, *value));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self) {
        self.record(GlCall::Clear);
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(GlCall::Viewport(width, height));
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        self.record(GlCall::DrawArrays(first, count));
    }

    fn draw_elements(&self, count: i32) {
        self.record(GlCall::DrawElements(count));
    }
}
