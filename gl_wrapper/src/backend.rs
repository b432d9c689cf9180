use std::ffi::{c_char, c_void, CStr};

use gl::types::{GLint, GLuint};

use crate::geometry::AttributeLayout;
use crate::program::ShaderStage;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

///
/// The subset of the OpenGL function table the wrappers use.
///
/// Handles are plain `u32` names as in GL, `0` meaning "none".
///
pub trait GlBackend {
    fn gen_buffer(&self) -> u32;
    fn bind_buffer(&self, target: BufferTarget, buffer: u32);
    fn buffer_data_f32(&self, target: BufferTarget, data: &[f32]);
    fn buffer_data_u32(&self, target: BufferTarget, data: &[u32]);
    fn delete_buffer(&self, buffer: u32);

    fn gen_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vao: u32);
    fn delete_vertex_array(&self, vao: u32);
    fn vertex_attrib_pointer(&self, layout: &AttributeLayout);
    fn enable_vertex_attrib_array(&self, slot: u32);

    fn create_shader(&self, stage: ShaderStage) -> u32;
    fn shader_source(&self, shader: u32, source: &CStr);
    fn compile_shader(&self, shader: u32);
    fn compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);
    fn delete_program(&self, program: u32);
    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32>;
    fn uniform_matrix4(&self, location: i32, value: &[f32; 16]);

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self);
    fn viewport(&self, width: u32, height: u32);
    fn draw_arrays(&self, first: i32, count: i32);
    fn draw_elements(&self, count: i32);
}

///
/// Backend calling straight into the loaded `gl` function pointers.
///
/// Only valid once `gl::load_with` ran against a current context.
///
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeGl;

impl GlBackend for NativeGl {
    fn gen_buffer(&self) -> u32 {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, (&mut id) as *mut u32);
        }
        id
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        unsafe { gl::BindBuffer(target.gl_enum(), buffer) }
    }

    fn buffer_data_f32(&self, target: BufferTarget, data: &[f32]) {
        unsafe {
            gl::BufferData(
                target.gl_enum(),
                std::mem::size_of_val(data) as isize,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn buffer_data_u32(&self, target: BufferTarget, data: &[u32]) {
        unsafe {
            gl::BufferData(
                target.gl_enum(),
                std::mem::size_of_val(data) as isize,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        unsafe { gl::DeleteBuffers(1, (&buffer) as *const u32) }
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut id = 0;
        unsafe {
            gl::GenVertexArrays(1, (&mut id) as *mut u32);
        }
        id
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: u32) {
        unsafe { gl::DeleteVertexArrays(1, (&vao) as *const u32) }
    }

    fn vertex_attrib_pointer(&self, layout: &AttributeLayout) {
        unsafe {
            gl::VertexAttribPointer(
                layout.slot,
                layout.components,
                gl::FLOAT,
                gl::FALSE,
                layout.stride,
                layout.offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, slot: u32) {
        unsafe { gl::EnableVertexAttribArray(slot) }
    }

    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: u32, source: &CStr) {
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                (&source.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );
        }
    }

    fn compile_shader(&self, shader: u32) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: u32) -> bool {
        let mut success: GLint = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        }
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
        }

        let mut buf = vec![0_u8; len.max(1) as usize];
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                buf.len() as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
        }

        log_to_string(buf)
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: u32) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: u32) -> bool {
        let mut success: GLint = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: u32) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
        }

        let mut buf = vec![0_u8; len.max(1) as usize];
        unsafe {
            gl::GetProgramInfoLog(
                program,
                buf.len() as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
        }

        log_to_string(buf)
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program as GLuint) }
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32> {
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn uniform_matrix4(&self, location: i32, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { gl::Viewport(0, 0, width as i32, height as i32) }
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) }
    }

    fn draw_elements(&self, count: i32) {
        unsafe { gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, std::ptr::null()) }
    }
}

// info logs come back NUL terminated
fn log_to_string(mut buf: Vec<u8>) -> String {
    if let Some(end) = buf.iter().position(|b| *b == 0) {
        buf.truncate(end);
    }

    String::from_utf8_lossy(&buf).trim_end().to_string()
}
