use thiserror::Error;

use crate::backend::{BufferTarget, GlBackend};

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_attributes(mut self, attrs: &[VertexAttribute]) -> Self {
        self.attributes.extend_from_slice(attrs);
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Slot, stride and byte offset of every attribute, in declaration order.
    pub fn layout(&self) -> Vec<AttributeLayout> {
        let stride = self.floats_per_vertex() * std::mem::size_of::<f32>();
        let mut offset = 0;

        self.attributes
            .iter()
            .enumerate()
            .map(|(i, attr)| {
                let layout = AttributeLayout {
                    slot: i as u32,
                    components: attr.size() as i32,
                    stride: stride as i32,
                    offset,
                };
                offset += attr.size() * std::mem::size_of::<f32>();
                layout
            })
            .collect()
    }

    fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.size()).sum()
    }

    pub fn build(self, gl: &impl GlBackend) -> Result<Geometry, GBError> {
        let total_len = self.floats_per_vertex();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if let Some(indices) = self.indices {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange { index, vertices });
            }
        }

        let layout = self.layout();

        let vbo = gl.gen_buffer();
        gl.bind_buffer(BufferTarget::Array, vbo);
        gl.buffer_data_f32(BufferTarget::Array, self.data);

        let vao = gl.gen_vertex_array();
        gl.bind_vertex_array(vao);

        for attr in &layout {
            gl.vertex_attrib_pointer(attr);
            gl.enable_vertex_attrib_array(attr.slot);
        }

        // the element binding is vertex array state, so it has to happen while `vao` is bound
        let ebo = self.indices.map(|indices| {
            let ebo = gl.gen_buffer();
            gl.bind_buffer(BufferTarget::ElementArray, ebo);
            gl.buffer_data_u32(BufferTarget::ElementArray, indices);
            ebo
        });

        gl.bind_buffer(BufferTarget::Array, 0);
        gl.bind_vertex_array(0);

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            vertices,
            indices: self.indices.map_or(0, |i| i.len()),
            layout,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("No vertex attributes were declared")]
    NoAttributes,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
            VertexAttribute::Vec4 => 4,
        }
    }
}

/// One `glVertexAttribPointer` worth of layout, stride and offset in bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub slot: u32,
    pub components: i32,
    pub stride: i32,
    pub offset: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Arrays { first: i32, count: i32 },
    Elements { count: i32 },
}

#[derive(Debug)]
pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    indices: usize,
    layout: Vec<AttributeLayout>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn layout(&self) -> &[AttributeLayout] {
        &self.layout
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// The single draw that covers the whole geometry.
    pub fn draw_call(&self) -> DrawCall {
        if self.ebo.is_some() {
            DrawCall::Elements {
                count: self.indices as i32,
            }
        } else {
            DrawCall::Arrays {
                first: 0,
                count: self.vertices as i32,
            }
        }
    }

    ///
    /// Releases the buffers first and the vertex array second, unbinding each before deletion.
    ///
    pub fn delete(self, gl: &impl GlBackend) {
        gl.bind_buffer(BufferTarget::Array, 0);
        gl.delete_buffer(self.vbo);

        if let Some(ebo) = self.ebo {
            gl.delete_buffer(ebo);
        }

        gl.bind_vertex_array(0);
        gl.delete_vertex_array(self.vao);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{GlCall, RecordingGl};

    #[rustfmt::skip]
    const COLORED: [f32; 36] = [
        -0.2, 0.5, 0.0,   1.0, 0.0, 1.0,
        0.2, 0.5, 0.0,    0.0, 0.0, 1.0,
        -0.2, -0.5, 0.0,  1.0, 1.0, 1.0,
        0.2, 0.5, 0.0,    0.0, 0.0, 1.0,
        0.2, -0.5, 0.0,   0.0, 1.0, 0.0,
        -0.2, -0.5, 0.0,  1.0, 1.0, 1.0,
    ];

    #[rustfmt::skip]
    const SQUARE: [f32; 8] = [
        -0.5, -0.5,
        0.5, -0.5,
        0.5, 0.5,
        -0.5, 0.5,
    ];

    #[test]
    fn interleaved_layout() {
        let layout = GeometryBuilder::new(&COLORED)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .layout();

        assert_eq!(
            layout,
            vec![
                AttributeLayout { slot: 0, components: 3, stride: 24, offset: 0 },
                AttributeLayout { slot: 1, components: 3, stride: 24, offset: 12 },
            ]
        );

        let layout = GeometryBuilder::new(&[])
            .with_attributes(&[VertexAttribute::Vec2, VertexAttribute::Vec3])
            .layout();

        assert_eq!(layout[0].stride, 20);
        assert_eq!(layout[1].stride, 20);
        assert_eq!(layout[1].offset, 8);
    }

    #[test]
    fn raw_vertices_draw_everything() {
        let gl = RecordingGl::new();
        let geometry = GeometryBuilder::new(&COLORED)
            .with_attributes(&[VertexAttribute::Vec3, VertexAttribute::Vec3])
            .build(&gl)
            .unwrap();

        assert_eq!(geometry.vertices(), 6);
        assert!(!geometry.is_indexed());
        assert_eq!(geometry.draw_call(), DrawCall::Arrays { first: 0, count: 6 });
    }

    #[test]
    fn indexed_vertices_draw_indices() {
        let gl = RecordingGl::new();
        let geometry = GeometryBuilder::new(&SQUARE)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 2, 0, 2, 3])
            .build(&gl)
            .unwrap();

        assert_eq!(geometry.vertices(), 4);
        assert_eq!(geometry.draw_call(), DrawCall::Elements { count: 6 });

        let calls = gl.calls();
        let vao_bound = calls
            .iter()
            .position(|c| *c == GlCall::BindVertexArray(geometry.vao()))
            .unwrap();
        let ebo_bound = calls
            .iter()
            .position(|c| matches!(c, GlCall::BindBuffer(BufferTarget::ElementArray, id) if *id != 0))
            .unwrap();
        let vao_unbound = calls
            .iter()
            .rposition(|c| *c == GlCall::BindVertexArray(0))
            .unwrap();

        assert!(vao_bound < ebo_bound && ebo_bound < vao_unbound);
    }

    #[test]
    fn rejects_bad_input() {
        let gl = RecordingGl::new();

        let res = GeometryBuilder::new(&SQUARE).build(&gl);
        assert!(matches!(res, Err(GBError::NoAttributes)));

        let res = GeometryBuilder::new(&SQUARE[..7])
            .with_attribute(VertexAttribute::Vec2)
            .build(&gl);
        assert!(matches!(res, Err(GBError::InvalidDataLength)));

        let res = GeometryBuilder::new(&SQUARE)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 4])
            .build(&gl);
        assert!(matches!(
            res,
            Err(GBError::IndexOutOfRange { index: 4, vertices: 4 })
        ));

        assert!(gl.calls().is_empty());
    }

    #[test]
    fn delete_releases_buffers_then_vertex_array() {
        let gl = RecordingGl::new();
        let geometry = GeometryBuilder::new(&SQUARE)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 2])
            .build(&gl)
            .unwrap();
        let vao = geometry.vao();

        gl.clear_log();
        geometry.delete(&gl);

        let calls = gl.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], GlCall::BindBuffer(BufferTarget::Array, 0));
        assert!(matches!(calls[1], GlCall::DeleteBuffer(_)));
        assert!(matches!(calls[2], GlCall::DeleteBuffer(_)));
        assert_eq!(calls[3], GlCall::BindVertexArray(0));
        assert_eq!(calls[4], GlCall::DeleteVertexArray(vao));
    }
}
