use glium::{implement_vertex, Surface};

use crate::CreationError;

#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: [f32; 4],
    pub tex_coord: [f32; 2],
}

implement_vertex!(Vertex, position, tex_coord);

/// Corners in triangle strip order.
pub const STRIP: [Vertex; 4] = [
    Vertex {
        position: [-1.0, -1.0, 0.0, 1.0],
        tex_coord: [0.0, 0.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0, 1.0],
        tex_coord: [1.0, 0.0],
    },
    Vertex {
        position: [-1.0, 1.0, 0.0, 1.0],
        tex_coord: [0.0, 1.0],
    },
    Vertex {
        position: [1.0, 1.0, 0.0, 1.0],
        tex_coord: [1.0, 1.0],
    },
];

/// Covers the whole target; every post-processing pass draws through it.
pub struct ScreenQuad {
    vertex_buffer: glium::VertexBuffer<Vertex>,
}

impl ScreenQuad {
    pub fn create<F: glium::backend::Facade>(facade: &F) -> Result<Self, CreationError> {
        let vertex_buffer = glium::VertexBuffer::immutable(facade, &STRIP)?;

        Ok(Self { vertex_buffer })
    }

    pub fn draw<S, U>(
        &self,
        target: &mut S,
        program: &glium::Program,
        uniforms: &U,
    ) -> Result<(), glium::DrawError>
    where
        S: Surface,
        U: glium::uniforms::Uniforms,
    {
        target.draw(
            &self.vertex_buffer,
            glium::index::NoIndices(glium::index::PrimitiveType::TriangleStrip),
            program,
            uniforms,
            &Default::default(),
        )
    }
}
