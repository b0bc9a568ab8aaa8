use glium::implement_vertex;

use crate::scene::GeometryData;
use crate::CreationError;

#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

implement_vertex!(Vertex, position, normal, tex_coord);

/// Tessellated geometry living on the GPU.
pub struct Mesh {
    pub vertex_buffer: glium::VertexBuffer<Vertex>,
    pub index_buffer: glium::IndexBuffer<u32>,
}

impl Mesh {
    pub fn create<F: glium::backend::Facade>(
        facade: &F,
        data: &GeometryData,
    ) -> Result<Mesh, CreationError> {
        let vertex_buffer = glium::VertexBuffer::immutable(facade, &vertices(data))?;
        let index_buffer = glium::IndexBuffer::immutable(
            facade,
            glium::index::PrimitiveType::TrianglesList,
            &data.indices,
        )?;

        Ok(Mesh {
            vertex_buffer,
            index_buffer,
        })
    }
}

pub fn vertices(data: &GeometryData) -> Vec<Vertex> {
    data.positions
        .iter()
        .zip(data.normals.iter())
        .zip(data.tex_coords.iter())
        .map(|((&position, &normal), &tex_coord)| Vertex {
            position,
            normal,
            tex_coord,
        })
        .collect()
}
