use std::fmt;

use crate::shader;

/// Failure while uploading the scene or building a program.
#[derive(Debug)]
pub enum CreationError {
    Shader(shader::BuildError),
    Texture(glium::texture::TextureCreationError),
    Vertices(glium::vertex::BufferCreationError),
    Indices(glium::index::BufferCreationError),
}

impl From<shader::BuildError> for CreationError {
    fn from(err: shader::BuildError) -> CreationError {
        CreationError::Shader(err)
    }
}

impl From<glium::texture::TextureCreationError> for CreationError {
    fn from(err: glium::texture::TextureCreationError) -> CreationError {
        CreationError::Texture(err)
    }
}

impl From<glium::vertex::BufferCreationError> for CreationError {
    fn from(err: glium::vertex::BufferCreationError) -> CreationError {
        CreationError::Vertices(err)
    }
}

impl From<glium::index::BufferCreationError> for CreationError {
    fn from(err: glium::index::BufferCreationError) -> CreationError {
        CreationError::Indices(err)
    }
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CreationError::Shader(shader::BuildError::Parse { message, .. }) => {
                write!(f, "generated GLSL does not parse: {}", message)
            }
            CreationError::Shader(shader::BuildError::Program { error, .. }) => {
                write!(f, "program does not link: {}", error)
            }
            CreationError::Texture(err) => write!(f, "texture allocation failed: {}", err),
            CreationError::Vertices(err) => write!(f, "vertex upload failed: {}", err),
            CreationError::Indices(err) => write!(f, "index upload failed: {}", err),
        }
    }
}

impl std::error::Error for CreationError {}

/// Failure during one of the passes of a frame, or while presenting it.
#[derive(Debug)]
pub enum DrawError {
    /// Render targets could not be recreated on resize.
    Targets(CreationError),
    Draw(glium::DrawError),
    Framebuffer(glium::framebuffer::ValidationError),
    Present(glium::SwapBuffersError),
}

impl From<CreationError> for DrawError {
    fn from(err: CreationError) -> DrawError {
        DrawError::Targets(err)
    }
}

impl From<glium::DrawError> for DrawError {
    fn from(err: glium::DrawError) -> DrawError {
        DrawError::Draw(err)
    }
}

impl From<glium::framebuffer::ValidationError> for DrawError {
    fn from(err: glium::framebuffer::ValidationError) -> DrawError {
        DrawError::Framebuffer(err)
    }
}

impl From<glium::SwapBuffersError> for DrawError {
    fn from(err: glium::SwapBuffersError) -> DrawError {
        DrawError::Present(err)
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DrawError::Targets(err) => write!(f, "recreating render targets: {}", err),
            DrawError::Draw(err) => write!(f, "draw call failed: {}", err),
            DrawError::Framebuffer(err) => write!(f, "incomplete framebuffer: {:?}", err),
            DrawError::Present(err) => write!(f, "swapping buffers failed: {}", err),
        }
    }
}

impl std::error::Error for DrawError {}
