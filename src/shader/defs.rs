use glium::uniforms::UniformType;

use crate::shader::{FragmentOut, Interpolation, OutputKind, Varying};

pub const V_WORLD_NORMAL: (&str, Varying) = (
    "v_world_normal",
    Varying(UniformType::FloatVec3, Interpolation::Smooth),
);

pub const V_WORLD_POS: (&str, Varying) = (
    "v_world_pos",
    Varying(UniformType::FloatVec4, Interpolation::Smooth),
);

pub const V_TEX_COORD: (&str, Varying) = (
    "v_tex_coord",
    Varying(UniformType::FloatVec2, Interpolation::Smooth),
);

/// Special case: `gl_Position` is assigned but never declared.
pub const V_POS: (&str, Varying) = (
    "gl_Position",
    Varying(UniformType::FloatVec4, Interpolation::Local),
);

pub const F_COLOR: (&str, FragmentOut) = (
    "f_color",
    FragmentOut(UniformType::FloatVec4, OutputKind::Yield),
);

/// Linear-space color before post-processing transforms are applied.
pub const F_LINEAR: (&str, FragmentOut) = (
    "f_linear",
    FragmentOut(UniformType::FloatVec3, OutputKind::Local),
);
