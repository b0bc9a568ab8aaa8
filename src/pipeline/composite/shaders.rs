use glium::uniforms::UniformType;

use crate::screen_quad;
use crate::shader::{self, defs};
use crate::tone_mapping::ToneMapping;

/// Copies the base texture, i.e. the scene with its true materials.
pub fn base_core() -> shader::Core<screen_quad::Vertex> {
    let vertex = shader::VertexStage::empty()
        .with_out(defs::V_TEX_COORD, "tex_coord")
        .with_out(defs::V_POS, "position");

    let fragment = shader::FragmentStage::empty()
        .with_uniform("base_texture", UniformType::Sampler2d)
        .with_in(defs::V_TEX_COORD)
        .with_out(
            defs::F_COLOR,
            "vec4(texture(base_texture, v_tex_coord).rgb, 1.0)",
        );

    shader::Core { vertex, fragment }
}

pub fn tone_mapping_transform(
    core: shader::Core<screen_quad::Vertex>,
    tone_mapping: &ToneMapping,
) -> shader::Core<screen_quad::Vertex> {
    assert!(
        core.fragment.has_out(defs::F_COLOR.0),
        "FragmentStage needs F_COLOR output for tone mapping"
    );

    let fragment = core
        .fragment
        .with_out(defs::F_LINEAR, "f_color.rgb")
        .with_out_expr(
            defs::F_COLOR.0,
            &format!("vec4({}, 1.0)", tone_mapping.glsl(defs::F_LINEAR.0)),
        );

    shader::Core {
        vertex: core.vertex,
        fragment,
    }
}

pub fn gamma_correction_transform(
    core: shader::Core<screen_quad::Vertex>,
    gamma: f32,
) -> shader::Core<screen_quad::Vertex> {
    assert!(
        core.fragment.has_out(defs::F_COLOR.0),
        "FragmentStage needs F_COLOR output for gamma correction"
    );

    let fragment = core.fragment.with_out_expr(
        defs::F_COLOR.0,
        &format!("vec4(pow(max(f_color.rgb, vec3(0.0)), vec3(1.0 / {:?})), 1.0)", gamma),
    );

    shader::Core {
        vertex: core.vertex,
        fragment,
    }
}
