//! Bloom shaders.
//!
//! Bright parts of the scene are extracted with a luminance high-pass and
//! then blurred with a separable 9-tap Gaussian, see:
//! https://learnopengl.com/Advanced-Lighting/Bloom

use glium::uniforms::UniformType;

use crate::screen_quad;
use crate::shader::{self, defs};

/// Gaussian weights of the center tap and the four taps on either side.
pub const WEIGHTS: [f32; 5] = [0.227_027, 0.194_594_6, 0.121_621_6, 0.054_054, 0.016_216];

/// Width of the smooth step above the luminance threshold.
pub const THRESHOLD_SMOOTHING: f32 = 0.01;

/// Rec. 601 luma coefficients.
pub const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

fn quad_vertex() -> shader::VertexStage<screen_quad::Vertex> {
    shader::VertexStage::empty()
        .with_out(defs::V_TEX_COORD, "tex_coord")
        .with_out(defs::V_POS, "position")
}

/// Keeps only the pixels whose luminance exceeds `threshold`.
pub fn extract_core() -> shader::Core<screen_quad::Vertex> {
    let fragment = shader::FragmentStage::empty()
        .with_uniform("scene_texture", UniformType::Sampler2d)
        .with_uniform("threshold", UniformType::Float)
        .with_in(defs::V_TEX_COORD)
        .with_body(&format!(
            "
            vec3 color = texture(scene_texture, v_tex_coord).rgb;
            float luminance = dot(color, vec3({:?}, {:?}, {:?}));
            float alpha = smoothstep(threshold, threshold + {:?}, luminance);
            ",
            LUMA[0], LUMA[1], LUMA[2], THRESHOLD_SMOOTHING,
        ))
        .with_out(defs::F_COLOR, "vec4(color * alpha, 1.0)");

    shader::Core {
        vertex: quad_vertex(),
        fragment,
    }
}

/// Accumulates the taps along `direction`, one statement per tap.
fn blur_taps() -> String {
    let mut body = format!(
        "vec3 blur_result = texture(input_texture, v_tex_coord).rgb * {:?};\n",
        WEIGHTS[0]
    );

    for (i, weight) in WEIGHTS.iter().enumerate().skip(1) {
        for sign in &["+", "-"] {
            body += &format!(
                "blur_result += texture(input_texture, v_tex_coord {} {:?} * direction).rgb * {:?};\n",
                sign, i as f32, weight,
            );
        }
    }

    body
}

/// One direction of the separable blur. `radius` scales the spacing of the
/// taps in texels, `scale` multiplies the result.
pub fn blur_core() -> shader::Core<screen_quad::Vertex> {
    let fragment = shader::FragmentStage::empty()
        .with_uniform("input_texture", UniformType::Sampler2d)
        .with_uniform("horizontal", UniformType::Bool)
        .with_uniform("radius", UniformType::Float)
        .with_uniform("scale", UniformType::Float)
        .with_in(defs::V_TEX_COORD)
        .with_body(
            "
            vec2 texel_size = radius / vec2(textureSize(input_texture, 0));
            vec2 direction = horizontal ? vec2(texel_size.x, 0.0) : vec2(0.0, texel_size.y);
            ",
        )
        .with_body(&blur_taps())
        .with_out(defs::F_COLOR, "vec4(blur_result * scale, 1.0)");

    shader::Core {
        vertex: quad_vertex(),
        fragment,
    }
}

/// Adds the blurred bloom texture on top of `f_color`.
pub fn composition_transform(
    core: shader::Core<screen_quad::Vertex>,
) -> shader::Core<screen_quad::Vertex> {
    assert!(
        core.fragment.has_in(defs::V_TEX_COORD.0),
        "FragmentStage needs V_TEX_COORD input for bloom composition"
    );
    assert!(
        core.fragment.has_out(defs::F_COLOR.0),
        "FragmentStage needs F_COLOR output for bloom composition"
    );

    let fragment = core
        .fragment
        .with_uniform("bloom_texture", UniformType::Sampler2d)
        .with_out_expr(
            defs::F_COLOR.0,
            "f_color + vec4(texture(bloom_texture, v_tex_coord).rgb, 0.0)",
        );

    shader::Core {
        vertex: core.vertex,
        fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_weights_sum_to_one() {
        let sum = WEIGHTS[0] + 2.0 * WEIGHTS[1..].iter().sum::<f32>();

        assert_relative_eq!(sum, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gaussian_weights_decrease() {
        assert!(WEIGHTS.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_blur_unrolls_every_tap() {
        let taps = blur_taps();

        assert_eq!(taps.matches("blur_result +=").count(), 8);
        assert!(taps.contains("v_tex_coord - 4.0 * direction"));
    }

    #[test]
    fn test_blur_and_extract_cores_link() {
        let (_, fragment) = blur_core().link().unwrap().compile();
        assert!(fragment.contains("uniform bool horizontal;"));

        let (_, fragment) = extract_core().link().unwrap().compile();
        assert!(fragment.contains("smoothstep"));
    }

    #[test]
    fn test_composition_adds_bloom_texture() {
        let core = composition_transform(crate::pipeline::composite::shaders::base_core());
        let (_, fragment) = core.link().unwrap().compile();

        assert!(fragment.contains("uniform sampler2D bloom_texture;"));
        assert!(fragment.contains("texture(bloom_texture, v_tex_coord)"));
    }
}
