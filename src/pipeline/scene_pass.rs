//! Forward rendering of scene objects with their current materials.

use glium::uniforms::{UniformType, UniformValue, Uniforms};
use glium::{uniform, Surface};
use log::info;

use crate::scene::{Background, Scene, Shading};
use crate::shader::{self, defs};
use crate::{mesh, Context, CreationError, DrawError, Resources, ScreenQuad, MAX_LIGHTS};

fn light_uniform(slot: usize, field: &str) -> String {
    format!("light{}_{}", slot, field)
}

/// Diffuse term of every light slot, one block per slot. A slot with a
/// positive range fades out smoothly towards it.
fn light_terms() -> String {
    (0..MAX_LIGHTS)
        .map(|i| {
            format!(
                "
                {{
                    vec3 to_light = light{i}_position - v_world_pos.xyz;
                    float window = light{i}_range > 0.0
                        ? clamp(1.0 - pow(length(to_light) / light{i}_range, 4.0), 0.0, 1.0)
                        : 1.0;
                    float diffuse = max(dot(normal, normalize(to_light)), 0.0);
                    lighting += window * window * diffuse * light{i}_color;
                }}
                ",
                i = i
            )
        })
        .collect()
}

pub fn scene_core() -> shader::Core<mesh::Vertex> {
    let vertex = shader::VertexStage::empty()
        .with_uniform("mat_model", UniformType::FloatMat4)
        .with_uniform("mat_view", UniformType::FloatMat4)
        .with_uniform("mat_projection", UniformType::FloatMat4)
        .with_out(defs::V_WORLD_POS, "mat_model * vec4(position, 1.0)")
        .with_out(defs::V_WORLD_NORMAL, "normalize(mat3(mat_model) * normal)")
        .with_out(defs::V_TEX_COORD, "tex_coord")
        .with_out(defs::V_POS, "mat_projection * mat_view * v_world_pos");

    let mut fragment = shader::FragmentStage::empty()
        .with_uniform("material_color", UniformType::FloatVec3)
        .with_uniform("material_map", UniformType::Sampler2d)
        .with_uniform("material_lit", UniformType::Bool)
        .with_uniform("ambient_light", UniformType::FloatVec3);

    for slot in 0..MAX_LIGHTS {
        fragment = fragment
            .with_uniform(&light_uniform(slot, "position"), UniformType::FloatVec3)
            .with_uniform(&light_uniform(slot, "color"), UniformType::FloatVec3)
            .with_uniform(&light_uniform(slot, "range"), UniformType::Float);
    }

    let fragment = fragment
        .with_in(defs::V_WORLD_POS)
        .with_in(defs::V_WORLD_NORMAL)
        .with_in(defs::V_TEX_COORD)
        .with_body(&format!(
            "
            vec3 albedo = material_color * texture(material_map, v_tex_coord).rgb;
            vec3 lighting = vec3(1.0);

            if (material_lit) {{
                vec3 normal = normalize(v_world_normal);
                if (!gl_FrontFacing) {{
                    normal = -normal;
                }}

                lighting = ambient_light;
                {}
            }}
            ",
            light_terms(),
        ))
        .with_out(defs::F_COLOR, "vec4(albedo * lighting, 1.0)");

    shader::Core { vertex, fragment }
}

/// Values for every light slot. Slots beyond the context's lights are black.
fn light_values(context: &Context) -> Vec<(String, UniformValue<'static>)> {
    let lights = context.active_lights();
    let mut values = Vec::with_capacity(3 * MAX_LIGHTS);

    for slot in 0..MAX_LIGHTS {
        let (position, color, range): ([f32; 3], [f32; 3], f32) = match lights.get(slot) {
            Some(light) => (
                light.position.coords.into(),
                light.color.into(),
                light.range.unwrap_or(0.0),
            ),
            None => ([0.0; 3], [0.0; 3], 0.0),
        };

        values.push((light_uniform(slot, "position"), UniformValue::Vec3(position)));
        values.push((light_uniform(slot, "color"), UniformValue::Vec3(color)));
        values.push((light_uniform(slot, "range"), UniformValue::Float(range)));
    }

    values
}

/// Per-object uniforms extended by the light slots of the frame.
struct WithLights<'a, U> {
    object: U,
    lights: &'a [(String, UniformValue<'static>)],
}

impl<'a, U: Uniforms> Uniforms for WithLights<'a, U> {
    fn visit_values<'b, F: FnMut(&str, UniformValue<'b>)>(&'b self, mut visit: F) {
        self.object.visit_values(&mut visit);

        for (name, value) in self.lights {
            visit(name, *value);
        }
    }
}

/// Draws a texture over the whole target, e.g. the sky behind the scene.
pub fn background_core() -> shader::Core<crate::screen_quad::Vertex> {
    let vertex = shader::VertexStage::empty()
        .with_out(defs::V_TEX_COORD, "tex_coord")
        .with_out(defs::V_POS, "position");

    let fragment = shader::FragmentStage::empty()
        .with_uniform("background_texture", UniformType::Sampler2d)
        .with_in(defs::V_TEX_COORD)
        .with_out(
            defs::F_COLOR,
            "vec4(texture(background_texture, v_tex_coord).rgb, 1.0)",
        );

    shader::Core { vertex, fragment }
}

pub struct ScenePass {
    program: glium::Program,
    background_program: glium::Program,
}

impl ScenePass {
    pub fn create<F: glium::backend::Facade>(facade: &F) -> Result<ScenePass, CreationError> {
        info!("Creating scene program");
        let program = scene_core().build_program(facade)?;

        info!("Creating background program");
        let background_program = background_core().build_program(facade)?;

        Ok(ScenePass {
            program,
            background_program,
        })
    }

    /// Clears `target` to the scene's background, or to black if
    /// `with_background` is false.
    pub fn clear<S: Surface>(
        &self,
        resources: &Resources,
        scene: &Scene,
        screen_quad: &ScreenQuad,
        with_background: bool,
        target: &mut S,
    ) -> Result<(), DrawError> {
        match scene.background() {
            Background::Color(color) if with_background => {
                target.clear_color_and_depth((color.x, color.y, color.z, 1.0), 1.0);
            }
            Background::Texture(texture) if with_background => {
                target.clear_depth(1.0);
                screen_quad.draw(
                    target,
                    &self.background_program,
                    &uniform! {
                        background_texture: resources.texture(Some(*texture)),
                    },
                )?;
            }
            _ => target.clear_color_and_depth((0.0, 0.0, 0.0, 1.0), 1.0),
        }

        Ok(())
    }

    /// Draws every object with the material currently assigned to it.
    pub fn draw<S: Surface>(
        &self,
        resources: &Resources,
        context: &Context,
        scene: &Scene,
        target: &mut S,
    ) -> Result<(), DrawError> {
        let mat_view: [[f32; 4]; 4] = context.camera.view().into();
        let mat_projection: [[f32; 4]; 4] = context.camera.projection().into();
        let lights = light_values(context);
        let ambient_light: [f32; 3] = context.ambient_light.into();

        for object in scene.objects() {
            let material = scene.material(object.material());
            let mesh = resources.mesh(object.geometry());

            let mat_model: [[f32; 4]; 4] = object.transform.matrix().into();
            let material_color: [f32; 3] = material.color.into();

            let object_uniforms = uniform! {
                mat_model: mat_model,
                mat_view: mat_view,
                mat_projection: mat_projection,
                material_color: material_color,
                material_map: resources.texture(material.map),
                material_lit: material.shading == Shading::Lit,
                ambient_light: ambient_light,
            };
            let uniforms = WithLights {
                object: object_uniforms,
                lights: &lights,
            };

            let params = glium::DrawParameters {
                backface_culling: if material.double_sided {
                    glium::draw_parameters::BackfaceCullingMode::CullingDisabled
                } else {
                    glium::draw_parameters::BackfaceCullingMode::CullClockwise
                },
                depth: glium::Depth {
                    test: glium::DepthTest::IfLess,
                    write: true,
                    ..Default::default()
                },
                ..Default::default()
            };

            target.draw(
                &mesh.vertex_buffer,
                &mesh.index_buffer,
                &self.program,
                &uniforms,
                &params,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_core_links_every_varying() {
        let linked = scene_core().link().unwrap();

        for name in &[defs::V_WORLD_POS.0, defs::V_WORLD_NORMAL.0, defs::V_TEX_COORD.0] {
            assert!(linked.vertex.has_out(name));
            assert!(linked.fragment.has_in(name));
        }
    }

    #[test]
    fn scene_vertex_stage_reads_mesh_attributes() {
        let (vertex, _) = scene_core().link().unwrap().compile();

        assert!(vertex.contains("in vec3 position;"));
        assert!(vertex.contains("in vec3 normal;"));
        assert!(vertex.contains("in vec2 tex_coord;"));
    }

    #[test]
    fn every_light_slot_is_shaded() {
        let (_, fragment) = scene_core().link().unwrap().compile();

        for slot in 0..MAX_LIGHTS {
            assert!(fragment.contains(&format!("uniform float light{}_range;", slot)));
            assert!(fragment.contains(&format!("lighting += window * window * diffuse * light{}_color;", slot)));
        }
    }

    #[test]
    fn missing_lights_are_black() {
        let context = Context {
            camera: crate::Camera::new(75.0, 1.0, 0.1, 100.0),
            lights: vec![crate::Light::default().with_range(3.0)],
            ambient_light: nalgebra::Vector3::zeros(),
        };

        let values = light_values(&context);

        assert_eq!(values.len(), 3 * MAX_LIGHTS);
        match values[2] {
            (ref name, UniformValue::Float(range)) => {
                assert_eq!(name, "light0_range");
                assert_eq!(range, 3.0);
            }
            _ => panic!("unexpected uniform {}", values[2].0),
        }
        match values[4] {
            (ref name, UniformValue::Vec3(color)) => {
                assert_eq!(name, "light1_color");
                assert_eq!(color, [0.0; 3]);
            }
            _ => panic!("unexpected uniform {}", values[4].0),
        }
    }
}
