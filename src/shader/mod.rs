//! Composable GLSL programs.
//!
//! A `Core` is a pair of vertex and fragment stages that can be extended by
//! transforms (e.g. the bloom composition or tone mapping) before being
//! linked and compiled into a `glium::Program`. Linking prunes varyings and
//! local outputs that no statement ends up reading.

pub mod defs;

use std::collections::BTreeMap;
use std::marker::PhantomData;

use log::info;

use glsl::parser::Parse;
use glsl::visitor::Host;

use glium::uniforms::UniformType;
use glium::vertex::AttributeType;

pub type VariableName = String;
pub type Glsl = String;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interpolation {
    Flat,
    Smooth,
    Local,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputKind {
    Local,
    Yield,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Varying(pub UniformType, pub Interpolation);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FragmentOut(pub UniformType, pub OutputKind);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Block(Glsl),
    Assign(VariableName, Glsl),
}

impl Statement {
    fn assigns(&self, name: &str) -> bool {
        match self {
            Statement::Block(_) => false,
            Statement::Assign(target, _) => target == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexStage<V> {
    pub uniforms: BTreeMap<VariableName, UniformType>,
    pub outputs: BTreeMap<VariableName, Varying>,
    pub defs: Glsl,
    pub body: Vec<Statement>,
    phantom: PhantomData<V>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentStage {
    pub uniforms: BTreeMap<VariableName, UniformType>,
    pub inputs: BTreeMap<VariableName, Varying>,
    pub outputs: BTreeMap<VariableName, FragmentOut>,
    pub defs: Glsl,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Core<V> {
    pub vertex: VertexStage<V>,
    pub fragment: FragmentStage,
}

impl<V> Default for VertexStage<V> {
    fn default() -> Self {
        Self {
            uniforms: BTreeMap::new(),
            outputs: BTreeMap::new(),
            defs: String::new(),
            body: Vec::new(),
            phantom: PhantomData,
        }
    }
}

impl Default for FragmentStage {
    fn default() -> Self {
        Self {
            uniforms: BTreeMap::new(),
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            defs: String::new(),
            body: Vec::new(),
        }
    }
}

impl<V> VertexStage<V> {
    pub fn empty() -> Self {
        Default::default()
    }

    pub fn has_out(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn with_uniform(mut self, name: &str, t: UniformType) -> Self {
        self.uniforms.insert(name.into(), t);
        self
    }

    pub fn with_defs(mut self, defs: &str) -> Self {
        self.defs += defs;
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body.push(Statement::Block(body.into()));
        self
    }

    pub fn with_out(mut self, (name, varying): (&str, Varying), expr: &str) -> Self {
        assert!(!self.has_out(name), "vertex output {} defined twice", name);

        if name != defs::V_POS.0 {
            self.outputs.insert(name.into(), varying);
        }

        self.body.push(Statement::Assign(name.into(), expr.into()));
        self
    }
}

impl FragmentStage {
    pub fn empty() -> Self {
        Default::default()
    }

    pub fn has_in(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn has_out(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn with_uniform(mut self, name: &str, t: UniformType) -> Self {
        self.uniforms.insert(name.into(), t);
        self
    }

    pub fn with_defs(mut self, defs: &str) -> Self {
        self.defs += defs;
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body.push(Statement::Block(body.into()));
        self
    }

    pub fn with_in(mut self, (name, varying): (&str, Varying)) -> Self {
        self.inputs.insert(name.into(), varying);
        self
    }

    pub fn with_out(mut self, (name, out): (&str, FragmentOut), expr: &str) -> Self {
        assert!(!self.has_out(name), "fragment output {} defined twice", name);

        self.outputs.insert(name.into(), out);
        self.body.push(Statement::Assign(name.into(), expr.into()));
        self
    }

    /// Reassigns an existing output, e.g. to post-process `f_color`.
    pub fn with_out_expr(mut self, name: &str, expr: &str) -> Self {
        assert!(self.has_out(name), "fragment output {} is not defined", name);

        self.body.push(Statement::Assign(name.into(), expr.into()));
        self
    }
}

#[derive(Debug)]
pub enum BuildError {
    Parse {
        glsl: String,
        message: String,
    },
    Program {
        vertex_source: String,
        fragment_source: String,
        error: glium::program::ProgramCreationError,
    },
}

fn uses_variable(defs: &str, body: &[Statement], name: &str) -> Result<bool, BuildError> {
    struct Finder<'a> {
        name: &'a str,
        found: bool,
    }

    impl<'a> glsl::visitor::Visitor for Finder<'a> {
        fn visit_identifier(
            &mut self,
            identifier: &mut glsl::syntax::Identifier,
        ) -> glsl::visitor::Visit {
            if identifier.as_str() == self.name {
                self.found = true;
            }

            glsl::visitor::Visit::Children
        }
    }

    let mut finder = Finder { name, found: false };

    // Braces turn the statement list into a single compound statement.
    let source = format!("{{{}}}", compile_body(body));
    let mut statement = glsl::syntax::Statement::parse(&source).map_err(|err| BuildError::Parse {
        glsl: source.clone(),
        message: format!("{:?}", err),
    })?;
    statement.visit(&mut finder);

    if !defs.trim().is_empty() {
        let mut unit =
            glsl::syntax::TranslationUnit::parse(defs).map_err(|err| BuildError::Parse {
                glsl: defs.to_string(),
                message: format!("{:?}", err),
            })?;
        unit.visit(&mut finder);
    }

    Ok(finder.found)
}

/// Like `uses_variable`, but plain assignments to `name` do not count.
fn is_read(defs: &str, body: &[Statement], name: &str) -> Result<bool, BuildError> {
    let others: Vec<Statement> = body
        .iter()
        .filter(|statement| !statement.assigns(name))
        .cloned()
        .collect();

    uses_variable(defs, &others, name)
}

impl<V: Clone> Core<V> {
    /// Prunes everything the final fragment color does not depend on.
    pub fn link(&self) -> Result<Core<V>, BuildError> {
        let mut fragment = self.fragment.clone();

        // Removing one local output may make another unused, so iterate to a
        // fixed point.
        loop {
            let mut unused = None;

            for (name, FragmentOut(_, kind)) in fragment.outputs.iter() {
                if *kind == OutputKind::Local && !is_read(&fragment.defs, &fragment.body, name)? {
                    unused = Some(name.clone());
                    break;
                }
            }

            match unused {
                Some(name) => {
                    info!("Removing unused local fragment output {}", name);
                    fragment.outputs.remove(&name);
                    fragment.body.retain(|statement| !statement.assigns(&name));
                }
                None => break,
            }
        }

        let mut inputs = BTreeMap::new();
        for (name, varying) in fragment.inputs.iter() {
            if uses_variable(&fragment.defs, &fragment.body, name)? {
                inputs.insert(name.clone(), *varying);
            } else {
                info!("Removing unused fragment input {}", name);
            }
        }
        fragment.inputs = inputs;

        let mut vertex = self.vertex.clone();

        for (name, Varying(_, interpolation)) in vertex.outputs.iter_mut() {
            if !fragment.has_in(name) && *interpolation != Interpolation::Local {
                info!("Demoting unconnected vertex output {} to local", name);
                *interpolation = Interpolation::Local;
            }
        }

        loop {
            let mut unused = None;

            for (name, Varying(_, interpolation)) in vertex.outputs.iter() {
                if *interpolation == Interpolation::Local
                    && !is_read(&vertex.defs, &vertex.body, name)?
                {
                    unused = Some(name.clone());
                    break;
                }
            }

            match unused {
                Some(name) => {
                    info!("Removing unused local vertex output {}", name);
                    vertex.outputs.remove(&name);
                    vertex.body.retain(|statement| !statement.assigns(&name));
                }
                None => break,
            }
        }

        Ok(Core { vertex, fragment })
    }
}

impl<V> Core<V>
where
    V: glium::vertex::Vertex,
{
    pub fn compile(&self) -> (String, String) {
        (self.vertex.compile(), self.fragment.compile())
    }

    pub fn build_program<F: glium::backend::Facade>(
        &self,
        facade: &F,
    ) -> Result<glium::Program, BuildError> {
        let (vertex_source, fragment_source) = self.link()?.compile();

        // `outputs_srgb: true` keeps glium from enabling GL_FRAMEBUFFER_SRGB;
        // gamma correction is done explicitly in the composition shader.
        glium::Program::new(
            facade,
            glium::program::ProgramCreationInput::SourceCode {
                vertex_shader: &vertex_source,
                fragment_shader: &fragment_source,
                geometry_shader: None,
                tessellation_control_shader: None,
                tessellation_evaluation_shader: None,
                transform_feedback_varyings: None,
                outputs_srgb: true,
                uses_point_size: false,
            },
        )
        .map_err(|error| BuildError::Program {
            vertex_source,
            fragment_source,
            error,
        })
    }
}

fn glsl_type(t: UniformType) -> &'static str {
    match t {
        UniformType::Float => "float",
        UniformType::FloatVec2 => "vec2",
        UniformType::FloatVec3 => "vec3",
        UniformType::FloatVec4 => "vec4",
        UniformType::FloatMat3 => "mat3",
        UniformType::FloatMat4 => "mat4",
        UniformType::Int => "int",
        UniformType::Bool => "bool",
        UniformType::Sampler2d => "sampler2D",
        _ => unimplemented!("GLSL type not supported: {:?}", t),
    }
}

fn attribute_type(t: AttributeType) -> UniformType {
    match t {
        AttributeType::F32 => UniformType::Float,
        AttributeType::F32F32 => UniformType::FloatVec2,
        AttributeType::F32F32F32 => UniformType::FloatVec3,
        AttributeType::F32F32F32F32 => UniformType::FloatVec4,
        _ => unimplemented!("Vertex attribute type not supported: {:?}", t),
    }
}

fn declare<'a, I>(prefix: &str, variables: I) -> String
where
    I: Iterator<Item = (&'a VariableName, UniformType)>,
{
    variables
        .map(|(name, t)| {
            if prefix.is_empty() {
                format!("{} {};\n", glsl_type(t), name)
            } else {
                format!("{} {} {};\n", prefix, glsl_type(t), name)
            }
        })
        .collect()
}

fn declare_varyings(direction: &str, varyings: &BTreeMap<VariableName, Varying>) -> String {
    varyings
        .iter()
        .map(|(name, Varying(t, interpolation))| {
            let prefix = match interpolation {
                Interpolation::Flat => format!("flat {}", direction),
                Interpolation::Smooth => format!("smooth {}", direction),
                Interpolation::Local => String::new(),
            };

            declare(&prefix, std::iter::once((name, *t)))
        })
        .collect()
}

fn compile_body(body: &[Statement]) -> String {
    body.iter()
        .map(|statement| match statement {
            Statement::Block(block) => block.clone(),
            Statement::Assign(name, expr) => format!("    {} = {};\n", name, expr),
        })
        .collect()
}

fn compile_main(defs: &str, body: &[Statement]) -> String {
    format!("{}\nvoid main() {{\n{}}}\n", defs, compile_body(body))
}

impl<V: glium::vertex::Vertex> VertexStage<V> {
    pub fn compile(&self) -> String {
        let bindings = V::build_bindings();
        let attributes: Vec<(VariableName, UniformType)> = bindings
            .iter()
            .map(|binding| (binding.0.to_string(), attribute_type(binding.2)))
            .collect();

        let mut s = String::from("#version 330\n\n");
        s += &declare("uniform", self.uniforms.iter().map(|(n, t)| (n, *t)));
        s += &declare("in", attributes.iter().map(|(n, t)| (n, *t)));
        s += &declare_varyings("out", &self.outputs);
        s += &compile_main(&self.defs, &self.body);
        s
    }
}

impl FragmentStage {
    pub fn compile(&self) -> String {
        let mut s = String::from("#version 330\n\n");
        s += &declare("uniform", self.uniforms.iter().map(|(n, t)| (n, *t)));
        s += &declare_varyings("in", &self.inputs);

        for (name, FragmentOut(t, kind)) in self.outputs.iter() {
            let prefix = match kind {
                OutputKind::Yield => "out",
                OutputKind::Local => "",
            };
            s += &declare(prefix, std::iter::once((name, *t)));
        }

        s += &compile_main(&self.defs, &self.body);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen_quad;

    fn quad_core() -> Core<screen_quad::Vertex> {
        let vertex = VertexStage::empty()
            .with_out(defs::V_TEX_COORD, "tex_coord")
            .with_out(defs::V_POS, "position");
        let fragment = FragmentStage::empty()
            .with_uniform("color_texture", UniformType::Sampler2d)
            .with_in(defs::V_TEX_COORD)
            .with_out(defs::F_COLOR, "texture(color_texture, v_tex_coord)");

        Core { vertex, fragment }
    }

    #[test]
    fn compiled_stages_declare_their_interface() {
        let (vertex, fragment) = quad_core().compile();

        assert!(vertex.starts_with("#version 330"));
        assert!(vertex.contains("in vec4 position;"));
        assert!(vertex.contains("in vec2 tex_coord;"));
        assert!(vertex.contains("smooth out vec2 v_tex_coord;"));
        assert!(vertex.contains("gl_Position = position;"));
        assert!(!vertex.contains("out vec4 gl_Position"));

        assert!(fragment.contains("uniform sampler2D color_texture;"));
        assert!(fragment.contains("smooth in vec2 v_tex_coord;"));
        assert!(fragment.contains("out vec4 f_color;"));
    }

    #[test]
    fn link_removes_unused_local_outputs() {
        let mut core = quad_core();
        core.fragment = core.fragment.with_out(defs::F_LINEAR, "vec3(1.0)");

        let linked = core.link().unwrap();

        assert!(!linked.fragment.has_out(defs::F_LINEAR.0));
        assert!(linked.fragment.has_out(defs::F_COLOR.0));
    }

    #[test]
    fn link_keeps_local_outputs_that_are_read() {
        let core = quad_core();
        let fragment = FragmentStage::empty()
            .with_in(defs::V_TEX_COORD)
            .with_out(defs::F_LINEAR, "vec3(v_tex_coord, 0.0)")
            .with_out(defs::F_COLOR, "vec4(f_linear, 1.0)");

        let linked = Core {
            vertex: core.vertex,
            fragment,
        }
        .link()
        .unwrap();

        assert!(linked.fragment.has_out(defs::F_LINEAR.0));
        assert!(linked.fragment.has_in(defs::V_TEX_COORD.0));
    }

    #[test]
    fn link_drops_varyings_the_fragment_stage_ignores() {
        let core = quad_core();
        let fragment = FragmentStage::empty()
            .with_in(defs::V_TEX_COORD)
            .with_out(defs::F_COLOR, "vec4(1.0)");

        let linked = Core {
            vertex: core.vertex,
            fragment,
        }
        .link()
        .unwrap();

        assert!(!linked.fragment.has_in(defs::V_TEX_COORD.0));
        assert!(!linked.vertex.has_out(defs::V_TEX_COORD.0));
    }

    #[test]
    #[should_panic]
    fn outputs_cannot_be_defined_twice() {
        let _ = FragmentStage::empty()
            .with_out(defs::F_COLOR, "vec4(0.0)")
            .with_out(defs::F_COLOR, "vec4(1.0)");
    }
}
