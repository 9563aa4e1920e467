//! Shader kernel generation for GPU skinning.
//!
//! The CPU evaluator in [`crate::skinning`] has an exact GPU twin: a skinning
//! function emitted as shader source so engines can deform on-device without
//! hand-porting the weight policy. This module provides:
//!
//! - [`SkinKernel`] — Fluent generator for the kernel source
//! - [`ShaderDialect`] — WGSL (complete compute module) or HLSL (include-style
//!   function library)
//! - [`Precision`] — Full or half precision arithmetic
//! - [`ShaderStage`] — Pipeline stage tags with capability queries
//! - [`CodeWriter`] — The indentation-tracking string builder behind it all
//!
//! # Quick Start
//!
//! ```
//! use armature::{Precision, ShaderDialect, SkinKernel};
//!
//! let wgsl = SkinKernel::new(ShaderDialect::Wgsl).source();
//! assert!(wgsl.contains("fn skin_main"));
//!
//! let hlsl = SkinKernel::new(ShaderDialect::Hlsl)
//!     .precision(Precision::Half)
//!     .source();
//! assert!(hlsl.contains("half4x4"));
//! ```
//!
//! Generated source mirrors the CPU evaluator branch for branch — same
//! weight-sum tolerance, same zero-sum passthrough, same lane skipping — so a
//! mesh skinned on either side lands in the same place.

use crate::skinning::WEIGHT_SUM_TOLERANCE;

/// Pipeline stages a shader function can run in.
///
/// `All` is the union tag: a function available in every stage, or a
/// requirement that applies to every stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex processing only.
    Vertex,
    /// Fragment processing only.
    Fragment,
    /// Every stage.
    All,
}

impl ShaderStage {
    /// Returns `true` if this stage tag covers vertex processing.
    pub fn includes_vertex(self) -> bool {
        matches!(self, ShaderStage::Vertex | ShaderStage::All)
    }

    /// Returns `true` if this stage tag covers fragment processing.
    pub fn includes_fragment(self) -> bool {
        matches!(self, ShaderStage::Fragment | ShaderStage::All)
    }

    /// Returns `true` if the two stage tags overlap anywhere.
    ///
    /// # Example
    ///
    /// ```
    /// use armature::ShaderStage;
    ///
    /// assert!(ShaderStage::All.supports(ShaderStage::Vertex));
    /// assert!(!ShaderStage::Vertex.supports(ShaderStage::Fragment));
    /// ```
    pub fn supports(self, other: ShaderStage) -> bool {
        (self.includes_vertex() && other.includes_vertex())
            || (self.includes_fragment() && other.includes_fragment())
    }
}

/// The shading language a kernel is emitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderDialect {
    /// WGSL: a self-contained compute module, ready for
    /// [`wgpu::Device::create_shader_module`].
    Wgsl,
    /// HLSL: a function library in the style of engine shader includes,
    /// meant to be pasted into a larger vertex shader.
    Hlsl,
}

/// Arithmetic precision of the generated kernel.
///
/// Half precision trades accuracy for bandwidth on mobile-class GPUs. The
/// palette buffer stays full precision either way; half kernels narrow on
/// load. Half WGSL starts with `enable f16;` and needs
/// [`wgpu::Features::SHADER_F16`] at device creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    /// 32-bit floats (`float` / `f32`).
    Single,
    /// 16-bit floats (`half` / `f16`).
    Half,
}

impl Precision {
    /// The scalar type name in the given dialect, also used as the
    /// generated function's name suffix.
    pub fn scalar(self, dialect: ShaderDialect) -> &'static str {
        match (dialect, self) {
            (ShaderDialect::Wgsl, Precision::Single) => "f32",
            (ShaderDialect::Wgsl, Precision::Half) => "f16",
            (ShaderDialect::Hlsl, Precision::Single) => "float",
            (ShaderDialect::Hlsl, Precision::Half) => "half",
        }
    }
}

/// String builder that keeps track of indentation for generated code.
///
/// Four spaces per level, chainable calls, in the shape code generators
/// usually take:
///
/// ```
/// use armature::CodeWriter;
///
/// let mut w = CodeWriter::new();
/// w.line("fn answer() -> i32 {")
///     .indent()
///     .line("return 42;")
///     .dedent()
///     .line("}");
/// assert_eq!(w.finish(), "fn answer() -> i32 {\n    return 42;\n}\n");
/// ```
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    depth: usize,
}

impl CodeWriter {
    /// Creates an empty writer at indentation depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line at the current indentation depth.
    pub fn line(&mut self, text: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
        self
    }

    /// Appends an empty line (no indentation).
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Increases the indentation depth by one level.
    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Decreases the indentation depth by one level.
    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Consumes the writer and returns the accumulated source.
    pub fn finish(self) -> String {
        self.output
    }
}

/// Fluent generator for the skinning shader kernel.
///
/// The kernel blends by the same rules as [`crate::skin_vertex`]: weight sums
/// off by more than the shared tolerance renormalize, all-zero weights pass
/// the vertex through, zero-weight lanes are skipped. What varies is the
/// packaging per dialect:
///
/// - **WGSL** emits a complete compute module: the vertex and palette buffer
///   bindings, the blend function, and a `skin_main` entry point running one
///   invocation per vertex in workgroups of [`SkinKernel::WORKGROUP_SIZE`]
///   (overridable per kernel).
/// - **HLSL** emits the palette `StructuredBuffer` declaration and a
///   skinning function with `out` parameters, for inclusion in a vertex
///   shader.
///
/// # Example
///
/// ```
/// use armature::{Precision, ShaderDialect, SkinKernel};
///
/// let kernel = SkinKernel::new(ShaderDialect::Wgsl).precision(Precision::Single);
/// assert_eq!(kernel.function_name(), "armature_linear_blend_skinning_f32");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SkinKernel {
    dialect: ShaderDialect,
    precision: Precision,
    workgroup_size: u32,
}

impl SkinKernel {
    /// Compute entry point name in generated WGSL modules.
    pub const ENTRY_POINT: &'static str = "skin_main";

    /// Default invocations per workgroup in generated WGSL modules.
    pub const WORKGROUP_SIZE: u32 = 64;

    /// Starts a kernel for the given dialect at full precision.
    pub fn new(dialect: ShaderDialect) -> Self {
        Self {
            dialect,
            precision: Precision::Single,
            workgroup_size: Self::WORKGROUP_SIZE,
        }
    }

    /// Selects the arithmetic precision.
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Overrides the WGSL workgroup size.
    ///
    /// Dispatchers must cover `ceil(vertex_count / size)` workgroups to
    /// match; HLSL output ignores this.
    pub fn workgroup_size(mut self, size: u32) -> Self {
        self.workgroup_size = size;
        self
    }

    /// Returns `true` if the kernel can run in the given stage.
    ///
    /// Skinning deforms geometry, so it belongs to vertex processing; a
    /// fragment-only context has no vertex streams to feed it.
    pub fn available_in(&self, stage: ShaderStage) -> bool {
        stage.includes_vertex()
    }

    /// Returns `true` if the kernel needs object-space positions in `stage`.
    pub fn requires_position(&self, stage: ShaderStage) -> bool {
        stage.includes_vertex()
    }

    /// Returns `true` if the kernel needs object-space normals in `stage`.
    pub fn requires_normal(&self, stage: ShaderStage) -> bool {
        stage.includes_vertex()
    }

    /// Returns `true` if the kernel needs object-space tangents in `stage`.
    pub fn requires_tangent(&self, stage: ShaderStage) -> bool {
        stage.includes_vertex()
    }

    /// Name of the generated blend function, suffixed with the precision's
    /// scalar type.
    pub fn function_name(&self) -> String {
        match self.dialect {
            ShaderDialect::Wgsl => format!(
                "armature_linear_blend_skinning_{}",
                self.precision.scalar(self.dialect)
            ),
            ShaderDialect::Hlsl => format!(
                "Armature_LinearBlendSkinning_{}",
                self.precision.scalar(self.dialect)
            ),
        }
    }

    /// The resource declarations the blend function reads from.
    ///
    /// WGSL: the vertex/palette/output/params bindings and their struct
    /// types. HLSL: the palette `StructuredBuffer` at its conventional
    /// register.
    pub fn bindings_source(&self) -> String {
        let mut w = CodeWriter::new();
        match self.dialect {
            ShaderDialect::Wgsl => self.write_wgsl_bindings(&mut w),
            ShaderDialect::Hlsl => self.write_hlsl_bindings(&mut w),
        }
        w.finish()
    }

    /// The blend function alone, without bindings or entry point.
    ///
    /// Not a complete module; compose it with [`SkinKernel::bindings_source`]
    /// (and, for half precision WGSL, an `enable f16;` directive) when
    /// embedding in a larger shader.
    pub fn function_source(&self) -> String {
        let mut w = CodeWriter::new();
        match self.dialect {
            ShaderDialect::Wgsl => self.write_wgsl_function(&mut w),
            ShaderDialect::Hlsl => self.write_hlsl_function(&mut w),
        }
        w.finish()
    }

    /// The complete kernel source.
    ///
    /// For WGSL this is a compilable compute module; for HLSL, the buffer
    /// declaration followed by the skinning function.
    pub fn source(&self) -> String {
        let mut w = CodeWriter::new();
        match self.dialect {
            ShaderDialect::Wgsl => {
                if self.precision == Precision::Half {
                    w.line("enable f16;").blank();
                }
                self.write_wgsl_bindings(&mut w);
                w.blank();
                self.write_wgsl_function(&mut w);
                w.blank();
                self.write_wgsl_entry(&mut w);
            }
            ShaderDialect::Hlsl => {
                self.write_hlsl_bindings(&mut w);
                w.blank();
                self.write_hlsl_function(&mut w);
            }
        }
        w.finish()
    }

    fn write_wgsl_bindings(&self, w: &mut CodeWriter) {
        // array<f32, N> members keep the struct packed to the same 72-byte
        // stride as the Rust-side vertex; vec3/vec4 members would pad.
        w.line("struct SkinnedVertex {")
            .indent()
            .line("position: array<f32, 3>,")
            .line("normal: array<f32, 3>,")
            .line("tangent: array<f32, 4>,")
            .line("joints: array<u32, 4>,")
            .line("weights: array<f32, 4>,")
            .dedent()
            .line("}")
            .blank()
            .line("struct SkinParams {")
            .indent()
            .line("vertex_count: u32,")
            .line("joint_offset: u32,")
            .dedent()
            .line("}")
            .blank()
            .line("@group(0) @binding(0) var<storage, read> skin_matrices: array<mat4x4<f32>>;")
            .line("@group(0) @binding(1) var<storage, read> vertices_in: array<SkinnedVertex>;")
            .line("@group(0) @binding(2) var<storage, read_write> vertices_out: array<SkinnedVertex>;")
            .line("@group(0) @binding(3) var<uniform> params: SkinParams;");
    }

    fn write_wgsl_function(&self, w: &mut CodeWriter) {
        let s = self.precision.scalar(ShaderDialect::Wgsl);
        let tolerance = format!("{:e}", WEIGHT_SUM_TOLERANCE);

        w.line("struct SkinResult {")
            .indent()
            .line("position: vec3<f32>,")
            .line("normal: vec3<f32>,")
            .line("tangent: vec3<f32>,")
            .dedent()
            .line("}")
            .blank()
            .line(&format!("fn {}(", self.function_name()))
            .indent()
            .line("position_in: vec3<f32>,")
            .line("normal_in: vec3<f32>,")
            .line("tangent_in: vec3<f32>,")
            .line("joints: vec4<u32>,")
            .line("weights: vec4<f32>,")
            .line("joint_offset: u32,")
            .dedent()
            .line(") -> SkinResult {")
            .indent()
            .line("var result: SkinResult;")
            .line("result.position = position_in;")
            .line("result.normal = normal_in;")
            .line("result.tangent = tangent_in;")
            .blank()
            .line(&format!("let position = vec3<{s}>(position_in);"))
            .line(&format!("let normal = vec3<{s}>(normal_in);"))
            .line(&format!("let tangent = vec3<{s}>(tangent_in);"))
            // Locals so the lanes can be indexed dynamically below.
            .line(&format!("var w = vec4<{s}>(weights);"))
            .line("var j = joints;")
            .blank()
            .line("let weight_sum = w.x + w.y + w.z + w.w;")
            .line("if weight_sum == 0.0 {")
            .indent()
            .line("return result;")
            .dedent()
            .line("}")
            .blank()
            .line(&format!("var scale: {s} = 1.0;"))
            .line(&format!("if abs(weight_sum - 1.0) > {tolerance} {{"))
            .indent()
            .line("scale = 1.0 / weight_sum;")
            .dedent()
            .line("}")
            .blank()
            .line(&format!("var skinned_position = vec3<{s}>(0.0);"))
            .line(&format!("var skinned_normal = vec3<{s}>(0.0);"))
            .line(&format!("var skinned_tangent = vec3<{s}>(0.0);"))
            .line("for (var lane = 0u; lane < 4u; lane++) {")
            .indent()
            .line("let raw_weight = w[lane];")
            .line("if raw_weight == 0.0 {")
            .indent()
            .line("continue;")
            .dedent()
            .line("}")
            .line("let weight = raw_weight * scale;")
            .line(&format!(
                "let skin_matrix = mat4x4<{s}>(skin_matrices[j[lane] + joint_offset]);"
            ))
            .line(&format!(
                "skinned_position += (skin_matrix * vec4<{s}>(position, 1.0)).xyz * weight;"
            ))
            .line(&format!(
                "skinned_normal += (skin_matrix * vec4<{s}>(normal, 0.0)).xyz * weight;"
            ))
            .line(&format!(
                "skinned_tangent += (skin_matrix * vec4<{s}>(tangent, 0.0)).xyz * weight;"
            ))
            .dedent()
            .line("}")
            .blank()
            .line("result.position = vec3<f32>(skinned_position);")
            .line("result.normal = vec3<f32>(skinned_normal);")
            .line("result.tangent = vec3<f32>(skinned_tangent);")
            .line("return result;")
            .dedent()
            .line("}");
    }

    fn write_wgsl_entry(&self, w: &mut CodeWriter) {
        w.line(&format!(
            "@compute @workgroup_size({})",
            self.workgroup_size
        ))
        .line(&format!(
            "fn {}(@builtin(global_invocation_id) id: vec3<u32>) {{",
            Self::ENTRY_POINT
        ))
        .indent()
        .line("let index = id.x;")
        .line("if index >= params.vertex_count {")
        .indent()
        .line("return;")
        .dedent()
        .line("}")
        .blank()
        .line("let v = vertices_in[index];")
        .line(&format!("let result = {}(", self.function_name()))
        .indent()
        .line("vec3<f32>(v.position[0], v.position[1], v.position[2]),")
        .line("vec3<f32>(v.normal[0], v.normal[1], v.normal[2]),")
        .line("vec3<f32>(v.tangent[0], v.tangent[1], v.tangent[2]),")
        .line("vec4<u32>(v.joints[0], v.joints[1], v.joints[2], v.joints[3]),")
        .line("vec4<f32>(v.weights[0], v.weights[1], v.weights[2], v.weights[3]),")
        .line("params.joint_offset,")
        .dedent()
        .line(");")
        .blank()
        .line("var skinned = v;")
        .line("skinned.position = array<f32, 3>(result.position.x, result.position.y, result.position.z);")
        .line("skinned.normal = array<f32, 3>(result.normal.x, result.normal.y, result.normal.z);")
        // Tangent w is handedness and rides along untouched.
        .line("skinned.tangent = array<f32, 4>(result.tangent.x, result.tangent.y, result.tangent.z, v.tangent[3]);")
        .line("vertices_out[index] = skinned;")
        .dedent()
        .line("}");
    }

    fn write_hlsl_bindings(&self, w: &mut CodeWriter) {
        // The palette register is the engine-side contract; the buffer stays
        // full precision even for half kernels, which narrow on load.
        w.line("uniform StructuredBuffer<float4x4> _SkinMatrices : register(t1);");
    }

    fn write_hlsl_function(&self, w: &mut CodeWriter) {
        let s = self.precision.scalar(ShaderDialect::Hlsl);
        let tolerance = format!("{:e}", WEIGHT_SUM_TOLERANCE);

        w.line(&format!("void {}(", self.function_name()))
            .indent()
            .line(&format!("{s}3 positionIn,"))
            .line(&format!("{s}3 normalIn,"))
            .line(&format!("{s}3 tangentIn,"))
            .line("uint4 indices,")
            .line(&format!("{s}4 weights,"))
            .line("uint indexOffset,")
            .line(&format!("out {s}3 positionOut,"))
            .line(&format!("out {s}3 normalOut,"))
            .line(&format!("out {s}3 tangentOut)"))
            .dedent()
            .line("{")
            .indent()
            .line("positionOut = positionIn;")
            .line("normalOut = normalIn;")
            .line("tangentOut = tangentIn;")
            .blank()
            .line(&format!(
                "{s} weightSum = weights.x + weights.y + weights.z + weights.w;"
            ))
            .line("if (weightSum == 0.0)")
            .line("{")
            .indent()
            .line("return;")
            .dedent()
            .line("}")
            .blank()
            .line(&format!(
                "{s} scale = abs(weightSum - 1.0) > {tolerance} ? 1.0 / weightSum : 1.0;"
            ))
            .blank()
            .line("positionOut = 0;")
            .line("normalOut = 0;")
            .line("tangentOut = 0;")
            .line("for (int i = 0; i < 4; ++i)")
            .line("{")
            .indent()
            .line("if (weights[i] == 0.0)")
            .line("{")
            .indent()
            .line("continue;")
            .dedent()
            .line("}")
            .line(&format!("{s} weight = weights[i] * scale;"))
            .line(&format!(
                "{s}4x4 skinMatrix = _SkinMatrices[indices[i] + indexOffset];"
            ))
            .line(&format!(
                "positionOut += mul(skinMatrix, {s}4(positionIn, 1.0)).xyz * weight;"
            ))
            .line(&format!(
                "normalOut += mul(skinMatrix, {s}4(normalIn, 0.0)).xyz * weight;"
            ))
            .line(&format!(
                "tangentOut += mul(skinMatrix, {s}4(tangentIn, 0.0)).xyz * weight;"
            ))
            .dedent()
            .line("}")
            .dedent()
            .line("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tags_overlap_the_obvious_ways() {
        assert!(ShaderStage::All.supports(ShaderStage::Vertex));
        assert!(ShaderStage::All.supports(ShaderStage::Fragment));
        assert!(ShaderStage::Vertex.supports(ShaderStage::Vertex));
        assert!(ShaderStage::Vertex.supports(ShaderStage::All));
        assert!(!ShaderStage::Vertex.supports(ShaderStage::Fragment));
        assert!(!ShaderStage::Fragment.supports(ShaderStage::Vertex));
    }

    #[test]
    fn kernel_is_vertex_stage_work() {
        let kernel = SkinKernel::new(ShaderDialect::Hlsl);
        assert!(kernel.available_in(ShaderStage::Vertex));
        assert!(kernel.available_in(ShaderStage::All));
        assert!(!kernel.available_in(ShaderStage::Fragment));

        assert!(kernel.requires_position(ShaderStage::Vertex));
        assert!(kernel.requires_normal(ShaderStage::All));
        assert!(!kernel.requires_tangent(ShaderStage::Fragment));
    }

    #[test]
    fn code_writer_tracks_indentation() {
        let mut w = CodeWriter::new();
        w.line("a {").indent().line("b;").dedent().line("}");
        assert_eq!(w.finish(), "a {\n    b;\n}\n");
    }

    #[test]
    fn code_writer_dedent_saturates_at_zero() {
        let mut w = CodeWriter::new();
        w.dedent().line("still flush left");
        assert_eq!(w.finish(), "still flush left\n");
    }

    #[test]
    fn wgsl_module_has_entry_point_and_bindings() {
        let source = SkinKernel::new(ShaderDialect::Wgsl).source();

        assert!(source.contains("fn armature_linear_blend_skinning_f32("));
        assert!(source.contains("@compute @workgroup_size(64)"));
        assert!(source.contains("fn skin_main("));
        assert!(source.contains("@group(0) @binding(0) var<storage, read> skin_matrices"));
        assert!(source.contains("@group(0) @binding(2) var<storage, read_write> vertices_out"));
        assert!(source.contains("@group(0) @binding(3) var<uniform> params"));
        assert!(!source.contains("enable f16;"));
    }

    #[test]
    fn wgsl_vertex_struct_stays_packed() {
        // vec3 members would 16-align and break the 72-byte stride.
        let bindings = SkinKernel::new(ShaderDialect::Wgsl).bindings_source();
        assert!(bindings.contains("position: array<f32, 3>,"));
        assert!(bindings.contains("joints: array<u32, 4>,"));
        assert!(!bindings.contains("position: vec3<f32>"));
    }

    #[test]
    fn wgsl_half_enables_f16_first() {
        let source = SkinKernel::new(ShaderDialect::Wgsl)
            .precision(Precision::Half)
            .source();

        assert!(source.starts_with("enable f16;"));
        assert!(source.contains("fn armature_linear_blend_skinning_f16("));
        assert!(source.contains("mat4x4<f16>"));
    }

    #[test]
    fn workgroup_size_override_lands_in_the_attribute() {
        let source = SkinKernel::new(ShaderDialect::Wgsl)
            .workgroup_size(256)
            .source();
        assert!(source.contains("@compute @workgroup_size(256)"));
    }

    #[test]
    fn wgsl_modules_parse_and_validate() {
        let kernels = [
            SkinKernel::new(ShaderDialect::Wgsl),
            SkinKernel::new(ShaderDialect::Wgsl).precision(Precision::Half),
            SkinKernel::new(ShaderDialect::Wgsl).workgroup_size(256),
        ];
        for kernel in kernels {
            let source = kernel.source();
            let module = match naga::front::wgsl::parse_str(&source) {
                Ok(module) => module,
                Err(e) => panic!("{}", e.emit_to_string(&source)),
            };
            naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            )
            .validate(&module)
            .expect("generated module failed validation");

            assert!(
                module
                    .entry_points
                    .iter()
                    .any(|ep| ep.name == SkinKernel::ENTRY_POINT)
            );
        }
    }

    #[test]
    fn kernels_share_the_cpu_weight_tolerance() {
        for dialect in [ShaderDialect::Wgsl, ShaderDialect::Hlsl] {
            let source = SkinKernel::new(dialect).source();
            assert!(source.contains("1e-4"), "{:?} lost the tolerance", dialect);
        }
    }

    #[test]
    fn hlsl_keeps_the_palette_register_contract() {
        let kernel = SkinKernel::new(ShaderDialect::Hlsl);
        assert!(
            kernel
                .bindings_source()
                .contains("uniform StructuredBuffer<float4x4> _SkinMatrices : register(t1);")
        );
    }

    #[test]
    fn hlsl_function_blends_through_out_parameters() {
        let source = SkinKernel::new(ShaderDialect::Hlsl).function_source();

        assert!(source.contains("void Armature_LinearBlendSkinning_float("));
        assert!(source.contains("out float3 positionOut,"));
        assert!(source.contains("_SkinMatrices[indices[i] + indexOffset]"));
        assert!(source.contains("mul(skinMatrix, float4(positionIn, 1.0)).xyz"));
        // Directions use w = 0: no translation pickup.
        assert!(source.contains("mul(skinMatrix, float4(normalIn, 0.0)).xyz"));
    }

    #[test]
    fn hlsl_half_narrows_every_precision_site() {
        let source = SkinKernel::new(ShaderDialect::Hlsl)
            .precision(Precision::Half)
            .source();

        assert!(source.contains("void Armature_LinearBlendSkinning_half("));
        assert!(source.contains("half4x4 skinMatrix"));
        assert!(source.contains("half weightSum"));
        // The palette buffer itself stays full precision.
        assert!(source.contains("StructuredBuffer<float4x4> _SkinMatrices"));
    }

    #[test]
    fn function_source_composes_with_bindings() {
        let kernel = SkinKernel::new(ShaderDialect::Wgsl);
        let function = kernel.function_source();

        assert!(function.contains("struct SkinResult"));
        assert!(!function.contains("@compute"));
        assert!(!function.contains("@binding"));
        assert!(kernel.bindings_source().contains("@binding"));
    }
}
