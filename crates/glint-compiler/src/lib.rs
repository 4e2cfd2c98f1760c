//! Glint Compiler - lowers node/wire effect graphs to per-frame LED code.
//!
//! The pipeline has three stages:
//!
//! 1. **Resolve** ([`resolve`]): ids become indices, kinds and parameters are
//!    checked against [`glint_registry`], and a CSR view of the wires is
//!    ordered with [`glint_graph::Graph::topo_sort`]. Cycles fail here.
//! 2. **Palette** ([`Palette::for_effect`]): `palette_data` or a built-in name.
//! 3. **Lower**: pure nodes are inlined as expressions; statement-bearing and
//!    shared nodes become temporaries; each palette sink emits a pixel loop.
//!
//! Compilation is all-or-nothing and deterministic: the same input always
//! yields byte-identical code.
//!
//! # Example
//!
//! ```rust
//! use glint_compiler::{EffectGraph, NodeSpec, compile};
//!
//! let effect = EffectGraph::default()
//!     .node(NodeSpec::new("bass", "spectrum-bin").param("bin", 2.0))
//!     .node(NodeSpec::new("paint", "palette-interpolate"))
//!     .wire("bass", "paint");
//!
//! let compiled = compile(&effect)?;
//! assert!(compiled.code.contains("fmodf(spectrogram[2], 1.0f)"));
//! # Ok::<(), glint_compiler::CompileError>(())
//! ```

mod error;
mod lower;
mod model;
mod palette;
mod resolve;
mod target;

pub use error::CompileError;
pub use lower::CompileStats;
pub use model::{EffectGraph, NodeSpec, ParamValue, WireSpec};
pub use palette::{DEFAULT_PALETTE, Keyframe, Palette, builtin_names};
pub use resolve::{ResolvedGraph, ResolvedNode, resolve};
pub use target::{TargetProfile, is_identifier};

use serde::Serialize;

/// Name used when an effect has none.
const UNTITLED: &str = "untitled";

/// Result of a successful compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledEffect {
    /// Effect name.
    pub name: String,
    /// Generated statements, to be embedded in the firmware's render function.
    pub code: String,
    /// Lowering counters.
    pub stats: CompileStats,
}

/// Compiles effects against a target profile.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    target: TargetProfile,
}

impl Compiler {
    /// Creates a compiler for `target`.
    pub fn new(target: TargetProfile) -> Self {
        Self { target }
    }

    /// The target profile in use.
    pub fn target(&self) -> &TargetProfile {
        &self.target
    }

    /// Validates and lowers `effect`.
    pub fn compile(&self, effect: &EffectGraph) -> Result<CompiledEffect, CompileError> {
        let resolved = resolve(effect)?;
        self.compile_resolved(effect, &resolved)
    }

    /// Lowers an effect that was already resolved.
    ///
    /// `resolved` must come from `resolve(effect)`.
    pub fn compile_resolved(
        &self,
        effect: &EffectGraph,
        resolved: &ResolvedGraph,
    ) -> Result<CompiledEffect, CompileError> {
        let palette = Palette::for_effect(effect)?;
        let name = effect.name.as_deref().unwrap_or(UNTITLED);
        let (code, stats) = lower::lower(resolved, &palette, &self.target, name);

        tracing::debug!(
            effect = name,
            lines = code.lines().count(),
            inlined = stats.inlined,
            temporaries = stats.frame_temporaries + stats.pixel_temporaries,
            "compiled effect"
        );

        Ok(CompiledEffect {
            name: name.to_string(),
            code,
            stats,
        })
    }

    /// Parses and compiles effect JSON.
    pub fn compile_json(&self, json: &str) -> Result<CompiledEffect, CompileError> {
        self.compile(&EffectGraph::from_json(json)?)
    }
}

/// Compiles `effect` with the default [`TargetProfile`].
pub fn compile(effect: &EffectGraph) -> Result<CompiledEffect, CompileError> {
    Compiler::default().compile(effect)
}

/// Parses and compiles effect JSON with the default [`TargetProfile`].
pub fn compile_json(json: &str) -> Result<CompiledEffect, CompileError> {
    Compiler::default().compile_json(json)
}
