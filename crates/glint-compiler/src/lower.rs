//! Lowering of a resolved graph into C-like per-frame statements.
//!
//! Pure nodes become scalar expressions substituted into their consumers.
//! A node is materialized as a `float` temporary instead when
//!
//! - its value needs statements (`spectrum-range`, auto `beat`,
//!   `spectrum-interpolate`), or
//! - it is a non-leaf pure node read by two or more emitted consumers.
//!
//! Temporaries land in the narrowest scope that can hold them: frame scope
//! (once, before the pixel loops) unless they depend on the pixel index.
//! Each `palette-interpolate` sink emits its keyframe table and one pixel
//! loop writing `leds[i]`. `output` emits nothing.

use glint_registry::{AUTO_TEMPO_BIN, NodeKind};
use serde::Serialize;

use crate::palette::Palette;
use crate::resolve::{ResolvedGraph, ResolvedNode};
use crate::target::TargetProfile;

const INDENT: &str = "    ";
const CENTER: &str = "glint_center";
const LAST: &str = "glint_last";

/// Counters describing one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileStats {
    /// Nodes in the graph.
    pub node_count: usize,
    /// Dependency edges in the graph.
    pub edge_count: usize,
    /// Pixel loops emitted (one per palette sink).
    pub pixel_loops: usize,
    /// Nodes substituted into their consumers.
    pub inlined: usize,
    /// Temporaries emitted before the pixel loops.
    pub frame_temporaries: usize,
    /// Temporaries emitted inside the pixel loops.
    pub pixel_temporaries: usize,
    /// Temporaries introduced only because the node has several consumers.
    pub shared: usize,
    /// Ids of nodes that feed no palette sink and were not emitted.
    pub unused: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Scope {
    Frame,
    Pixel,
}

#[derive(Debug, Clone)]
struct Value {
    expr: String,
    scope: Scope,
}

/// Statements defining a temporary, or a bare expression.
enum Lowered {
    Expr(String),
    Temp(Vec<String>),
}

struct Lowering<'a> {
    graph: &'a ResolvedGraph,
    target: &'a TargetProfile,
    consumers: Vec<usize>,
    values: Vec<Option<Value>>,
    frame: Vec<String>,
    pixel: Vec<Vec<String>>,
    uses_center: bool,
    uses_last: bool,
    stats: CompileStats,
}

/// Lowers `graph` to code. `name` goes in the header comment.
pub(crate) fn lower(
    graph: &ResolvedGraph,
    palette: &Palette,
    target: &TargetProfile,
    name: &str,
) -> (String, CompileStats) {
    let n = graph.nodes().len();
    let mut lowering = Lowering {
        graph,
        target,
        consumers: vec![0; n],
        values: vec![None; n],
        frame: Vec::new(),
        pixel: vec![Vec::new(); n],
        uses_center: false,
        uses_last: false,
        stats: CompileStats {
            node_count: n,
            edge_count: graph.view().edge_count(),
            ..CompileStats::default()
        },
    };

    let sinks: Vec<usize> = graph
        .order()
        .iter()
        .copied()
        .filter(|&i| graph.nodes()[i].kind == NodeKind::PaletteInterpolate)
        .collect();

    let mut live = vec![false; n];
    for &sink in &sinks {
        for (i, reached) in lowering.upstream_of(sink).into_iter().enumerate() {
            live[i] |= reached;
        }
    }
    // Reads by nodes that are never emitted do not count.
    for (c, node) in graph.nodes().iter().enumerate() {
        if live[c] {
            for &i in &node.inputs {
                lowering.consumers[i] += 1;
            }
        }
    }

    for &idx in graph.order() {
        let node = &graph.nodes()[idx];
        if live[idx] {
            if !node.kind.is_sink() {
                lowering.lower_node(idx);
            }
        } else if node.kind != NodeKind::Output {
            tracing::warn!(
                node = %node.id,
                kind = %node.kind,
                "node does not feed a palette sink; not emitted"
            );
            lowering.stats.unused.push(node.id.clone());
        }
    }

    let mut loops = Vec::new();
    for &sink in &sinks {
        loops.push(lowering.palette_loop(sink, palette));
    }
    lowering.stats.pixel_loops = loops.len();

    let code = lowering.assemble(name, &loops);
    (code, lowering.stats)
}

impl Lowering<'_> {
    /// Marks `root` and every node it transitively reads.
    fn upstream_of(&self, root: usize) -> Vec<bool> {
        let nodes = self.graph.nodes();
        let mut seen = vec![false; nodes.len()];
        let mut stack = vec![root];
        seen[root] = true;
        while let Some(u) = stack.pop() {
            for &v in &nodes[u].inputs {
                if !seen[v] {
                    seen[v] = true;
                    stack.push(v);
                }
            }
        }
        seen
    }

    fn input(&self, node: &ResolvedNode, slot: usize) -> &Value {
        self.values[node.inputs[slot]]
            .as_ref()
            .unwrap_or_else(|| panic!("input {slot} of '{}' lowered out of order", node.id))
    }

    fn lower_node(&mut self, idx: usize) {
        let graph = self.graph;
        let node = &graph.nodes()[idx];
        let scope = node
            .inputs
            .iter()
            .filter_map(|&i| self.values[i].as_ref().map(|v| v.scope))
            .fold(
                if node.kind.is_per_pixel() {
                    Scope::Pixel
                } else {
                    Scope::Frame
                },
                Scope::max,
            );
        let var = format!("v{idx}");

        let (lines, shared) = match self.lower_kind(node, &var) {
            Lowered::Temp(lines) => (lines, false),
            Lowered::Expr(expr) if self.consumers[idx] >= 2 && !node.inputs.is_empty() => {
                (vec![format!("float {var} = {expr};")], true)
            }
            Lowered::Expr(expr) => {
                self.stats.inlined += 1;
                self.values[idx] = Some(Value { expr, scope });
                return;
            }
        };

        tracing::debug!(node = %node.id, ?scope, shared, "materialized temporary");
        if shared {
            self.stats.shared += 1;
        }
        let mut block = vec![format!("// {} ({})", comment_text(&node.id), node.kind)];
        block.extend(lines);
        match scope {
            Scope::Frame => {
                self.stats.frame_temporaries += 1;
                self.frame.extend(block);
            }
            Scope::Pixel => {
                self.stats.pixel_temporaries += 1;
                self.pixel[idx] = block;
            }
        }
        self.values[idx] = Some(Value { expr: var, scope });
    }

    fn lower_kind(&mut self, node: &ResolvedNode, var: &str) -> Lowered {
        let t = self.target;
        let expr = match node.kind {
            NodeKind::Constant => float_lit(node.param("value")),
            NodeKind::Gradient => {
                self.uses_center = true;
                format!("(fabsf((float)i - {CENTER}) / fmaxf({CENTER}, 1.0f))")
            }
            NodeKind::PositionGradient => {
                self.uses_last = true;
                format!("((float)i / fmaxf({LAST}, 1.0f))")
            }
            NodeKind::Time => {
                let speed = node.param("speed");
                if speed == 1.0 {
                    t.time_seconds.clone()
                } else {
                    format!("({} * {})", t.time_seconds, float_lit(speed))
                }
            }
            NodeKind::Add => format!(
                "fminf({} + {}, 1.0f)",
                self.input(node, 0).expr,
                self.input(node, 1).expr
            ),
            NodeKind::Multiply => format!(
                "({} * {})",
                self.input(node, 0).expr,
                self.input(node, 1).expr
            ),
            NodeKind::Clamp => format!(
                "fmaxf({}, fminf({}, {}))",
                float_lit(node.param("min")),
                float_lit(node.param("max")),
                self.input(node, 0).expr
            ),
            NodeKind::Modulo => format!(
                "fmodf({}, {})",
                self.input(node, 0).expr,
                float_lit(node.param("divisor"))
            ),
            NodeKind::Scale => format!(
                "({} * {})",
                self.input(node, 0).expr,
                float_lit(node.param("factor"))
            ),
            NodeKind::Sin => format!(
                "(sinf({} * {} * 6.2831853f) * 0.5f + 0.5f)",
                self.input(node, 0).expr,
                float_lit(node.param("frequency"))
            ),
            NodeKind::SpectrumBin => format!("{}[{}]", t.spectrogram, int(node.param("bin"))),
            NodeKind::SpectrumRange => {
                let (lo, hi) = bin_bounds(node);
                return Lowered::Temp(vec![
                    format!("float {var} = 0.0f;"),
                    format!("for (int k = {lo}; k <= {hi}; k++) {{"),
                    format!("{INDENT}{var} += {}[k];", t.spectrogram),
                    "}".to_string(),
                    format!("{var} /= {}.0f;", hi - lo + 1),
                ]);
            }
            NodeKind::SpectrumInterpolate => {
                self.uses_last = true;
                let (lo, hi) = bin_bounds(node);
                return Lowered::Temp(vec![
                    format!("float {var};"),
                    "{".to_string(),
                    format!(
                        "{INDENT}float f = {lo}.0f + {}.0f * ((float)i / fmaxf({LAST}, 1.0f));",
                        hi - lo
                    ),
                    format!("{INDENT}int k = (int)f;"),
                    format!("{INDENT}int k1 = k < {hi} ? k + 1 : {hi};"),
                    format!("{INDENT}float t = f - (float)k;"),
                    format!(
                        "{INDENT}{var} = {s}[k] * (1.0f - t) + {s}[k1] * t;",
                        s = t.spectrogram
                    ),
                    "}".to_string(),
                ]);
            }
            NodeKind::AudioLevel => t.vu_level.clone(),
            NodeKind::Beat => {
                let bin = node.param("tempoBin");
                if bin == AUTO_TEMPO_BIN {
                    let best = format!("{var}_best");
                    return Lowered::Temp(vec![
                        format!("int {best} = 0;"),
                        format!("for (int k = 1; k < {}; k++) {{", t.num_tempi),
                        format!(
                            "{INDENT}if ({tempi}[k].magnitude > {tempi}[{best}].magnitude) {{",
                            tempi = t.tempi
                        ),
                        format!("{INDENT}{INDENT}{best} = k;"),
                        format!("{INDENT}}}"),
                        "}".to_string(),
                        format!("float {var} = {}[{best}].beat * 0.5f + 0.5f;", t.tempi),
                    ]);
                }
                format!("({}[{}].beat * 0.5f + 0.5f)", t.tempi, int(bin))
            }
            NodeKind::Chromagram => format!("{}[{}]", t.chromagram, int(node.param("pitch"))),
            NodeKind::TempoConfidence => t.tempo_confidence.clone(),
            NodeKind::PaletteInterpolate | NodeKind::Output => {
                unreachable!("sinks are not lowered as values")
            }
        };
        Lowered::Expr(expr)
    }

    /// Table and pixel loop for one palette sink.
    fn palette_loop(&mut self, sink: usize, palette: &Palette) -> Vec<String> {
        let graph = self.graph;
        let node = &graph.nodes()[sink];
        let table = format!("palette_v{sink}");
        let len = palette.len();
        let mut out = vec![
            format!("// {} ({})", comment_text(&node.id), node.kind),
            format!("static const uint8_t {table}[{len}][3] = {{"),
        ];
        for k in palette.keyframes() {
            out.push(format!("{INDENT}{{{}, {}, {}}},", k.r, k.g, k.b));
        }
        out.push("};".to_string());
        out.push(format!("for (int i = 0; i < {}; i++) {{", self.target.num_leds));

        let reached = self.upstream_of(sink);
        for &idx in graph.order() {
            if reached[idx] {
                for line in &self.pixel[idx] {
                    out.push(format!("{INDENT}{line}"));
                }
            }
        }

        match node.inputs.first() {
            Some(_) => {
                let x = &self.input(node, 0).expr;
                out.push(format!("{INDENT}float pos = fmodf({x}, 1.0f);"));
                out.push(format!("{INDENT}if (pos < 0.0f) {{"));
                out.push(format!("{INDENT}{INDENT}pos += 1.0f;"));
                out.push(format!("{INDENT}}}"));
            }
            None => {
                self.uses_center = true;
                out.push(format!(
                    "{INDENT}float pos = fabsf((float)i - {CENTER}) / fmaxf({CENTER}, 1.0f);"
                ));
            }
        }

        out.push(format!("{INDENT}float scaled = pos * {}.0f;", len - 1));
        out.push(format!("{INDENT}int lo = (int)scaled;"));
        out.push(format!("{INDENT}if (lo > {}) {{", len - 2));
        out.push(format!("{INDENT}{INDENT}lo = {};", len - 2));
        out.push(format!("{INDENT}}}"));
        out.push(format!("{INDENT}float t = scaled - (float)lo;"));

        let brightness = node.param("brightness");
        let scale = if brightness < 1.0 {
            format!(" * {}", float_lit(brightness))
        } else {
            String::new()
        };
        for (channel, c) in ["r", "g", "b"].iter().enumerate() {
            out.push(format!(
                "{INDENT}{leds}[i].{c} = (uint8_t)(({table}[lo][{channel}] + \
                 ({table}[lo + 1][{channel}] - {table}[lo][{channel}]) * t){scale});",
                leds = self.target.leds
            ));
        }
        out.push("}".to_string());
        out
    }

    fn assemble(&self, name: &str, loops: &[Vec<String>]) -> String {
        let mut code = String::new();
        let mut line = |text: &str| {
            code.push_str(text);
            code.push('\n');
        };

        line(&format!("// glint effect: {}", comment_text(name)));
        line("// generated by glint; do not edit");
        if self.uses_center {
            line(&format!(
                "const float {CENTER} = (float)({} - 1) * 0.5f;",
                self.target.num_leds
            ));
        }
        if self.uses_last {
            line(&format!(
                "const float {LAST} = (float)({} - 1);",
                self.target.num_leds
            ));
        }
        for text in &self.frame {
            line(text);
        }
        for body in loops {
            for text in body {
                line(text);
            }
        }
        code
    }
}

/// `text` with control characters and backslashes replaced by spaces, so a
/// `//` comment holding it stays on one line.
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() || c == '\\' { ' ' } else { c })
        .collect()
}

/// Clamped and ordered `(startBin, endBin)`.
fn bin_bounds(node: &ResolvedNode) -> (i64, i64) {
    let a = int(node.param("startBin"));
    let b = int(node.param("endBin"));
    (a.min(b), a.max(b))
}

fn int(value: f64) -> i64 {
    value as i64
}

/// C float literal. Negative values are parenthesized.
fn float_lit(value: f64) -> String {
    let text = if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}f")
    } else {
        format!("{value}f")
    };
    if value.is_sign_negative() {
        format!("({text})")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_literals() {
        assert_eq!(float_lit(1.0), "1.0f");
        assert_eq!(float_lit(0.25), "0.25f");
        assert_eq!(float_lit(-3.0), "(-3.0f)");
        assert_eq!(float_lit(0.0001), "0.0001f");
    }

    #[test]
    fn comment_text_stays_on_one_line() {
        assert_eq!(comment_text("bass"), "bass");
        assert_eq!(comment_text("a\nb\r\nc"), "a b  c");
        assert_eq!(comment_text("tab\there"), "tab here");
        assert_eq!(comment_text("end\\"), "end ");
    }
}
