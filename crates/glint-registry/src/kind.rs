//! The closed set of node kinds and their static contracts.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::param::ParamSpec;

/// Number of frequency bins in the spectrogram array.
pub const NUM_FREQS: usize = 64;

/// Number of pitch classes in the chromagram array.
pub const NUM_CHROMA: usize = 12;

/// Number of tempo candidates in the tempi array.
pub const NUM_TEMPI: usize = 96;

const LAST_FREQ: f64 = (NUM_FREQS - 1) as f64;
const LAST_CHROMA: f64 = (NUM_CHROMA - 1) as f64;
const LAST_TEMPO: f64 = (NUM_TEMPI - 1) as f64;

/// Sentinel `tempoBin` selecting runtime auto-detection.
pub const AUTO_TEMPO_BIN: f64 = -1.0;

/// Role of a node kind in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeCategory {
    /// No inputs; produces a value from constants, position or time.
    Generator,
    /// Pure function of its inputs.
    Combinator,
    /// No inputs; reads audio-analysis arrays supplied by the device.
    AudioReactive,
    /// Terminal node that owns the output buffer.
    Sink,
}

impl NodeCategory {
    /// All categories in display order.
    pub const ALL: [NodeCategory; 4] = [
        NodeCategory::Generator,
        NodeCategory::Combinator,
        NodeCategory::AudioReactive,
        NodeCategory::Sink,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeCategory::Generator => "Generator",
            NodeCategory::Combinator => "Combinator",
            NodeCategory::AudioReactive => "Audio-Reactive",
            NodeCategory::Sink => "Sink",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            NodeCategory::Generator => "Constants, spatial gradients and time sources",
            NodeCategory::Combinator => "Arithmetic and shaping functions of upstream values",
            NodeCategory::AudioReactive => "Spectrum, beat, chroma and level readouts",
            NodeCategory::Sink => "Nodes that write the LED buffer",
        }
    }
}

/// A node `type` string that names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind '{0}'")]
pub struct UnknownKind(pub String);

/// Node kinds understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Fixed scalar.
    Constant,
    /// Center-origin distance, 0 at the middle of the strip and 1 at the edges.
    Gradient,
    /// Linear position `i / (NUM_LEDS - 1)`.
    PositionGradient,
    /// Seconds since start scaled by `speed`.
    Time,
    /// Saturating sum of two inputs.
    Add,
    /// Product of two inputs.
    Multiply,
    /// Clamp into `[min, max]`.
    Clamp,
    /// Floating-point remainder by `divisor`.
    Modulo,
    /// Multiply by `factor`.
    Scale,
    /// Sine remapped to `[0, 1]`.
    Sin,
    /// One spectrogram bin.
    SpectrumBin,
    /// Mean over an inclusive bin range.
    SpectrumRange,
    /// Spectrum stretched across the strip.
    SpectrumInterpolate,
    /// Overall VU level.
    AudioLevel,
    /// Beat phase of a tempo candidate.
    Beat,
    /// One pitch class.
    Chromagram,
    /// Confidence of the tempo estimate.
    TempoConfidence,
    /// Palette lookup written to the LED buffer.
    PaletteInterpolate,
    /// Terminal passthrough; emits nothing.
    Output,
}

const NO_PARAMS: &[ParamSpec] = &[];
const CONSTANT: &[ParamSpec] = &[ParamSpec::float("value", -1000.0, 1000.0, 0.0).required()];
const TIME: &[ParamSpec] = &[ParamSpec::float("speed", -100.0, 100.0, 1.0)];
const CLAMP: &[ParamSpec] = &[
    ParamSpec::float("min", -1000.0, 1000.0, 0.0),
    ParamSpec::float("max", -1000.0, 1000.0, 1.0),
];
const MODULO: &[ParamSpec] = &[ParamSpec::float("divisor", 0.0001, 1000.0, 1.0)];
const SCALE: &[ParamSpec] = &[ParamSpec::float("factor", -1000.0, 1000.0, 1.0)];
const SIN: &[ParamSpec] = &[ParamSpec::float("frequency", 0.0, 64.0, 1.0)];
const SPECTRUM_BIN: &[ParamSpec] = &[ParamSpec::int("bin", 0.0, LAST_FREQ, 0.0).required()];
const BIN_RANGE: &[ParamSpec] = &[
    ParamSpec::int("startBin", 0.0, LAST_FREQ, 0.0).clamped(),
    ParamSpec::int("endBin", 0.0, LAST_FREQ, LAST_FREQ).clamped(),
];
const BEAT: &[ParamSpec] = &[ParamSpec::int("tempoBin", AUTO_TEMPO_BIN, LAST_TEMPO, AUTO_TEMPO_BIN)];
const CHROMAGRAM: &[ParamSpec] = &[ParamSpec::int("pitch", 0.0, LAST_CHROMA, 0.0).required()];
const PALETTE: &[ParamSpec] = &[ParamSpec::float("brightness", 0.0, 1.0, 1.0)];

impl NodeKind {
    /// Every kind, in catalog order.
    pub const ALL: [NodeKind; 19] = [
        NodeKind::Constant,
        NodeKind::Gradient,
        NodeKind::PositionGradient,
        NodeKind::Time,
        NodeKind::Add,
        NodeKind::Multiply,
        NodeKind::Clamp,
        NodeKind::Modulo,
        NodeKind::Scale,
        NodeKind::Sin,
        NodeKind::SpectrumBin,
        NodeKind::SpectrumRange,
        NodeKind::SpectrumInterpolate,
        NodeKind::AudioLevel,
        NodeKind::Beat,
        NodeKind::Chromagram,
        NodeKind::TempoConfidence,
        NodeKind::PaletteInterpolate,
        NodeKind::Output,
    ];

    /// The `type` string used in node JSON and as the cost-model key.
    pub const fn id(&self) -> &'static str {
        match self {
            NodeKind::Constant => "constant",
            NodeKind::Gradient => "gradient",
            NodeKind::PositionGradient => "position-gradient",
            NodeKind::Time => "time",
            NodeKind::Add => "add",
            NodeKind::Multiply => "multiply",
            NodeKind::Clamp => "clamp",
            NodeKind::Modulo => "modulo",
            NodeKind::Scale => "scale",
            NodeKind::Sin => "sin",
            NodeKind::SpectrumBin => "spectrum-bin",
            NodeKind::SpectrumRange => "spectrum-range",
            NodeKind::SpectrumInterpolate => "spectrum-interpolate",
            NodeKind::AudioLevel => "audio-level",
            NodeKind::Beat => "beat",
            NodeKind::Chromagram => "chromagram",
            NodeKind::TempoConfidence => "tempo-confidence",
            NodeKind::PaletteInterpolate => "palette-interpolate",
            NodeKind::Output => "output",
        }
    }

    /// Looks up a kind by its `type` string.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Constant => "Constant",
            NodeKind::Gradient => "Center Gradient",
            NodeKind::PositionGradient => "Position Gradient",
            NodeKind::Time => "Time",
            NodeKind::Add => "Add",
            NodeKind::Multiply => "Multiply",
            NodeKind::Clamp => "Clamp",
            NodeKind::Modulo => "Modulo",
            NodeKind::Scale => "Scale",
            NodeKind::Sin => "Sine",
            NodeKind::SpectrumBin => "Spectrum Bin",
            NodeKind::SpectrumRange => "Spectrum Range",
            NodeKind::SpectrumInterpolate => "Spectrum Interpolate",
            NodeKind::AudioLevel => "Audio Level",
            NodeKind::Beat => "Beat",
            NodeKind::Chromagram => "Chromagram",
            NodeKind::TempoConfidence => "Tempo Confidence",
            NodeKind::PaletteInterpolate => "Palette Interpolate",
            NodeKind::Output => "Output",
        }
    }

    /// One-line description for catalogs and CLI listings.
    pub const fn description(&self) -> &'static str {
        match self {
            NodeKind::Constant => "Fixed scalar value",
            NodeKind::Gradient => "Distance from the strip center, 0 in the middle and 1 at the edges",
            NodeKind::PositionGradient => "Linear ramp from 0 at the first LED to 1 at the last",
            NodeKind::Time => "Elapsed seconds multiplied by speed",
            NodeKind::Add => "Sum of two inputs, saturated at 1",
            NodeKind::Multiply => "Product of two inputs",
            NodeKind::Clamp => "Limits the input to [min, max]",
            NodeKind::Modulo => "Floating-point remainder of the input by divisor",
            NodeKind::Scale => "Input multiplied by factor",
            NodeKind::Sin => "Sine of the input remapped to [0, 1]",
            NodeKind::SpectrumBin => "Magnitude of one frequency bin",
            NodeKind::SpectrumRange => "Mean magnitude over an inclusive bin range",
            NodeKind::SpectrumInterpolate => "Bin range stretched across the strip",
            NodeKind::AudioLevel => "Overall VU level",
            NodeKind::Beat => "Beat phase of a tempo candidate, auto-detected when tempoBin is -1",
            NodeKind::Chromagram => "Energy of one pitch class",
            NodeKind::TempoConfidence => "Confidence of the current tempo estimate",
            NodeKind::PaletteInterpolate => "Maps a position to a palette color and writes every LED",
            NodeKind::Output => "Terminal passthrough; the palette sink already writes the buffer",
        }
    }

    /// Category of the kind.
    pub const fn category(&self) -> NodeCategory {
        match self {
            NodeKind::Constant | NodeKind::Gradient | NodeKind::PositionGradient | NodeKind::Time => {
                NodeCategory::Generator
            }
            NodeKind::Add
            | NodeKind::Multiply
            | NodeKind::Clamp
            | NodeKind::Modulo
            | NodeKind::Scale
            | NodeKind::Sin => NodeCategory::Combinator,
            NodeKind::SpectrumBin
            | NodeKind::SpectrumRange
            | NodeKind::SpectrumInterpolate
            | NodeKind::AudioLevel
            | NodeKind::Beat
            | NodeKind::Chromagram
            | NodeKind::TempoConfidence => NodeCategory::AudioReactive,
            NodeKind::PaletteInterpolate | NodeKind::Output => NodeCategory::Sink,
        }
    }

    /// Fewest inputs the kind accepts.
    pub const fn min_inputs(&self) -> usize {
        match self {
            NodeKind::Add | NodeKind::Multiply => 2,
            NodeKind::Clamp | NodeKind::Modulo | NodeKind::Scale | NodeKind::Sin => 1,
            _ => 0,
        }
    }

    /// Most inputs the kind accepts.
    pub const fn max_inputs(&self) -> usize {
        match self {
            NodeKind::Add | NodeKind::Multiply => 2,
            NodeKind::Clamp
            | NodeKind::Modulo
            | NodeKind::Scale
            | NodeKind::Sin
            | NodeKind::PaletteInterpolate
            | NodeKind::Output => 1,
            _ => 0,
        }
    }

    /// Parameter schema in declaration order.
    pub const fn params(&self) -> &'static [ParamSpec] {
        match self {
            NodeKind::Constant => CONSTANT,
            NodeKind::Time => TIME,
            NodeKind::Clamp => CLAMP,
            NodeKind::Modulo => MODULO,
            NodeKind::Scale => SCALE,
            NodeKind::Sin => SIN,
            NodeKind::SpectrumBin => SPECTRUM_BIN,
            NodeKind::SpectrumRange | NodeKind::SpectrumInterpolate => BIN_RANGE,
            NodeKind::Beat => BEAT,
            NodeKind::Chromagram => CHROMAGRAM,
            NodeKind::PaletteInterpolate => PALETTE,
            _ => NO_PARAMS,
        }
    }

    /// Looks up one parameter of the kind by name.
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params().iter().find(|p| p.name == name)
    }

    /// Returns true for sinks.
    pub const fn is_sink(&self) -> bool {
        matches!(self.category(), NodeCategory::Sink)
    }

    /// Returns true if lowering the kind writes the output buffer.
    ///
    /// Every other kind lowers to a side-effect-free expression.
    pub const fn has_side_effect(&self) -> bool {
        matches!(self, NodeKind::PaletteInterpolate)
    }

    /// Returns true if the value differs per pixel rather than per frame.
    pub const fn is_per_pixel(&self) -> bool {
        matches!(
            self,
            NodeKind::Gradient | NodeKind::PositionGradient | NodeKind::SpectrumInterpolate
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_id(kind.id()), Some(kind));
            assert_eq!(kind.to_string().parse::<NodeKind>().unwrap(), kind);
        }
        assert_eq!(
            "laser".parse::<NodeKind>(),
            Err(UnknownKind("laser".to_string()))
        );
    }

    #[test]
    fn arity_table() {
        assert_eq!((NodeKind::Add.min_inputs(), NodeKind::Add.max_inputs()), (2, 2));
        assert_eq!((NodeKind::Clamp.min_inputs(), NodeKind::Clamp.max_inputs()), (1, 1));
        assert_eq!(
            (
                NodeKind::PaletteInterpolate.min_inputs(),
                NodeKind::PaletteInterpolate.max_inputs()
            ),
            (0, 1)
        );
        for kind in NodeKind::ALL {
            if matches!(
                kind.category(),
                NodeCategory::Generator | NodeCategory::AudioReactive
            ) {
                assert_eq!(kind.max_inputs(), 0, "{kind} must take no inputs");
            }
        }
    }

    #[test]
    fn only_palette_has_side_effect() {
        let effectful: Vec<_> = NodeKind::ALL
            .into_iter()
            .filter(|k| k.has_side_effect())
            .collect();
        assert_eq!(effectful, vec![NodeKind::PaletteInterpolate]);
        assert!(NodeKind::Output.is_sink());
    }

    #[test]
    fn audio_ranges_follow_array_sizes() {
        let bin = NodeKind::SpectrumBin.param("bin").unwrap();
        assert_eq!(bin.max, 63.0);
        assert!(bin.is_required());
        assert_eq!(NodeKind::Chromagram.param("pitch").unwrap().max, 11.0);
        let tempo = NodeKind::Beat.param("tempoBin").unwrap();
        assert_eq!((tempo.min, tempo.max, tempo.default), (-1.0, 95.0, Some(-1.0)));
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NodeKind::PaletteInterpolate).unwrap(),
            "\"palette-interpolate\""
        );
        assert_eq!(
            serde_json::to_string(&NodeCategory::AudioReactive).unwrap(),
            "\"audio-reactive\""
        );
    }
}
