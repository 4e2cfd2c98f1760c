//! Symbols the generated code references in the embedding firmware.

use serde::{Deserialize, Serialize};

/// Names of the buffers and scalars owned by the device runtime.
///
/// The firmware declares these; generated code only reads the audio inputs
/// and writes `leds[i].r/g/b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// RGB pixel buffer.
    pub leds: String,
    /// Pixel count.
    pub num_leds: String,
    /// Frequency-bin magnitudes.
    pub spectrogram: String,
    /// Pitch-class energies.
    pub chromagram: String,
    /// Tempo candidates with `.beat` and `.magnitude` fields.
    pub tempi: String,
    /// Tempo candidate count.
    pub num_tempi: String,
    /// Overall level.
    pub vu_level: String,
    /// Tempo estimate confidence.
    pub tempo_confidence: String,
    /// Seconds since start.
    pub time_seconds: String,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            leds: "leds".into(),
            num_leds: "NUM_LEDS".into(),
            spectrogram: "spectrogram".into(),
            chromagram: "chromagram".into(),
            tempi: "tempi".into(),
            num_tempi: "NUM_TEMPI".into(),
            vu_level: "vu_level".into(),
            tempo_confidence: "tempo_confidence".into(),
            time_seconds: "time_seconds".into(),
        }
    }
}

impl TargetProfile {
    /// All symbols as `(field, value)` pairs.
    pub fn symbols(&self) -> [(&'static str, &str); 9] {
        [
            ("leds", self.leds.as_str()),
            ("num_leds", self.num_leds.as_str()),
            ("spectrogram", self.spectrogram.as_str()),
            ("chromagram", self.chromagram.as_str()),
            ("tempi", self.tempi.as_str()),
            ("num_tempi", self.num_tempi.as_str()),
            ("vu_level", self.vu_level.as_str()),
            ("tempo_confidence", self.tempo_confidence.as_str()),
            ("time_seconds", self.time_seconds.as_str()),
        ]
    }

    /// First symbol that is not a C identifier, as `(field, value)`.
    pub fn invalid_symbol(&self) -> Option<(&'static str, &str)> {
        self.symbols()
            .into_iter()
            .find(|&(_, name)| !is_identifier(name))
    }
}

/// Returns true if `s` is a C identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
