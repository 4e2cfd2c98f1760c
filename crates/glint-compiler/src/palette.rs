//! Color palettes for the palette sink.
//!
//! A palette is an ordered list of RGB keyframes. Positions only order the
//! keyframes; the emitted table spaces them evenly and the generated code
//! indexes it with `pos * (len - 1)`.

use crate::error::CompileError;
use crate::model::EffectGraph;

/// Palette used when an effect names none.
pub const DEFAULT_PALETTE: &str = "sunset";

/// One RGB keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Position in `[0, 1]`, used for ordering.
    pub pos: f64,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Keyframe {
    const fn new(pos: f64, r: u8, g: u8, b: u8) -> Self {
        Self { pos, r, g, b }
    }
}

const BUILTIN: &[(&str, &[Keyframe])] = &[
    (
        "sunset",
        &[
            Keyframe::new(0.0, 120, 0, 0),
            Keyframe::new(0.33, 255, 80, 0),
            Keyframe::new(0.66, 255, 200, 40),
            Keyframe::new(1.0, 255, 255, 180),
        ],
    ),
    (
        "ocean",
        &[
            Keyframe::new(0.0, 0, 8, 40),
            Keyframe::new(0.5, 0, 90, 160),
            Keyframe::new(1.0, 120, 230, 255),
        ],
    ),
    (
        "lava",
        &[
            Keyframe::new(0.0, 0, 0, 0),
            Keyframe::new(0.25, 90, 0, 0),
            Keyframe::new(0.5, 200, 20, 0),
            Keyframe::new(0.75, 255, 120, 0),
            Keyframe::new(1.0, 255, 255, 255),
        ],
    ),
    (
        "forest",
        &[
            Keyframe::new(0.0, 0, 30, 0),
            Keyframe::new(0.5, 40, 140, 20),
            Keyframe::new(1.0, 200, 255, 120),
        ],
    ),
    (
        "aurora",
        &[
            Keyframe::new(0.0, 0, 255, 120),
            Keyframe::new(0.33, 0, 140, 255),
            Keyframe::new(0.66, 140, 0, 255),
            Keyframe::new(1.0, 255, 0, 160),
        ],
    ),
    (
        "rainbow",
        &[
            Keyframe::new(0.0, 255, 0, 0),
            Keyframe::new(0.17, 255, 160, 0),
            Keyframe::new(0.33, 255, 255, 0),
            Keyframe::new(0.5, 0, 255, 0),
            Keyframe::new(0.67, 0, 120, 255),
            Keyframe::new(0.83, 80, 0, 255),
            Keyframe::new(1.0, 255, 0, 200),
        ],
    ),
    (
        "mono",
        &[Keyframe::new(0.0, 0, 0, 0), Keyframe::new(1.0, 255, 255, 255)],
    ),
];

/// Names of every built-in palette.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|&(name, _)| name)
}

/// A validated palette with at least two keyframes, sorted by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    keyframes: Vec<Keyframe>,
}

impl Palette {
    /// Looks up a built-in palette.
    pub fn named(name: &str) -> Option<Self> {
        BUILTIN
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|&(_, keys)| Self {
                keyframes: keys.to_vec(),
            })
    }

    /// Builds a palette from `[pos, r, g, b]` rows.
    ///
    /// Channels must be integers in `0..=255` and positions finite. Rows are
    /// sorted by position (stable for ties).
    pub fn from_data(rows: &[[f64; 4]]) -> Result<Self, CompileError> {
        if rows.len() < 2 {
            return Err(CompileError::InvalidPalette {
                reason: format!("need at least 2 keyframes, got {}", rows.len()),
            });
        }

        let mut keyframes = Vec::with_capacity(rows.len());
        for (i, &[pos, r, g, b]) in rows.iter().enumerate() {
            if !pos.is_finite() {
                return Err(CompileError::InvalidPalette {
                    reason: format!("keyframe {i} has non-finite position {pos}"),
                });
            }
            let channel = |v: f64, name: &str| -> Result<u8, CompileError> {
                if v.fract() == 0.0 && (0.0..=255.0).contains(&v) {
                    Ok(v as u8)
                } else {
                    Err(CompileError::InvalidPalette {
                        reason: format!("keyframe {i} {name}={v} is not an integer in 0..=255"),
                    })
                }
            };
            keyframes.push(Keyframe {
                pos,
                r: channel(r, "r")?,
                g: channel(g, "g")?,
                b: channel(b, "b")?,
            });
        }
        keyframes.sort_by(|a, b| a.pos.total_cmp(&b.pos));

        Ok(Self { keyframes })
    }

    /// Resolves the palette of an effect.
    ///
    /// `palette_data` wins over `palette`; with neither, [`DEFAULT_PALETTE`].
    pub fn for_effect(graph: &EffectGraph) -> Result<Self, CompileError> {
        if let Some(rows) = &graph.palette_data {
            return Self::from_data(rows);
        }
        let name = graph.palette.as_deref().unwrap_or(DEFAULT_PALETTE);
        Self::named(name).ok_or_else(|| CompileError::UnknownPalette {
            name: name.to_string(),
        })
    }

    /// Keyframes in table order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Number of keyframes (always at least 2).
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Returns true if the palette has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        for name in builtin_names() {
            let palette = Palette::named(name).unwrap();
            assert!(palette.len() >= 2, "{name}");
            assert!(
                palette.keyframes().windows(2).all(|w| w[0].pos <= w[1].pos),
                "{name} not sorted"
            );
        }
        assert_eq!(Palette::named(DEFAULT_PALETTE).unwrap().len(), 4);
    }

    #[test]
    fn data_is_sorted_by_position() {
        let palette = Palette::from_data(&[[1.0, 255.0, 0.0, 0.0], [0.0, 0.0, 0.0, 255.0]]).unwrap();
        assert_eq!(palette.keyframes()[0].b, 255);
        assert_eq!(palette.keyframes()[1].r, 255);
    }

    #[test]
    fn data_validation() {
        assert!(Palette::from_data(&[[0.0, 0.0, 0.0, 0.0]]).is_err());
        assert!(Palette::from_data(&[[0.0, 256.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]]).is_err());
        assert!(Palette::from_data(&[[0.0, 1.5, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]]).is_err());
        assert!(Palette::from_data(&[[f64::NAN, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn data_wins_over_name() {
        let graph = EffectGraph {
            palette: Some("no-such-palette".into()),
            palette_data: Some(vec![[0.0, 1.0, 2.0, 3.0], [1.0, 4.0, 5.0, 6.0]]),
            ..EffectGraph::default()
        };
        assert_eq!(Palette::for_effect(&graph).unwrap().len(), 2);
    }

    #[test]
    fn unknown_name_fails() {
        let graph = EffectGraph::default().with_palette("plaid");
        assert_eq!(
            Palette::for_effect(&graph),
            Err(CompileError::UnknownPalette {
                name: "plaid".into()
            })
        );
    }
}
