//! Style selection: colors, fill shapes, background patterns, heart mode,
//! and the tuning knobs shared by every pass of the compositor.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::geometry::PlanOptions;
use crate::heart::HeartParams;
use crate::{RenderError, Result};

/// Canvas background. Quiet zone and outer padding are always this color.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    let invalid = || RenderError::InvalidColor(s.to_string());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16).ok_or_else(invalid)? as u8;
                rgb[i] = v * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => Err(invalid()),
    }
}

macro_rules! named_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Kebab-case name used in configuration.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    other => {
                        let names: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        Err(format!("unknown {} '{other}' (expected one of: {})",
                            stringify!($name), names.join(", ")))
                    }
                }
            }
        }
    };
}

/// Background texture kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    #[default]
    None,
    Dots,
    Stripes,
    Grid,
    Noise,
}

named_enum!(PatternKind {
    None => "none",
    Dots => "dots",
    Stripes => "stripes",
    Grid => "grid",
    Noise => "noise",
});

/// How an accepted dark module is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskKind {
    /// Rounded square sized by the dot scale.
    #[default]
    FilledSquare,
    /// Centered circle.
    RoundedDot,
    /// Full-cell square, so the heart edge reads as a hard clip.
    HeartClip,
}

named_enum!(MaskKind {
    FilledSquare => "filled-square",
    RoundedDot => "rounded-dot",
    HeartClip => "heart-clip",
});

/// How the heart silhouette affects unprotected dark modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeartMode {
    /// Draw only modules inside the heart.
    Mask,
    /// Inside the heart in the accent color, elsewhere in the foreground.
    #[default]
    DualColor,
    /// Ignore the heart: a plain QR code.
    Off,
}

named_enum!(HeartMode {
    Mask => "mask",
    DualColor => "dual-color",
    Off => "off",
});

/// What to do when the heart mask drops too many data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErasurePolicy {
    Ignore,
    #[default]
    Warn,
    Reject,
}

named_enum!(ErasurePolicy {
    Ignore => "ignore",
    Warn => "warn",
    Reject => "reject",
});

/// Shape tuning shared by the fill styles and the planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    /// Painted fraction of a module edge (0.72..=0.90 looks like dots).
    pub dot_scale: f64,
    /// Corner radius as a fraction of the painted edge (0..=0.5).
    pub roundness: f64,
    /// Corner radius cap for finder cells.
    pub finder_roundness: f64,
    /// Heart shrink factor `sf`; smaller makes the heart cover more modules.
    pub heart_shrink: f64,
    /// Planner padding knobs.
    pub plan: PlanOptions,
}

impl Default for Look {
    fn default() -> Self {
        Self {
            dot_scale: 0.82,
            roundness: 0.40,
            finder_roundness: 0.18,
            heart_shrink: 0.92,
            plan: PlanOptions::default(),
        }
    }
}

impl Look {
    /// Painted edge fraction for finder cells, a little larger than data
    /// modules so detection is easier.
    pub fn finder_scale(&self) -> f64 {
        (self.dot_scale + 0.08).min(0.92)
    }
}

/// Full style configuration for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub foreground: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub pattern: PatternKind,
    pub pattern_color: Rgba<u8>,
    pub mask: MaskKind,
    pub heart_mode: HeartMode,
    pub heart: HeartParams,
    pub look: Look,
    pub timing_protected: bool,
    /// Transfer the pattern faintly into light data modules.
    pub pattern_in_light_modules: bool,
    /// Seed for the noise pattern.
    pub noise_seed: u64,
    pub erasure_policy: ErasurePolicy,
    /// Maximum dropped fraction of unprotected modules.
    pub erasure_limit: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            foreground: Rgba([0, 0, 0, 255]),
            accent: Rgba([0xE9, 0x1E, 0x63, 255]),
            pattern: PatternKind::None,
            pattern_color: Rgba([0xFF, 0x69, 0xB4, 0x40]),
            mask: MaskKind::FilledSquare,
            heart_mode: HeartMode::DualColor,
            heart: HeartParams::default(),
            look: Look::default(),
            timing_protected: false,
            pattern_in_light_modules: true,
            noise_seed: 0x4845_4152_5451_52,
            erasure_policy: ErasurePolicy::Warn,
            erasure_limit: 0.25,
        }
    }
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: foreground and accent from hex strings.
    pub fn with_colors(mut self, foreground: &str, accent: &str) -> Result<Self> {
        self.foreground = parse_hex_color(foreground)?;
        self.accent = parse_hex_color(accent)?;
        Ok(self)
    }

    /// Builder: background pattern and its color.
    pub fn with_pattern(mut self, kind: PatternKind, color: Rgba<u8>) -> Self {
        self.pattern = kind;
        self.pattern_color = color;
        self
    }

    /// Builder: module fill shape.
    pub fn with_mask(mut self, mask: MaskKind) -> Self {
        self.mask = mask;
        self
    }

    /// Builder: heart mode.
    pub fn with_heart_mode(mut self, mode: HeartMode) -> Self {
        self.heart_mode = mode;
        self
    }

    /// Builder: heart shape parameters.
    pub fn with_heart(mut self, heart: HeartParams) -> Self {
        self.heart = heart;
        self
    }

    /// Builder: heart shrink factor.
    pub fn with_heart_shrink(mut self, shrink: f64) -> Self {
        self.look.heart_shrink = shrink;
        self
    }

    /// Builder: timing-line protection.
    pub fn with_timing_protected(mut self, val: bool) -> Self {
        self.timing_protected = val;
        self
    }

    /// Builder: pattern transfer into light data modules.
    pub fn with_pattern_in_light_modules(mut self, val: bool) -> Self {
        self.pattern_in_light_modules = val;
        self
    }

    /// Builder: noise seed.
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Builder: erasure policy and limit.
    ///
    /// # Panics
    /// Panics if `limit` is not in `0.0..=1.0`.
    pub fn with_erasure(mut self, policy: ErasurePolicy, limit: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&limit),
            "Erasure limit must be between 0.0 and 1.0, got {limit}"
        );
        self.erasure_policy = policy;
        self.erasure_limit = limit;
        self
    }
}

/// Named parameterizations of the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    /// Heart mask, rounded squares, no texture.
    Plain,
    /// Two-tone heart over a dotted background that also tints light cells.
    #[default]
    Patterned,
    /// Two-tone heart drawn with round dots.
    DotOutline,
    /// Heart mask drawn with round dots.
    RoundedDot,
    /// Heart mask with full-cell squares for a crisp clipped edge.
    HeartClip,
    /// Heart mask with a smaller shrink factor and a looser threshold.
    HeartStrong,
}

named_enum!(StylePreset {
    Plain => "plain",
    Patterned => "patterned",
    DotOutline => "dot-outline",
    RoundedDot => "rounded-dot",
    HeartClip => "heart-clip",
    HeartStrong => "heart-strong",
});

impl StylePreset {
    /// Apply this preset's selections on top of `base`, keeping its colors.
    pub fn apply(self, base: StyleConfig) -> StyleConfig {
        match self {
            StylePreset::Plain => base
                .with_heart_mode(HeartMode::Mask)
                .with_mask(MaskKind::FilledSquare),
            StylePreset::Patterned => {
                let color = base.pattern_color;
                base.with_heart_mode(HeartMode::DualColor)
                    .with_mask(MaskKind::FilledSquare)
                    .with_pattern(PatternKind::Dots, color)
                    .with_pattern_in_light_modules(true)
            }
            StylePreset::DotOutline => base
                .with_heart_mode(HeartMode::DualColor)
                .with_mask(MaskKind::RoundedDot),
            StylePreset::RoundedDot => base
                .with_heart_mode(HeartMode::Mask)
                .with_mask(MaskKind::RoundedDot),
            StylePreset::HeartClip => base
                .with_heart_mode(HeartMode::Mask)
                .with_mask(MaskKind::HeartClip),
            StylePreset::HeartStrong => {
                let heart = base.heart.with_expand_threshold(0.10);
                base.with_heart_mode(HeartMode::Mask)
                    .with_mask(MaskKind::FilledSquare)
                    .with_heart(heart)
                    .with_heart_shrink(0.85)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(parse_hex_color("#000000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_hex_color("ff69b4").unwrap(), Rgba([255, 105, 180, 255]));
        assert_eq!(parse_hex_color("#f0a").unwrap(), Rgba([255, 0, 170, 255]));
        assert_eq!(
            parse_hex_color("#11223344").unwrap(),
            Rgba([0x11, 0x22, 0x33, 0x44])
        );
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        for bad in ["", "#12", "#12345", "#gggggg", "#ééé", "red"] {
            assert!(
                matches!(parse_hex_color(bad), Err(RenderError::InvalidColor(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn enum_names_round_trip() {
        for kind in PatternKind::ALL {
            assert_eq!(kind.as_str().parse::<PatternKind>().unwrap(), *kind);
        }
        assert_eq!("Heart-Clip".parse::<MaskKind>().unwrap(), MaskKind::HeartClip);
        assert!("hexagon".parse::<MaskKind>().unwrap_err().contains("filled-square"));
    }

    #[test]
    fn finder_scale_is_capped() {
        let look = Look::default();
        assert!((look.finder_scale() - 0.90).abs() < 1e-12);
        let big = Look {
            dot_scale: 0.9,
            ..Look::default()
        };
        assert!((big.finder_scale() - 0.92).abs() < 1e-12);
    }

    #[test]
    fn presets_keep_colors() {
        let base = StyleConfig::new().with_colors("#112233", "#445566").unwrap();
        for preset in StylePreset::ALL {
            let cfg = preset.apply(base.clone());
            assert_eq!(cfg.foreground, base.foreground);
            assert_eq!(cfg.accent, base.accent);
        }
        let strong = StylePreset::HeartStrong.apply(base);
        assert!(strong.look.heart_shrink < Look::default().heart_shrink);
        assert_eq!(strong.heart_mode, HeartMode::Mask);
    }

    #[test]
    #[should_panic(expected = "Erasure limit must be between 0.0 and 1.0")]
    fn invalid_erasure_limit() {
        StyleConfig::new().with_erasure(ErasurePolicy::Reject, 1.5);
    }
}
