//! Runtime configuration loaded from defaults + environment, with
//! command-line overrides applied on top.

use std::path::PathBuf;

use anyhow::anyhow;
use heart_qr::{
    ErasurePolicy, HeartMode, MaskKind, PatternKind, StyleConfig, StylePreset, parse_hex_color,
};

use super::defaults::{describe, keys};
use super::validation::validate_setting;
use super::ENV_PREFIX;

/// Runtime configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub size: u32,
    pub color: String,
    pub heart_color: String,
    pub preset: Option<StylePreset>,
    pub pattern: Option<PatternKind>,
    pub pattern_color: String,
    pub mask: Option<MaskKind>,
    pub heart_mode: Option<HeartMode>,
    pub timing_protected: bool,
    pub pattern_in_light_cells: bool,
    pub heart_shrink: f64,
    pub erasure_policy: ErasurePolicy,
    pub erasure_limit: f64,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            size: 600,
            color: "#000000".into(),
            heart_color: "#E91E63".into(),
            preset: None,
            pattern: None,
            pattern_color: "#FF69B440".into(),
            mask: None,
            heart_mode: None,
            timing_protected: false,
            pattern_in_light_cells: true,
            heart_shrink: 0.92,
            erasure_policy: ErasurePolicy::Warn,
            erasure_limit: 0.25,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    /// Load configuration from `HEART_QR_*` environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::load_with(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Load configuration through a key lookup (unprefixed keys).
    ///
    /// Missing keys fall back to their defaults; present keys are validated.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let mut config = Self::default();
        for key in keys() {
            let Some(value) = lookup(key) else {
                continue;
            };
            config
                .set(key, &value)
                .map_err(|e| anyhow!("invalid {ENV_PREFIX}{key} ({}): {e}", describe(key)))?;
        }
        Ok(config)
    }

    /// Validate and assign one setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        validate_setting(key, value).map_err(|e| format!("{key}: {e}"))?;
        match key {
            "SIZE" => self.size = value.parse().map_err(|_| "SIZE: must be an integer")?,
            "COLOR" => self.color = value.to_string(),
            "HEART_COLOR" => self.heart_color = value.to_string(),
            "PRESET" => self.preset = parse_optional(value)?,
            "PATTERN" => self.pattern = parse_optional(value)?,
            "PATTERN_COLOR" => self.pattern_color = value.to_string(),
            "MASK" => self.mask = parse_optional(value)?,
            "HEART_MODE" => self.heart_mode = parse_optional(value)?,
            "TIMING_PROTECTED" => self.timing_protected = value == "true",
            "PATTERN_IN_LIGHT_CELLS" => self.pattern_in_light_cells = value == "true",
            "HEART_SHRINK" => self.heart_shrink = parse_f64(value, 0.92),
            "ERASURE_POLICY" => self.erasure_policy = value.parse()?,
            "ERASURE_LIMIT" => self.erasure_limit = parse_f64(value, 0.25),
            "OUTPUT_DIR" => self.output_dir = PathBuf::from(value),
            _ => return Err(format!("unknown setting '{key}'")),
        }
        Ok(())
    }

    /// Build the renderer's style configuration.
    ///
    /// The preset is applied first; explicit pattern, mask and heart-mode
    /// settings override it.
    pub fn style(&self) -> Result<StyleConfig, anyhow::Error> {
        let pattern_color = parse_hex_color(&self.pattern_color)?;
        let mut style = StyleConfig::new()
            .with_colors(&self.color, &self.heart_color)?
            .with_timing_protected(self.timing_protected)
            .with_heart_shrink(self.heart_shrink)
            .with_erasure(self.erasure_policy, self.erasure_limit);
        style.pattern_color = pattern_color;

        if let Some(preset) = self.preset {
            style = preset.apply(style);
        }
        if let Some(pattern) = self.pattern {
            style = style.with_pattern(pattern, pattern_color);
        }
        if let Some(mask) = self.mask {
            style = style.with_mask(mask);
        }
        if let Some(mode) = self.heart_mode {
            style = style.with_heart_mode(mode);
        }
        Ok(style.with_pattern_in_light_modules(self.pattern_in_light_cells))
    }
}

fn parse_optional<T: std::str::FromStr<Err = String>>(value: &str) -> Result<Option<T>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some)
}

fn parse_f64(s: &str, default: f64) -> f64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
