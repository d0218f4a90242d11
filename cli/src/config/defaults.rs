//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("SIZE", "600", "Target output size in pixels (one of the size presets)"),
    ("COLOR", "#000000", "Foreground color of the QR modules"),
    ("HEART_COLOR", "#E91E63", "Accent color of modules inside the heart"),
    ("PRESET", "", "Named style preset applied before individual overrides"),
    ("PATTERN", "", "Background pattern: none, dots, stripes, grid, noise"),
    ("PATTERN_COLOR", "#FF69B440", "Background pattern color, alpha allowed"),
    ("MASK", "", "Module shape: filled-square, rounded-dot, heart-clip"),
    ("HEART_MODE", "", "Heart handling: mask, dual-color, off"),
    ("TIMING_PROTECTED", "false", "Exclude the timing lines from the heart mask"),
    ("PATTERN_IN_LIGHT_CELLS", "true", "Tint light data modules with the pattern"),
    ("HEART_SHRINK", "0.92", "Heart shrink factor; smaller covers more modules"),
    ("ERASURE_POLICY", "warn", "On too many dropped modules: ignore, warn, reject"),
    ("ERASURE_LIMIT", "0.25", "Maximum dropped fraction of unprotected modules"),
    ("OUTPUT_DIR", "output", "Directory the PNG is written to"),
];

/// A single setting definition.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
#[allow(dead_code)]
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Human-readable description of a setting key.
pub fn describe(key: &str) -> &'static str {
    DEFAULT_SETTINGS.get(key).map_or("", |d| d.description)
}

/// All setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}
