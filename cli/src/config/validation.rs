//! Setting value validation.

use std::str::FromStr;

use heart_qr::{ErasurePolicy, HeartMode, MaskKind, PatternKind, StylePreset, parse_hex_color};

use super::SIZE_PRESETS;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SIZE" => {
            let v: u32 = value.parse().map_err(|_| "must be an integer")?;
            if !SIZE_PRESETS.contains(&v) {
                let sizes: Vec<String> = SIZE_PRESETS.iter().map(u32::to_string).collect();
                return Err(format!("must be one of {}", sizes.join(", ")));
            }
        }
        "COLOR" | "HEART_COLOR" | "PATTERN_COLOR" => {
            parse_hex_color(value).map_err(|_| "must be a hex color like #RRGGBB")?;
        }
        "PRESET" => validate_optional_enum::<StylePreset>(value)?,
        "PATTERN" => validate_optional_enum::<PatternKind>(value)?,
        "MASK" => validate_optional_enum::<MaskKind>(value)?,
        "HEART_MODE" => validate_optional_enum::<HeartMode>(value)?,
        "ERASURE_POLICY" => {
            ErasurePolicy::from_str(value)?;
        }
        "HEART_SHRINK" => validate_float_range(value, 0.5, 1.0)?,
        "ERASURE_LIMIT" => validate_float_range(value, 0.0, 1.0)?,
        "OUTPUT_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => return Err(format!("unknown setting '{key}'")),
    }
    Ok(())
}

fn validate_optional_enum<T: FromStr<Err = String>>(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    T::from_str(value).map(|_| ())
}

fn validate_float_range(value: &str, min: f64, max: f64) -> Result<(), String> {
    let v: f64 = value.parse().map_err(|_| "must be a float")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "TIMING_PROTECTED" | "PATTERN_IN_LIGHT_CELLS")
}
