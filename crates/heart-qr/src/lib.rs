//! Heart-shaped QR code rendering.
//!
//! Takes a QR module matrix and composites it into a raster whose data
//! modules are shaped toward a heart silhouette, while the finder patterns,
//! the optional timing lines and the quiet zone are kept intact so the
//! symbol still scans.

pub mod compose;
pub mod encode;
pub mod fill;
pub mod geometry;
pub mod heart;
pub mod matrix;
pub mod pattern;
pub mod protect;
pub mod style;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use compose::{Compositor, ErasureReport, RenderResult, Rendered};
pub use encode::{QrEncoder, SymbolEncoder};
pub use geometry::{GridGeometry, PlanOptions, plan};
pub use heart::HeartParams;
pub use matrix::ModuleMatrix;
pub use protect::{FINDER_PROTECT, ProtectionClass, classify};
pub use style::{
    ErasurePolicy, HeartMode, Look, MaskKind, PatternKind, StyleConfig, StylePreset,
    parse_hex_color,
};

/// Quiet-zone width in modules. The QR minimum is 4; the heart mask erodes
/// data modules, so the margin is doubled.
pub const QUIET_ZONE_MODULES: u32 = 8;

/// Smallest module edge, in pixels, that still renders a usable symbol.
pub const MIN_MODULE_SIZE: u32 = 2;

/// Errors that can occur while rendering a heart QR code.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR encoder unavailable: {0}")]
    EncoderUnavailable(String),

    #[error(
        "Output size {target_px}px is too small for {module_count} modules \
         (module size {module_size}px, need at least {min}px)",
        min = MIN_MODULE_SIZE
    )]
    SizeTooSmall {
        target_px: u32,
        module_count: usize,
        module_size: u32,
    },

    #[error("Heart mask drops {ratio:.3} of data modules, limit is {limit:.3}")]
    ErasureBudgetExceeded { ratio: f64, limit: f64 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Encode `text` at error-correction level H and render it with `config`.
///
/// This is the whole pipeline: encoder, planner, compositor. On error
/// nothing is returned, never a half-composited image.
pub fn render_text(text: &str, target_px: u32, config: &StyleConfig) -> Result<Rendered> {
    render_with(&QrEncoder, text, target_px, config)
}

/// Same as [`render_text`] but with a caller-supplied encoder.
pub fn render_with<E: SymbolEncoder>(
    encoder: &E,
    text: &str,
    target_px: u32,
    config: &StyleConfig,
) -> Result<Rendered> {
    let matrix = encoder.encode(text)?;
    Compositor::new(config.clone()).render(&matrix, target_px)
}
