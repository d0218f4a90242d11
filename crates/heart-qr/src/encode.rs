//! QR symbol encoding.
//!
//! The encoder is a trusted oracle: it turns text into a module matrix.
//! Error correction is always level H so the heart mask has as much
//! redundancy as possible to erode.

use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::matrix::ModuleMatrix;
use crate::{RenderError, Result};

/// Produces a QR module matrix for a text payload.
pub trait SymbolEncoder {
    fn encode(&self, text: &str) -> Result<ModuleMatrix>;
}

/// Encoder backed by the `qrcode` crate, fixed to error-correction level H.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl SymbolEncoder for QrEncoder {
    fn encode(&self, text: &str) -> Result<ModuleMatrix> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
            .map_err(|e| RenderError::EncoderUnavailable(format!("QR encode error: {e}")))?;
        let width = code.width();
        let modules: Vec<bool> = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        debug!(width, len = text.len(), "Encoded QR symbol at level H");

        ModuleMatrix::from_modules(width, modules).ok_or_else(|| {
            let msg = format!("encoder returned a non-square matrix ({width})");
            RenderError::EncoderUnavailable(msg)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_square_matrix() {
        let m = QrEncoder.encode("https://example.com").unwrap();
        assert_eq!(m.size(), 29);
        // Top-left finder corner is dark, separator next to it is light.
        assert!(m.is_dark(0, 0));
        assert!(!m.is_dark(7, 7));
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let text = "x".repeat(4000);
        let err = QrEncoder.encode(&text).unwrap_err();
        assert!(matches!(err, RenderError::EncoderUnavailable(_)));
    }
}
