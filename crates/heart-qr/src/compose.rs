//! Layered compositing of a QR module matrix into a heart-styled raster.
//!
//! Passes run in a fixed order over one canvas, each allowed to overwrite
//! the previous one:
//!
//! 1. background fill
//! 2. background pattern, kept only outside the symbol footprint
//! 3. dark modules (finder/timing cells bypass the heart test)
//!    3b. faint pattern transfer into eligible light data modules
//! 4. quiet-zone re-assertion
//! 5. finder re-assertion
//!
//! Passes 4 and 5 run unconditionally, so quiet zone and finder corners do
//! not depend on anything earlier passes did.

use image::{Rgba, RgbaImage};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fill::{clear_rect, paint_finder};
use crate::geometry::{GridGeometry, PixelRect, plan};
use crate::heart::normalize;
use crate::matrix::ModuleMatrix;
use crate::pattern::render_pattern;
use crate::protect::{
    FINDER_PATTERN_BAN, FINDER_PROTECT, ProtectionClass, classify, in_corner_block,
};
use crate::style::{BACKGROUND, ErasurePolicy, HeartMode, StyleConfig};
use crate::{RenderError, Result};

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderResult {
    pub module_count: usize,
    pub module_size: u32,
    pub final_size: u32,
}

/// How many data modules the heart mask drops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErasureReport {
    /// Dark, unprotected modules left undrawn.
    pub dropped: usize,
    /// Modules outside every protected region.
    pub unprotected: usize,
    /// `dropped / unprotected`, 0 when nothing is unprotected.
    pub ratio: f64,
}

/// A composited raster plus its summary.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbaImage,
    pub summary: RenderResult,
    pub geometry: GridGeometry,
    pub erasure: ErasureReport,
}

/// The five-pass rendering pipeline, parameterized by a [`StyleConfig`].
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    config: StyleConfig,
}

impl Compositor {
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Render `matrix` into a canvas planned for `target_px`.
    ///
    /// Planning and the erasure check happen before any pixel is written.
    pub fn render(&self, matrix: &ModuleMatrix, target_px: u32) -> Result<Rendered> {
        let cfg = &self.config;
        let n = matrix.size();
        let geometry = plan(n, target_px, &cfg.look.plan)?;
        let erasure = self.check_erasure(matrix)?;

        // 1
        let size = geometry.final_size;
        let mut canvas = RgbaImage::from_pixel(size, size, BACKGROUND);

        // 2
        let full = PixelRect::new(0, 0, size, size);
        let pattern = render_pattern(cfg.pattern, cfg.pattern_color, size, full, cfg.noise_seed);
        if let Some(ref layer) = pattern {
            copy_outside_symbol(&mut canvas, layer, &geometry);
            debug!(pattern = %cfg.pattern, "Applied background pattern");
        }

        // 3
        let drawn = self.paint_modules(&mut canvas, matrix, &geometry);
        debug!(drawn, "Painted dark modules");

        // 3b
        if let Some(ref layer) = pattern {
            if cfg.pattern_in_light_modules {
                let tinted = self.transfer_to_light_modules(&mut canvas, layer, matrix, &geometry);
                debug!(tinted, "Transferred pattern into light modules");
            }
        }

        // 4
        reassert_quiet_zone(&mut canvas, &geometry);

        // 5
        self.reassert_finders(&mut canvas, matrix, &geometry);

        let summary = RenderResult {
            module_count: n,
            module_size: geometry.module_size,
            final_size: geometry.final_size,
        };
        info!(
            final_size = summary.final_size,
            modules = n,
            module_size = summary.module_size,
            dropped = erasure.dropped,
            "Rendered heart QR"
        );

        Ok(Rendered {
            image: canvas,
            summary,
            geometry,
            erasure,
        })
    }

    /// Color for the dark module at `(row, col)`, or `None` when the heart
    /// mask drops it.
    pub fn dark_module_color(&self, row: usize, col: usize, n: usize) -> Option<Rgba<u8>> {
        let cfg = &self.config;
        if classify(row, col, n, cfg.timing_protected).is_protected() {
            return Some(cfg.foreground);
        }
        match cfg.heart_mode {
            HeartMode::Off => Some(cfg.foreground),
            HeartMode::Mask => self.in_heart(row, col, n).then_some(cfg.foreground),
            HeartMode::DualColor => Some(if self.in_heart(row, col, n) {
                cfg.accent
            } else {
                cfg.foreground
            }),
        }
    }

    fn in_heart(&self, row: usize, col: usize, n: usize) -> bool {
        let (nx, ny) = normalize(row, col, n, self.config.look.heart_shrink);
        self.config.heart.contains(nx, ny)
    }

    /// Count the data modules the heart mask would drop.
    pub fn estimate_erasure(&self, matrix: &ModuleMatrix) -> ErasureReport {
        let n = matrix.size();
        let timing = self.config.timing_protected;
        let mut dropped = 0;
        let mut unprotected = 0;
        for (row, col, dark) in matrix.cells() {
            if classify(row, col, n, timing).is_protected() {
                continue;
            }
            unprotected += 1;
            if dark && self.dark_module_color(row, col, n).is_none() {
                dropped += 1;
            }
        }
        let ratio = if unprotected == 0 {
            0.0
        } else {
            dropped as f64 / unprotected as f64
        };
        ErasureReport {
            dropped,
            unprotected,
            ratio,
        }
    }

    fn check_erasure(&self, matrix: &ModuleMatrix) -> Result<ErasureReport> {
        let report = self.estimate_erasure(matrix);
        let limit = self.config.erasure_limit;
        if report.ratio > limit {
            match self.config.erasure_policy {
                ErasurePolicy::Ignore => {}
                ErasurePolicy::Warn => warn!(
                    ratio = report.ratio,
                    limit,
                    dropped = report.dropped,
                    "Heart mask drops more modules than level H is budgeted to recover"
                ),
                ErasurePolicy::Reject => {
                    return Err(RenderError::ErasureBudgetExceeded {
                        ratio: report.ratio,
                        limit,
                    });
                }
            }
        }
        Ok(report)
    }

    fn paint_modules(
        &self,
        canvas: &mut RgbaImage,
        matrix: &ModuleMatrix,
        geometry: &GridGeometry,
    ) -> usize {
        let cfg = &self.config;
        let n = matrix.size();
        let mut drawn = 0;
        for (row, col, dark) in matrix.cells() {
            if !dark {
                continue;
            }
            let Some(color) = self.dark_module_color(row, col, n) else {
                continue;
            };
            let finder = classify(row, col, n, cfg.timing_protected) == ProtectionClass::Finder;
            cfg.mask.paint(canvas, geometry.cell_rect(row, col), color, finder, &cfg.look);
            drawn += 1;
        }
        drawn
    }

    /// Copy the pattern into light data modules away from the finder corners
    /// (and off the timing lines when those are protected).
    fn transfer_to_light_modules(
        &self,
        canvas: &mut RgbaImage,
        layer: &RgbaImage,
        matrix: &ModuleMatrix,
        geometry: &GridGeometry,
    ) -> usize {
        let n = matrix.size();
        let timing = self.config.timing_protected;
        let mut tinted = 0;
        for (row, col, dark) in matrix.cells() {
            if dark
                || in_corner_block(row, col, n, FINDER_PATTERN_BAN)
                || classify(row, col, n, timing).is_protected()
            {
                continue;
            }
            let cell = geometry.cell_rect(row, col);
            for y in cell.y..cell.y + cell.height {
                for x in cell.x..cell.x + cell.width {
                    canvas.put_pixel(x, y, *layer.get_pixel(x, y));
                }
            }
            tinted += 1;
        }
        tinted
    }

    /// Repaint every finder-protected cell from scratch: light cells back to
    /// background, dark cells as solid foreground squares.
    fn reassert_finders(
        &self,
        canvas: &mut RgbaImage,
        matrix: &ModuleMatrix,
        geometry: &GridGeometry,
    ) {
        let n = matrix.size();
        let foreground = self.config.foreground;
        for (row, col, dark) in matrix.cells() {
            if !in_corner_block(row, col, n, FINDER_PROTECT) {
                continue;
            }
            let cell = geometry.cell_rect(row, col);
            if dark {
                paint_finder(canvas, cell, foreground);
            } else {
                clear_rect(canvas, cell, BACKGROUND);
            }
        }
        debug!("Re-asserted finder corners");
    }
}

fn copy_outside_symbol(canvas: &mut RgbaImage, layer: &RgbaImage, geometry: &GridGeometry) {
    let symbol = geometry.symbol_rect();
    for (x, y, pixel) in layer.enumerate_pixels() {
        if !symbol.contains(x, y) {
            canvas.put_pixel(x, y, *pixel);
        }
    }
}

fn reassert_quiet_zone(canvas: &mut RgbaImage, geometry: &GridGeometry) {
    for band in geometry.quiet_zone_bands() {
        clear_rect(canvas, band, BACKGROUND);
    }
    debug!(quiet_zone = geometry.quiet_zone, "Re-asserted quiet zone");
}
