//! Module grid planning: pixel size of a module, quiet zone, outer padding,
//! and the mapping from grid coordinates to canvas pixels.

use serde::Serialize;
use tracing::debug;

use crate::{MIN_MODULE_SIZE, QUIET_ZONE_MODULES, RenderError, Result};

/// Axis-aligned pixel rectangle `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether pixel `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.width && py < self.y + self.height
    }
}

/// Inputs to the planner besides module count and target size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    /// Quiet-zone width in modules.
    pub quiet_zone_modules: u32,
    /// Minimum outer padding in pixels.
    pub outer_pad_min: u32,
    /// Outer padding as a fraction of the drawn symbol size.
    pub outer_pad_ratio: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            quiet_zone_modules: QUIET_ZONE_MODULES,
            outer_pad_min: 24,
            outer_pad_ratio: 0.08,
        }
    }
}

/// Canvas layout for one render.
///
/// `final_size = module_size * (n + 2 * quiet_zone) + 2 * outer_pad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridGeometry {
    /// Modules per side.
    pub n: usize,
    /// Module edge in pixels, at least [`MIN_MODULE_SIZE`].
    pub module_size: u32,
    /// Quiet-zone width in modules.
    pub quiet_zone: u32,
    /// Pixel offset of module `(0, 0)` from the canvas origin.
    pub offset: u32,
    /// White margin outside the quiet zone, in pixels.
    pub outer_pad: u32,
    /// Canvas edge in pixels.
    pub final_size: u32,
}

/// Plan the canvas for an `n`-module symbol at roughly `target_px` pixels.
///
/// Fails with [`RenderError::SizeTooSmall`] when a module would be narrower
/// than [`MIN_MODULE_SIZE`]. Pure and deterministic.
pub fn plan(n: usize, target_px: u32, opts: &PlanOptions) -> Result<GridGeometry> {
    let span = n as u64 + 2 * u64::from(opts.quiet_zone_modules);
    let module_size = u32::try_from(u64::from(target_px) / span.max(1)).unwrap_or(0);
    if module_size < MIN_MODULE_SIZE {
        return Err(RenderError::SizeTooSmall {
            target_px,
            module_count: n,
            module_size,
        });
    }

    let draw_size = module_size * span as u32;
    let ratio_pad = (f64::from(draw_size) * opts.outer_pad_ratio).floor() as u32;
    let outer_pad = opts.outer_pad_min.max(ratio_pad);
    let final_size = draw_size + 2 * outer_pad;
    let offset = outer_pad + opts.quiet_zone_modules * module_size;

    debug!(
        n,
        target_px, module_size, draw_size, outer_pad, final_size, "Planned module grid"
    );

    Ok(GridGeometry {
        n,
        module_size,
        quiet_zone: opts.quiet_zone_modules,
        offset,
        outer_pad,
        final_size,
    })
}

impl GridGeometry {
    /// Edge of the symbol including its quiet zone.
    pub fn draw_size(&self) -> u32 {
        self.module_size * (self.n as u32 + 2 * self.quiet_zone)
    }

    /// Top-left pixel of module `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        (
            self.offset + col as u32 * self.module_size,
            self.offset + row as u32 * self.module_size,
        )
    }

    /// Pixel rectangle of module `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> PixelRect {
        let (x, y) = self.cell_origin(row, col);
        PixelRect::new(x, y, self.module_size, self.module_size)
    }

    /// The data area: all `n × n` modules.
    pub fn data_rect(&self) -> PixelRect {
        let side = self.n as u32 * self.module_size;
        PixelRect::new(self.offset, self.offset, side, side)
    }

    /// The symbol footprint: data area plus quiet zone.
    pub fn symbol_rect(&self) -> PixelRect {
        let side = self.draw_size();
        PixelRect::new(self.outer_pad, self.outer_pad, side, side)
    }

    /// The four bands (top, bottom, left, right) forming the quiet-zone ring.
    pub fn quiet_zone_bands(&self) -> [PixelRect; 4] {
        let s = self.symbol_rect();
        let q = self.quiet_zone * self.module_size;
        [
            PixelRect::new(s.x, s.y, s.width, q),
            PixelRect::new(s.x, s.y + s.height - q, s.width, q),
            PixelRect::new(s.x, s.y, q, s.height),
            PixelRect::new(s.x + s.width - q, s.y, q, s.height),
        ]
    }

    /// Whether pixel `(px, py)` lies in the quiet-zone ring.
    pub fn in_quiet_zone(&self, px: u32, py: u32) -> bool {
        self.symbol_rect().contains(px, py) && !self.data_rect().contains(px, py)
    }
}
