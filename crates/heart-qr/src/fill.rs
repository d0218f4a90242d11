//! Per-module fill styles.
//!
//! Every painter estimates per-pixel coverage on a small supersampling grid
//! and never touches pixels outside the module cell it was given, so cells
//! can be repainted independently.

use image::{Rgba, RgbaImage};

use crate::geometry::PixelRect;
use crate::style::{BACKGROUND, Look, MaskKind};

impl MaskKind {
    /// Paint one accepted dark module into `cell`.
    ///
    /// Finder cells get tighter corners (and a larger dot) to help detection.
    pub fn paint(
        self,
        surface: &mut RgbaImage,
        cell: PixelRect,
        color: Rgba<u8>,
        finder: bool,
        look: &Look,
    ) {
        let ms = f64::from(cell.width);
        match self {
            MaskKind::FilledSquare => {
                let s = ms * look.dot_scale;
                let roundness = if finder {
                    look.finder_roundness.min(look.roundness)
                } else {
                    look.roundness
                };
                fill_centered_rounded_square(surface, cell, s, s * roundness, color);
            }
            MaskKind::RoundedDot => {
                let ratio = if finder { look.finder_scale() } else { look.dot_scale };
                let (cx, cy) = cell_center(cell);
                fill_circle(surface, cell, cx, cy, ms * ratio / 2.0, color);
            }
            MaskKind::HeartClip => {
                fill_rounded_rect(surface, cell, cell_bounds(cell), 0.0, color);
            }
        }
    }
}

/// Paint a finder cell the way the final re-assertion pass does: a solid,
/// square-cornered fill of the whole cell.
///
/// Neighbouring dark finder cells must touch, otherwise the 7×7 ring and
/// the 3×3 center break into separate squares and lose the 1:1:3:1:1 run
/// lengths scanners search for.
pub fn paint_finder(surface: &mut RgbaImage, cell: PixelRect, color: Rgba<u8>) {
    clear_rect(surface, cell, BACKGROUND);
    fill_rounded_rect(surface, cell, cell_bounds(cell), 0.0, color);
}

/// Overwrite every pixel of `rect` (clipped to the surface) with `color`.
pub fn clear_rect(surface: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>) {
    let x_end = (rect.x + rect.width).min(surface.width());
    let y_end = (rect.y + rect.height).min(surface.height());
    for y in rect.y..y_end {
        for x in rect.x..x_end {
            surface.put_pixel(x, y, color);
        }
    }
}

/// Alpha-composite `color` over the pixel at `(x, y)`.
pub fn blend_onto(surface: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let alpha = f32::from(color[3]) / 255.0;
    if alpha > 0.99 {
        surface.put_pixel(x, y, color);
    } else if alpha > 0.0 {
        let bg = *surface.get_pixel(x, y);
        surface.put_pixel(x, y, blend_pixel(&bg, &color, alpha));
    }
}

/// `color` with its alpha scaled by `coverage` (0..=1).
pub(crate) fn with_coverage(color: Rgba<u8>, coverage: f64) -> Rgba<u8> {
    let alpha = (f64::from(color[3]) * coverage.clamp(0.0, 1.0)).round() as u8;
    Rgba([color[0], color[1], color[2], alpha])
}

/// Fraction of pixel `(px, py)` covered by the shape described by `inside`.
pub(crate) fn coverage(px: u32, py: u32, inside: &impl Fn(f64, f64) -> bool) -> f64 {
    let step = 1.0 / f64::from(SUBSAMPLES);
    let mut hits = 0u32;
    for sy in 0..SUBSAMPLES {
        for sx in 0..SUBSAMPLES {
            let x = f64::from(px) + (f64::from(sx) + 0.5) * step;
            let y = f64::from(py) + (f64::from(sy) + 0.5) * step;
            if inside(x, y) {
                hits += 1;
            }
        }
    }
    f64::from(hits) / f64::from(SUBSAMPLES * SUBSAMPLES)
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    let mix = |i: usize| (f32::from(fg[i]) * alpha + f32::from(bg[i]) * inv).round() as u8;
    Rgba([mix(0), mix(1), mix(2), 255])
}

/// Samples per pixel axis for coverage estimates.
const SUBSAMPLES: u32 = 4;

/// `(x, y, w, h)` of a cell in float pixels.
type Bounds = (f64, f64, f64, f64);

fn cell_bounds(cell: PixelRect) -> Bounds {
    (
        f64::from(cell.x),
        f64::from(cell.y),
        f64::from(cell.width),
        f64::from(cell.height),
    )
}

fn cell_center(cell: PixelRect) -> (f64, f64) {
    (
        f64::from(cell.x) + f64::from(cell.width) / 2.0,
        f64::from(cell.y) + f64::from(cell.height) / 2.0,
    )
}

fn fill_centered_rounded_square(
    surface: &mut RgbaImage,
    cell: PixelRect,
    s: f64,
    radius: f64,
    color: Rgba<u8>,
) {
    let pad = (f64::from(cell.width) - s) / 2.0;
    let bounds = (f64::from(cell.x) + pad, f64::from(cell.y) + pad, s, s);
    fill_rounded_rect(surface, cell, bounds, radius, color);
}

/// Fill a rounded rectangle, restricted to the pixels of `clip`.
fn fill_rounded_rect(
    surface: &mut RgbaImage,
    clip: PixelRect,
    bounds: Bounds,
    radius: f64,
    color: Rgba<u8>,
) {
    let (x, y, w, h) = bounds;
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    for_each_pixel(surface, clip, color, |cx, cy| {
        if cx < x || cx > x + w || cy < y || cy > y + h {
            return false;
        }
        let qx = cx.clamp(x + r, x + w - r);
        let qy = cy.clamp(y + r, y + h - r);
        let (dx, dy) = (cx - qx, cy - qy);
        dx * dx + dy * dy <= r * r
    });
}

fn fill_circle(
    surface: &mut RgbaImage,
    clip: PixelRect,
    ccx: f64,
    ccy: f64,
    r: f64,
    color: Rgba<u8>,
) {
    for_each_pixel(surface, clip, color, |cx, cy| {
        let (dx, dy) = (cx - ccx, cy - ccy);
        dx * dx + dy * dy <= r * r
    });
}

fn for_each_pixel(
    surface: &mut RgbaImage,
    clip: PixelRect,
    color: Rgba<u8>,
    inside: impl Fn(f64, f64) -> bool,
) {
    let x_end = (clip.x + clip.width).min(surface.width());
    let y_end = (clip.y + clip.height).min(surface.height());
    for py in clip.y..y_end {
        for px in clip.x..x_end {
            let covered = coverage(px, py, &inside);
            if covered > 0.0 {
                blend_onto(surface, px, py, with_coverage(color, covered));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([10, 20, 30, 255]);

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(40, 40, BACKGROUND)
    }

    fn painted(img: &RgbaImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| **p != BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn painters_stay_inside_cell() {
        let cell = PixelRect::new(10, 10, 10, 10);
        for kind in MaskKind::ALL {
            for finder in [false, true] {
                let mut img = canvas();
                kind.paint(&mut img, cell, INK, finder, &Look::default());
                let px = painted(&img);
                assert!(!px.is_empty(), "{kind} painted nothing");
                assert!(px.iter().all(|&(x, y)| cell.contains(x, y)), "{kind} leaked");
            }
        }
    }

    #[test]
    fn heart_clip_fills_whole_cell() {
        let cell = PixelRect::new(4, 4, 8, 8);
        let mut img = canvas();
        MaskKind::HeartClip.paint(&mut img, cell, INK, false, &Look::default());
        assert_eq!(painted(&img).len(), 64);
    }

    #[test]
    fn filled_square_leaves_gaps() {
        let cell = PixelRect::new(0, 0, 20, 20);
        let mut img = canvas();
        MaskKind::FilledSquare.paint(&mut img, cell, INK, false, &Look::default());
        // Corners are rounded off and the edge padding is unpainted.
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(10, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(10, 10), INK);
    }

    #[test]
    fn finder_dot_is_larger() {
        let cell = PixelRect::new(0, 0, 20, 20);
        let mut data = canvas();
        let mut finder = canvas();
        MaskKind::RoundedDot.paint(&mut data, cell, INK, false, &Look::default());
        MaskKind::RoundedDot.paint(&mut finder, cell, INK, true, &Look::default());
        assert!(painted(&finder).len() > painted(&data).len());
    }

    #[test]
    fn finder_paint_is_idempotent() {
        let cell = PixelRect::new(8, 8, 8, 8);
        let mut once = canvas();
        paint_finder(&mut once, cell, INK);
        let mut twice = once.clone();
        paint_finder(&mut twice, cell, INK);
        assert_eq!(once, twice);
    }

    #[test]
    fn adjacent_finder_cells_merge() {
        // Cells share edges, so a row across them is one solid run.
        let mut img = canvas();
        for col in 0..3 {
            paint_finder(&mut img, PixelRect::new(2 + col * 13, 5, 13, 13), INK);
        }
        for y in 5..18 {
            for x in 2..41.min(img.width()) {
                assert_eq!(*img.get_pixel(x, y), INK, "gap at ({x}, {y})");
            }
        }
    }

    #[test]
    fn edge_pixels_are_partially_covered() {
        let cell = PixelRect::new(0, 0, 20, 20);
        let mut img = canvas();
        MaskKind::FilledSquare.paint(&mut img, cell, INK, false, &Look::default());
        // The painted square starts 1.8px in, so row 1 is a quarter covered.
        let p = *img.get_pixel(10, 1);
        assert_ne!(p, BACKGROUND);
        assert_ne!(p, INK);
        assert!(p[0] > INK[0] && p[0] < BACKGROUND[0], "{p:?}");
    }

    #[test]
    fn coverage_counts_subsamples() {
        assert_eq!(coverage(0, 0, &|_, _| true), 1.0);
        assert_eq!(coverage(0, 0, &|_, _| false), 0.0);
        assert_eq!(coverage(3, 0, &|x, _| x < 3.5), 0.5);
    }

    #[test]
    fn translucent_color_blends() {
        let mut img = canvas();
        blend_onto(&mut img, 0, 0, Rgba([0, 0, 0, 128]));
        let p = img.get_pixel(0, 0);
        assert!(p[0] > 100 && p[0] < 150);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn clear_rect_clips_to_surface() {
        let mut img = canvas();
        clear_rect(&mut img, PixelRect::new(30, 30, 50, 50), INK);
        assert_eq!(painted(&img).len(), 100);
    }
}
