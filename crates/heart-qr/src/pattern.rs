//! Background texture renderers.
//!
//! Patterns are drawn into an off-screen buffer the size of the canvas and
//! returned by value. The compositor decides which parts of it end up on
//! the canvas. Patterns know nothing about the module grid.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::fill::{blend_onto, coverage, with_coverage};
use crate::geometry::PixelRect;
use crate::style::{BACKGROUND, PatternKind};

/// Dot grid pitch in pixels.
pub const DOT_STEP: u32 = 14;
/// Dot radius in pixels.
pub const DOT_RADIUS: f64 = 1.6;
/// Diagonal stripe pitch in pixels.
pub const STRIPE_STEP: i64 = 18;
/// Diagonal stripe width in pixels.
pub const STRIPE_WIDTH: i64 = 2;
/// Grid line pitch in pixels.
pub const GRID_STEP: u32 = 18;
/// Grid line width in pixels. Lines sit on pixel boundaries, so the two
/// pixels either side each get half of it as coverage.
pub const GRID_WIDTH: f64 = 1.5;
/// Noise intensities are drawn from `0..NOISE_LEVELS`.
pub const NOISE_LEVELS: u8 = 18;

/// Render `kind` over a `size`×`size` background buffer, only inside `clip`.
///
/// Returns `None` for [`PatternKind::None`].
pub fn render_pattern(
    kind: PatternKind,
    color: Rgba<u8>,
    size: u32,
    clip: PixelRect,
    seed: u64,
) -> Option<RgbaImage> {
    let layer = match kind {
        PatternKind::None => return None,
        PatternKind::Dots => dots_layer(size, clip, color),
        PatternKind::Stripes => stripes_layer(size, clip, color),
        PatternKind::Grid => grid_layer(size, clip, color),
        PatternKind::Noise => noise_layer(size, clip, color, seed),
    };
    debug!(%kind, size, "Rendered background pattern");

    let mut buffer = RgbaImage::from_pixel(size, size, BACKGROUND);
    for (x, y, pixel) in layer.enumerate_pixels() {
        if clip.contains(x, y) {
            blend_onto(&mut buffer, x, y, *pixel);
        }
    }
    Some(buffer)
}

fn dots_layer(size: u32, clip: PixelRect, color: Rgba<u8>) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    let half = f64::from(DOT_STEP) / 2.0;
    for yy in (clip.y..clip.y + clip.height).step_by(DOT_STEP as usize) {
        for xx in (clip.x..clip.x + clip.width).step_by(DOT_STEP as usize) {
            let center = (f64::from(xx) + half, f64::from(yy) + half);
            draw_dot(&mut layer, center, color);
        }
    }
    layer
}

fn draw_dot(layer: &mut RgbaImage, (cx, cy): (f64, f64), color: Rgba<u8>) {
    let inside = |x: f64, y: f64| (x - cx).powi(2) + (y - cy).powi(2) <= DOT_RADIUS * DOT_RADIUS;
    let x0 = (cx - DOT_RADIUS).floor().max(0.0) as u32;
    let y0 = (cy - DOT_RADIUS).floor().max(0.0) as u32;
    let x1 = ((cx + DOT_RADIUS).ceil() as u32).min(layer.width());
    let y1 = ((cy + DOT_RADIUS).ceil() as u32).min(layer.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let covered = coverage(x, y, &inside);
            let pixel = layer.get_pixel_mut(x, y);
            let tinted = with_coverage(color, covered);
            if tinted[3] > pixel[3] {
                *pixel = tinted;
            }
        }
    }
}

fn stripes_layer(size: u32, clip: PixelRect, color: Rgba<u8>) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    for (x, y, pixel) in layer.enumerate_pixels_mut() {
        let d = i64::from(x) - i64::from(y) + i64::from(clip.y);
        if d.rem_euclid(STRIPE_STEP) < STRIPE_WIDTH {
            *pixel = color;
        }
    }
    layer
}

fn grid_layer(size: u32, clip: PixelRect, color: Rgba<u8>) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    let (x0, y0) = (clip.x as i32, clip.y as i32);
    let line_color = with_coverage(color, GRID_WIDTH / 2.0);
    for xx in (clip.x..=clip.x + clip.width).step_by(GRID_STEP as usize) {
        let line = Rect::at(xx as i32 - 1, y0).of_size(2, clip.height.max(1));
        draw_filled_rect_mut(&mut layer, line, line_color);
    }
    for yy in (clip.y..=clip.y + clip.height).step_by(GRID_STEP as usize) {
        let line = Rect::at(x0, yy as i32 - 1).of_size(clip.width.max(1), 2);
        draw_filled_rect_mut(&mut layer, line, line_color);
    }
    layer
}

/// Paper-like speckle. Each pixel gets a random fraction of the pattern
/// color's alpha, reproducible from `seed`.
fn noise_layer(size: u32, clip: PixelRect, color: Rgba<u8>, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut layer = RgbaImage::new(size, size);
    for y in clip.y..(clip.y + clip.height).min(size) {
        for x in clip.x..(clip.x + clip.width).min(size) {
            let v = rng.gen_range(0..NOISE_LEVELS);
            let alpha = u32::from(color[3]) * u32::from(v) / u32::from(NOISE_LEVELS - 1);
            layer.put_pixel(x, y, Rgba([color[0], color[1], color[2], alpha as u8]));
        }
    }
    layer
}
