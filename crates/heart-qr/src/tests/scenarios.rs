use image::Rgba;

use super::{decode, encode, finder_pixels, quiet_zone_is_pure};
use crate::protect::{FINDER_PROTECT, in_corner_block};
use crate::style::{HeartMode, MaskKind, PatternKind, StyleConfig, StylePreset};
use crate::{Compositor, ModuleMatrix, RenderError, render_text};

const PATTERNS: [PatternKind; 5] = [
    PatternKind::None,
    PatternKind::Dots,
    PatternKind::Stripes,
    PatternKind::Grid,
    PatternKind::Noise,
];

fn plain() -> StyleConfig {
    StyleConfig::new().with_heart_mode(HeartMode::Off)
}

#[test]
fn example_url_at_400px() {
    let out = render_text("https://example.com", 400, &StyleConfig::default()).unwrap();
    assert_eq!(out.summary.module_count, 29);
    assert!(out.summary.module_size >= 2);
    assert_eq!(out.summary.final_size, 416);
    assert!(quiet_zone_is_pure(&out.image, &out.geometry));

    let again = render_text("https://example.com", 400, &StyleConfig::default()).unwrap();
    assert_eq!(out.image, again.image);
    assert_eq!(out.summary, again.summary);
}

#[test]
fn finder_blocks_match_plain_rendering_for_every_style() {
    let matrix = encode("https://example.com");
    let reference = Compositor::new(plain()).render(&matrix, 400).unwrap();
    let expected = finder_pixels(&reference.image, &reference.geometry);

    for preset in StylePreset::ALL {
        for pattern in PATTERNS {
            for timing in [false, true] {
                let cfg = preset
                    .apply(StyleConfig::default())
                    .with_pattern(pattern, Rgba([0xFF, 0x69, 0xB4, 0xC0]))
                    .with_timing_protected(timing);
                let out = Compositor::new(cfg).render(&matrix, 400).unwrap();
                assert_eq!(out.geometry, reference.geometry);
                assert_eq!(
                    finder_pixels(&out.image, &out.geometry),
                    expected,
                    "finder differs for {preset} / {pattern} / timing={timing}"
                );
                assert!(
                    quiet_zone_is_pure(&out.image, &out.geometry),
                    "quiet zone dirty for {preset} / {pattern} / timing={timing}"
                );
            }
        }
    }
}

#[test]
fn none_and_dots_differ_only_outside_protected_pixels() {
    let matrix = encode("https://example.com/heart");
    let base = StyleConfig::default().with_mask(MaskKind::RoundedDot);
    let color = Rgba([0, 0, 0, 0x80]);
    let bare = Compositor::new(base.clone().with_pattern(PatternKind::None, color))
        .render(&matrix, 600)
        .unwrap();
    let dotted = Compositor::new(base.with_pattern(PatternKind::Dots, color))
        .render(&matrix, 600)
        .unwrap();

    let g = bare.geometry;
    assert_eq!(finder_pixels(&bare.image, &g), finder_pixels(&dotted.image, &g));
    assert!(quiet_zone_is_pure(&bare.image, &g));
    assert!(quiet_zone_is_pure(&dotted.image, &g));

    // Differences exist, but only in the outer padding or in data modules.
    let data = g.data_rect();
    let symbol = g.symbol_rect();
    let mut differs = false;
    for (x, y, p) in dotted.image.enumerate_pixels() {
        if p != bare.image.get_pixel(x, y) {
            differs = true;
            assert!(data.contains(x, y) || !symbol.contains(x, y), "({x}, {y})");
        }
    }
    assert!(differs);
}

#[test]
fn dark_modules_in_data_area_never_pick_up_pattern() {
    let matrix = encode("HEART");
    let cfg = StyleConfig::default()
        .with_heart_mode(HeartMode::Off)
        .with_mask(MaskKind::HeartClip)
        .with_pattern(PatternKind::Stripes, Rgba([0, 200, 0, 255]));
    let out = Compositor::new(cfg.clone()).render(&matrix, 400).unwrap();
    let g = out.geometry;
    for (row, col, dark) in matrix.cells() {
        if dark && !in_corner_block(row, col, g.n, FINDER_PROTECT) {
            let cell = g.cell_rect(row, col);
            for y in cell.y..cell.y + cell.height {
                for x in cell.x..cell.x + cell.width {
                    assert_eq!(*out.image.get_pixel(x, y), cfg.foreground);
                }
            }
        }
    }
}

#[test]
fn too_small_target_fails_without_output() {
    let matrix = ModuleMatrix::from_fn(70, |r, c| (r * c) % 3 == 0);
    let err = Compositor::default().render(&matrix, 100).unwrap_err();
    assert!(matches!(
        err,
        RenderError::SizeTooSmall {
            module_count: 70,
            ..
        }
    ));

    let long = "https://example.com/".to_string() + &"a".repeat(200);
    assert!(matches!(
        render_text(&long, 100, &StyleConfig::default()),
        Err(RenderError::SizeTooSmall { .. })
    ));
}

#[test]
fn mask_mode_drops_modules_but_keeps_heart_center() {
    let matrix = encode("https://example.com");
    let cfg = StylePreset::Plain.apply(StyleConfig::default());
    let out = Compositor::new(cfg.clone()).render(&matrix, 400).unwrap();
    assert!(out.erasure.dropped > 0);

    let n = matrix.size();
    let g = out.geometry;
    // Bottom-right corner lies outside the heart: dark cells there are blank.
    let corner_dark = (n - 3..n)
        .flat_map(|r| (n - 3..n).map(move |c| (r, c)))
        .find(|&(r, c)| matrix.is_dark(r, c));
    if let Some((r, c)) = corner_dark {
        let cell = g.cell_rect(r, c);
        let (cx, cy) = (cell.x + cell.width / 2, cell.y + cell.height / 2);
        assert_ne!(*out.image.get_pixel(cx, cy), cfg.foreground);
    }
}

#[test]
fn every_preset_decodes_back_to_its_payload() {
    let pattern_color = StyleConfig::default().pattern_color;
    for text in ["https://example.com", "https://example.com/love/letters?to=you"] {
        let matrix = encode(text);
        for preset in StylePreset::ALL {
            for pattern in [PatternKind::None, PatternKind::Dots] {
                let cfg = preset
                    .apply(StyleConfig::default())
                    .with_pattern(pattern, pattern_color);
                let out = Compositor::new(cfg).render(&matrix, 600).unwrap();
                assert_eq!(
                    decode(&out.image).as_deref(),
                    Some(text),
                    "{preset} / {pattern} / n={}",
                    matrix.size()
                );
            }
        }
    }
}

#[test]
fn plain_rendering_decodes() {
    let text = "https://example.com";
    let out = render_text(text, 400, &plain()).unwrap();
    assert_eq!(decode(&out.image).as_deref(), Some(text));
}

#[test]
fn finder_center_row_keeps_one_one_three_one_one_runs() {
    let matrix = encode("https://example.com");
    for preset in StylePreset::ALL {
        let cfg = preset.apply(StyleConfig::default());
        let out = Compositor::new(cfg.clone()).render(&matrix, 600).unwrap();
        let g = out.geometry;
        let start = g.cell_rect(3, 0);
        let y = start.y + start.height / 2;

        let mut runs: Vec<(bool, u32)> = Vec::new();
        for x in start.x..start.x + 7 * g.module_size {
            let dark = *out.image.get_pixel(x, y) == cfg.foreground;
            match runs.last_mut() {
                Some((d, len)) if *d == dark => *len += 1,
                _ => runs.push((dark, 1)),
            }
        }
        let ms = g.module_size;
        assert_eq!(
            runs,
            vec![(true, ms), (false, ms), (true, 3 * ms), (false, ms), (true, ms)],
            "{preset}"
        );
    }
}
