use image::{DynamicImage, RgbaImage};
use rqrr::PreparedImage;

use crate::geometry::GridGeometry;
use crate::protect::{FINDER_PROTECT, in_corner_block};
use crate::style::BACKGROUND;
use crate::{ModuleMatrix, QrEncoder, SymbolEncoder};

fn encode(text: &str) -> ModuleMatrix {
    QrEncoder.encode(text).expect("Failed to encode test payload")
}

/// Pixels of every cell in the three finder corner blocks.
fn finder_pixels(img: &RgbaImage, g: &GridGeometry) -> Vec<[u8; 4]> {
    let mut out = Vec::new();
    for row in 0..g.n {
        for col in 0..g.n {
            if !in_corner_block(row, col, g.n, FINDER_PROTECT) {
                continue;
            }
            let cell = g.cell_rect(row, col);
            for y in cell.y..cell.y + cell.height {
                for x in cell.x..cell.x + cell.width {
                    out.push(img.get_pixel(x, y).0);
                }
            }
        }
    }
    out
}

fn quiet_zone_is_pure(img: &RgbaImage, g: &GridGeometry) -> bool {
    g.quiet_zone_bands().iter().all(|band| {
        (band.y..band.y + band.height)
            .all(|y| (band.x..band.x + band.width).all(|x| *img.get_pixel(x, y) == BACKGROUND))
    })
}

/// Decode the first QR grid found in `img`, the way a phone scanner would
/// see it (greyscale, no hints).
fn decode(img: &RgbaImage) -> Option<String> {
    let grey = DynamicImage::ImageRgba8(img.clone()).to_luma8();
    let (w, h) = (grey.width() as usize, grey.height() as usize);
    let mut prepared =
        PreparedImage::prepare_from_greyscale(w, h, |x, y| grey.get_pixel(x as u32, y as u32)[0]);
    prepared
        .detect_grids()
        .first()
        .and_then(|g| g.decode().ok())
        .map(|(_, content)| content)
}

mod scenarios;
