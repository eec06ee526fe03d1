//! Canvas compositing: places a card on a black bleed canvas.
//!
//! These functions combine the geometry calculations with pixel work. They
//! are deterministic and never touch the filesystem.

use super::backend::DecodedImage;
use super::calculations::{BleedGeometry, GeometryError, Rect};
use image::{Rgba, RgbaImage};

/// Bleed fill. Printers trim inside this margin; black hides imprecise cuts.
pub const BLEED_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Build the bled card for `original`.
///
/// The canvas is filled with [`BLEED_FILL`] and the original is drawn over it
/// at `(bleed, bleed)`, so transparent pixels end up blended onto black. When
/// `corner_fix` is set and the source was lossy, [`repair_corners`] runs on
/// the result. The returned image keeps the source format tag.
pub fn composite(
    original: &DecodedImage,
    corner_fix: bool,
) -> Result<(DecodedImage, BleedGeometry), GeometryError> {
    let geometry = BleedGeometry::for_dimensions(original.width(), original.height())?;
    let pixels = composite_with_geometry(&original.pixels, &geometry);

    let mut bled = DecodedImage {
        pixels,
        format: original.format,
    };
    if corner_fix && original.format.is_lossy() {
        repair_corners(&mut bled.pixels, &geometry);
    }
    Ok((bled, geometry))
}

/// Fill a canvas of `geometry.outer` size and draw `original` into `geometry.inner`.
pub fn composite_with_geometry(original: &RgbaImage, geometry: &BleedGeometry) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(geometry.outer.width, geometry.outer.height, BLEED_FILL);
    let (dx, dy) = (geometry.inner.x, geometry.inner.y);
    for (x, y, pixel) in original.enumerate_pixels() {
        canvas.put_pixel(x + dx, y + dy, over_black(*pixel));
    }
    canvas
}

/// Source-over onto an opaque black backing, in integer math so opaque
/// pixels come through bit-exact.
fn over_black(pixel: Rgba<u8>) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    match a {
        255 => pixel,
        0 => BLEED_FILL,
        _ => {
            let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
            Rgba([scale(r), scale(g), scale(b), 255])
        }
    }
}

/// Paint the corner repair L-shapes black.
///
/// Lossy encoders leave faint light fringes where the card's rounded corners
/// meet the fill. This paints over real artwork near each corner; it is an
/// approximation and stays opt-in.
pub fn repair_corners(canvas: &mut RgbaImage, geometry: &BleedGeometry) {
    for rect in geometry.corner_repair_rects() {
        fill_rect(canvas, &rect, BLEED_FILL);
    }
}

fn fill_rect(canvas: &mut RgbaImage, rect: &Rect, color: Rgba<u8>) {
    let bounds = Rect::new(0, 0, canvas.width(), canvas.height());
    let rect = rect.intersect(&bounds);
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            canvas.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageFormatTag;
    use crate::test_helpers::gradient_rgba;

    fn card(width: u32, height: u32, format: ImageFormatTag) -> DecodedImage {
        DecodedImage {
            pixels: gradient_rgba(width, height),
            format,
        }
    }

    #[test]
    fn composite_standard_card_dimensions() {
        let original = card(750, 1050, ImageFormatTag::Png);
        let (bled, geometry) = composite(&original, false).unwrap();
        assert_eq!(geometry.bleed_px, 36);
        assert_eq!(bled.pixels.dimensions(), (822, 1122));
        assert_eq!(bled.format, ImageFormatTag::Png);
    }

    #[test]
    fn composite_preserves_original_pixels() {
        let original = card(300, 420, ImageFormatTag::Png);
        let (bled, geometry) = composite(&original, false).unwrap();
        let b = geometry.bleed_px;
        for y in 0..original.height() {
            for x in 0..original.width() {
                assert_eq!(
                    bled.pixels.get_pixel(x + b, y + b),
                    original.pixels.get_pixel(x, y),
                    "pixel ({x}, {y}) changed"
                );
            }
        }
    }

    #[test]
    fn composite_fills_margin_black() {
        let original = card(300, 420, ImageFormatTag::Png);
        let (bled, geometry) = composite(&original, false).unwrap();
        for (x, y, pixel) in bled.pixels.enumerate_pixels() {
            if !geometry.inner.contains(x, y) {
                assert_eq!(*pixel, BLEED_FILL, "margin pixel ({x}, {y}) not black");
            }
        }
    }

    #[test]
    fn composite_blends_transparency_onto_black() {
        let mut pixels = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        pixels.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        let original = DecodedImage {
            pixels,
            format: ImageFormatTag::Png,
        };
        let (bled, geometry) = composite(&original, false).unwrap();
        let b = geometry.bleed_px;
        assert_eq!(*bled.pixels.get_pixel(b, b), BLEED_FILL);
        assert_eq!(*bled.pixels.get_pixel(b + 1, b), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn half_transparent_pixel_darkens() {
        assert_eq!(
            over_black(Rgba([200, 100, 0, 128])),
            Rgba([100, 50, 0, 255])
        );
    }

    #[test]
    fn corner_fix_ignored_for_png() {
        let original = card(750, 1050, ImageFormatTag::Png);
        let (fixed, _) = composite(&original, true).unwrap();
        let (plain, _) = composite(&original, false).unwrap();
        assert_eq!(fixed.pixels, plain.pixels);
    }

    #[test]
    fn corner_fix_only_touches_repair_rects() {
        let original = DecodedImage {
            pixels: RgbaImage::from_pixel(750, 1050, Rgba([250, 250, 250, 255])),
            format: ImageFormatTag::Jpeg,
        };
        let (fixed, geometry) = composite(&original, true).unwrap();
        let (plain, _) = composite(&original, false).unwrap();
        let rects = geometry.corner_repair_rects();

        for (x, y, pixel) in fixed.pixels.enumerate_pixels() {
            let in_repair = rects.iter().any(|r| r.contains(x, y));
            if in_repair {
                assert_eq!(*pixel, BLEED_FILL, "({x}, {y}) not repaired");
            } else {
                assert_eq!(pixel, plain.pixels.get_pixel(x, y), "({x}, {y}) touched");
            }
        }
    }

    #[test]
    fn corner_fix_paints_all_four_corners() {
        let original = DecodedImage {
            pixels: RgbaImage::from_pixel(750, 1050, Rgba([250, 250, 250, 255])),
            format: ImageFormatTag::Jpeg,
        };
        let (fixed, g) = composite(&original, true).unwrap();
        let inner = g.inner;
        for (x, y) in [
            (inner.x, inner.y),
            (inner.right() - 1, inner.y),
            (inner.x, inner.bottom() - 1),
            (inner.right() - 1, inner.bottom() - 1),
        ] {
            assert_eq!(*fixed.pixels.get_pixel(x, y), BLEED_FILL);
        }
        // Just past the L along the top edge stays untouched.
        assert_eq!(
            *fixed.pixels.get_pixel(inner.x + g.bleed_px, inner.y),
            Rgba([250, 250, 250, 255])
        );
    }

    #[test]
    fn composite_rejects_empty_image() {
        let original = DecodedImage {
            pixels: RgbaImage::new(0, 10),
            format: ImageFormatTag::Png,
        };
        assert_eq!(
            composite(&original, false).unwrap_err(),
            GeometryError::ZeroWidth
        );
    }

    #[test]
    fn rerun_adds_more_bleed() {
        let original = card(750, 1050, ImageFormatTag::Png);
        let (once, _) = composite(&original, false).unwrap();
        let (twice, _) = composite(&once, false).unwrap();
        assert!(twice.width() > once.width());
    }
}
