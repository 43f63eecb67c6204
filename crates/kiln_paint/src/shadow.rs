//! Drop shadow rasterization
//!
//! A shadow is the coverage of the shape being painted, shifted by the
//! shadow offset, blurred with a gaussian of standard deviation
//! `blur / 2` and tinted with the shadow color. The gaussian is
//! approximated by three successive box blurs per axis.

use std::f32::consts::PI;

use kiln_core::Shadow;
use tiny_skia::{FillRule, Mask, Pixmap, PixmapPaint, Transform};

/// Paint the shadow of `coverage` (drawn with `transform`) onto `pixmap`
pub(crate) fn draw_shadow(
    pixmap: &mut Pixmap,
    coverage: &tiny_skia::Path,
    transform: Transform,
    shadow: &Shadow,
    global_alpha: f32,
    anti_alias: bool,
) {
    let (width, height) = (pixmap.width(), pixmap.height());
    let Some(mut mask) = Mask::new(width, height) else {
        return;
    };
    let shifted = transform.post_translate(shadow.offset.x, shadow.offset.y);
    mask.fill_path(coverage, FillRule::Winding, anti_alias, shifted);

    let blurred = blur_coverage(
        mask.data(),
        width as usize,
        height as usize,
        shadow.blur / 2.0,
    );

    let Some(mut layer) = Pixmap::new(width, height) else {
        return;
    };
    let color = shadow.color;
    let alpha = (color.a * global_alpha).clamp(0.0, 1.0);
    for (px, &cov) in layer.data_mut().chunks_exact_mut(4).zip(blurred.iter()) {
        if cov == 0 {
            continue;
        }
        let a = alpha * cov as f32 / 255.0;
        px[0] = (color.r.clamp(0.0, 1.0) * a * 255.0 + 0.5) as u8;
        px[1] = (color.g.clamp(0.0, 1.0) * a * 255.0 + 0.5) as u8;
        px[2] = (color.b.clamp(0.0, 1.0) * a * 255.0 + 0.5) as u8;
        px[3] = (a * 255.0 + 0.5) as u8;
    }

    pixmap.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Approximate gaussian blur of an 8-bit coverage buffer
pub(crate) fn blur_coverage(coverage: &[u8], width: usize, height: usize, sigma: f32) -> Vec<u8> {
    let radius = box_radius(sigma);
    if radius == 0 || width == 0 || height == 0 {
        return coverage.to_vec();
    }

    let mut front = coverage.to_vec();
    let mut back = vec![0u8; front.len()];
    for horizontal in [true, true, true, false, false, false] {
        box_pass(&front, &mut back, width, height, radius, horizontal);
        std::mem::swap(&mut front, &mut back);
    }
    front
}

/// Box radius whose triple application approximates a gaussian of `sigma`
fn box_radius(sigma: f32) -> usize {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    let d = (sigma * 3.0 * (2.0 * PI).sqrt() / 4.0 + 0.5).floor();
    (d as usize) / 2
}

/// One sliding-window box pass; pixels outside the buffer count as zero
fn box_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    let (lines, len, line_stride, step) = if horizontal {
        (height, width, width, 1)
    } else {
        (width, height, 1, width)
    };
    let window = (2 * radius + 1) as u32;

    for line in 0..lines {
        let base = line * line_stride;
        let at = |i: usize| src[base + i * step] as u32;

        let mut sum: u32 = (0..=radius.min(len - 1)).map(at).sum();
        for i in 0..len {
            dst[base + i * step] = ((sum + window / 2) / window) as u8;
            let incoming = i + radius + 1;
            if incoming < len {
                sum += at(incoming);
            }
            if i >= radius {
                sum -= at(i - radius);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sigma_is_identity() {
        let data = vec![0, 255, 0, 128];
        assert_eq!(blur_coverage(&data, 2, 2, 0.0), data);
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let (w, h) = (21, 21);
        let mut data = vec![0u8; w * h];
        for y in 8..13 {
            for x in 8..13 {
                data[y * w + x] = 255;
            }
        }

        let blurred = blur_coverage(&data, w, h, 2.0);
        let center = blurred[10 * w + 10];
        let edge = blurred[10 * w + 14];
        let far = blurred[0];

        assert!(center > edge, "center {center} should exceed edge {edge}");
        assert!(edge > 0);
        assert_eq!(far, 0);
    }

    #[test]
    fn test_blur_of_uniform_interior_is_stable() {
        let (w, h) = (16, 16);
        let data = vec![200u8; w * h];
        let blurred = blur_coverage(&data, w, h, 1.5);
        assert_eq!(blurred[8 * w + 8], 200);
    }

    #[test]
    fn test_shadow_is_offset() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        let path = tiny_skia::PathBuilder::from_rect(rect);
        let shadow = Shadow::new(kiln_core::Color::BLACK, 0.0, kiln_core::Vec2::new(20.0, 20.0));

        draw_shadow(&mut pixmap, &path, Transform::identity(), &shadow, 1.0, false);

        let alpha_at = |x: u32, y: u32| pixmap.data()[((y * 40 + x) * 4 + 3) as usize];
        assert_eq!(alpha_at(5, 5), 0);
        assert_eq!(alpha_at(25, 25), 255);
    }
}
