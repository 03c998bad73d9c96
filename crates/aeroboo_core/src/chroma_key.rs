//! Chroma-key conversion of flat-backdrop sprite images.
//!
//! Source art is drawn on a solid backdrop. At load time the backdrop color is
//! estimated from the four corner pixels and every pixel gets an alpha derived
//! from its distance to that color:
//!
//! - distance `<= low`  -> fully transparent
//! - distance `>= high` -> fully opaque
//! - in between         -> linear ramp, giving a soft edge band
//!
//! Partially transparent pixels are then *un-blended*: the source pixel is
//! assumed to be `fg * a + backdrop * (1 - a)`, so the foreground color is
//! recovered as `(observed - (1 - a) * backdrop) / a`. This removes the
//! backdrop-colored fringe that would otherwise show around sprite edges.
//!
//! The arithmetic is single-precision with round-half-up truncation so the
//! output matches the reference assets byte-for-byte.

use image::{Rgb, RgbaImage};

/// Distance thresholds (max per-channel difference) for the alpha ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyThresholds {
    pub low: u8,
    pub high: u8,
}

impl Default for KeyThresholds {
    fn default() -> Self {
        Self { low: 8, high: 40 }
    }
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Integer mean of the four corner pixels (top-left, top-right, bottom-left,
/// bottom-right). Returns `None` for an empty image.
pub fn sample_backdrop(image: &RgbaImage) -> Option<Rgb<u8>> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let corners = [
        image.get_pixel(0, 0),
        image.get_pixel(w - 1, 0),
        image.get_pixel(0, h - 1),
        image.get_pixel(w - 1, h - 1),
    ];
    let mut sums = [0u32; 3];
    for corner in corners {
        for (sum, &channel) in sums.iter_mut().zip(corner.0.iter()) {
            *sum += u32::from(channel);
        }
    }
    Some(Rgb([
        (sums[0] / 4) as u8,
        (sums[1] / 4) as u8,
        (sums[2] / 4) as u8,
    ]))
}

/// Largest absolute per-channel difference between a pixel and the backdrop.
pub fn backdrop_distance(rgb: [u8; 3], backdrop: Rgb<u8>) -> u8 {
    rgb.iter()
        .zip(backdrop.0.iter())
        .map(|(&c, &b)| c.abs_diff(b))
        .max()
        .unwrap_or(0)
}

/// Opacity in `[0, 1]` for a backdrop distance.
pub fn opacity_for_distance(distance: u8, thresholds: KeyThresholds) -> f32 {
    let KeyThresholds { low, high } = thresholds;
    if distance <= low {
        0.0
    } else if distance >= high {
        1.0
    } else {
        f32::from(distance - low) / f32::from(high - low)
    }
}

/// Convert one observed pixel into its keyed RGBA value.
pub fn key_pixel(rgb: [u8; 3], backdrop: Rgb<u8>, thresholds: KeyThresholds) -> [u8; 4] {
    let a = opacity_for_distance(backdrop_distance(rgb, backdrop), thresholds);
    let alpha = clamp_u8((255.0 * a + 0.5) as i32);
    if a <= 0.0 {
        let [r, g, b] = backdrop.0;
        return [r, g, b, alpha];
    }

    let unblend = |observed: u8, bg: u8| -> u8 {
        let recovered = (f32::from(observed) - (1.0 - a) * f32::from(bg)) / a;
        clamp_u8((recovered + 0.5) as i32)
    };
    [
        unblend(rgb[0], backdrop.0[0]),
        unblend(rgb[1], backdrop.0[1]),
        unblend(rgb[2], backdrop.0[2]),
        alpha,
    ]
}

/// Rewrite `image` in place so its backdrop becomes transparent.
///
/// Returns the sampled backdrop color, or `None` when the image is empty and
/// nothing was changed. The backdrop is sampled before any pixel is touched.
pub fn key_out_backdrop(image: &mut RgbaImage, thresholds: KeyThresholds) -> Option<Rgb<u8>> {
    let backdrop = sample_backdrop(image)?;
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        pixel.0 = key_pixel([r, g, b], backdrop, thresholds);
    }
    Some(backdrop)
}
