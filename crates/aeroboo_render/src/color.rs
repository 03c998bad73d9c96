//! 8-bit sRGB colors converted for an sRGB render target.
//!
//! The surface format is sRGB, so the shader and clear color work in linear
//! space. Colors authored as 8-bit sRGB go through `srgb_to_linear` first so
//! they show up on screen with exactly the authored value.

pub fn srgb_channel_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGBA (opaque) for an sRGB triple, suitable for vertex colors.
pub fn srgb_to_linear(rgb: [u8; 3]) -> [f32; 4] {
    [
        srgb_channel_to_linear(rgb[0]),
        srgb_channel_to_linear(rgb[1]),
        srgb_channel_to_linear(rgb[2]),
        1.0,
    ]
}

/// Clear color for an sRGB triple.
pub fn clear_color(rgb: [u8; 3]) -> wgpu::Color {
    let [r, g, b, a] = srgb_to_linear(rgb);
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
