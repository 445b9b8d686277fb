//! RGB/HSL helpers for firework colors
//!
//! Colors are linear `Vec3` triples in [0, 1].

use glam::Vec3;

/// Convert HSL (all components in [0, 1], hue wraps) to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert RGB to HSL, returned as `(h, s, l)`
pub fn rgb_to_hsl(rgb: Vec3) -> (f32, f32, f32) {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == rgb.x {
        (rgb.y - rgb.z) / d + if rgb.y < rgb.z { 6.0 } else { 0.0 }
    } else if max == rgb.y {
        (rgb.z - rgb.x) / d + 2.0
    } else {
        (rgb.x - rgb.y) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Shift the hue of `rgb` by `offset` (in turns), keeping saturation and lightness
pub fn shift_hue(rgb: Vec3, offset: f32) -> Vec3 {
    let (h, s, l) = rgb_to_hsl(rgb);
    hsl_to_rgb(h + offset, s, l)
}

/// Gold tint used for golden envelopes and their coins
pub const GOLD: Vec3 = Vec3::new(1.0, 0.84, 0.0);
/// Red tint for ordinary envelopes
pub const ENVELOPE_RED: Vec3 = Vec3::new(0.9, 0.1, 0.1);
/// Silver tint for ordinary coins
pub const SILVER: Vec3 = Vec3::new(0.8, 0.8, 0.85);
