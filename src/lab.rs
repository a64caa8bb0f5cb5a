//! CIE XYZ and CIE L*a*b* conversions for 8-bit sRGB colours.
//!
//! D65 reference white, XYZ scaled to `[0, 100]`, L* in `[0, 100]`.

use crate::colour::Colour;

const WHITE_REFERENCE_X: f64 = 95.047;
const WHITE_REFERENCE_Y: f64 = 100.0;
const WHITE_REFERENCE_Z: f64 = 108.883;
const EPSILON: f64 = 0.008856;
const KAPPA: f64 = 903.3;

/// CIE XYZ tristimulus values, `Y` in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// CIE L*a*b* colour, L* in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

// --- sRGB transfer function (delegated to linear-srgb) ---

/// sRGB gamma → linear (single channel, 0..255 → 0.0..1.0)
#[inline]
fn srgb_to_linear(c: u8) -> f64 {
    linear_srgb::default::srgb_u8_to_linear(c) as f64
}

/// Linear → 8-bit sRGB. Out-of-gamut values saturate at 0 or 255.
#[inline]
fn linear_to_srgb(c: f64) -> u8 {
    (255.0 * linear_srgb::precise::linear_to_srgb_f64(c)).round() as u8
}

/// CIE pivot: cube root above the epsilon, linear segment below.
#[inline]
fn pivot(component: f64) -> f64 {
    if component > EPSILON {
        component.cbrt()
    } else {
        (KAPPA * component + 16.0) / 116.0
    }
}

/// Convert an 8-bit sRGB colour to XYZ. Alpha is ignored.
pub fn colour_to_xyz(c: Colour) -> Xyz {
    let r = srgb_to_linear(c.red());
    let g = srgb_to_linear(c.green());
    let b = srgb_to_linear(c.blue());

    Xyz {
        x: 100.0 * (r * 0.4124 + g * 0.3576 + b * 0.1805),
        y: 100.0 * (r * 0.2126 + g * 0.7152 + b * 0.0722),
        z: 100.0 * (r * 0.0193 + g * 0.1192 + b * 0.9505),
    }
}

/// Convert XYZ to an opaque 8-bit sRGB colour. Out-of-gamut channels saturate.
pub fn xyz_to_colour(xyz: Xyz) -> Colour {
    let r = (xyz.x * 3.2406 + xyz.y * -1.5372 + xyz.z * -0.4986) / 100.0;
    let g = (xyz.x * -0.9689 + xyz.y * 1.8758 + xyz.z * 0.0415) / 100.0;
    let b = (xyz.x * 0.0557 + xyz.y * -0.2040 + xyz.z * 1.0570) / 100.0;

    Colour::from_rgb(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let fx = pivot(xyz.x / WHITE_REFERENCE_X);
    let fy = pivot(xyz.y / WHITE_REFERENCE_Y);
    let fz = pivot(xyz.z / WHITE_REFERENCE_Z);

    Lab {
        l: (116.0 * fy - 16.0).max(0.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let fx3 = fx.powi(3);
    let xr = if fx3 > EPSILON {
        fx3
    } else {
        (116.0 * fx - 16.0) / KAPPA
    };
    let yr = if lab.l > KAPPA * EPSILON {
        fy.powi(3)
    } else {
        lab.l / KAPPA
    };
    let fz3 = fz.powi(3);
    let zr = if fz3 > EPSILON {
        fz3
    } else {
        (116.0 * fz - 16.0) / KAPPA
    };

    Xyz {
        x: xr * WHITE_REFERENCE_X,
        y: yr * WHITE_REFERENCE_Y,
        z: zr * WHITE_REFERENCE_Z,
    }
}

pub fn colour_to_lab(c: Colour) -> Lab {
    xyz_to_lab(colour_to_xyz(c))
}

pub fn lab_to_colour(lab: Lab) -> Colour {
    xyz_to_colour(lab_to_xyz(lab))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lab(c: Colour, expected: (f64, f64, f64), tolerance: f64) {
        let lab = colour_to_lab(c);
        assert!(
            (lab.l - expected.0).abs() < tolerance
                && (lab.a - expected.1).abs() < tolerance
                && (lab.b - expected.2).abs() < tolerance,
            "{c}: got {lab:?}, expected {expected:?}"
        );
    }

    fn assert_close(a: Colour, b: Colour) {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs();
        assert!(
            d(a.red(), b.red()) <= 1 && d(a.green(), b.green()) <= 1 && d(a.blue(), b.blue()) <= 1,
            "{a} vs {b}"
        );
    }

    #[test]
    fn reference_pairs() {
        assert_lab(Colour::BLACK, (0.0, 0.0, 0.0), 0.01);
        assert_lab(Colour::WHITE, (100.0, 0.0, 0.0), 0.05);
        assert_lab(Colour::from_rgb(255, 0, 0), (53.24, 80.09, 67.20), 0.5);
        assert_lab(Colour::from_rgb(0, 255, 0), (87.73, -86.18, 83.18), 0.5);
        assert_lab(Colour::from_rgb(0, 0, 255), (32.30, 79.19, -107.86), 0.5);
        assert_lab(Colour::from_rgb(128, 128, 128), (53.59, 0.0, 0.0), 0.05);
    }

    #[test]
    fn white_luminance_is_full() {
        let xyz = colour_to_xyz(Colour::WHITE);
        assert!((xyz.y - 100.0).abs() < 1e-3);
        assert_eq!(colour_to_xyz(Colour::BLACK), Xyz::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn blue_uses_its_own_channel_in_linear_segment() {
        // Blue is below the 0.04045 threshold, green is not; they must not mix.
        let xyz = colour_to_xyz(Colour::from_rgb(0, 200, 5));
        let expected_z = 100.0 * (srgb_to_linear(200) * 0.1192 + srgb_to_linear(5) * 0.9505);
        assert!((xyz.z - expected_z).abs() < 1e-9);
    }

    #[test]
    fn lab_roundtrip() {
        for c in [
            Colour::BLACK,
            Colour::WHITE,
            Colour::from_rgb(255, 0, 0),
            Colour::from_rgb(12, 200, 99),
            Colour::from_rgb(3, 4, 5),
            Colour::from_rgb(100, 150, 200),
        ] {
            assert_close(lab_to_colour(colour_to_lab(c)), c);
        }
    }

    #[test]
    fn out_of_gamut_lab_clamps() {
        let c = lab_to_colour(Lab::new(100.0, 120.0, 120.0));
        assert_eq!(c.alpha(), 255);
        assert_eq!(c.red(), 255);
    }

    #[test]
    fn transfer_function_matches_srgb_curve() {
        for c in 0..=255u8 {
            let v = c as f64 / 255.0;
            let exact = if v < 0.04045 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            };
            assert!((srgb_to_linear(c) - exact).abs() < 1e-5, "channel {c}");
            assert_eq!(linear_to_srgb(srgb_to_linear(c)), c);
        }
        assert_eq!(linear_to_srgb(-0.3), 0);
        assert_eq!(linear_to_srgb(1.7), 255);
    }
}
