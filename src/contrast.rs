//! Relative luminance, WCAG contrast ratios and the bounded searches built on them.

use crate::colour::Colour;
use crate::error::PaletteError;
use crate::lab::{self, Lab};

const MIN_ALPHA_SEARCH_MAX_ITERATIONS: u32 = 10;
const MIN_ALPHA_SEARCH_PRECISION: u32 = 1;
const CONTRAST_SEARCH_MAX_ITERATIONS: u32 = 15;
const CONTRAST_SEARCH_PRECISION: f64 = 1e-5;

/// Minimum contrast for body text against its background.
pub const MIN_CONTRAST_BODY_TEXT: f64 = 4.5;
/// Minimum contrast for title text against its background.
pub const MIN_CONTRAST_TITLE_TEXT: f64 = 3.0;

/// Relative luminance in `[0, 1]`. Alpha is ignored.
pub fn luminance(c: Colour) -> f64 {
    lab::colour_to_xyz(c).y / 100.0
}

/// WCAG contrast ratio in `[1, 21]`.
///
/// A translucent foreground is composited over the background first. The
/// background must be fully opaque.
pub fn contrast(foreground: Colour, background: Colour) -> Result<f64, PaletteError> {
    if !background.is_opaque() {
        return Err(PaletteError::TranslucentBackground(background.alpha()));
    }
    let foreground = if foreground.is_opaque() {
        foreground
    } else {
        composite_colours(foreground, background)
    };

    let l1 = luminance(foreground) + 0.05;
    let l2 = luminance(background) + 0.05;
    Ok(l1.max(l2) / l1.min(l2))
}

/// Smallest alpha for `foreground` that still gives at least `min_ratio` against
/// `background`, or `None` if even a fully opaque foreground falls short.
pub fn minimum_alpha(
    foreground: Colour,
    background: Colour,
    min_ratio: f64,
) -> Result<Option<u8>, PaletteError> {
    if contrast(foreground.with_alpha(255), background)? < min_ratio {
        return Ok(None);
    }

    let mut min_alpha = 0u32;
    let mut max_alpha = 255u32;
    let mut iterations = 0;
    while iterations < MIN_ALPHA_SEARCH_MAX_ITERATIONS
        && max_alpha - min_alpha > MIN_ALPHA_SEARCH_PRECISION
    {
        let test_alpha = (min_alpha + max_alpha) / 2;
        if contrast(foreground.with_alpha(test_alpha as u8), background)? < min_ratio {
            min_alpha = test_alpha;
        } else {
            max_alpha = test_alpha;
        }
        iterations += 1;
    }

    Ok(Some(max_alpha as u8))
}

/// Composite `foreground` over `background` (Porter-Duff "over").
pub fn composite_colours(foreground: Colour, background: Colour) -> Colour {
    let fg_a = foreground.alpha() as u32;
    let bg_a = background.alpha() as u32;
    let a = composite_alpha(fg_a, bg_a);

    let channel = |fg: u8, bg: u8| composite_component(fg as u32, fg_a, bg as u32, bg_a, a);
    Colour::from_argb(
        a as u8,
        channel(foreground.red(), background.red()),
        channel(foreground.green(), background.green()),
        channel(foreground.blue(), background.blue()),
    )
}

fn composite_alpha(fg_a: u32, bg_a: u32) -> u32 {
    0xff - ((0xff - bg_a) * (0xff - fg_a)) / 0xff
}

fn composite_component(fg_c: u32, fg_a: u32, bg_c: u32, bg_a: u32, a: u32) -> u8 {
    if a == 0 {
        return 0;
    }
    let value = (0xff * fg_c * fg_a + bg_c * bg_a * (0xff - fg_a)) / (a * 0xff);
    value.min(0xff) as u8
}

/// Whether `foreground` is readable as body text on `background`.
pub fn satisfies_text_contrast(background: Colour, foreground: Colour) -> Result<bool, PaletteError> {
    Ok(contrast(foreground, background)? >= MIN_CONTRAST_BODY_TEXT)
}

/// A colour reads as light when its luminance exceeds one half.
pub fn is_light(c: Colour) -> bool {
    luminance(c) > 0.5
}

/// Shift the LAB lightness of `base` by `amount`, clamped to `[0, 100]`.
pub fn change_lightness(base: Colour, amount: f64) -> Colour {
    let mut lab = lab::colour_to_lab(base);
    lab.l = (lab.l + amount).clamp(0.0, 100.0);
    lab::lab_to_colour(lab)
}

/// Darken `colour` in LAB lightness until it reaches `ratio` against `other`.
///
/// Intended for light backgrounds. When `find_foreground` is set `colour` is the
/// foreground, otherwise it is the background. Returns `colour` unchanged if it
/// already satisfies the ratio.
pub fn find_contrast_colour(
    colour: Colour,
    other: Colour,
    find_foreground: bool,
    ratio: f64,
) -> Result<Colour, PaletteError> {
    let (mut fg, mut bg) = if find_foreground {
        (colour, other)
    } else {
        (other, colour)
    };
    if contrast(fg, bg)? >= ratio {
        return Ok(colour);
    }

    let lab = lab::colour_to_lab(colour);
    let mut low = 0.0;
    let mut high = lab.l;
    let mut iterations = 0;
    while iterations < CONTRAST_SEARCH_MAX_ITERATIONS && high - low > CONTRAST_SEARCH_PRECISION {
        let l = (low + high) / 2.0;
        let probe = lab::lab_to_colour(Lab::new(l, lab.a, lab.b));
        if find_foreground {
            fg = probe;
        } else {
            bg = probe;
        }

        if contrast(fg, bg)? > ratio {
            low = l;
        } else {
            high = l;
        }
        iterations += 1;
    }

    Ok(lab::lab_to_colour(Lab::new(low, lab.a, lab.b)))
}

/// Lighten `colour` in HSL lightness until it reaches `ratio` against `other`.
///
/// Counterpart of [`find_contrast_colour`] for dark backgrounds.
pub fn find_contrast_colour_against_dark(
    colour: Colour,
    other: Colour,
    find_foreground: bool,
    ratio: f64,
) -> Result<Colour, PaletteError> {
    let (mut fg, mut bg) = if find_foreground {
        (colour, other)
    } else {
        (other, colour)
    };
    if contrast(fg, bg)? >= ratio {
        return Ok(colour);
    }

    let mut hsl = colour.hsl();
    let mut low = hsl.l as f64;
    let mut high = 1.0;
    let mut iterations = 0;
    while iterations < CONTRAST_SEARCH_MAX_ITERATIONS && high - low > CONTRAST_SEARCH_PRECISION {
        let l = (low + high) / 2.0;
        hsl.l = l as f32;
        let probe = hsl.to_colour();
        if find_foreground {
            fg = probe;
        } else {
            bg = probe;
        }

        if contrast(fg, bg)? > ratio {
            high = l;
        } else {
            low = l;
        }
        iterations += 1;
    }

    hsl.l = high as f32;
    Ok(hsl.to_colour())
}
