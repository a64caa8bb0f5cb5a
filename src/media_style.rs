//! Background and text colours for media artwork, in the style of a
//! notification or now-playing card.

use std::borrow::Cow;

use crate::bitmap::Bitmap;
use crate::colour::Colour;
use crate::contrast::{self, MIN_CONTRAST_BODY_TEXT};
use crate::error::PaletteError;
use crate::filter::{BlackWhiteFilter, HueFilter};
use crate::palette::Palette;
use crate::swatch::Swatch;

const RESIZE_BITMAP_AREA: usize = 150 * 150;
const LIGHTNESS_TEXT_DIFFERENCE_LIGHT: f64 = 20.0;
const LIGHTNESS_TEXT_DIFFERENCE_DARK: f64 = -10.0;
const POPULATION_FRACTION_FOR_WHITE_OR_BLACK: f32 = 2.5;
const POPULATION_FRACTION_FOR_DOMINANT: f32 = 0.01;
const POPULATION_FRACTION_FOR_MORE_VIBRANT: f32 = 1.0;
const MINIMUM_IMAGE_FRACTION: f32 = 0.002;
const MIN_SATURATION_WHEN_DECIDING: f32 = 0.19;

/// Colours derived from a piece of artwork: a background taken from the
/// image and two text colours that stay readable on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaStyle {
    background: Colour,
    primary_text: Colour,
    secondary_text: Colour,
}

impl MediaStyle {
    pub fn from_bitmap(bitmap: &Bitmap) -> Result<Self, PaletteError> {
        let bitmap = downscaled(bitmap)?;
        let builder = Palette::from_bitmap(&bitmap)
            .clear_filters()
            .resize_area(RESIZE_BITMAP_AREA);
        let palette = builder.generate()?;
        let (background, background_hue) = find_background(&palette);

        // Foreground candidates must differ in hue from the background and
        // cannot be near black or white.
        let builder = match background_hue {
            Some(hue) => builder.add_filter(HueFilter::new(hue)),
            None => builder,
        };
        let palette = builder.add_filter(BlackWhiteFilter).generate()?;
        let foreground = select_foreground(background, &palette);
        let (primary_text, secondary_text) = ensure_contrast(background, foreground)?;

        log::debug!(
            "media style: background {background}, foreground {foreground}, text {primary_text} / {secondary_text}"
        );
        Ok(Self {
            background,
            primary_text,
            secondary_text,
        })
    }

    pub fn background_colour(&self) -> Colour {
        self.background
    }

    pub fn primary_text_colour(&self) -> Colour {
        self.primary_text
    }

    pub fn secondary_text_colour(&self) -> Colour {
        self.secondary_text
    }

    /// Whether the background reads as light.
    pub fn is_light(&self) -> bool {
        contrast::is_light(self.background)
    }
}

/// Shrink to at most `RESIZE_BITMAP_AREA` pixels, flooring both sides.
fn downscaled(bitmap: &Bitmap) -> Result<Cow<'_, Bitmap>, PaletteError> {
    let area = bitmap.area();
    if area <= RESIZE_BITMAP_AREA {
        return Ok(Cow::Borrowed(bitmap));
    }
    let factor = (RESIZE_BITMAP_AREA as f64 / area as f64).sqrt();
    let width = ((bitmap.width() as f64 * factor).floor() as usize).max(1);
    let height = ((bitmap.height() as f64 * factor).floor() as usize).max(1);
    bitmap.scaled(width, height).map(Cow::Owned)
}

/// Background colour plus the hue foregrounds should avoid, if it has one.
fn find_background(palette: &Palette) -> (Colour, Option<f32>) {
    let Some(dominant) = palette.dominant_swatch() else {
        return (Colour::WHITE, None);
    };
    let dom = dominant.colour();
    if !BlackWhiteFilter::is_black_or_white(dom) {
        return (dom, Some(dom.hsl().h));
    }

    // Prefer the most populous chromatic swatch unless black or white clearly dominates.
    let mut second: Option<&Swatch> = None;
    for swatch in palette.swatches() {
        if swatch == dominant || BlackWhiteFilter::is_black_or_white(swatch.colour()) {
            continue;
        }
        if second.map_or(true, |s| swatch.population() > s.population()) {
            second = Some(swatch);
        }
    }

    match second {
        Some(second)
            if dominant.population() as f32 / second.population() as f32
                <= POPULATION_FRACTION_FOR_WHITE_OR_BLACK =>
        {
            log::debug!("background {dom} is black or white, using {}", second.colour());
            (second.colour(), Some(second.hsl().h))
        }
        _ => (dom, None),
    }
}

fn select_foreground(background: Colour, palette: &Palette) -> Colour {
    if contrast::is_light(background) {
        select_foreground_for_swatches(
            palette.dark_vibrant_swatch(),
            palette.vibrant_swatch(),
            palette.dark_muted_swatch(),
            palette.muted_swatch(),
            palette.dominant_swatch(),
            Colour::BLACK,
        )
    } else {
        select_foreground_for_swatches(
            palette.light_vibrant_swatch(),
            palette.vibrant_swatch(),
            palette.light_muted_swatch(),
            palette.muted_swatch(),
            palette.dominant_swatch(),
            Colour::WHITE,
        )
    }
}

fn select_foreground_for_swatches(
    more_vibrant: Option<&Swatch>,
    vibrant: Option<&Swatch>,
    more_muted: Option<&Swatch>,
    muted: Option<&Swatch>,
    dominant: Option<&Swatch>,
    fallback: Colour,
) -> Colour {
    let candidate = select_vibrant_candidate(more_vibrant, vibrant)
        .or_else(|| select_muted_candidate(muted, more_muted));

    match (candidate, dominant) {
        (Some(candidate), Some(dominant)) if candidate != dominant => {
            let fraction = candidate.population() as f32 / dominant.population() as f32;
            if fraction < POPULATION_FRACTION_FOR_DOMINANT
                && dominant.hsl().s > MIN_SATURATION_WHEN_DECIDING
            {
                dominant.colour()
            } else {
                candidate.colour()
            }
        }
        (Some(candidate), _) => candidate.colour(),
        (None, dominant) if has_enough_population(dominant) => {
            dominant.map_or(fallback, Swatch::colour)
        }
        (None, _) => fallback,
    }
}

fn select_vibrant_candidate<'a>(
    first: Option<&'a Swatch>,
    second: Option<&'a Swatch>,
) -> Option<&'a Swatch> {
    match (enough(first), enough(second)) {
        (Some(first), Some(second)) => {
            let fraction = first.population() as f32 / second.population() as f32;
            if fraction < POPULATION_FRACTION_FOR_MORE_VIBRANT {
                Some(second)
            } else {
                Some(first)
            }
        }
        (first, second) => first.or(second),
    }
}

fn select_muted_candidate<'a>(
    first: Option<&'a Swatch>,
    second: Option<&'a Swatch>,
) -> Option<&'a Swatch> {
    match (enough(first), enough(second)) {
        (Some(first), Some(second)) => {
            let fraction = first.population() as f32 / second.population() as f32;
            if first.hsl().s * fraction > second.hsl().s {
                Some(first)
            } else {
                Some(second)
            }
        }
        (first, second) => first.or(second),
    }
}

fn enough(swatch: Option<&Swatch>) -> Option<&Swatch> {
    swatch.filter(|s| has_enough_population(Some(*s)))
}

fn has_enough_population(swatch: Option<&Swatch>) -> bool {
    swatch.is_some_and(|s| {
        s.population() as f32 / RESIZE_BITMAP_AREA as f32 > MINIMUM_IMAGE_FRACTION
    })
}

/// Primary and secondary text colours derived from `foreground`, adjusted to
/// reach body-text contrast against `background`.
fn ensure_contrast(
    background: Colour,
    foreground: Colour,
) -> Result<(Colour, Colour), PaletteError> {
    let background_luminance = contrast::luminance(background);
    let foreground_luminance = contrast::luminance(foreground);
    let ratio = contrast::contrast(foreground, background)?;

    let background_light = (background_luminance > foreground_luminance
        && contrast::satisfies_text_contrast(background, Colour::BLACK)?)
        || (background_luminance <= foreground_luminance
            && !contrast::satisfies_text_contrast(background, Colour::WHITE)?);

    let difference = if background_light {
        LIGHTNESS_TEXT_DIFFERENCE_LIGHT
    } else {
        LIGHTNESS_TEXT_DIFFERENCE_DARK
    };
    let find = |colour: Colour| {
        if background_light {
            contrast::find_contrast_colour(colour, background, true, MIN_CONTRAST_BODY_TEXT)
        } else {
            contrast::find_contrast_colour_against_dark(
                colour,
                background,
                true,
                MIN_CONTRAST_BODY_TEXT,
            )
        }
    };

    if ratio < MIN_CONTRAST_BODY_TEXT {
        let secondary = find(foreground)?;
        let primary = contrast::change_lightness(secondary, -difference);
        return Ok((primary, secondary));
    }

    let secondary = contrast::change_lightness(foreground, difference);
    if contrast::contrast(secondary, background)? < MIN_CONTRAST_BODY_TEXT {
        let secondary = find(secondary)?;
        let primary = contrast::change_lightness(secondary, -difference);
        return Ok((primary, secondary));
    }
    Ok((foreground, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(colour: Colour, width: usize, height: usize) -> Bitmap {
        Bitmap::from_pixels(vec![colour; width * height], width, height).unwrap()
    }

    #[test]
    fn chromatic_background_on_dark_image() {
        let style = MediaStyle::from_bitmap(&solid(Colour::from_rgb(40, 90, 200), 20, 20)).unwrap();
        assert_eq!(style.background_colour(), Colour::from_rgb(40, 88, 200));
        assert!(!style.is_light());
        // No foreground survives the hue filter, so white is used.
        assert_eq!(style.primary_text_colour(), Colour::WHITE);
        let secondary = contrast::contrast(style.secondary_text_colour(), style.background_colour());
        assert!(secondary.unwrap() >= MIN_CONTRAST_BODY_TEXT);
    }

    #[test]
    fn white_image_gets_black_text() {
        let style = MediaStyle::from_bitmap(&solid(Colour::WHITE, 10, 10)).unwrap();
        assert!(style.is_light());
        assert_eq!(style.primary_text_colour(), Colour::BLACK);
        assert_ne!(style.secondary_text_colour(), Colour::BLACK);
    }

    #[test]
    fn dominant_white_keeps_background() {
        let mut pixels = vec![Colour::WHITE; 150 * 120];
        pixels.extend(vec![Colour::from_rgb(255, 0, 0); 150 * 30]);
        let style = MediaStyle::from_bitmap(&Bitmap::from_pixels(pixels, 150, 150).unwrap()).unwrap();
        assert_eq!(style.background_colour(), Colour::from_rgb(248, 248, 248));
        assert!(style.is_light());

        let secondary = style.secondary_text_colour();
        assert!(contrast::contrast(secondary, style.background_colour()).unwrap() >= MIN_CONTRAST_BODY_TEXT);
        assert!(secondary.red() > secondary.green());
    }

    #[test]
    fn chromatic_second_replaces_white() {
        let mut pixels = vec![Colour::WHITE; 150 * 100];
        pixels.extend(vec![Colour::from_rgb(255, 0, 0); 150 * 50]);
        let style = MediaStyle::from_bitmap(&Bitmap::from_pixels(pixels, 150, 150).unwrap()).unwrap();
        assert_eq!(style.background_colour(), Colour::from_rgb(248, 0, 0));
        assert!(!style.is_light());
    }

    #[test]
    fn large_artwork_is_floored_to_area() {
        let bitmap = solid(Colour::from_rgb(40, 90, 200), 300, 200);
        let small = downscaled(&bitmap).unwrap();
        assert_eq!((small.width(), small.height()), (183, 122));
        assert!(small.area() <= RESIZE_BITMAP_AREA);

        let exact = solid(Colour::BLACK, 150, 150);
        assert!(matches!(downscaled(&exact).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn floored_artwork_population() {
        let bitmap = solid(Colour::from_rgb(40, 90, 200), 300, 200);
        let style = MediaStyle::from_bitmap(&bitmap).unwrap();
        assert_eq!(style.background_colour(), Colour::from_rgb(40, 88, 200));

        // The builder leaves the floored bitmap alone.
        let small = downscaled(&bitmap).unwrap();
        let palette = Palette::from_bitmap(&small)
            .clear_filters()
            .resize_area(RESIZE_BITMAP_AREA)
            .generate()
            .unwrap();
        assert_eq!(palette.dominant_swatch().unwrap().population(), 183 * 122);
    }

    #[test]
    fn vibrant_candidate_prefers_larger() {
        let a = Swatch::new(Colour::from_rgb(200, 0, 0), 100);
        let b = Swatch::new(Colour::from_rgb(0, 0, 200), 200);
        assert_eq!(select_vibrant_candidate(Some(&a), Some(&b)), Some(&b));
        assert_eq!(select_vibrant_candidate(Some(&b), Some(&a)), Some(&b));
        assert_eq!(select_vibrant_candidate(None, Some(&a)), Some(&a));
        let tiny = Swatch::new(Colour::from_rgb(0, 200, 0), 10);
        assert_eq!(select_vibrant_candidate(Some(&tiny), None), None);
    }

    #[test]
    fn saturated_dominant_overrides_rare_candidate() {
        let candidate = Swatch::new(Colour::from_rgb(30, 200, 30), 50);
        let dominant = Swatch::new(Colour::from_rgb(200, 30, 30), 10_000);
        let chosen = select_foreground_for_swatches(
            None,
            Some(&candidate),
            None,
            None,
            Some(&dominant),
            Colour::BLACK,
        );
        assert_eq!(chosen, dominant.colour());
    }
}
