//! Median-cut palette extraction with target scoring and WCAG contrast helpers.
//!
//! Pixels are bucketed into a 15-bit histogram, split into at most
//! `max_colours` boxes, and each box is reduced to a [`Swatch`]. A [`Palette`]
//! then picks the best swatch for each [`Target`] (vibrant, muted, and their
//! light and dark variants, or custom profiles).
//!
//! ```no_run
//! use vibrancy::{Bitmap, Colour, Palette};
//!
//! let bitmap = Bitmap::from_pixels(vec![Colour::from_rgb(200, 40, 40); 64], 8, 8)?;
//! let palette = Palette::from_bitmap(&bitmap).max_colours(8).generate()?;
//! if let Some(swatch) = palette.vibrant_swatch() {
//!     println!("{} on {}", swatch.body_text_colour(), swatch.colour());
//! }
//! # Ok::<(), vibrancy::PaletteError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bitmap;
pub mod colour;
pub mod contrast;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod lab;
pub mod media_style;
mod median_cut;
pub mod palette;
pub mod swatch;
pub mod target;

pub use bitmap::{Bitmap, Region};
pub use colour::{Colour, Hsl};
pub use error::PaletteError;
pub use filter::{BlackWhiteFilter, DefaultFilter, Filter, FilterSet, HueFilter};
pub use media_style::MediaStyle;
pub use palette::{Palette, PaletteBuilder, PaletteConfig};
pub use swatch::Swatch;
pub use target::{Range, Target, TargetBuilder, Weights};

use histogram::Histogram;

/// Reduce `pixels` to at most `max_colours` swatches.
///
/// `filter` is applied to every histogram bucket before splitting and to every
/// averaged swatch afterwards, so the result may hold fewer than `max_colours`
/// entries. When no more distinct buckets than `max_colours` survive the first
/// pass, each becomes its own swatch with its exact pixel count.
pub fn quantize<F: Filter + ?Sized>(
    pixels: &[Colour],
    max_colours: usize,
    filter: &F,
) -> Result<Vec<Swatch>, PaletteError> {
    if max_colours == 0 {
        return Err(PaletteError::InvalidMaxColours(max_colours));
    }
    if pixels.is_empty() {
        return Ok(Vec::new());
    }

    let mut hist = Histogram::build(pixels, filter);
    let distinct = hist.distinct();

    let swatches = if distinct <= max_colours {
        hist.colours()
            .iter()
            .map(|&q| Swatch::new(histogram::approximate_quantized(q), hist.count(q)))
            .collect()
    } else {
        median_cut::median_cut(&mut hist, max_colours)
    };

    // Averages can land on colours the filter rejects.
    let swatches: Vec<Swatch> = swatches
        .into_iter()
        .filter(|s| filter.allows(s.colour()))
        .collect();

    log::debug!(
        "quantized {} pixels: {} buckets, {} swatches (max {})",
        pixels.len(),
        distinct,
        swatches.len(),
        max_colours
    );
    Ok(swatches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_all(_: Colour) -> bool {
        true
    }

    #[test]
    fn zero_max_colours_is_error() {
        let err = quantize(&[Colour::BLACK], 0, &allow_all);
        assert_eq!(err, Err(PaletteError::InvalidMaxColours(0)));
    }

    #[test]
    fn empty_input() {
        assert!(quantize(&[], 4, &allow_all).unwrap().is_empty());
    }

    #[test]
    fn few_colours_pass_through_exactly() {
        let mut pixels = vec![Colour::from_rgb(16, 32, 200); 7];
        pixels.extend([Colour::from_rgb(200, 8, 8); 3]);
        let swatches = quantize(&pixels, 16, &allow_all).unwrap();
        assert_eq!(swatches.len(), 2);
        let blue = swatches.iter().find(|s| s.colour().blue() == 200).unwrap();
        assert_eq!(blue.population(), 7);
        assert_eq!(blue.colour(), Colour::from_rgb(16, 32, 200));
    }

    #[test]
    fn filtered_input_is_empty() {
        let pixels = [Colour::WHITE, Colour::BLACK];
        assert!(quantize(&pixels, 4, &DefaultFilter).unwrap().is_empty());
    }

    #[test]
    fn post_filter_drops_rejected_averages() {
        // Black and white average to mid grey, which the filter refuses.
        let pixels = [Colour::BLACK, Colour::WHITE];
        let no_grey = |c: Colour| c.hsl().l < 0.4 || c.hsl().l > 0.6;
        assert!(quantize(&pixels, 1, &no_grey).unwrap().is_empty());
    }

    #[test]
    fn translucent_pixels_become_opaque_swatches() {
        let pixels = [Colour::from_argb(10, 40, 90, 200); 4];
        let swatches = quantize(&pixels, 4, &allow_all).unwrap();
        assert!(swatches[0].colour().is_opaque());
    }
}
