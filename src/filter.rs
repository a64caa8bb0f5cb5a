//! Colour predicates applied by the quantizer before and after box splitting.

use crate::colour::{Colour, Hsl};

/// Decides whether a colour may appear in a palette.
pub trait Filter {
    fn allows(&self, colour: Colour) -> bool;
}

impl<F> Filter for F
where
    F: Fn(Colour) -> bool,
{
    fn allows(&self, colour: Colour) -> bool {
        self(colour)
    }
}

/// Rejects near-black, near-white and the red "I-line" band that JPEG
/// artefacts tend to produce around skin tones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFilter;

impl DefaultFilter {
    const BLACK_MAX_LIGHTNESS: f32 = 0.05;
    const WHITE_MIN_LIGHTNESS: f32 = 0.95;

    fn is_near_red_i_line(hsl: Hsl) -> bool {
        (10.0..=37.0).contains(&hsl.h) && hsl.s <= 0.82
    }
}

impl Filter for DefaultFilter {
    fn allows(&self, colour: Colour) -> bool {
        let hsl = colour.hsl();
        hsl.l > Self::BLACK_MAX_LIGHTNESS
            && hsl.l < Self::WHITE_MIN_LIGHTNESS
            && !Self::is_near_red_i_line(hsl)
    }
}

/// Rejects colours whose HSL lightness is at most 0.08 or at least 0.90.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlackWhiteFilter;

impl BlackWhiteFilter {
    const BLACK_MAX_LIGHTNESS: f32 = 0.08;
    const WHITE_MIN_LIGHTNESS: f32 = 0.90;

    pub fn is_black_or_white(colour: Colour) -> bool {
        let l = colour.hsl().l;
        l <= Self::BLACK_MAX_LIGHTNESS || l >= Self::WHITE_MIN_LIGHTNESS
    }
}

impl Filter for BlackWhiteFilter {
    fn allows(&self, colour: Colour) -> bool {
        !Self::is_black_or_white(colour)
    }
}

/// Rejects colours within 10 degrees of a reference hue, wrapping at 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueFilter {
    hue: f32,
}

impl HueFilter {
    const MIN_DISTANCE: f32 = 10.0;

    pub fn new(hue: f32) -> Self {
        Self { hue }
    }
}

impl Filter for HueFilter {
    fn allows(&self, colour: Colour) -> bool {
        let diff = (colour.hsl().h - self.hue).abs();
        diff > Self::MIN_DISTANCE && diff < 360.0 - Self::MIN_DISTANCE
    }
}

/// Logical AND of any number of filters. An empty set allows everything.
#[derive(Default)]
pub struct FilterSet {
    filters: Vec<Box<dyn Filter + Send + Sync>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: impl Filter + Send + Sync + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for FilterSet {
    fn allows(&self, colour: Colour) -> bool {
        self.filters.iter().all(|f| f.allows(colour))
    }
}

impl core::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilterSet")
            .field("len", &self.filters.len())
            .finish()
    }
}
