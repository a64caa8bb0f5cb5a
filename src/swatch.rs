use core::fmt;
use std::sync::OnceLock;

use crate::colour::{Colour, Hsl};
use crate::contrast::{self, MIN_CONTRAST_BODY_TEXT, MIN_CONTRAST_TITLE_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextColours {
    title: Colour,
    body: Colour,
}

/// A representative colour and the number of source pixels it stands for.
///
/// Title and body text colours are derived on first request and cached.
#[derive(Debug, Clone)]
pub struct Swatch {
    colour: Colour,
    population: u32,
    text: OnceLock<TextColours>,
}

impl Swatch {
    /// The colour is forced fully opaque.
    pub fn new(colour: Colour, population: u32) -> Self {
        Self {
            colour: colour.with_alpha(255),
            population,
            text: OnceLock::new(),
        }
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn hsl(&self) -> Hsl {
        self.colour.hsl()
    }

    /// White or black at the lowest alpha that reaches 3:1 against this swatch.
    pub fn title_text_colour(&self) -> Colour {
        self.text_colours().title
    }

    /// White or black at the lowest alpha that reaches 4.5:1 against this swatch.
    pub fn body_text_colour(&self) -> Colour {
        self.text_colours().body
    }

    fn text_colours(&self) -> TextColours {
        *self.text.get_or_init(|| derive_text_colours(self.colour))
    }
}

impl PartialEq for Swatch {
    fn eq(&self, other: &Self) -> bool {
        self.population == other.population && self.colour == other.colour
    }
}

impl Eq for Swatch {}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hsl = self.hsl();
        write!(
            f,
            "[RGB: {}] [HSL: {:.1}, {:.3}, {:.3}] [Population: {}] [Title Text: {}] [Body Text: {}]",
            self.colour,
            hsl.h,
            hsl.s,
            hsl.l,
            self.population,
            self.title_text_colour(),
            self.body_text_colour()
        )
    }
}

fn alpha_against(text: Colour, background: Colour, ratio: f64) -> Option<u8> {
    // Swatch colours are opaque, so the only failure left is an unreachable ratio.
    contrast::minimum_alpha(text, background, ratio).ok().flatten()
}

fn derive_text_colours(background: Colour) -> TextColours {
    let light_body = alpha_against(Colour::WHITE, background, MIN_CONTRAST_BODY_TEXT);
    let light_title = alpha_against(Colour::WHITE, background, MIN_CONTRAST_TITLE_TEXT);
    if let (Some(body), Some(title)) = (light_body, light_title) {
        return TextColours {
            title: Colour::WHITE.with_alpha(title),
            body: Colour::WHITE.with_alpha(body),
        };
    }

    let dark_body = alpha_against(Colour::BLACK, background, MIN_CONTRAST_BODY_TEXT);
    let dark_title = alpha_against(Colour::BLACK, background, MIN_CONTRAST_TITLE_TEXT);
    if let (Some(body), Some(title)) = (dark_body, dark_title) {
        return TextColours {
            title: Colour::BLACK.with_alpha(title),
            body: Colour::BLACK.with_alpha(body),
        };
    }

    // Mixed: white where it works, black otherwise. One of the two always
    // reaches 4.5:1 against an opaque colour.
    let pick = |light: Option<u8>, dark: Option<u8>| match light {
        Some(alpha) => Colour::WHITE.with_alpha(alpha),
        None => Colour::BLACK.with_alpha(dark.unwrap_or(255)),
    };
    TextColours {
        title: pick(light_title, dark_title),
        body: pick(light_body, dark_body),
    }
}
