use core::fmt;

/// An 8-bit-per-channel ARGB colour packed as `0xAARRGGBB`.
///
/// Plain value type: every operation returns a new colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colour(u32);

impl Colour {
    pub const TRANSPARENT: Colour = Colour(0x0000_0000);
    pub const BLACK: Colour = Colour(0xff00_0000);
    pub const WHITE: Colour = Colour(0xffff_ffff);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    /// Fully opaque colour from RGB channels.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_argb(255, red, green, blue)
    }

    /// Build a colour from unbounded channel values, clamping each into `[0, 255]`.
    pub fn clamped(alpha: i32, red: i32, green: i32, blue: i32) -> Self {
        let c = |v: i32| v.clamp(0, 255) as u8;
        Self::from_argb(c(alpha), c(red), c(green), c(blue))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_opaque(self) -> bool {
        self.alpha() == 255
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self(self.0 & 0x00ff_ffff | (alpha as u32) << 24)
    }

    pub const fn with_red(self, red: u8) -> Self {
        Self(self.0 & 0xff00_ffff | (red as u32) << 16)
    }

    pub const fn with_green(self, green: u8) -> Self {
        Self(self.0 & 0xffff_00ff | (green as u32) << 8)
    }

    pub const fn with_blue(self, blue: u8) -> Self {
        Self(self.0 & 0xffff_ff00 | blue as u32)
    }

    /// HSL view of the RGB channels. Alpha is ignored.
    pub fn hsl(self) -> Hsl {
        let r = self.red() as f32 / 255.0;
        let g = self.green() as f32 / 255.0;
        let b = self.blue() as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return Hsl::new(0.0, 0.0, l);
        }

        let sector = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        let s = delta / (1.0 - (2.0 * l - 1.0).abs());

        Hsl::new((sector * 60.0).rem_euclid(360.0), s.clamp(0.0, 1.0), l)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl From<rgb::RGB8> for Colour {
    fn from(p: rgb::RGB8) -> Self {
        Self::from_rgb(p.r, p.g, p.b)
    }
}

impl From<rgb::RGBA8> for Colour {
    fn from(p: rgb::RGBA8) -> Self {
        Self::from_argb(p.a, p.r, p.g, p.b)
    }
}

impl From<Colour> for rgb::RGBA8 {
    fn from(c: Colour) -> Self {
        rgb::RGBA8 {
            r: c.red(),
            g: c.green(),
            b: c.blue(),
            a: c.alpha(),
        }
    }
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Convert back to an opaque colour, rounding and clamping each channel.
    pub fn to_colour(self) -> Colour {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let m = self.l - 0.5 * c;
        let x = c * (1.0 - ((self.h / 60.0).rem_euclid(2.0) - 1.0).abs());

        let (r, g, b) = match (self.h.rem_euclid(360.0) / 60.0) as u32 {
            0 => (c + m, x + m, m),
            1 => (x + m, c + m, m),
            2 => (m, c + m, x + m),
            3 => (m, x + m, c + m),
            4 => (x + m, m, c + m),
            _ => (c + m, m, x + m),
        };

        let channel = |v: f32| (255.0 * v).round() as i32;
        Colour::clamped(255, channel(r), channel(g), channel(b))
    }
}
