use crate::colour::Colour;
use crate::filter::Filter;

/// Bits kept per channel when bucketing pixels.
pub const QUANTIZE_WORD_WIDTH: u32 = 5;
const QUANTIZE_WORD_MASK: u32 = (1 << QUANTIZE_WORD_WIDTH) - 1;
/// Number of histogram buckets (32,768 at 5 bits per channel).
pub const BUCKET_COUNT: usize = 1 << (QUANTIZE_WORD_WIDTH * 3);

/// Colour channel of a quantized (15-bit) colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Extract one 5-bit channel from a quantized colour.
#[inline]
pub fn quantized_component(quantized: u16, channel: Channel) -> u32 {
    let q = quantized as u32;
    match channel {
        Channel::Red => (q >> (QUANTIZE_WORD_WIDTH * 2)) & QUANTIZE_WORD_MASK,
        Channel::Green => (q >> QUANTIZE_WORD_WIDTH) & QUANTIZE_WORD_MASK,
        Channel::Blue => q & QUANTIZE_WORD_MASK,
    }
}

#[inline]
fn modify_word_width(value: u32, from: u32, to: u32) -> u32 {
    let shifted = if to > from {
        value << (to - from)
    } else {
        value >> (from - to)
    };
    shifted & ((1 << to) - 1)
}

/// Reduce an 8-bit-per-channel colour to a 15-bit bucket key. Alpha is dropped.
#[inline]
pub fn quantize_from_rgb888(c: Colour) -> u16 {
    let r = modify_word_width(c.red() as u32, 8, QUANTIZE_WORD_WIDTH);
    let g = modify_word_width(c.green() as u32, 8, QUANTIZE_WORD_WIDTH);
    let b = modify_word_width(c.blue() as u32, 8, QUANTIZE_WORD_WIDTH);
    (r << (QUANTIZE_WORD_WIDTH * 2) | g << QUANTIZE_WORD_WIDTH | b) as u16
}

/// Widen 5-bit channels back to an opaque 8-bit colour.
#[inline]
pub fn approximate_to_rgb888(r: u32, g: u32, b: u32) -> Colour {
    let widen = |v: u32| modify_word_width(v, QUANTIZE_WORD_WIDTH, 8) as u8;
    Colour::from_rgb(widen(r), widen(g), widen(b))
}

/// Widen a 15-bit bucket key back to an opaque 8-bit colour.
#[inline]
pub fn approximate_quantized(quantized: u16) -> Colour {
    approximate_to_rgb888(
        quantized_component(quantized, Channel::Red),
        quantized_component(quantized, Channel::Green),
        quantized_component(quantized, Channel::Blue),
    )
}

/// Pixel counts per 15-bit bucket, plus the sorted list of occupied buckets.
///
/// This is the arena the median cut works over: boxes are index ranges into
/// `colours`, populations are looked up in `counts`.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u32>,
    colours: Vec<u16>,
}

impl Histogram {
    /// Count every pixel, then zero any bucket whose widened colour `filter` rejects.
    pub fn build<F: Filter + ?Sized>(pixels: &[Colour], filter: &F) -> Self {
        let mut counts = vec![0u32; BUCKET_COUNT];
        for &pixel in pixels {
            let key = quantize_from_rgb888(pixel) as usize;
            counts[key] = counts[key].saturating_add(1);
        }

        let mut colours = Vec::new();
        for (key, count) in counts.iter_mut().enumerate() {
            if *count == 0 {
                continue;
            }
            if !filter.allows(approximate_quantized(key as u16)) {
                *count = 0;
                continue;
            }
            colours.push(key as u16);
        }

        Self { counts, colours }
    }

    /// Occupied buckets in ascending key order.
    pub fn colours(&self) -> &[u16] {
        &self.colours
    }

    pub(crate) fn colours_mut(&mut self) -> &mut [u16] {
        &mut self.colours
    }

    /// Pixel count of one bucket.
    #[inline]
    pub fn count(&self, quantized: u16) -> u32 {
        self.counts[quantized as usize]
    }

    /// Number of distinct buckets that survived the filter.
    pub fn distinct(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DefaultFilter;

    fn allow_all(_: Colour) -> bool {
        true
    }

    #[test]
    fn single_color_one_bucket() {
        let pixels = vec![Colour::from_rgb(128, 128, 128); 100];
        let hist = Histogram::build(&pixels, &allow_all);
        assert_eq!(hist.distinct(), 1);
        assert_eq!(hist.count(hist.colours()[0]), 100);
    }

    #[test]
    fn near_duplicates_share_a_bucket() {
        let pixels = [
            Colour::from_rgb(128, 64, 32),
            Colour::from_rgb(135, 71, 39),
            Colour::from_rgb(136, 64, 32),
        ];
        let hist = Histogram::build(&pixels, &allow_all);
        assert_eq!(hist.distinct(), 2);
    }

    #[test]
    fn distinct_colors_separate_buckets() {
        let pixels = [Colour::BLACK, Colour::WHITE];
        let hist = Histogram::build(&pixels, &allow_all);
        assert_eq!(hist.distinct(), 2);
        assert_eq!(hist.colours(), &[0, (BUCKET_COUNT - 1) as u16]);
    }

    #[test]
    fn prefilter_zeroes_rejected_buckets() {
        let pixels = [Colour::BLACK, Colour::WHITE, Colour::from_rgb(40, 90, 200)];
        let hist = Histogram::build(&pixels, &DefaultFilter);
        assert_eq!(hist.distinct(), 1);
        assert_eq!(hist.count(0), 0);
    }

    #[test]
    fn word_width_roundtrip() {
        let c = Colour::from_rgb(0xff, 0x80, 0x07);
        let q = quantize_from_rgb888(c);
        assert_eq!(quantized_component(q, Channel::Red), 31);
        assert_eq!(quantized_component(q, Channel::Green), 16);
        assert_eq!(quantized_component(q, Channel::Blue), 0);
        assert_eq!(approximate_quantized(q), Colour::from_rgb(0xf8, 0x80, 0x00));
    }

    #[test]
    fn alpha_is_ignored() {
        let a = quantize_from_rgb888(Colour::from_argb(0, 10, 20, 30));
        let b = quantize_from_rgb888(Colour::from_argb(255, 10, 20, 30));
        assert_eq!(a, b);
    }
}
