use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::histogram::{self, Channel, Histogram, QUANTIZE_WORD_WIDTH, quantized_component};
use crate::swatch::Swatch;

/// An inclusive index range `[lower, upper]` into the histogram's colour list,
/// with cached per-channel bounds and total population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColourBox {
    lower: usize,
    upper: usize,
    min: [u32; 3],
    max: [u32; 3],
    population: u64,
}

impl ColourBox {
    fn new(hist: &Histogram, lower: usize, upper: usize) -> Self {
        let mut b = Self {
            lower,
            upper,
            min: [0; 3],
            max: [0; 3],
            population: 0,
        };
        b.fit(hist);
        b
    }

    /// Recompute bounds and population over the current range, each channel on its own.
    fn fit(&mut self, hist: &Histogram) {
        let mut min = [u32::MAX; 3];
        let mut max = [0u32; 3];
        let mut population = 0u64;

        for &colour in &hist.colours()[self.lower..=self.upper] {
            population += hist.count(colour) as u64;
            let channels = [
                quantized_component(colour, Channel::Red),
                quantized_component(colour, Channel::Green),
                quantized_component(colour, Channel::Blue),
            ];
            for i in 0..3 {
                min[i] = min[i].min(channels[i]);
                max[i] = max[i].max(channels[i]);
            }
        }

        self.min = min;
        self.max = max;
        self.population = population;
    }

    /// Product of the per-channel extents.
    fn volume(&self) -> u32 {
        (0..3).map(|i| self.max[i] - self.min[i] + 1).product()
    }

    fn colour_count(&self) -> usize {
        self.upper - self.lower + 1
    }

    fn can_split(&self) -> bool {
        self.colour_count() > 1
    }

    /// Channel with the widest extent. Ties resolve red, then green, then blue.
    fn longest_channel(&self) -> Channel {
        let red = self.max[0] - self.min[0];
        let green = self.max[1] - self.min[1];
        let blue = self.max[2] - self.min[2];

        if red >= green && red >= blue {
            Channel::Red
        } else if green >= red && green >= blue {
            Channel::Green
        } else {
            Channel::Blue
        }
    }

    /// Sort the range along its longest channel and return the index at which
    /// the cumulative population first reaches half the box total.
    fn find_split_point(&self, hist: &mut Histogram) -> usize {
        let channel = self.longest_channel();
        hist.colours_mut()[self.lower..=self.upper]
            .sort_unstable_by_key(|&c| with_significant_channel(c, channel));

        let midpoint = self.population / 2;
        let mut count = 0u64;
        for i in self.lower..=self.upper {
            count += hist.count(hist.colours()[i]) as u64;
            if count >= midpoint {
                return i.min(self.upper - 1);
            }
        }
        self.lower
    }

    /// Split into two non-empty boxes. `self` keeps the lower half.
    fn split(&mut self, hist: &mut Histogram) -> ColourBox {
        let split_point = self.find_split_point(hist);
        let upper_half = ColourBox::new(hist, split_point + 1, self.upper);
        self.upper = split_point;
        self.fit(hist);
        upper_half
    }

    /// Population-weighted mean colour of the box.
    fn average(&self, hist: &Histogram) -> Swatch {
        let mut sums = [0u64; 3];
        let mut total = 0u64;

        for &colour in &hist.colours()[self.lower..=self.upper] {
            let pop = hist.count(colour) as u64;
            total += pop;
            sums[0] += pop * quantized_component(colour, Channel::Red) as u64;
            sums[1] += pop * quantized_component(colour, Channel::Green) as u64;
            sums[2] += pop * quantized_component(colour, Channel::Blue) as u64;
        }

        let mean = |sum: u64| (sum as f64 / total.max(1) as f64).round() as u32;
        let colour = histogram::approximate_to_rgb888(mean(sums[0]), mean(sums[1]), mean(sums[2]));
        Swatch::new(colour, u32::try_from(total).unwrap_or(u32::MAX))
    }
}

impl Ord for ColourBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.volume()
            .cmp(&other.volume())
            // Deterministic order among equal volumes: earlier ranges first.
            .then_with(|| other.lower.cmp(&self.lower))
    }
}

impl PartialOrd for ColourBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Re-pack a quantized colour so `channel` occupies the most significant bits.
fn with_significant_channel(colour: u16, channel: Channel) -> u16 {
    let r = quantized_component(colour, Channel::Red);
    let g = quantized_component(colour, Channel::Green);
    let b = quantized_component(colour, Channel::Blue);
    let (hi, mid, lo) = match channel {
        Channel::Red => return colour,
        Channel::Green => (g, r, b),
        Channel::Blue => (b, g, r),
    };
    (hi << (QUANTIZE_WORD_WIDTH * 2) | mid << QUANTIZE_WORD_WIDTH | lo) as u16
}

/// Split the histogram's colours into at most `max_colours` boxes and return
/// each box's weighted average, largest volume first.
///
/// Expects at least one occupied bucket and `max_colours >= 1`.
pub(crate) fn median_cut(hist: &mut Histogram, max_colours: usize) -> Vec<Swatch> {
    if hist.is_empty() {
        return Vec::new();
    }

    let mut boxes = BinaryHeap::with_capacity(max_colours);
    boxes.push(ColourBox::new(hist, 0, hist.distinct() - 1));

    while boxes.len() < max_colours {
        let Some(mut largest) = boxes.pop() else {
            break;
        };
        if !largest.can_split() {
            // The largest box is a single colour, so every remaining box is too.
            boxes.push(largest);
            break;
        }

        let upper_half = largest.split(hist);
        log::trace!(
            "split box [{}..={}] / [{}..={}]",
            largest.lower,
            largest.upper,
            upper_half.lower,
            upper_half.upper
        );
        boxes.push(upper_half);
        boxes.push(largest);
    }

    boxes
        .into_sorted_vec()
        .into_iter()
        .rev()
        .map(|b| b.average(hist))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;

    fn allow_all(_: Colour) -> bool {
        true
    }

    fn grey_ramp(steps: u8) -> Vec<Colour> {
        (0..steps).map(|i| Colour::from_rgb(i * 8, i * 8, i * 8)).collect()
    }

    #[test]
    fn empty_histogram() {
        let mut hist = Histogram::build(&[], &allow_all);
        assert!(median_cut(&mut hist, 16).is_empty());
    }

    #[test]
    fn produces_requested_count() {
        let mut hist = Histogram::build(&grey_ramp(32), &allow_all);
        let result = median_cut(&mut hist, 8);
        assert_eq!(result.len(), 8);
        let total: u32 = result.iter().map(Swatch::population).sum();
        assert_eq!(total, 32);
    }

    #[test]
    fn single_box_averages_everything() {
        let pixels = [Colour::from_rgb(0, 0, 0), Colour::from_rgb(16, 16, 16)];
        let mut hist = Histogram::build(&pixels, &allow_all);
        let result = median_cut(&mut hist, 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].population(), 2);
        assert_eq!(result[0].colour(), Colour::from_rgb(8, 8, 8));
    }

    #[test]
    fn weighted_entries_influence_centroids() {
        let mut pixels = vec![Colour::from_rgb(40, 40, 40); 90];
        pixels.extend(vec![Colour::from_rgb(200, 200, 200); 10]);
        let mut hist = Histogram::build(&pixels, &allow_all);
        let result = median_cut(&mut hist, 1);
        // 0.9 * 5 + 0.1 * 25 = 7 in 5-bit space.
        assert_eq!(result[0].colour(), Colour::from_rgb(56, 56, 56));
    }

    #[test]
    fn splits_along_longest_channel() {
        // Blue spans far more than red or green.
        let pixels: Vec<Colour> = (0..8)
            .map(|i| Colour::from_rgb(100, 100, i * 32))
            .collect();
        let mut hist = Histogram::build(&pixels, &allow_all);
        let result = median_cut(&mut hist, 2);
        assert_eq!(result.len(), 2);
        for s in &result {
            assert_eq!(s.colour().red(), 96);
            assert_eq!(s.population(), 4);
        }
        assert_ne!(result[0].colour().blue(), result[1].colour().blue());
    }

    #[test]
    fn split_orders_by_chosen_channel() {
        // In raw key order red dominates and would pair dark with bright greens;
        // splitting on green must re-sort the range first.
        let pixels = [
            Colour::from_rgb(0, 0, 0),
            Colour::from_rgb(8, 248, 0),
            Colour::from_rgb(16, 8, 0),
            Colour::from_rgb(24, 240, 0),
        ];
        let mut hist = Histogram::build(&pixels, &allow_all);
        let result = median_cut(&mut hist, 2);
        let mut greens: Vec<u8> = result.iter().map(|s| s.colour().green()).collect();
        greens.sort_unstable();
        assert_eq!(greens, vec![8, 248]);
    }

    #[test]
    fn refit_tracks_each_channel() {
        let hist = Histogram::build(
            &[Colour::from_rgb(200, 0, 100), Colour::from_rgb(0, 160, 40)],
            &allow_all,
        );
        let b = ColourBox::new(&hist, 0, 1);
        assert_eq!(b.min, [0, 0, 5]);
        assert_eq!(b.max, [25, 20, 12]);
        assert_eq!(b.volume(), 26 * 21 * 8);
    }

    #[test]
    fn stalls_when_nothing_splits() {
        let pixels = [Colour::from_rgb(10, 200, 30); 5];
        let mut hist = Histogram::build(&pixels, &allow_all);
        let result = median_cut(&mut hist, 4);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].population(), 5);
    }

    #[test]
    fn significant_channel_repack() {
        let c = histogram::quantize_from_rgb888(Colour::from_rgb(8, 16, 24));
        // r=1, g=2, b=3
        assert_eq!(with_significant_channel(c, Channel::Red), c);
        assert_eq!(with_significant_channel(c, Channel::Green), (2 << 10 | 1 << 5 | 3) as u16);
        assert_eq!(with_significant_channel(c, Channel::Blue), (3 << 10 | 2 << 5 | 1) as u16);
    }
}
