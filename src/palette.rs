//! Target selection over a quantized swatch set, and the builder that feeds it.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::bitmap::{Bitmap, Region};
use crate::colour::Colour;
use crate::error::PaletteError;
use crate::filter::{DefaultFilter, Filter, FilterSet};
use crate::swatch::Swatch;
use crate::target::Target;

/// Default upper bound on the number of quantized swatches.
pub const DEFAULT_MAX_COLOURS: usize = 16;
/// Bitmaps larger than this many pixels are downscaled before quantizing.
pub const DEFAULT_RESIZE_AREA: usize = 112 * 112;

/// Knobs for [`PaletteBuilder::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteConfig {
    /// Upper bound on swatches produced by the quantizer. Must be at least 1.
    pub max_colours: usize,
    /// Downscale target in pixels; `None` quantizes at full size.
    pub resize_area: Option<usize>,
    /// Sub-rectangle of the source bitmap to sample; `None` means all of it.
    pub region: Option<Region>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            max_colours: DEFAULT_MAX_COLOURS,
            resize_area: Some(DEFAULT_RESIZE_AREA),
            region: None,
        }
    }
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_colours(mut self, n: usize) -> Self {
        self.max_colours = n;
        self
    }

    /// Zero disables resizing.
    pub fn resize_area(mut self, area: usize) -> Self {
        self.resize_area = (area > 0).then_some(area);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

/// Quantized swatches plus the swatch chosen for each target.
#[derive(Debug, Clone)]
pub struct Palette {
    swatches: Vec<Swatch>,
    targets: Vec<Target>,
    selected: Vec<(Target, usize)>,
    dominant: Option<usize>,
}

impl Palette {
    /// Start building a palette from the pixels of `bitmap`.
    pub fn from_bitmap(bitmap: &Bitmap) -> PaletteBuilder<'_> {
        PaletteBuilder::with_source(Source::Bitmap(bitmap))
    }

    /// Start building a palette from already quantized swatches.
    pub fn from_swatches(swatches: Vec<Swatch>) -> PaletteBuilder<'static> {
        PaletteBuilder::with_source(Source::Swatches(swatches))
    }

    /// Score `swatches` against `targets` in order.
    pub fn new(swatches: Vec<Swatch>, targets: Vec<Target>) -> Self {
        let mut palette = Self {
            dominant: find_dominant(&swatches),
            swatches,
            targets,
            selected: Vec::new(),
        };
        palette.generate();
        palette
    }

    fn generate(&mut self) {
        let dominant_population = self
            .dominant_swatch()
            .map_or(1, Swatch::population)
            .max(1);

        let mut used = HashSet::new();
        let mut selected = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let scoring = target.normalized();
            let Some(index) = self.max_scored_swatch(&scoring, &used, dominant_population) else {
                log::debug!("no swatch for target {target:?}");
                continue;
            };
            let colour = self.swatches[index].colour();
            log::debug!("target {target:?} -> {colour}");
            if target.exclusive {
                used.insert(colour);
            }
            selected.push((*target, index));
        }
        self.selected = selected;
    }

    /// Index of the best eligible swatch. The first one wins ties.
    fn max_scored_swatch(
        &self,
        target: &Target,
        used: &HashSet<Colour>,
        dominant_population: u32,
    ) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, swatch) in self.swatches.iter().enumerate() {
            if !should_be_scored(swatch, target, used) {
                continue;
            }
            let score = score(swatch, target, dominant_population);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The swatch selected for `target`, if any qualified.
    pub fn swatch_for_target(&self, target: &Target) -> Option<&Swatch> {
        self.selected
            .iter()
            .find(|(t, _)| t == target)
            .map(|&(_, i)| &self.swatches[i])
    }

    pub fn colour_for_target(&self, target: &Target, default: Colour) -> Colour {
        self.swatch_for_target(target).map_or(default, Swatch::colour)
    }

    pub fn vibrant_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::VIBRANT)
    }

    pub fn light_vibrant_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::LIGHT_VIBRANT)
    }

    pub fn dark_vibrant_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::DARK_VIBRANT)
    }

    pub fn muted_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::MUTED)
    }

    pub fn light_muted_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::LIGHT_MUTED)
    }

    pub fn dark_muted_swatch(&self) -> Option<&Swatch> {
        self.swatch_for_target(&Target::DARK_MUTED)
    }

    pub fn vibrant_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::VIBRANT, default)
    }

    pub fn light_vibrant_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::LIGHT_VIBRANT, default)
    }

    pub fn dark_vibrant_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::DARK_VIBRANT, default)
    }

    pub fn muted_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::MUTED, default)
    }

    pub fn light_muted_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::LIGHT_MUTED, default)
    }

    pub fn dark_muted_colour(&self, default: Colour) -> Colour {
        self.colour_for_target(&Target::DARK_MUTED, default)
    }

    /// The most populous swatch, first one on ties.
    pub fn dominant_swatch(&self) -> Option<&Swatch> {
        self.dominant.map(|i| &self.swatches[i])
    }

    pub fn dominant_colour(&self, default: Colour) -> Colour {
        self.dominant_swatch().map_or(default, Swatch::colour)
    }
}

fn find_dominant(swatches: &[Swatch]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, swatch) in swatches.iter().enumerate() {
        if best.map_or(true, |(_, pop)| swatch.population() > pop) {
            best = Some((i, swatch.population()));
        }
    }
    best.map(|(i, _)| i)
}

fn should_be_scored(swatch: &Swatch, target: &Target, used: &HashSet<Colour>) -> bool {
    let hsl = swatch.hsl();
    target.saturation.contains(hsl.s)
        && target.lightness.contains(hsl.l)
        && !used.contains(&swatch.colour())
}

fn score(swatch: &Swatch, target: &Target, dominant_population: u32) -> f32 {
    let hsl = swatch.hsl();
    let weights = target.weights;

    let mut total = 0.0;
    if weights.saturation > 0.0 {
        total += weights.saturation * (1.0 - (hsl.s - target.saturation.target).abs());
    }
    if weights.lightness > 0.0 {
        total += weights.lightness * (1.0 - (hsl.l - target.lightness.target).abs());
    }
    if weights.population > 0.0 {
        total += weights.population * (swatch.population() as f32 / dominant_population as f32);
    }
    total
}

#[derive(Debug)]
enum Source<'a> {
    Bitmap(&'a Bitmap),
    Swatches(Vec<Swatch>),
}

/// Collects the source, filters, targets and config for a [`Palette`].
///
/// Starts with [`DefaultFilter`] and the six preset targets.
#[derive(Debug)]
pub struct PaletteBuilder<'a> {
    source: Source<'a>,
    config: PaletteConfig,
    filters: FilterSet,
    targets: Vec<Target>,
}

impl<'a> PaletteBuilder<'a> {
    fn with_source(source: Source<'a>) -> Self {
        let mut filters = FilterSet::new();
        filters.push(DefaultFilter);
        Self {
            source,
            config: PaletteConfig::default(),
            filters,
            targets: Target::PRESETS.to_vec(),
        }
    }

    pub fn config(mut self, config: PaletteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_colours(mut self, n: usize) -> Self {
        self.config.max_colours = n;
        self
    }

    /// Zero disables resizing.
    pub fn resize_area(mut self, area: usize) -> Self {
        self.config = self.config.resize_area(area);
        self
    }

    /// Only sample `[left, right) x [top, bottom)` of the bitmap.
    pub fn region(mut self, left: usize, top: usize, right: usize, bottom: usize) -> Self {
        self.config.region = Some(Region::new(left, top, right, bottom));
        self
    }

    pub fn clear_region(mut self) -> Self {
        self.config.region = None;
        self
    }

    pub fn add_filter(mut self, filter: impl Filter + Send + Sync + 'static) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn clear_filters(mut self) -> Self {
        self.filters.clear();
        self
    }

    /// Targets equal to one already present are ignored.
    pub fn add_target(mut self, target: Target) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn clear_targets(mut self) -> Self {
        self.targets.clear();
        self
    }

    /// Quantize (unless built from swatches) and score every target.
    pub fn generate(&self) -> Result<Palette, PaletteError> {
        let swatches = match &self.source {
            Source::Swatches(swatches) => swatches.clone(),
            Source::Bitmap(bitmap) => self.quantize_bitmap(bitmap)?,
        };
        Ok(Palette::new(swatches, self.targets.clone()))
    }

    fn quantize_bitmap(&self, bitmap: &Bitmap) -> Result<Vec<Swatch>, PaletteError> {
        if self.config.max_colours == 0 {
            return Err(PaletteError::InvalidMaxColours(self.config.max_colours));
        }

        let scaled = match self.config.resize_area {
            Some(area) => bitmap
                .scaled_to_area(area)?
                .map_or(Cow::Borrowed(bitmap), Cow::Owned),
            None => Cow::Borrowed(bitmap),
        };

        let region = match self.config.region {
            Some(region) => {
                let scale = scaled.width() as f64 / bitmap.width() as f64;
                region.scaled(scale, scaled.width(), scaled.height())
            }
            None => Region::new(0, 0, scaled.width(), scaled.height()),
        };

        let pixels = scaled.pixels_in(region)?;
        crate::quantize(&pixels, self.config.max_colours, &self.filters)
    }
}
