//! Visual profiles a palette tries to fill, and the six standard presets.

const TARGET_DARK_LUMA: f32 = 0.26;
const MAX_DARK_LUMA: f32 = 0.45;
const MIN_LIGHT_LUMA: f32 = 0.55;
const TARGET_LIGHT_LUMA: f32 = 0.74;
const MIN_NORMAL_LUMA: f32 = 0.3;
const TARGET_NORMAL_LUMA: f32 = 0.5;
const MAX_NORMAL_LUMA: f32 = 0.7;
const TARGET_MUTED_SATURATION: f32 = 0.3;
const MAX_MUTED_SATURATION: f32 = 0.4;
const TARGET_VIBRANT_SATURATION: f32 = 1.0;
const MIN_VIBRANT_SATURATION: f32 = 0.35;
const WEIGHT_SATURATION: f32 = 0.24;
const WEIGHT_LUMA: f32 = 0.52;
const WEIGHT_POPULATION: f32 = 0.24;

const DEFAULT_RANGE: Range = Range::new(0.0, 0.5, 1.0);
const LIGHT_LUMA: Range = Range::new(MIN_LIGHT_LUMA, TARGET_LIGHT_LUMA, 1.0);
const NORMAL_LUMA: Range = Range::new(MIN_NORMAL_LUMA, TARGET_NORMAL_LUMA, MAX_NORMAL_LUMA);
const DARK_LUMA: Range = Range::new(0.0, TARGET_DARK_LUMA, MAX_DARK_LUMA);
const VIBRANT_SATURATION: Range = Range::new(MIN_VIBRANT_SATURATION, TARGET_VIBRANT_SATURATION, 1.0);
const MUTED_SATURATION: Range = Range::new(0.0, TARGET_MUTED_SATURATION, MAX_MUTED_SATURATION);
const DEFAULT_WEIGHTS: Weights = Weights {
    saturation: WEIGHT_SATURATION,
    lightness: WEIGHT_LUMA,
    population: WEIGHT_POPULATION,
};

/// Acceptable `[minimum, maximum]` interval and preferred value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub minimum: f32,
    pub target: f32,
    pub maximum: f32,
}

impl Range {
    pub const fn new(minimum: f32, target: f32, maximum: f32) -> Self {
        Self {
            minimum,
            target,
            maximum,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.minimum && value <= self.maximum
    }
}

/// Importance of each scoring term. A weight of zero or less disables its term.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    pub saturation: f32,
    pub lightness: f32,
    pub population: f32,
}

impl Weights {
    /// Rescale the positive weights to sum to one, leaving the rest untouched.
    pub fn normalized(self) -> Self {
        let positive = |w: f32| if w > 0.0 { w } else { 0.0 };
        let sum = positive(self.saturation) + positive(self.lightness) + positive(self.population);
        if sum == 0.0 {
            return self;
        }
        let scale = |w: f32| if w > 0.0 { w / sum } else { w };
        Self {
            saturation: scale(self.saturation),
            lightness: scale(self.lightness),
            population: scale(self.population),
        }
    }
}

/// A profile used to pick one swatch out of a quantized set.
///
/// A swatch qualifies when its HSL saturation and lightness fall inside the
/// target's ranges; among qualifying swatches the highest weighted score wins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub saturation: Range,
    pub lightness: Range,
    pub weights: Weights,
    /// A swatch chosen by an exclusive target is unavailable to later targets.
    pub exclusive: bool,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            saturation: DEFAULT_RANGE,
            lightness: DEFAULT_RANGE,
            weights: DEFAULT_WEIGHTS,
            exclusive: true,
        }
    }
}

impl Target {
    pub const LIGHT_VIBRANT: Target = Target::preset(VIBRANT_SATURATION, LIGHT_LUMA);
    pub const VIBRANT: Target = Target::preset(VIBRANT_SATURATION, NORMAL_LUMA);
    pub const DARK_VIBRANT: Target = Target::preset(VIBRANT_SATURATION, DARK_LUMA);
    pub const LIGHT_MUTED: Target = Target::preset(MUTED_SATURATION, LIGHT_LUMA);
    pub const MUTED: Target = Target::preset(MUTED_SATURATION, NORMAL_LUMA);
    pub const DARK_MUTED: Target = Target::preset(MUTED_SATURATION, DARK_LUMA);

    /// The six presets in the order a palette scores them by default.
    pub const PRESETS: [Target; 6] = [
        Target::VIBRANT,
        Target::LIGHT_VIBRANT,
        Target::DARK_VIBRANT,
        Target::MUTED,
        Target::LIGHT_MUTED,
        Target::DARK_MUTED,
    ];

    const fn preset(saturation: Range, lightness: Range) -> Self {
        Self {
            saturation,
            lightness,
            weights: DEFAULT_WEIGHTS,
            exclusive: true,
        }
    }

    pub fn builder() -> TargetBuilder {
        TargetBuilder::default()
    }

    /// Copy with weights rescaled by [`Weights::normalized`].
    pub fn normalized(self) -> Self {
        Self {
            weights: self.weights.normalized(),
            ..self
        }
    }
}

/// Optional overrides applied on top of a base target by [`TargetBuilder::build`].
///
/// Unset fields keep the base value (`min 0, target 0.5, max 1`, default weights,
/// exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetBuilder {
    pub base: Option<Target>,
    pub minimum_saturation: Option<f32>,
    pub target_saturation: Option<f32>,
    pub maximum_saturation: Option<f32>,
    pub minimum_lightness: Option<f32>,
    pub target_lightness: Option<f32>,
    pub maximum_lightness: Option<f32>,
    pub saturation_weight: Option<f32>,
    pub lightness_weight: Option<f32>,
    pub population_weight: Option<f32>,
    pub exclusive: Option<bool>,
}

impl TargetBuilder {
    /// Start from an existing target instead of the defaults.
    pub fn from_target(target: Target) -> Self {
        Self {
            base: Some(target),
            ..Self::default()
        }
    }

    pub fn minimum_saturation(mut self, v: f32) -> Self {
        self.minimum_saturation = Some(v);
        self
    }

    pub fn target_saturation(mut self, v: f32) -> Self {
        self.target_saturation = Some(v);
        self
    }

    pub fn maximum_saturation(mut self, v: f32) -> Self {
        self.maximum_saturation = Some(v);
        self
    }

    pub fn minimum_lightness(mut self, v: f32) -> Self {
        self.minimum_lightness = Some(v);
        self
    }

    pub fn target_lightness(mut self, v: f32) -> Self {
        self.target_lightness = Some(v);
        self
    }

    pub fn maximum_lightness(mut self, v: f32) -> Self {
        self.maximum_lightness = Some(v);
        self
    }

    pub fn saturation_weight(mut self, v: f32) -> Self {
        self.saturation_weight = Some(v);
        self
    }

    pub fn lightness_weight(mut self, v: f32) -> Self {
        self.lightness_weight = Some(v);
        self
    }

    pub fn population_weight(mut self, v: f32) -> Self {
        self.population_weight = Some(v);
        self
    }

    pub fn exclusive(mut self, v: bool) -> Self {
        self.exclusive = Some(v);
        self
    }

    pub fn build(&self) -> Target {
        let base = self.base.unwrap_or_default();
        Target {
            saturation: Range {
                minimum: self.minimum_saturation.unwrap_or(base.saturation.minimum),
                target: self.target_saturation.unwrap_or(base.saturation.target),
                maximum: self.maximum_saturation.unwrap_or(base.saturation.maximum),
            },
            lightness: Range {
                minimum: self.minimum_lightness.unwrap_or(base.lightness.minimum),
                target: self.target_lightness.unwrap_or(base.lightness.target),
                maximum: self.maximum_lightness.unwrap_or(base.lightness.maximum),
            },
            weights: Weights {
                saturation: self.saturation_weight.unwrap_or(base.weights.saturation),
                lightness: self.lightness_weight.unwrap_or(base.weights.lightness),
                population: self.population_weight.unwrap_or(base.weights.population),
            },
            exclusive: self.exclusive.unwrap_or(base.exclusive),
        }
    }
}
