use imgref::{ImgRef, ImgVec};

use crate::colour::Colour;
use crate::error::PaletteError;

/// Rectangle in bitmap pixel coordinates; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Region {
    pub const fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Map this region onto a bitmap resized by `scale`, rounding outwards
    /// and clamping to the new bounds.
    pub fn scaled(self, scale: f64, width: usize, height: usize) -> Self {
        Self {
            left: (self.left as f64 * scale).floor() as usize,
            top: (self.top as f64 * scale).floor() as usize,
            right: ((self.right as f64 * scale).ceil() as usize).min(width),
            bottom: ((self.bottom as f64 * scale).ceil() as usize).min(height),
        }
    }
}

/// A rectangular grid of colours.
#[derive(Debug, Clone)]
pub struct Bitmap {
    img: ImgVec<Colour>,
}

impl Bitmap {
    /// A `width` x `height` bitmap filled with opaque white.
    pub fn new(width: usize, height: usize) -> Result<Self, PaletteError> {
        Self::from_pixels(vec![Colour::WHITE; width * height], width, height)
    }

    /// Wrap row-major pixels.
    pub fn from_pixels(
        pixels: Vec<Colour>,
        width: usize,
        height: usize,
    ) -> Result<Self, PaletteError> {
        if width == 0 || height == 0 {
            return Err(PaletteError::ZeroDimension);
        }
        if pixels.len() != width * height {
            return Err(PaletteError::DimensionMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            img: ImgVec::new(pixels, width, height),
        })
    }

    /// Convert row-major RGBA pixels, e.g. straight from a decoder.
    pub fn from_rgba(
        pixels: &[rgb::RGBA8],
        width: usize,
        height: usize,
    ) -> Result<Self, PaletteError> {
        Self::from_pixels(pixels.iter().map(|&p| p.into()).collect(), width, height)
    }

    pub fn width(&self) -> usize {
        self.img.width()
    }

    pub fn height(&self) -> usize {
        self.img.height()
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn as_img(&self) -> ImgRef<'_, Colour> {
        self.img.as_ref()
    }

    /// The pixel at `(x, y)`, or opaque white outside the bitmap.
    pub fn pixel(&self, x: usize, y: usize) -> Colour {
        if x < self.width() && y < self.height() {
            self.img[(x, y)]
        } else {
            Colour::WHITE
        }
    }

    /// Writes outside the bitmap are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, colour: Colour) {
        if x < self.width() && y < self.height() {
            self.img[(x, y)] = colour;
        }
    }

    /// Row-major pixels of `region`, clamped to the bitmap.
    pub fn pixels_in(&self, region: Region) -> Result<Vec<Colour>, PaletteError> {
        let right = region.right.min(self.width());
        let bottom = region.bottom.min(self.height());
        if region.left >= right || region.top >= bottom {
            return Err(PaletteError::EmptyRegion {
                left: region.left,
                top: region.top,
                right: region.right,
                bottom: region.bottom,
            });
        }

        let sub = self
            .img
            .sub_image(region.left, region.top, right - region.left, bottom - region.top);
        Ok(sub.pixels().collect())
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> Vec<Colour> {
        self.img.buf().clone()
    }

    /// Nearest-neighbour resample to `width` x `height`.
    pub fn scaled(&self, width: usize, height: usize) -> Result<Self, PaletteError> {
        if width == 0 || height == 0 {
            return Err(PaletteError::ZeroDimension);
        }

        let (src_w, src_h) = (self.width(), self.height());
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = y * src_h / height;
            for x in 0..width {
                let sx = x * src_w / width;
                pixels.push(self.img[(sx, sy)]);
            }
        }
        Self::from_pixels(pixels, width, height)
    }

    /// Shrink so the area is at most `max_area`, keeping the aspect ratio.
    /// Returns `None` when the bitmap is already small enough.
    pub fn scaled_to_area(&self, max_area: usize) -> Result<Option<Self>, PaletteError> {
        let area = self.area();
        if max_area == 0 || area <= max_area {
            return Ok(None);
        }
        let ratio = (max_area as f64 / area as f64).sqrt();
        let width = (self.width() as f64 * ratio).ceil() as usize;
        let height = (self.height() as f64 * ratio).ceil() as usize;
        self.scaled(width, height).map(Some)
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.img.rows().eq(other.img.rows())
    }
}

impl From<ImgVec<Colour>> for Bitmap {
    fn from(img: ImgVec<Colour>) -> Self {
        Self { img }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> Bitmap {
        let pixels = (0..width * height)
            .map(|i| Colour::from_rgb(i as u8, 0, 0))
            .collect();
        Bitmap::from_pixels(pixels, width, height).unwrap()
    }

    #[test]
    fn new_is_white() {
        let b = Bitmap::new(3, 2).unwrap();
        assert_eq!(b.width(), 3);
        assert_eq!(b.height(), 2);
        assert!(b.pixels().iter().all(|&p| p == Colour::WHITE));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(Bitmap::new(0, 4), Err(PaletteError::ZeroDimension));
        assert_eq!(
            Bitmap::from_pixels(vec![Colour::BLACK; 5], 2, 2),
            Err(PaletteError::DimensionMismatch {
                len: 5,
                width: 2,
                height: 2
            })
        );
    }

    #[test]
    fn out_of_bounds_access() {
        let mut b = numbered(2, 2);
        assert_eq!(b.pixel(5, 0), Colour::WHITE);
        b.set_pixel(9, 9, Colour::BLACK);
        b.set_pixel(1, 0, Colour::BLACK);
        assert_eq!(b.pixel(1, 0), Colour::BLACK);
        assert_eq!(b.pixel(0, 1), Colour::from_rgb(2, 0, 0));
    }

    #[test]
    fn region_is_row_major_and_clamped() {
        let b = numbered(4, 3);
        let px = b.pixels_in(Region::new(2, 1, 10, 10)).unwrap();
        let reds: Vec<u8> = px.iter().map(|c| c.red()).collect();
        assert_eq!(reds, vec![6, 7, 10, 11]);
    }

    #[test]
    fn empty_region_fails() {
        let b = numbered(4, 3);
        assert!(matches!(
            b.pixels_in(Region::new(4, 0, 8, 3)),
            Err(PaletteError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn nearest_neighbour_downscale() {
        let b = numbered(4, 4);
        let s = b.scaled(2, 2).unwrap();
        let reds: Vec<u8> = s.pixels().iter().map(|c| c.red()).collect();
        assert_eq!(reds, vec![0, 2, 8, 10]);
    }

    #[test]
    fn area_scaling() {
        let b = Bitmap::new(200, 100).unwrap();
        assert!(b.scaled_to_area(1_000_000).unwrap().is_none());
        let s = b.scaled_to_area(5000).unwrap().unwrap();
        assert_eq!((s.width(), s.height()), (100, 50));
    }

    #[test]
    fn region_scaling_rounds_outwards() {
        let r = Region::new(3, 3, 7, 7).scaled(0.5, 3, 10);
        assert_eq!(r, Region::new(1, 1, 3, 4));
    }
}
