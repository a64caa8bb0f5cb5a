use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("bitmap dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("max_colours must be at least 1, got {0}")]
    InvalidMaxColours(usize),

    #[error("background colour must be fully opaque, got alpha {0}")]
    TranslucentBackground(u8),

    #[error("region ({left}, {top}) -> ({right}, {bottom}) contains no pixels")]
    EmptyRegion {
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
    },
}
