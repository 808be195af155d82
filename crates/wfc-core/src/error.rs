use thiserror::Error;

/// Failure classes surfaced at the library boundary.
///
/// Contradictions are deliberately distinct from argument errors so callers
/// can re-initialize and retry with a fresh seed.
#[derive(Debug, Error)]
pub enum WfcError {
    #[error("tile and output dimensions must be nonzero")]
    EmptyDimensions,

    #[error("{tile_width}x{tile_height} tiles do not fit the {width}x{height} input")]
    TileDoesNotFit {
        tile_width: usize,
        tile_height: usize,
        width: usize,
        height: usize,
    },

    #[error("contradiction: a cell ran out of candidate patterns")]
    Contradiction,

    #[cfg(feature = "image-io")]
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "image-io")]
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[cfg(feature = "image-io")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
