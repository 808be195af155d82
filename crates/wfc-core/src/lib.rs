//! Wave Function Collapse - Overlapping Model
//!
//! Synthesizes a large raster whose every local neighborhood appears in a
//! small input raster: tiles are harvested from the input, adjacency rules
//! are compiled from their one-pixel overlaps, and an entropy-ordered
//! constraint solver collapses the output cell by cell.

mod error;
mod pattern;
mod raster;
mod rules;
mod wfc;

#[cfg(feature = "image-io")]
mod io;

pub use error::WfcError;
pub use pattern::{extract_patterns, Pattern};
pub use raster::Raster;
pub use rules::{AdjacencyRules, Direction};
pub use wfc::{RunStatus, Wfc, PROP_CAP};

#[cfg(feature = "image-io")]
pub use io::{load_raster, save_raster};

/// Configuration for the overlapping model.
#[derive(Clone, Debug)]
pub struct WfcConfig {
    /// Output raster width in pixels.
    pub output_width: usize,
    /// Output raster height in pixels.
    pub output_height: usize,
    /// Tile width in pixels.
    pub tile_width: usize,
    /// Tile height in pixels.
    pub tile_height: usize,
    /// Wrap the input like a torus when harvesting tiles.
    pub expand: bool,
    /// Augment the tile set with horizontal mirrors.
    pub xflip: bool,
    /// Augment the tile set with vertical mirrors.
    pub yflip: bool,
    /// Augment the tile set with the three non-identity rotations.
    pub rotate: bool,
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self {
            output_width: 128,
            output_height: 128,
            tile_width: 3,
            tile_height: 3,
            expand: true,
            xflip: true,
            yflip: true,
            rotate: true,
        }
    }
}
