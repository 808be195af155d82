use log::debug;

use crate::error::WfcError;
use crate::raster::Raster;
use crate::WfcConfig;

/// A deduplicated tile together with its occurrence count in the training
/// set. Identified by its index in the extraction result; immutable once the
/// adjacency rules are compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub image: Raster,
    pub freq: u32,
}

/// Harvest tiles from the input, augment them with the enabled mirror and
/// rotation variants, and deduplicate while summing frequencies.
///
/// With `expand` the input is first wrap-expanded by one tile minus a pixel
/// so that a tile starts at every input position; otherwise only fully
/// interior tiles are taken. Deduplication keeps the first occurrence of
/// each distinct tile, which fixes the pattern index order: harvest order
/// first, then mirrors, then rotations.
pub fn extract_patterns(input: &Raster, config: &WfcConfig) -> Result<Vec<Pattern>, WfcError> {
    let (tw, th) = (config.tile_width, config.tile_height);
    if tw == 0 || th == 0 || input.width == 0 || input.height == 0 {
        return Err(WfcError::EmptyDimensions);
    }
    if !config.expand && (tw > input.width || th > input.height) {
        return Err(WfcError::TileDoesNotFit {
            tile_width: tw,
            tile_height: th,
            width: input.width,
            height: input.height,
        });
    }

    let mut patterns = Vec::new();
    if config.expand {
        let source = input.wrap_expand(tw - 1, th - 1);
        for y in 0..input.height {
            for x in 0..input.width {
                patterns.push(Pattern {
                    image: source.window(x, y, tw, th),
                    freq: 1,
                });
            }
        }
    } else {
        for y in 0..=input.height - th {
            for x in 0..=input.width - tw {
                patterns.push(Pattern {
                    image: input.window(x, y, tw, th),
                    freq: 1,
                });
            }
        }
    }

    if config.xflip {
        let len = patterns.len();
        for i in 0..len {
            patterns.push(Pattern {
                image: patterns[i].image.flip_h(),
                freq: 1,
            });
        }
    }
    // Horizontal mirrors plus half turns already produce every vertical
    // mirror, so the pass would only feed duplicates to the dedup below.
    if config.yflip && !(config.xflip && config.rotate) {
        let len = patterns.len();
        for i in 0..len {
            patterns.push(Pattern {
                image: patterns[i].image.flip_v(),
                freq: 1,
            });
        }
    }
    if config.rotate {
        let len = patterns.len();
        for i in 0..len {
            for turns in 1..=3 {
                patterns.push(Pattern {
                    image: patterns[i].image.rot90(turns),
                    freq: 1,
                });
            }
        }
    }
    let augmented = patterns.len();

    dedup(&mut patterns);
    debug!("{} tiles harvested, {} unique patterns", augmented, patterns.len());
    Ok(patterns)
}

/// In-place first-occurrence compaction; a discarded duplicate adds its
/// frequency to the pattern that keeps its slot.
fn dedup(patterns: &mut Vec<Pattern>) {
    let mut kept = 0;
    for i in 0..patterns.len() {
        match (0..kept).find(|&j| patterns[j].image == patterns[i].image) {
            Some(j) => patterns[j].freq += patterns[i].freq,
            None => {
                patterns.swap(kept, i);
                kept += 1;
            }
        }
    }
    patterns.truncate(kept);
}
