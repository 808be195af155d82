use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::WfcError;
use crate::pattern::{extract_patterns, Pattern};
use crate::raster::Raster;
use crate::rules::{AdjacencyRules, Direction};
use crate::WfcConfig;

/// Worklist entries reserved per cell at construction time.
pub const PROP_CAP: usize = 1000;

/// Tie-breaking jitter added to each cell's entropy during selection.
const ENTROPY_JITTER: f64 = 1e-5;

/// Lifecycle of a solve. Terminal states are left by re-initializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Completed,
    Contradicted,
    BudgetExceeded,
}

/// Per-cell residual state. The candidate indices themselves live in one
/// contiguous block shared by all cells; `count` is the live prefix length
/// of this cell's slice.
#[derive(Clone, Default)]
struct Cell {
    count: usize,
    sum_freqs: u32,
    entropy: f64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct PropEntry {
    src: u32,
    dst: u32,
    direction: Direction,
}

/// Overlapping-model solver.
///
/// Owns the deduplicated patterns, the compiled adjacency relation, and the
/// residual state of every output cell. All large buffers are allocated
/// here, once; re-initialization only resets them.
pub struct Wfc {
    config: WfcConfig,
    components: usize,
    patterns: Vec<Pattern>,
    rules: AdjacencyRules,
    cells: Vec<Cell>,
    candidates: Vec<u32>,
    worklist: Vec<PropEntry>,
    cursor: usize,
    sum_freqs_global: u32,
    entropy_global: f64,
    collapsed_count: usize,
    status: RunStatus,
    seed: u64,
    rng: StdRng,
}

impl Wfc {
    /// Build a solver for the overlapping model: extract patterns from the
    /// input, compile the adjacency rules, allocate the cell and worklist
    /// buffers, and seed the RNG from wall-clock time.
    pub fn overlapping(input: &Raster, config: WfcConfig) -> Result<Self, WfcError> {
        if config.output_width == 0 || config.output_height == 0 {
            return Err(WfcError::EmptyDimensions);
        }
        let patterns = extract_patterns(input, &config)?;
        let rules = AdjacencyRules::compile(&patterns);
        let pattern_count = patterns.len();
        let cell_count = config.output_width * config.output_height;

        let sum_freqs_global: u32 = patterns.iter().map(|p| p.freq).sum();
        let entropy_global = patterns
            .iter()
            .map(|p| {
                let pr = p.freq as f64 / sum_freqs_global as f64;
                -pr * pr.ln()
            })
            .sum();

        let mut wfc = Self {
            components: input.components,
            config,
            patterns,
            rules,
            cells: vec![Cell::default(); cell_count],
            candidates: vec![0; cell_count * pattern_count],
            worklist: Vec::with_capacity(cell_count * PROP_CAP),
            cursor: 0,
            sum_freqs_global,
            entropy_global,
            collapsed_count: 0,
            status: RunStatus::Ready,
            seed: 0,
            rng: StdRng::seed_from_u64(0),
        };
        wfc.init();
        Ok(wfc)
    }

    /// Reseed from wall-clock time and reset every cell; the next `run`
    /// behaves as a fresh solve.
    pub fn init(&mut self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.init_with_seed(now.as_nanos() as u64);
    }

    /// Like `init` with a pinned RNG stream, so a given seed reproduces a
    /// solve byte-for-byte.
    pub fn init_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        let pattern_count = self.patterns.len();
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.count = pattern_count;
            cell.sum_freqs = self.sum_freqs_global;
            cell.entropy = self.entropy_global;
            let slice = &mut self.candidates[i * pattern_count..(i + 1) * pattern_count];
            for (t, slot) in slice.iter_mut().enumerate() {
                *slot = t as u32;
            }
        }
        self.worklist.clear();
        self.cursor = 0;
        self.collapsed_count = 0;
        self.status = RunStatus::Ready;
    }

    /// Collapse and propagate until no cell holds more than one candidate,
    /// a contradiction is reached, or `max_collapse_count` cells have been
    /// collapsed (`None` runs unbounded).
    ///
    /// Contradictions leave the solver restartable: re-initialize, usually
    /// with a different seed, and run again. There is no backtracking.
    pub fn run(&mut self, max_collapse_count: Option<usize>) -> Result<RunStatus, WfcError> {
        if self.status == RunStatus::Contradicted {
            return Err(WfcError::Contradiction);
        }
        self.status = RunStatus::Running;
        loop {
            if let Some(max) = max_collapse_count {
                if self.collapsed_count >= max {
                    self.status = RunStatus::BudgetExceeded;
                    debug!("budget of {max} collapses reached");
                    return Ok(self.status);
                }
            }
            let Some(cell) = self.select_cell() else {
                self.status = RunStatus::Completed;
                debug!("solve completed after {} collapses", self.collapsed_count);
                return Ok(self.status);
            };
            if let Err(err) = self.step(cell) {
                self.status = RunStatus::Contradicted;
                debug!("contradiction after {} collapses", self.collapsed_count);
                return Err(err);
            }
        }
    }

    fn step(&mut self, cell: usize) -> Result<(), WfcError> {
        self.collapse(cell)?;
        self.propagate(cell)
    }

    /// The first collapse picks uniformly; afterwards the cell with minimal
    /// jittered entropy among those still undecided. `None` means the solve
    /// is complete.
    fn select_cell(&mut self) -> Option<usize> {
        if self.collapsed_count == 0 {
            return Some(self.rng.random_range(0..self.cells.len()));
        }
        let mut best = None;
        let mut best_score = f64::INFINITY;
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.count <= 1 {
                continue;
            }
            let score = cell.entropy + ENTROPY_JITTER * self.rng.random::<f64>();
            if score < best_score {
                best_score = score;
                best = Some(i);
            }
        }
        best
    }

    /// Frequency-weighted draw over the cell's candidate prefix, in prefix
    /// order.
    fn collapse(&mut self, cell: usize) -> Result<(), WfcError> {
        let pattern_count = self.patterns.len();
        let base = cell * pattern_count;
        let count = self.cells[cell].count;
        let sum_freqs = self.cells[cell].sum_freqs;
        if sum_freqs == 0 {
            return Err(WfcError::Contradiction);
        }

        let mut r = self.rng.random_range(0..sum_freqs);
        let mut winner = self.candidates[base];
        for &t in &self.candidates[base..base + count] {
            let freq = self.patterns[t as usize].freq;
            if r < freq {
                winner = t;
                break;
            }
            r -= freq;
        }

        self.candidates[base] = winner;
        let state = &mut self.cells[cell];
        state.count = 1;
        state.sum_freqs = 0;
        state.entropy = 0.0;
        self.collapsed_count += 1;
        Ok(())
    }

    /// Drain the worklist to fixpoint, starting from the freshly collapsed
    /// cell's neighbors.
    fn propagate(&mut self, cell: usize) -> Result<(), WfcError> {
        self.worklist.clear();
        self.cursor = 0;
        self.enqueue_neighbors(cell, None);
        while self.cursor < self.worklist.len() {
            let entry = self.worklist[self.cursor];
            self.cursor += 1;
            self.filter_cell(entry)?;
        }
        Ok(())
    }

    /// Drop every candidate of `dst` that no remaining candidate of `src`
    /// allows in the entry's direction, keeping the survivors in order. A
    /// shrink re-enqueues `dst` toward its other neighbors; an emptied cell
    /// is a contradiction.
    fn filter_cell(&mut self, entry: PropEntry) -> Result<(), WfcError> {
        let pattern_count = self.patterns.len();
        let (src, dst) = (entry.src as usize, entry.dst as usize);
        let src_base = src * pattern_count;
        let src_count = self.cells[src].count;
        let dst_base = dst * pattern_count;
        let old_count = self.cells[dst].count;

        let mut kept = 0;
        for k in 0..old_count {
            let t = self.candidates[dst_base + k];
            let enabled = self.candidates[src_base..src_base + src_count]
                .iter()
                .any(|&s| self.rules.allowed(entry.direction, s as usize, t as usize));
            if enabled {
                self.candidates[dst_base + kept] = t;
                kept += 1;
            } else {
                let freq = self.patterns[t as usize].freq;
                // Removal deltas use the fixed input distribution, not the
                // cell's residual one.
                let pr = freq as f64 / self.sum_freqs_global as f64;
                let state = &mut self.cells[dst];
                state.sum_freqs -= freq;
                state.entropy += pr * pr.ln();
            }
        }

        if kept == old_count {
            return Ok(());
        }
        self.cells[dst].count = kept;
        if kept == 0 {
            return Err(WfcError::Contradiction);
        }
        if kept == 1 {
            self.collapsed_count += 1;
        }
        self.enqueue_neighbors(dst, Some(entry.direction.opposite()));
        Ok(())
    }

    /// Append propagation entries from `cell` toward its in-bounds
    /// neighbors, except in the `skip` direction, suppressing entries that
    /// already sit in the unprocessed tail of the worklist.
    fn enqueue_neighbors(&mut self, cell: usize, skip: Option<Direction>) {
        let width = self.config.output_width as isize;
        let height = self.config.output_height as isize;
        let x = (cell % self.config.output_width) as isize;
        let y = (cell / self.config.output_width) as isize;
        for direction in Direction::ALL {
            if skip == Some(direction) {
                continue;
            }
            let nx = x + direction.dx();
            let ny = y + direction.dy();
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let entry = PropEntry {
                src: cell as u32,
                dst: (ny * width + nx) as u32,
                direction,
            };
            if self.worklist[self.cursor..].contains(&entry) {
                continue;
            }
            self.worklist.push(entry);
        }
    }

    /// Average the remaining candidates of every cell into a raster,
    /// sampling the top-left pixel of each candidate pattern.
    pub fn output(&self) -> Raster {
        let pattern_count = self.patterns.len();
        let mut out = Raster::new(
            self.config.output_width,
            self.config.output_height,
            self.components,
        );
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.count == 0 {
                continue;
            }
            let mut acc = [0u32; 4];
            for &t in &self.candidates[i * pattern_count..i * pattern_count + cell.count] {
                let pixel = self.patterns[t as usize].image.get(0, 0);
                for (sum, &byte) in acc.iter_mut().zip(pixel) {
                    *sum += byte as u32;
                }
            }
            let mut pixel = [0u8; 4];
            for c in 0..self.components {
                pixel[c] = (acc[c] / cell.count as u32) as u8;
            }
            out.set(
                i % self.config.output_width,
                i / self.config.output_width,
                &pixel[..self.components],
            );
        }
        out
    }

    pub fn config(&self) -> &WfcConfig {
        &self.config
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of cells holding exactly one candidate.
    pub fn collapsed_count(&self) -> usize {
        self.collapsed_count
    }

    pub fn is_collapsed(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.config.output_width + x].count == 1
    }

    /// The candidate pattern indices still permitted at `(x, y)`, in their
    /// current draw order.
    pub fn candidates(&self, x: usize, y: usize) -> &[u32] {
        let pattern_count = self.patterns.len();
        let i = y * self.config.output_width + x;
        &self.candidates[i * pattern_count..i * pattern_count + self.cells[i].count]
    }
}
