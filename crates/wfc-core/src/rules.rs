use crate::pattern::Pattern;

/// Cardinal neighbor directions on the output grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn dx(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            _ => 0,
        }
    }

    pub fn dy(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            _ => 0,
        }
    }
}

/// The compiled adjacency relation: may pattern `b` sit next to pattern `a`
/// in a given direction.
///
/// Stored as a dense `4 * P * P` boolean matrix for constant-time lookup in
/// the propagation inner loop. Immutable once compiled.
pub struct AdjacencyRules {
    pattern_count: usize,
    allowed: Vec<bool>,
}

impl AdjacencyRules {
    /// Run the overlap test over every ordered pattern pair in every
    /// direction. Self-overlap is included: a pattern may neighbor its own
    /// copy whenever its shifted content matches itself.
    pub fn compile(patterns: &[Pattern]) -> Self {
        let pattern_count = patterns.len();
        let mut allowed = vec![false; 4 * pattern_count * pattern_count];
        for direction in Direction::ALL {
            for (a, pa) in patterns.iter().enumerate() {
                for (b, pb) in patterns.iter().enumerate() {
                    let i = (direction as usize * pattern_count + a) * pattern_count + b;
                    allowed[i] = pa.image.overlap(&pb.image, direction);
                }
            }
        }
        Self {
            pattern_count,
            allowed,
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn allowed(&self, direction: Direction, a: usize, b: usize) -> bool {
        self.allowed[(direction as usize * self.pattern_count + a) * self.pattern_count + b]
    }
}
