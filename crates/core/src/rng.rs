//! RNG module - piece generators
//!
//! The default source draws each piece independently and uniformly from
//! the seven kinds, so repeats and droughts are possible. A 7-bag source
//! (each bag holds one of every kind, shuffled) is available as an opt-in,
//! plus a fixed cycling sequence for tests and scripted setups.
//!
//! Randomness comes from a small LCG so a seed reproduces a whole game.

use crate::piece::Piece;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the process-wide entropy source
    pub fn from_entropy() -> Self {
        Self::new(fastrand::u32(..))
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Which distribution new pieces are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomizer {
    /// Independent uniform draw per piece
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds
    Bag,
}

impl Randomizer {
    /// Parse from string (case-insensitive): "uniform" or "bag"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Randomizer::Uniform => "uniform",
            Randomizer::Bag => "bag",
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Uniform,
    Bag {
        bag: [PieceKind; 7],
        index: usize,
    },
    Sequence {
        kinds: Vec<PieceKind>,
        index: usize,
    },
}

/// Produces the stream of upcoming pieces
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    source: Source,
}

impl PieceGenerator {
    /// Independent uniform draws
    pub fn uniform(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            source: Source::Uniform,
        }
    }

    /// 7-bag draws: every consecutive group of seven holds each kind once
    pub fn bag(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            source: Source::Bag {
                bag: PieceKind::ALL,
                // Exhausted, so the first draw shuffles a fresh bag.
                index: PieceKind::ALL.len(),
            },
        }
    }

    pub fn from_randomizer(randomizer: Randomizer, seed: u32) -> Self {
        match randomizer {
            Randomizer::Uniform => Self::uniform(seed),
            Randomizer::Bag => Self::bag(seed),
        }
    }

    /// Cycle through a fixed list of kinds forever.
    ///
    /// An empty list behaves like [`PieceGenerator::uniform`] with seed 1.
    pub fn sequence(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<PieceKind> = kinds.into_iter().collect();
        let source = if kinds.is_empty() {
            Source::Uniform
        } else {
            Source::Sequence { kinds, index: 0 }
        };
        Self {
            rng: SimpleRng::new(1),
            source,
        }
    }

    /// Draw the next piece kind
    pub fn next_kind(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Uniform => {
                let idx = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[idx]
            }
            Source::Bag { bag, index } => {
                if *index >= bag.len() {
                    *bag = PieceKind::ALL;
                    self.rng.shuffle(bag);
                    *index = 0;
                }
                let kind = bag[*index];
                *index += 1;
                kind
            }
            Source::Sequence { kinds, index } => {
                let kind = kinds[*index];
                *index = (*index + 1) % kinds.len();
                kind
            }
        }
    }

    /// Draw the next kind as a fresh piece at spawn position
    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self {
            rng: SimpleRng::from_entropy(),
            source: Source::Uniform,
        }
    }
}
