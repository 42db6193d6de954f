//! The move algebra: every turn the cube engine understands, and sequences of
//! them.

use std::{fmt, ops::Deref, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

/// A move token that doesn't name any supported move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Move '{0}' is not supported")]
pub struct IllegalMove(pub String);

/// The part of the cube turned by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    U,
    D,
    F,
    B,
    R,
    L,
    Uw,
    Dw,
    Fw,
    Bw,
    Rw,
    Lw,
    M,
    S,
    E,
    X,
    Y,
    Z,
}

impl Layer {
    /// Face layers first, then wide layers, slices, and whole-cube rotations.
    pub const ALL: [Layer; 18] = {
        use Layer::*;
        [U, D, F, B, R, L, Uw, Dw, Fw, Bw, Rw, Lw, M, S, E, X, Y, Z]
    };

    /// The canonical notation for this layer, without any turn suffix.
    pub fn symbol(self) -> &'static str {
        match self {
            Layer::U => "U",
            Layer::D => "D",
            Layer::F => "F",
            Layer::B => "B",
            Layer::R => "R",
            Layer::L => "L",
            Layer::Uw => "u",
            Layer::Dw => "d",
            Layer::Fw => "f",
            Layer::Bw => "b",
            Layer::Rw => "r",
            Layer::Lw => "l",
            Layer::M => "M",
            Layer::S => "S",
            Layer::E => "E",
            Layer::X => "x",
            Layer::Y => "y",
            Layer::Z => "z",
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Layer::X | Layer::Y | Layer::Z)
    }
}

/// How far a layer is turned, seen from the face the layer is named after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Half,
}

impl Turn {
    #[must_use]
    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
            Turn::Half => Turn::Half,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Half => "2",
        }
    }
}

/// A single move: a layer and how far it is turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub layer: Layer,
    pub turn: Turn,
}

/// The number of moves at the start of `Move::ALL` that are legal in WCA
/// competition (face turns only).
pub const WCA_MOVE_COUNT: usize = 18;

// Every accepted spelling of a layer. Suffixes are handled separately.
static LAYER_SPELLINGS: phf::Map<&'static str, Layer> = phf::phf_map! {
    "U" => Layer::U,
    "D" => Layer::D,
    "F" => Layer::F,
    "B" => Layer::B,
    "R" => Layer::R,
    "L" => Layer::L,
    "Uw" => Layer::Uw,
    "Dw" => Layer::Dw,
    "Fw" => Layer::Fw,
    "Bw" => Layer::Bw,
    "Rw" => Layer::Rw,
    "Lw" => Layer::Lw,
    "u" => Layer::Uw,
    "d" => Layer::Dw,
    "f" => Layer::Fw,
    "b" => Layer::Bw,
    "r" => Layer::Rw,
    "l" => Layer::Lw,
    "M" => Layer::M,
    "S" => Layer::S,
    "E" => Layer::E,
    "x" => Layer::X,
    "y" => Layer::Y,
    "z" => Layer::Z,
    "X" => Layer::X,
    "Y" => Layer::Y,
    "Z" => Layer::Z,
};

impl Move {
    /// All 54 moves. The WCA-legal face turns come first.
    pub const ALL: [Move; 54] = {
        let mut out = [Move::new(Layer::U, Turn::Clockwise); 54];

        let mut i = 0;
        while i < Layer::ALL.len() {
            let layer = Layer::ALL[i];
            out[3 * i] = Move::new(layer, Turn::Clockwise);
            out[3 * i + 1] = Move::new(layer, Turn::CounterClockwise);
            out[3 * i + 2] = Move::new(layer, Turn::Half);
            i += 1;
        }

        out
    };

    pub const fn new(layer: Layer, turn: Turn) -> Move {
        Move { layer, turn }
    }

    #[must_use]
    pub fn inverse(self) -> Move {
        Move::new(self.layer, self.turn.inverse())
    }

    pub fn is_half_turn(self) -> bool {
        self.turn == Turn::Half
    }

    /// Pick any of the 54 moves uniformly at random
    pub fn random(rng: &mut fastrand::Rng) -> Move {
        Move::ALL[rng.usize(..Move::ALL.len())]
    }

    /// Pick one of the WCA-legal face turns uniformly at random
    pub fn random_wca(rng: &mut fastrand::Rng) -> Move {
        Move::ALL[rng.usize(..WCA_MOVE_COUNT)]
    }
}

impl FromStr for Move {
    type Err = IllegalMove;

    /// Accepts a layer spelling followed by nothing, `'`, `2`, or `2'`. A prime
    /// on a half turn is ignored since the half turn is its own inverse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (layer, turn) = if let Some(layer) = s.strip_suffix("2'") {
            (layer, Turn::Half)
        } else if let Some(layer) = s.strip_suffix('2') {
            (layer, Turn::Half)
        } else if let Some(layer) = s.strip_suffix('\'') {
            (layer, Turn::CounterClockwise)
        } else {
            (s, Turn::Clockwise)
        };

        match LAYER_SPELLINGS.get(layer) {
            Some(&layer) => Ok(Move::new(layer, turn)),
            None => Err(IllegalMove(s.to_owned())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.layer.symbol(), self.turn.suffix())
    }
}

/// An ordered list of moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sequence(Vec<Move>);

impl Sequence {
    pub fn new(moves: Vec<Move>) -> Sequence {
        Sequence(moves)
    }

    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.0
    }

    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }

    /// The group inverse: the moves in reverse order, each one inverted.
    #[must_use]
    pub fn inverse(&self) -> Sequence {
        self.0.iter().rev().map(|mv| mv.inverse()).collect()
    }

    /// Parse moves where `#` starts a comment that runs to the end of the line.
    ///
    /// # Errors
    ///
    /// Returns the first token that isn't a supported move.
    pub fn from_commented(text: &str) -> Result<Sequence, IllegalMove> {
        text.lines()
            .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
            .flat_map(str::split_whitespace)
            .map(str::parse::<Move>)
            .collect()
    }

    /// A random sequence of `len` moves, optionally restricted to WCA-legal
    /// face turns.
    pub fn random(len: usize, wca_only: bool, rng: &mut fastrand::Rng) -> Sequence {
        (0..len)
            .map(|_| {
                if wca_only {
                    Move::random_wca(rng)
                } else {
                    Move::random(rng)
                }
            })
            .collect()
    }
}

impl Deref for Sequence {
    type Target = [Move];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Move> for Sequence {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        Sequence(iter.into_iter().collect())
    }
}

impl Extend<Move> for Sequence {
    fn extend<T: IntoIterator<Item = Move>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> Extend<&'a Move> for Sequence {
    fn extend<T: IntoIterator<Item = &'a Move>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Sequence {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Sequence {
    type Err = IllegalMove;

    /// Whitespace separated move tokens. Empty text is the empty sequence.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace().map(str::parse::<Move>).collect()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{IllegalMove, Layer, Move, Sequence, Turn, WCA_MOVE_COUNT};

    #[test]
    fn inverse_is_an_involution() {
        for mv in Move::ALL {
            assert_eq!(mv.inverse().inverse(), mv);

            if mv.is_half_turn() {
                assert_eq!(mv.inverse(), mv);
            } else {
                assert_ne!(mv.inverse(), mv);
            }
        }
    }

    #[test]
    fn every_move_has_a_unique_spelling() {
        let spellings = Move::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<HashSet<_>>();
        assert_eq!(spellings.len(), 54);

        for mv in Move::ALL {
            assert_eq!(mv.to_string().parse::<Move>(), Ok(mv));
        }
    }

    #[test]
    fn wca_moves_come_first() {
        let faces = &Layer::ALL[..6];
        for mv in &Move::ALL[..WCA_MOVE_COUNT] {
            assert!(faces.contains(&mv.layer), "{mv}");
        }
    }

    #[test]
    fn canonical_spellings() {
        let cases = [
            ("R", "R"),
            ("R'", "R'"),
            ("R2", "R2"),
            ("R2'", "R2"),
            ("Rw", "r"),
            ("Rw'", "r'"),
            ("Rw2'", "r2"),
            ("r2", "r2"),
            ("M2'", "M2"),
            ("X", "x"),
            ("y'", "y'"),
            ("z2", "z2"),
        ];

        for (input, canonical) in cases {
            let mv = input.parse::<Move>().unwrap();
            assert_eq!(mv.to_string(), canonical, "{input}");
        }
    }

    #[test]
    fn rejects_unknown_moves() {
        for bad in [
            "", "Q", "R3", "R''", "R'2", "mw", "Mw", "uw", "xw", "2", "'", "U w",
        ] {
            let parsed = bad.parse::<Move>();
            assert_eq!(parsed, Err(IllegalMove(bad.to_owned())), "{bad}");
        }
    }

    #[test]
    fn sequence_parsing_and_display() {
        let seq = "R  U R'\tU'".parse::<Sequence>().unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.to_string(), "R U R' U'");
        assert_eq!(seq[2], Move::new(Layer::R, Turn::CounterClockwise));

        assert!("".parse::<Sequence>().unwrap().is_empty());
        assert!("   ".parse::<Sequence>().unwrap().is_empty());
        assert_eq!("R U P".parse::<Sequence>(), Err(IllegalMove("P".to_owned())));
    }

    #[test]
    fn sequence_inverse() {
        let seq = "R U2 r' x".parse::<Sequence>().unwrap();
        assert_eq!(seq.inverse().to_string(), "x' r U2 R'");
        assert_eq!(seq.inverse().inverse(), seq);
        assert!(Sequence::default().inverse().is_empty());
    }

    #[test]
    fn commented_sequences() {
        let text = "# a scramble\nR U # first pair\n  F2 D'\n#R R R\nB";
        let seq = Sequence::from_commented(text).unwrap();
        assert_eq!(seq.to_string(), "R U F2 D' B");

        assert!(Sequence::from_commented("R # fine\nK").is_err());
    }

    #[test]
    fn random_sequences() {
        let mut rng = fastrand::Rng::with_seed(7);
        let seq = Sequence::random(100, true, &mut rng);
        assert_eq!(seq.len(), 100);
        let wca = &Move::ALL[..WCA_MOVE_COUNT];
        assert!(seq.iter().all(|mv| wca.contains(mv)));

        let seq = Sequence::random(25, false, &mut rng);
        assert_eq!(seq.len(), 25);
    }
}
