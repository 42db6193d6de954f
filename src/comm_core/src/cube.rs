//! A sticker-level model of a 3x3 cube.
//!
//! Faces are stored as an unfolded net: U, L, F, R, B, D. The side faces are
//! read with U on top, U is read with B on top and D is read with F on top.
//! Every move is built out of nine layer quarter turns and three whole-cube
//! rotations.

use std::fmt;

use crate::moves::{Layer, Move, Sequence, Turn};

/// Side length of the cube
pub const N: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Yellow,
    Red,
    Orange,
    Blue,
    Green,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Red,
        Color::Orange,
        Color::Blue,
        Color::Green,
    ];

    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Blue => 'B',
            Color::Green => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A face of the cube, numbered in net order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    U = 0,
    L = 1,
    F = 2,
    R = 3,
    B = 4,
    D = 5,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, L, F, R, B, D];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn from_index(index: usize) -> Option<Face> {
        Face::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The color of this face's center in scramble orientation
    fn solved_color(self) -> Color {
        match self {
            Face::U => Color::White,
            Face::L => Color::Orange,
            Face::F => Color::Green,
            Face::R => Color::Red,
            Face::B => Color::Blue,
            Face::D => Color::Yellow,
        }
    }
}

/// The position of one sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sticker {
    pub face: Face,
    pub row: usize,
    pub col: usize,
}

impl Sticker {
    /// `row` and `col` must be less than `N`
    pub const fn new(face: Face, row: usize, col: usize) -> Sticker {
        assert!(row < N && col < N);
        Sticker { face, row, col }
    }
}

type Grid = [[Color; N]; N];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    fn reversed(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A layer that can be turned a quarter on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slab {
    U,
    D,
    F,
    B,
    R,
    L,
    M,
    S,
    E,
}

impl Slab {
    /// The face that spins along with the layer; slices have none.
    fn face(self) -> Option<Face> {
        match self {
            Slab::U => Some(Face::U),
            Slab::D => Some(Face::D),
            Slab::F => Some(Face::F),
            Slab::B => Some(Face::B),
            Slab::R => Some(Face::R),
            Slab::L => Some(Face::L),
            Slab::M | Slab::S | Slab::E => None,
        }
    }

    /// The `i`th sticker of each of the four strips touched by a clockwise
    /// quarter turn. Strip `k` receives the contents of strip `k + 1`, and
    /// the last strip receives the first.
    fn strips(self, i: usize) -> [Sticker; 4] {
        use Face::{B, D, F, L, R, U};

        let j = N - 1 - i;
        let mid = N / 2;

        match self {
            Slab::U => [
                Sticker::new(L, 0, i),
                Sticker::new(F, 0, i),
                Sticker::new(R, 0, i),
                Sticker::new(B, 0, i),
            ],
            Slab::D => [
                Sticker::new(B, N - 1, i),
                Sticker::new(R, N - 1, i),
                Sticker::new(F, N - 1, i),
                Sticker::new(L, N - 1, i),
            ],
            Slab::F => [
                Sticker::new(L, j, N - 1),
                Sticker::new(D, 0, j),
                Sticker::new(R, i, 0),
                Sticker::new(U, N - 1, i),
            ],
            Slab::B => [
                Sticker::new(R, i, N - 1),
                Sticker::new(D, N - 1, j),
                Sticker::new(L, j, 0),
                Sticker::new(U, 0, i),
            ],
            Slab::R => [
                Sticker::new(F, i, N - 1),
                Sticker::new(D, i, N - 1),
                Sticker::new(B, j, 0),
                Sticker::new(U, i, N - 1),
            ],
            Slab::L => [
                Sticker::new(B, j, N - 1),
                Sticker::new(D, i, 0),
                Sticker::new(F, i, 0),
                Sticker::new(U, i, 0),
            ],
            Slab::M => [
                Sticker::new(B, j, mid),
                Sticker::new(D, i, mid),
                Sticker::new(F, i, mid),
                Sticker::new(U, i, mid),
            ],
            Slab::S => [
                Sticker::new(L, j, mid),
                Sticker::new(D, mid, j),
                Sticker::new(R, i, mid),
                Sticker::new(U, mid, i),
            ],
            Slab::E => [
                Sticker::new(B, mid, i),
                Sticker::new(R, mid, i),
                Sticker::new(F, mid, i),
                Sticker::new(L, mid, i),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Where a face's grid ends up under a whole-cube rotation, and how many
/// clockwise quarter turns fix up its orientation afterwards.
struct Relabel {
    to: Face,
    from: Face,
    quarter_turns: usize,
}

const fn relabel(to: Face, from: Face, quarter_turns: usize) -> Relabel {
    Relabel {
        to,
        from,
        quarter_turns,
    }
}

/// A whole-cube rotation: the two faces on the axis spin in place, the other
/// four move around it.
struct RotationWiring {
    clockwise: Face,
    counter_clockwise: Face,
    relabels: [Relabel; 4],
}

impl Axis {
    fn wiring(self, direction: Direction) -> RotationWiring {
        use Face::{B, D, F, L, R, U};

        match (self, direction) {
            (Axis::X, Direction::Clockwise) => RotationWiring {
                clockwise: R,
                counter_clockwise: L,
                relabels: [
                    relabel(B, U, 2),
                    relabel(U, F, 0),
                    relabel(F, D, 0),
                    relabel(D, B, 2),
                ],
            },
            (Axis::X, Direction::CounterClockwise) => RotationWiring {
                clockwise: L,
                counter_clockwise: R,
                relabels: [
                    relabel(D, F, 0),
                    relabel(F, U, 0),
                    relabel(U, B, 2),
                    relabel(B, D, 2),
                ],
            },
            (Axis::Y, Direction::Clockwise) => RotationWiring {
                clockwise: U,
                counter_clockwise: D,
                relabels: [
                    relabel(F, R, 0),
                    relabel(R, B, 0),
                    relabel(B, L, 0),
                    relabel(L, F, 0),
                ],
            },
            (Axis::Y, Direction::CounterClockwise) => RotationWiring {
                clockwise: D,
                counter_clockwise: U,
                relabels: [
                    relabel(L, B, 0),
                    relabel(B, R, 0),
                    relabel(R, F, 0),
                    relabel(F, L, 0),
                ],
            },
            (Axis::Z, Direction::Clockwise) => RotationWiring {
                clockwise: F,
                counter_clockwise: B,
                relabels: [
                    relabel(L, D, 1),
                    relabel(D, R, 1),
                    relabel(R, U, 1),
                    relabel(U, L, 1),
                ],
            },
            (Axis::Z, Direction::CounterClockwise) => RotationWiring {
                clockwise: B,
                counter_clockwise: F,
                relabels: [
                    relabel(L, U, 3),
                    relabel(U, R, 3),
                    relabel(R, D, 3),
                    relabel(D, L, 3),
                ],
            },
        }
    }
}

fn rotate_clockwise(grid: &Grid) -> Grid {
    let mut out = *grid;

    for (i, row) in grid.iter().enumerate() {
        for (j, &color) in row.iter().enumerate() {
            out[j][N - 1 - i] = color;
        }
    }

    out
}

fn rotate_counter_clockwise(grid: &Grid) -> Grid {
    let mut out = *grid;

    for (i, row) in grid.iter().enumerate() {
        for (j, &color) in row.iter().enumerate() {
            out[N - 1 - j][i] = color;
        }
    }

    out
}

fn rotate_grid(grid: &Grid, direction: Direction) -> Grid {
    match direction {
        Direction::Clockwise => rotate_clockwise(grid),
        Direction::CounterClockwise => rotate_counter_clockwise(grid),
    }
}

/// The colors of all 54 stickers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubeState {
    stickers: [Grid; 6],
}

impl Default for CubeState {
    fn default() -> Self {
        CubeState::new()
    }
}

impl CubeState {
    /// A solved cube in scramble orientation: white on top, green in front.
    pub fn new() -> CubeState {
        CubeState {
            stickers: Face::ALL.map(|face| [[face.solved_color(); N]; N]),
        }
    }

    pub fn sticker_at(&self, face: Face, row: usize, col: usize) -> Color {
        self.stickers[face.index()][row][col]
    }

    pub fn sticker(&self, sticker: Sticker) -> Color {
        self.sticker_at(sticker.face, sticker.row, sticker.col)
    }

    fn set_sticker(&mut self, sticker: Sticker, color: Color) {
        self.stickers[sticker.face.index()][sticker.row][sticker.col] = color;
    }

    pub fn center(&self, face: Face) -> Color {
        self.sticker_at(face, N / 2, N / 2)
    }

    pub fn execute(&mut self, mv: Move) {
        match mv.turn {
            Turn::Clockwise => self.quarter(mv.layer, Direction::Clockwise),
            Turn::CounterClockwise => self.quarter(mv.layer, Direction::CounterClockwise),
            Turn::Half => {
                self.quarter(mv.layer, Direction::Clockwise);
                self.quarter(mv.layer, Direction::Clockwise);
            }
        }
    }

    pub fn execute_all<'a>(&mut self, moves: impl IntoIterator<Item = &'a Move>) {
        for &mv in moves {
            self.execute(mv);
        }
    }

    fn quarter(&mut self, layer: Layer, direction: Direction) {
        // Wide turns carry the adjacent slice along in the same rotational
        // sense; the slices are named after L, F and D so some are reversed.
        match layer {
            Layer::U => self.turn(Slab::U, direction),
            Layer::D => self.turn(Slab::D, direction),
            Layer::F => self.turn(Slab::F, direction),
            Layer::B => self.turn(Slab::B, direction),
            Layer::R => self.turn(Slab::R, direction),
            Layer::L => self.turn(Slab::L, direction),
            Layer::Uw => {
                self.turn(Slab::U, direction);
                self.turn(Slab::E, direction.reversed());
            }
            Layer::Dw => {
                self.turn(Slab::D, direction);
                self.turn(Slab::E, direction);
            }
            Layer::Fw => {
                self.turn(Slab::F, direction);
                self.turn(Slab::S, direction);
            }
            Layer::Bw => {
                self.turn(Slab::B, direction);
                self.turn(Slab::S, direction.reversed());
            }
            Layer::Rw => {
                self.turn(Slab::R, direction);
                self.turn(Slab::M, direction.reversed());
            }
            Layer::Lw => {
                self.turn(Slab::L, direction);
                self.turn(Slab::M, direction);
            }
            Layer::M => self.turn(Slab::M, direction),
            Layer::S => self.turn(Slab::S, direction),
            Layer::E => self.turn(Slab::E, direction),
            Layer::X => self.rotate(Axis::X, direction),
            Layer::Y => self.rotate(Axis::Y, direction),
            Layer::Z => self.rotate(Axis::Z, direction),
        }

        debug_assert!(self.is_legal());
    }

    fn turn(&mut self, slab: Slab, direction: Direction) {
        if let Some(face) = slab.face() {
            let grid = &mut self.stickers[face.index()];
            *grid = rotate_grid(grid, direction);
        }

        for i in 0..N {
            let mut strips = slab.strips(i);

            if direction == Direction::CounterClockwise {
                strips.reverse();
            }

            let first = self.sticker(strips[0]);
            for k in 0..strips.len() - 1 {
                self.set_sticker(strips[k], self.sticker(strips[k + 1]));
            }
            self.set_sticker(strips[strips.len() - 1], first);
        }
    }

    fn rotate(&mut self, axis: Axis, direction: Direction) {
        let wiring = axis.wiring(direction);

        let cw = wiring.clockwise.index();
        let ccw = wiring.counter_clockwise.index();
        self.stickers[cw] = rotate_clockwise(&self.stickers[cw]);
        self.stickers[ccw] = rotate_counter_clockwise(&self.stickers[ccw]);

        let before = self.stickers;

        for relabel in wiring.relabels {
            let mut grid = before[relabel.from.index()];
            for _ in 0..relabel.quarter_turns {
                grid = rotate_clockwise(&grid);
            }
            self.stickers[relabel.to.index()] = grid;
        }
    }

    /// Rotate the whole cube so white is on top and green is in front.
    /// Returns the rotations that were applied.
    pub fn scramble_orientation(&mut self) -> Sequence {
        let mut rotations = Sequence::default();

        let mut apply = |cube: &mut CubeState, mv: Move| {
            cube.execute(mv);
            rotations.push(mv);
        };

        if self.center(Face::U) != Color::White {
            if self.center(Face::D) == Color::White {
                apply(self, Move::new(Layer::X, Turn::Half));
            } else {
                for _ in 0..4 {
                    if self.center(Face::F) == Color::White {
                        break;
                    }
                    apply(self, Move::new(Layer::Y, Turn::Clockwise));
                }
                apply(self, Move::new(Layer::X, Turn::Clockwise));
            }
        }

        for _ in 0..4 {
            if self.center(Face::F) == Color::Green {
                break;
            }
            apply(self, Move::new(Layer::Y, Turn::Clockwise));
        }

        rotations
    }

    /// Whether the cube is solved, ignoring how it is held
    pub fn is_solved(&self) -> bool {
        let mut oriented = self.clone();
        oriented.scramble_orientation();
        oriented == CubeState::new()
    }

    /// Whether applying `solution` to a copy of this cube solves it
    pub fn is_solved_by(&self, solution: &Sequence) -> bool {
        let mut copy = self.clone();
        copy.execute_all(solution);
        copy.is_solved()
    }

    /// Every color appears on exactly `N * N` stickers
    pub fn is_legal(&self) -> bool {
        let mut counts = [0; Color::ALL.len()];
        for &color in self.stickers.iter().flatten().flatten() {
            counts[color as usize] += 1;
        }

        counts.iter().all(|&count| count == N * N)
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_row = |f: &mut fmt::Formatter<'_>, row: &[Color; N]| -> fmt::Result {
            for color in row {
                write!(f, "{color} ")?;
            }
            Ok(())
        };

        for row in &self.stickers[Face::U.index()] {
            write!(f, "\t")?;
            write_row(f, row)?;
            writeln!(f)?;
        }
        writeln!(f)?;

        for i in 0..N {
            for face in [Face::L, Face::F, Face::R, Face::B] {
                write_row(f, &self.stickers[face.index()][i])?;
                write!(f, "\t")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        for row in &self.stickers[Face::D.index()] {
            write!(f, "\t")?;
            write_row(f, row)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
