//! Speffz lettering: which sticker each letter names, which letters share a
//! physical piece, and the permutation report read off a cube state.

use std::{
    collections::HashMap,
    fmt,
    ops::Index,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cube::{Color, CubeState, Face, N, Sticker};

/// Letters per piece type
pub const LETTER_COUNT: usize = 24;

#[derive(Error, Debug)]
pub enum LabelingError {
    #[error("File I/O error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{origin}': {source}")]
    Csv { origin: String, source: csv::Error },
    #[error("'{0}' is not a letter between a and x")]
    InvalidLetter(String),
    #[error("Unknown piece type '{0}', expected edge or corner")]
    UnknownPieceType(String),
    #[error("The {piece_type} {table} lists '{letter}' more than once")]
    DuplicateLetter {
        piece_type: PieceType,
        table: &'static str,
        letter: Letter,
    },
    #[error("The {piece_type} {table} has no entry for '{letter}'")]
    MissingLetter {
        piece_type: PieceType,
        table: &'static str,
        letter: Letter,
    },
    #[error("The {piece_type} sticker '{letter}' is off the cube: face {face} ({row}, {col})")]
    CoordinateOutOfRange {
        piece_type: PieceType,
        letter: Letter,
        face: usize,
        row: usize,
        col: usize,
    },
    #[error("The {piece_type} group '{letters}' should have {expected} letters")]
    WrongGroupSize {
        piece_type: PieceType,
        letters: String,
        expected: usize,
    },
    #[error("The {piece_type} group '{letters}' has the colors of another piece")]
    AmbiguousPiece {
        piece_type: PieceType,
        letters: String,
    },
    #[error("No {piece_type} piece has the colors now on stickers '{letters}'")]
    InvalidPieceState {
        piece_type: PieceType,
        letters: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Edge,
    Corner,
}

impl PieceType {
    pub const ALL: [PieceType; 2] = [PieceType::Edge, PieceType::Corner];

    /// Stickers on one piece of this type
    pub fn piece_size(self) -> usize {
        match self {
            PieceType::Edge => 2,
            PieceType::Corner => 3,
        }
    }

    #[must_use]
    pub fn other(self) -> PieceType {
        match self {
            PieceType::Edge => PieceType::Corner,
            PieceType::Corner => PieceType::Edge,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieceType::Edge => "edge",
            PieceType::Corner => "corner",
        })
    }
}

impl FromStr for PieceType {
    type Err = LabelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "e" | "edge" | "edges" => Ok(PieceType::Edge),
            "c" | "corner" | "corners" => Ok(PieceType::Corner),
            _ => Err(LabelingError::UnknownPieceType(s.to_owned())),
        }
    }
}

/// One of the 24 Speffz letters `a..=x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(u8);

impl Letter {
    /// `c`: the UFR corner and the UF edge
    pub const DEFAULT_BUFFER: Letter = Letter(2);

    pub fn from_index(index: usize) -> Option<Letter> {
        u8::try_from(index)
            .ok()
            .filter(|&index| usize::from(index) < LETTER_COUNT)
            .map(Letter)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn to_char(self) -> char {
        char::from(b'a' + self.0)
    }

    pub fn all() -> impl Iterator<Item = Letter> {
        (0..LETTER_COUNT).filter_map(Letter::from_index)
    }
}

impl TryFrom<char> for Letter {
    type Error = LabelingError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let lower = c.to_ascii_lowercase();
        if ('a'..='x').contains(&lower) {
            Ok(Letter(lower as u8 - b'a'))
        } else {
            Err(LabelingError::InvalidLetter(c.to_string()))
        }
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        letter.to_char()
    }
}

impl FromStr for Letter {
    type Err = LabelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        single_char(s).map_or_else(
            || Err(LabelingError::InvalidLetter(s.to_owned())),
            Letter::try_from,
        )
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// For every letter position, the letter whose sticker now sits there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermutationReport([Letter; LETTER_COUNT]);

impl PermutationReport {
    pub fn identity() -> PermutationReport {
        let mut letters = [Letter(0); LETTER_COUNT];
        for (slot, letter) in letters.iter_mut().zip(Letter::all()) {
            *slot = letter;
        }

        PermutationReport(letters)
    }

    pub fn is_fixed(&self, position: Letter) -> bool {
        self[position] == position
    }

    pub fn is_identity(&self) -> bool {
        Letter::all().all(|letter| self.is_fixed(letter))
    }

    pub fn letters(&self) -> &[Letter; LETTER_COUNT] {
        &self.0
    }
}

impl Index<Letter> for PermutationReport {
    type Output = Letter;

    fn index(&self, position: Letter) -> &Letter {
        &self.0[position.index()]
    }
}

impl fmt::Display for PermutationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.0 {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// An unordered set of colors, used to identify a piece regardless of twist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct ColorSet(u8);

impl ColorSet {
    fn insert(&mut self, color: Color) {
        self.0 |= 1 << color as u8;
    }

    fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        let mut set = ColorSet::default();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

/// A `letter,face,row,col` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CoordinateRecord {
    pub letter: char,
    pub face: usize,
    pub row: usize,
    pub col: usize,
}

/// The raw tables for one piece type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceLabels {
    pub coordinates: Vec<CoordinateRecord>,
    pub groups: Vec<Vec<char>>,
}

/// Where to find the four labeling CSV files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelPaths {
    pub edge_labels: PathBuf,
    pub corner_labels: PathBuf,
    pub edge_connections: PathBuf,
    pub corner_connections: PathBuf,
}

/// Unvalidated labeling data, as read from CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelingConfig {
    pub edges: PieceLabels,
    pub corners: PieceLabels,
}

impl LabelingConfig {
    /// The standard Speffz scheme.
    ///
    /// # Errors
    ///
    /// Only if the bundled tables are malformed.
    pub fn speffz() -> Result<LabelingConfig, LabelingError> {
        Ok(LabelingConfig {
            edges: PieceLabels {
                coordinates: parse_coordinates(
                    include_str!("../labels/edge_labels.csv"),
                    "edge_labels.csv",
                )?,
                groups: parse_groups(
                    include_str!("../labels/edge_connections.csv"),
                    "edge_connections.csv",
                )?,
            },
            corners: PieceLabels {
                coordinates: parse_coordinates(
                    include_str!("../labels/corner_labels.csv"),
                    "corner_labels.csv",
                )?,
                groups: parse_groups(
                    include_str!("../labels/corner_connections.csv"),
                    "corner_connections.csv",
                )?,
            },
        })
    }

    /// # Errors
    ///
    /// Fails if a file can't be read or isn't well-formed CSV. The contents
    /// are checked later by `LabelingTables::new`.
    pub fn load(paths: &LabelPaths) -> Result<LabelingConfig, LabelingError> {
        Ok(LabelingConfig {
            edges: PieceLabels {
                coordinates: load_coordinates(&paths.edge_labels)?,
                groups: load_groups(&paths.edge_connections)?,
            },
            corners: PieceLabels {
                coordinates: load_coordinates(&paths.corner_labels)?,
                groups: load_groups(&paths.corner_connections)?,
            },
        })
    }

    pub fn labels(&self, piece_type: PieceType) -> &PieceLabels {
        match piece_type {
            PieceType::Edge => &self.edges,
            PieceType::Corner => &self.corners,
        }
    }
}

fn read(path: &Path) -> Result<String, LabelingError> {
    std::fs::read_to_string(path).map_err(|source| LabelingError::Io {
        path: path.to_owned(),
        source,
    })
}

fn load_coordinates(path: &Path) -> Result<Vec<CoordinateRecord>, LabelingError> {
    parse_coordinates(&read(path)?, &path.display().to_string())
}

fn load_groups(path: &Path) -> Result<Vec<Vec<char>>, LabelingError> {
    parse_groups(&read(path)?, &path.display().to_string())
}

fn csv_error(origin: &str) -> impl Fn(csv::Error) -> LabelingError {
    move |source| LabelingError::Csv {
        origin: origin.to_owned(),
        source,
    }
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn parse_coordinates(text: &str, origin: &str) -> Result<Vec<CoordinateRecord>, LabelingError> {
    csv_reader(text)
        .deserialize::<CoordinateRecord>()
        .map(|record| record.map_err(csv_error(origin)))
        .collect()
}

fn parse_groups(text: &str, origin: &str) -> Result<Vec<Vec<char>>, LabelingError> {
    csv_reader(text)
        .records()
        .map(|record| {
            let record = record.map_err(csv_error(origin))?;
            record.iter().map(group_letter).collect()
        })
        .collect()
}

fn group_letter(field: &str) -> Result<char, LabelingError> {
    match single_char(field) {
        Some(c) => Ok(c),
        None => Err(LabelingError::InvalidLetter(field.to_owned())),
    }
}

/// Validated lookup tables for one piece type.
#[derive(Debug, Clone)]
struct PieceTable {
    piece_type: PieceType,
    stickers: [Sticker; LETTER_COUNT],
    /// Index into `pieces` for every letter
    piece_of: [usize; LETTER_COUNT],
    pieces: Vec<Vec<Letter>>,
    /// The solved color of every sticker of a piece, keyed by the piece's
    /// colors
    identities: HashMap<ColorSet, Vec<(Color, Letter)>>,
}

fn group_text(letters: impl IntoIterator<Item = impl fmt::Display>) -> String {
    letters.into_iter().join("")
}

impl PieceTable {
    fn new(piece_type: PieceType, labels: &PieceLabels) -> Result<PieceTable, LabelingError> {
        let mut stickers = [None; LETTER_COUNT];

        for record in &labels.coordinates {
            let letter = Letter::try_from(record.letter)?;

            let face = Face::from_index(record.face)
                .filter(|_| record.row < N && record.col < N)
                .ok_or(LabelingError::CoordinateOutOfRange {
                    piece_type,
                    letter,
                    face: record.face,
                    row: record.row,
                    col: record.col,
                })?;

            let slot = &mut stickers[letter.index()];
            if slot.is_some() {
                return Err(LabelingError::DuplicateLetter {
                    piece_type,
                    table: "labels",
                    letter,
                });
            }
            *slot = Some(Sticker::new(face, record.row, record.col));
        }

        let stickers = complete(stickers, piece_type, "labels")?;

        let mut piece_of = [None; LETTER_COUNT];
        let mut pieces = Vec::with_capacity(labels.groups.len());

        for group in &labels.groups {
            if group.len() != piece_type.piece_size() {
                return Err(LabelingError::WrongGroupSize {
                    piece_type,
                    letters: group_text(group),
                    expected: piece_type.piece_size(),
                });
            }

            let letters = group
                .iter()
                .map(|&c| Letter::try_from(c))
                .collect::<Result<Vec<_>, _>>()?;

            for &letter in &letters {
                let slot = &mut piece_of[letter.index()];
                if slot.is_some() {
                    return Err(LabelingError::DuplicateLetter {
                        piece_type,
                        table: "connections",
                        letter,
                    });
                }
                *slot = Some(pieces.len());
            }

            pieces.push(letters);
        }

        let piece_of = complete(piece_of, piece_type, "connections")?;

        let solved = CubeState::new();
        let mut identities = HashMap::with_capacity(pieces.len());

        for piece in &pieces {
            let colors = piece
                .iter()
                .map(|&letter| (solved.sticker(stickers[letter.index()]), letter))
                .collect::<Vec<_>>();
            let set = colors.iter().map(|&(color, _)| color).collect::<ColorSet>();

            if set.len() != piece.len() || identities.insert(set, colors).is_some() {
                return Err(LabelingError::AmbiguousPiece {
                    piece_type,
                    letters: group_text(piece),
                });
            }
        }

        Ok(PieceTable {
            piece_type,
            stickers,
            piece_of,
            pieces,
            identities,
        })
    }

    fn report(&self, cube: &CubeState) -> Result<PermutationReport, LabelingError> {
        let mut report = PermutationReport::identity();

        for piece in &self.pieces {
            let current = piece
                .iter()
                .map(|&position| (position, cube.sticker(self.stickers[position.index()])))
                .collect::<Vec<_>>();

            let invalid = || LabelingError::InvalidPieceState {
                piece_type: self.piece_type,
                letters: group_text(piece),
            };

            let identity = self
                .identities
                .get(&current.iter().map(|&(_, color)| color).collect::<ColorSet>())
                .ok_or_else(invalid)?;

            for (position, color) in current {
                let &(_, letter) = identity
                    .iter()
                    .find(|&&(solved_color, _)| solved_color == color)
                    .ok_or_else(invalid)?;
                report.0[position.index()] = letter;
            }
        }

        Ok(report)
    }
}

fn complete<T: Copy>(
    slots: [Option<T>; LETTER_COUNT],
    piece_type: PieceType,
    table: &'static str,
) -> Result<[T; LETTER_COUNT], LabelingError> {
    let filled = slots
        .iter()
        .zip(Letter::all())
        .map(|(slot, letter)| {
            slot.ok_or(LabelingError::MissingLetter {
                piece_type,
                table,
                letter,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(std::array::from_fn(|i| filled[i]))
}

/// The read-only labeling tables for both piece types.
#[derive(Debug, Clone)]
pub struct LabelingTables {
    edges: PieceTable,
    corners: PieceTable,
}

impl LabelingTables {
    /// # Errors
    ///
    /// Fails if either piece type's tables don't describe a consistent
    /// lettering of the cube: every letter placed exactly once on the cube,
    /// grouped into pieces of the right size that can be told apart by color.
    pub fn new(config: &LabelingConfig) -> Result<LabelingTables, LabelingError> {
        Ok(LabelingTables {
            edges: PieceTable::new(PieceType::Edge, &config.edges)?,
            corners: PieceTable::new(PieceType::Corner, &config.corners)?,
        })
    }

    /// # Errors
    ///
    /// Only if the bundled tables are malformed.
    pub fn speffz() -> Result<LabelingTables, LabelingError> {
        LabelingTables::new(&LabelingConfig::speffz()?)
    }

    fn table(&self, piece_type: PieceType) -> &PieceTable {
        match piece_type {
            PieceType::Edge => &self.edges,
            PieceType::Corner => &self.corners,
        }
    }

    /// The letters on the same physical piece as `letter`, including itself.
    pub fn related_stickers(&self, piece_type: PieceType, letter: Letter) -> &[Letter] {
        let table = self.table(piece_type);
        &table.pieces[table.piece_of[letter.index()]]
    }

    pub fn are_related(&self, piece_type: PieceType, a: Letter, b: Letter) -> bool {
        let table = self.table(piece_type);
        table.piece_of[a.index()] == table.piece_of[b.index()]
    }

    pub fn sticker(&self, piece_type: PieceType, letter: Letter) -> Sticker {
        self.table(piece_type).stickers[letter.index()]
    }

    pub fn sticker_color(&self, piece_type: PieceType, letter: Letter, cube: &CubeState) -> Color {
        cube.sticker(self.sticker(piece_type, letter))
    }

    /// # Errors
    ///
    /// `InvalidPieceState` if some piece's colors match no piece of the
    /// solved cube.
    pub fn report(
        &self,
        piece_type: PieceType,
        cube: &CubeState,
    ) -> Result<PermutationReport, LabelingError> {
        self.table(piece_type).report(cube)
    }
}

pub fn center_color(face: Face, cube: &CubeState) -> Color {
    cube.center(face)
}
