//! Parsing, expanding, simulating, and verifying blindfolded-solving comms on a
//! 3x3 cube.

pub mod comm;
pub mod cube;
pub mod labeling;
pub mod moves;
pub mod sheet;
pub mod validity;

pub use comm::{Comm, CommError, Component};
pub use cube::{Color, CubeState, Face};
pub use labeling::{
    LabelPaths, LabelingConfig, LabelingError, LabelingTables, Letter, PermutationReport,
    PieceType,
};
pub use moves::{IllegalMove, Move, Sequence};
pub use sheet::{SheetConfig, SheetError, SheetReport};
pub use validity::{CommChecker, CommValidity};
