//! Deciding whether a comm performs the 3-cycle it's filed under.

use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::{
    comm::{Comm, CommError},
    cube::CubeState,
    labeling::{LabelingError, LabelingTables, Letter, PieceType},
};

/// The verdict for one comm, or one cell of a comm sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommValidity {
    UnbalancedBrackets,
    IllegalMove,
    ParsingError,
    DisruptsOtherPieces,
    IncorrectCycle,
    UnexpectedEmpty,
    ShouldBeEmpty,
    Valid,
}

impl CommValidity {
    pub const ALL: [CommValidity; 8] = [
        CommValidity::UnbalancedBrackets,
        CommValidity::IllegalMove,
        CommValidity::ParsingError,
        CommValidity::DisruptsOtherPieces,
        CommValidity::IncorrectCycle,
        CommValidity::UnexpectedEmpty,
        CommValidity::ShouldBeEmpty,
        CommValidity::Valid,
    ];

    pub fn is_valid(self) -> bool {
        self == CommValidity::Valid
    }

    /// Heading used when listing cells with this verdict
    pub fn title(self) -> &'static str {
        match self {
            CommValidity::UnbalancedBrackets => "UNBALANCED BRACKETS",
            CommValidity::IllegalMove => "ILLEGAL MOVE",
            CommValidity::ParsingError => "PARSING ERROR",
            CommValidity::DisruptsOtherPieces => "DISRUPTS OTHER PIECES",
            CommValidity::IncorrectCycle => "INCORRECT CYCLE",
            CommValidity::UnexpectedEmpty => "UNEXPECTED EMPTY",
            CommValidity::ShouldBeEmpty => "SHOULD BE EMPTY",
            CommValidity::Valid => "VALID",
        }
    }
}

impl fmt::Display for CommValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl From<&CommError> for CommValidity {
    fn from(err: &CommError) -> Self {
        match err {
            CommError::UnbalancedBrackets(_) => CommValidity::UnbalancedBrackets,
            CommError::IllegalMove(_) => CommValidity::IllegalMove,
            CommError::MalformedComm(_) => CommValidity::ParsingError,
        }
    }
}

/// Checks comms against the 3-cycle they're supposed to perform.
#[derive(Debug, Clone, Copy)]
pub struct CommChecker<'a> {
    tables: &'a LabelingTables,
}

impl<'a> CommChecker<'a> {
    pub fn new(tables: &'a LabelingTables) -> CommChecker<'a> {
        CommChecker { tables }
    }

    pub fn tables(&self) -> &'a LabelingTables {
        self.tables
    }

    /// Run `comm` on a solved cube and decide whether it cycles
    /// `buffer -> target1 -> target2 -> buffer` while leaving every other
    /// piece alone.
    ///
    /// # Errors
    ///
    /// `InvalidPieceState` if the resulting cube can't be read back as pieces.
    pub fn check_comm(
        &self,
        comm: &Comm,
        piece_type: PieceType,
        buffer: Letter,
        target1: Letter,
        target2: Letter,
    ) -> Result<CommValidity, LabelingError> {
        let moves = comm.to_sequence();

        let mut cube = CubeState::new();
        cube.execute_all(&moves);

        let other = self.tables.report(piece_type.other(), &cube)?;
        let relevant = self.tables.report(piece_type, &cube)?;

        // Pieces holding the buffer or a target are the only ones allowed to move
        let involved = [buffer, target1, target2];
        let bystander = |letter: Letter| {
            !involved
                .iter()
                .any(|&piece| self.tables.are_related(piece_type, piece, letter))
        };
        let moved_bystander = Letter::all()
            .filter(|&letter| bystander(letter))
            .any(|letter| !relevant.is_fixed(letter));

        let verdict = if !other.is_identity() || moved_bystander {
            CommValidity::DisruptsOtherPieces
        } else if relevant[target1] == buffer
            && relevant[target2] == target1
            && relevant[buffer] == target2
        {
            CommValidity::Valid
        } else {
            CommValidity::IncorrectCycle
        };

        debug!(
            target: "comm_check",
            "Checked comm: notation={:?} moves=\"{moves}\" {piece_type}_report={relevant} \
             buffer={buffer} targets={target1}{target2} verdict={verdict:?}",
            comm.notation(),
        );

        Ok(verdict)
    }

    /// Classify the raw text of a sheet cell for the targets `target1` and
    /// `target2`. Parse failures become verdicts.
    ///
    /// # Errors
    ///
    /// `InvalidPieceState` if the resulting cube can't be read back as pieces.
    pub fn classify_cell(
        &self,
        cell: &str,
        piece_type: PieceType,
        buffer: Letter,
        target1: Letter,
        target2: Letter,
    ) -> Result<CommValidity, LabelingError> {
        let empty = cell.trim().is_empty();

        let verdict = if self.tables.are_related(piece_type, target1, target2) {
            if empty {
                CommValidity::Valid
            } else {
                CommValidity::ShouldBeEmpty
            }
        } else if empty {
            CommValidity::UnexpectedEmpty
        } else {
            match Comm::parse(cell) {
                Ok(comm) => return self.check_comm(&comm, piece_type, buffer, target1, target2),
                Err(err) => {
                    trace!(
                        target: "comm_check",
                        "Cell failed to parse: targets={target1}{target2} error={err}"
                    );
                    CommValidity::from(&err)
                }
            }
        };

        trace!(
            target: "comm_check",
            "Classified cell: targets={target1}{target2} verdict={verdict:?}"
        );

        Ok(verdict)
    }
}
