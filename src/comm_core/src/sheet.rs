//! Validating a whole comm sheet: a grid with one cell per pair of targets.
//!
//! Rows are indexed by the second target and columns by the first. Sheets
//! either leave out the rows and columns of the buffer's own letters or keep
//! them as empty groups, and may carry a header row and column.

use std::{collections::BTreeMap, thread::available_parallelism};

use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    labeling::{LETTER_COUNT, LabelingError, Letter, PieceType},
    validity::{CommChecker, CommValidity},
};

const FLAG_SUGGESTION: &str =
    "Check whether the sheet has headers or empty rows and columns for the buffer piece";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet has {found} rows, but {expected} were expected. {FLAG_SUGGESTION}")]
    RowCount { found: usize, expected: usize },
    #[error("Row {row} has {found} columns, but {expected} were expected. {FLAG_SUGGESTION}")]
    ColumnCount {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error(transparent)]
    InvalidPieceState(#[from] LabelingError),
    #[error("A sheet worker thread panicked")]
    WorkerPanicked,
}

/// How a sheet is laid out and what it's for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub buffer: Letter,
    pub piece_type: PieceType,
    #[serde(default)]
    pub includes_headers: bool,
    #[serde(default)]
    pub includes_empty_buffer_groups: bool,
}

impl SheetConfig {
    /// The number of rows, and of columns in every non-header row
    pub fn expected_dimension(self) -> usize {
        let mut expected = LETTER_COUNT;

        if !self.includes_empty_buffer_groups {
            expected -= self.piece_type.piece_size();
        }

        if self.includes_headers {
            expected += 1;
        }

        expected
    }

    fn check_dimensions(self, rows: &[Vec<String>]) -> Result<(), SheetError> {
        let expected = self.expected_dimension();

        if rows.len() != expected {
            return Err(SheetError::RowCount {
                found: rows.len(),
                expected,
            });
        }

        for (i, row) in rows.iter().enumerate() {
            if self.includes_headers && i == 0 {
                continue;
            }

            if row.len() != expected {
                return Err(SheetError::ColumnCount {
                    row: i,
                    found: row.len(),
                    expected,
                });
            }
        }

        Ok(())
    }
}

/// Every verdict of a sheet, indexed `[target1][target2]`. Pairs involving the
/// buffer piece are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub buffer: Letter,
    pub piece_type: PieceType,
    verdicts: [[Option<CommValidity>; LETTER_COUNT]; LETTER_COUNT],
}

impl SheetReport {
    pub fn get(&self, target1: Letter, target2: Letter) -> Option<CommValidity> {
        self.verdicts[target1.index()][target2.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Letter, Letter, CommValidity)> + '_ {
        Letter::all().flat_map(move |t1| {
            Letter::all().filter_map(move |t2| self.get(t1, t2).map(|verdict| (t1, t2, verdict)))
        })
    }

    /// Target pairs grouped by verdict
    pub fn grouped(&self) -> BTreeMap<CommValidity, Vec<(Letter, Letter)>> {
        let mut groups = BTreeMap::<_, Vec<_>>::new();

        for (t1, t2, verdict) in self.iter() {
            groups.entry(verdict).or_default().push((t1, t2));
        }

        groups
    }

    /// The groups that need fixing. Unexpectedly empty cells can be left out
    /// for sheets that are still being filled in.
    pub fn problems(&self, ignore_empty: bool) -> Vec<(CommValidity, Vec<(Letter, Letter)>)> {
        let mut groups = self.grouped();
        groups.remove(&CommValidity::Valid);

        if ignore_empty {
            groups.remove(&CommValidity::UnexpectedEmpty);
        }

        groups.into_iter().collect()
    }

    pub fn count(&self, verdict: CommValidity) -> usize {
        self.iter().filter(|&(_, _, v)| v == verdict).count()
    }
}

struct Cell<'s> {
    target1: Letter,
    target2: Letter,
    text: &'s str,
}

impl CommChecker<'_> {
    /// Classify every cell of a sheet.
    ///
    /// # Errors
    ///
    /// Fails before classifying anything if the sheet's shape doesn't match
    /// `config`, and fails the batch on `InvalidPieceState`.
    pub fn validate_sheet(
        &self,
        rows: &[Vec<String>],
        config: &SheetConfig,
    ) -> Result<SheetReport, SheetError> {
        config.check_dimensions(rows)?;

        let skip = usize::from(config.includes_headers);
        let grid = rows
            .iter()
            .skip(skip)
            .map(|row| &row[skip..])
            .collect::<Vec<_>>();

        let piece_type = config.piece_type;
        let buffer = config.buffer;

        // The grid index of every non-buffer letter
        let mut indexed = Vec::with_capacity(LETTER_COUNT);
        let mut index = 0;
        for letter in Letter::all() {
            if self.tables().are_related(piece_type, buffer, letter) {
                if config.includes_empty_buffer_groups {
                    index += 1;
                }
                continue;
            }
            indexed.push((letter, index));
            index += 1;
        }

        let cells = indexed
            .iter()
            .cartesian_product(&indexed)
            .map(|(&(target1, col), &(target2, row))| Cell {
                target1,
                target2,
                text: &grid[row][col],
            })
            .collect::<Vec<_>>();

        let workers = match available_parallelism() {
            Ok(v) => v.get(),
            Err(e) => {
                warn!("Failed to get available parallelism; defaulting to 1: {e}");
                1
            }
        };
        let chunk_size = cells.len().div_ceil(workers).max(1);

        let classify = |cell: &Cell| {
            self.classify_cell(cell.text, piece_type, buffer, cell.target1, cell.target2)
                .map(|verdict| (cell.target1, cell.target2, verdict))
        };
        let classify_chunk =
            |chunk: &[Cell]| chunk.iter().map(classify).collect::<Result<Vec<_>, _>>();

        let classified = crossbeam::thread::scope(|s| {
            let handles = cells
                .chunks(chunk_size)
                .map(|chunk| s.spawn(move |_| classify_chunk(chunk)))
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| SheetError::WorkerPanicked))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| SheetError::WorkerPanicked)??;

        let mut verdicts = [[None; LETTER_COUNT]; LETTER_COUNT];
        for chunk in classified {
            for (target1, target2, verdict) in chunk? {
                verdicts[target1.index()][target2.index()] = Some(verdict);
            }
        }

        let report = SheetReport {
            buffer,
            piece_type,
            verdicts,
        };

        let unparsable = [
            CommValidity::UnbalancedBrackets,
            CommValidity::IllegalMove,
            CommValidity::ParsingError,
        ]
        .into_iter()
        .map(|verdict| report.count(verdict))
        .sum::<usize>();
        if unparsable > 0 {
            warn!("{unparsable} cells of the {piece_type} sheet couldn't be parsed");
        }

        info!(
            "Validated {piece_type} sheet: buffer={buffer} cells={} workers={workers} valid={}",
            cells.len(),
            report.count(CommValidity::Valid),
        );

        Ok(report)
    }
}
