use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{
    eyre::{WrapErr, eyre},
    owo_colors::OwoColorize,
};
use comm_core::{Comm, CommChecker, CubeState, Letter, PieceType, Sequence, SheetConfig};
use env_logger::TimestampPrecision;
use log::{LevelFilter, info};

use crate::{config::CliConfig, report::print_report};

mod config;
mod report;

/// Checks blindfolded-solving comm sheets
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional configuration file with default buffers and label tables, in
    /// TOML format
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every comm of a CSV comm sheet
    Check {
        /// The sheet; rows are the second target and columns the first
        file: PathBuf,
        /// What piece type the sheet is for: `e` for edges or `c` for corners
        #[arg(short = 't', long)]
        piece_type: PieceType,
        /// The buffer (default is 'c')
        #[arg(short, long)]
        buffer: Option<Letter>,
        /// Sheet includes row and column headers
        #[arg(short = 'r', long)]
        headers: bool,
        /// Sheet has empty rows and columns for the buffer piece
        #[arg(short, long)]
        empty_buffer_groups: bool,
        /// Ignore unexpectedly empty entries
        #[arg(short, long)]
        ignore_empty: bool,
    },
    /// Check one comm against a pair of targets
    Verify {
        /// The comm, e.g. "[R U R', D]"
        comm: String,
        target1: Letter,
        target2: Letter,
        #[arg(short = 't', long)]
        piece_type: PieceType,
        #[arg(short, long)]
        buffer: Option<Letter>,
    },
    /// Print the moves a comm expands to
    Expand {
        /// The comm, e.g. "[U: [S, R' B R]]"
        comm: String,
    },
    /// Print the cube after a sequence of moves
    State {
        /// The moves, e.g. "R U R' U'"
        sequence: Option<String>,
        /// Read the moves from a file instead; `#` starts a comment
        #[arg(short, long, conflicts_with = "sequence")]
        file: Option<PathBuf>,
    },
    /// Print a random sequence of moves
    Scramble {
        #[arg(short, long, default_value_t = 25)]
        length: usize,
        /// Use slices, wide turns, and rotations as well as face turns
        #[arg(short, long)]
        all_moves: bool,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            file,
            piece_type,
            buffer,
            headers,
            empty_buffer_groups,
            ignore_empty,
        } => {
            let tables = config.tables()?;
            let sheet = SheetConfig {
                buffer: config.buffer(piece_type, buffer),
                piece_type,
                includes_headers: headers,
                includes_empty_buffer_groups: empty_buffer_groups,
            };

            let rows = report::read_sheet(&file)?;
            info!("Read sheet: path={} rows={}", file.display(), rows.len());

            let report = CommChecker::new(&tables)
                .validate_sheet(&rows, &sheet)
                .wrap_err_with(|| format!("Failed to validate {}", file.display()))?;

            print_report(&report, ignore_empty);
        }
        Commands::Verify {
            comm,
            target1,
            target2,
            piece_type,
            buffer,
        } => {
            let tables = config.tables()?;
            let buffer = config.buffer(piece_type, buffer);

            let comm = comm.parse::<Comm>()?;
            let verdict = CommChecker::new(&tables)
                .check_comm(&comm, piece_type, buffer, target1, target2)?;

            println!("{}", comm.to_sequence());
            if verdict.is_valid() {
                println!("{}", verdict.green());
            } else {
                println!("{}", verdict.red());
            }
        }
        Commands::Expand { comm } => {
            println!("{}", comm.parse::<Comm>()?.to_sequence());
        }
        Commands::State { sequence, file } => {
            let moves = match (sequence, file) {
                (Some(sequence), _) => sequence.parse::<Sequence>()?,
                (None, Some(file)) => {
                    let text = std::fs::read_to_string(&file)
                        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
                    Sequence::from_commented(&text)?
                }
                (None, None) => return Err(eyre!("Give either a sequence or a file of moves")),
            };

            let mut cube = CubeState::new();
            cube.execute_all(&moves);

            print!("{cube}");
            if cube.is_solved() {
                println!("{}", "Solved".green());
            }
        }
        Commands::Scramble {
            length,
            all_moves,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };

            println!("{}", Sequence::random(length, !all_moves, &mut rng));
        }
    }

    Ok(())
}
