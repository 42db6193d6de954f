use std::path::Path;

use color_eyre::{eyre::WrapErr, owo_colors::OwoColorize};
use comm_core::{CommValidity, Letter, SheetReport};
use itertools::Itertools;

/// Read every row of a headerless CSV sheet as raw cell text.
pub fn read_sheet(path: &Path) -> color_eyre::Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .wrap_err_with(|| format!("Failed to open sheet {}", path.display()))?;

    reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_owned).collect::<Vec<_>>())
                .wrap_err_with(|| format!("Failed to read sheet {}", path.display()))
        })
        .collect()
}

fn pair(target1: Letter, target2: Letter) -> String {
    format!("{target1}{target2}").to_uppercase()
}

/// One block per kind of problem: a heading, an underline, and the target
/// pairs.
pub fn format_problems(problems: &[(CommValidity, Vec<(Letter, Letter)>)]) -> String {
    let mut out = String::new();

    for (verdict, pairs) in problems {
        let title = verdict.title();
        out.push_str(&format!("{}\n", title.bold().red()));
        out.push_str(&"_".repeat(title.len()));
        out.push('\n');

        for &(target1, target2) in pairs {
            out.push_str(&pair(target1, target2));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

pub fn print_report(report: &SheetReport, ignore_empty: bool) {
    let problems = report.problems(ignore_empty);

    if problems.is_empty() {
        let piece_type = report.piece_type;
        let buffer = report.buffer;
        let message = format!("Every {piece_type} comm for buffer {buffer} is valid");
        println!("{}", message.green());
        return;
    }

    print!("{}", format_problems(&problems));

    let summary = problems
        .iter()
        .map(|(verdict, pairs)| format!("{} {}", pairs.len(), verdict.title().to_lowercase()))
        .join(", ");
    println!("{} valid, {summary}", report.count(CommValidity::Valid));
}
