use comm_core::{
    CommChecker, CommValidity, LabelingTables, Letter, PieceType, SheetConfig, SheetError,
    SheetReport,
};

fn letter(c: char) -> Letter {
    Letter::try_from(c).unwrap()
}

fn blank(dim: usize) -> Vec<Vec<String>> {
    vec![vec![String::new(); dim]; dim]
}

fn config(piece_type: PieceType, headers: bool, empty_groups: bool) -> SheetConfig {
    SheetConfig {
        buffer: letter('c'),
        piece_type,
        includes_headers: headers,
        includes_empty_buffer_groups: empty_groups,
    }
}

fn validate(rows: &[Vec<String>], config: &SheetConfig) -> Result<SheetReport, SheetError> {
    let tables = LabelingTables::speffz().unwrap();
    CommChecker::new(&tables).validate_sheet(rows, config)
}

#[test_log::test]
fn test_compact_corner_sheet() {
    // Without the buffer's letters the order is a b d e f g h i k l n o p ...
    let mut rows = blank(21);
    rows[9][12] = "[R U R', D]".to_owned();
    rows[12][9] = "[R U R', D]".to_owned();
    rows[3][0] = "[R, U]".to_owned();
    rows[0][1] = "[R, U".to_owned();

    let report = validate(&rows, &config(PieceType::Corner, false, false)).unwrap();
    let get = |t1, t2| report.get(letter(t1), letter(t2));

    assert_eq!(get('p', 'l'), Some(CommValidity::Valid));
    assert_eq!(get('l', 'p'), Some(CommValidity::IncorrectCycle));
    assert_eq!(get('a', 'e'), Some(CommValidity::ShouldBeEmpty));
    assert_eq!(get('b', 'a'), Some(CommValidity::UnbalancedBrackets));
    assert_eq!(get('a', 'b'), Some(CommValidity::UnexpectedEmpty));

    for other in Letter::all() {
        assert_eq!(report.get(letter('j'), other), None);
        assert_eq!(report.get(other, letter('m')), None);
    }

    let grouped = report.grouped();
    let cycles = &grouped[&CommValidity::IncorrectCycle];
    assert_eq!(cycles, &[(letter('l'), letter('p'))]);
    assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), 21 * 21);

    let problems = report.problems(true);
    let kinds = problems.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            CommValidity::UnbalancedBrackets,
            CommValidity::IncorrectCycle,
            CommValidity::ShouldBeEmpty,
        ]
    );
}

#[test_log::test]
fn test_sheet_with_buffer_groups_and_headers() {
    // Every letter keeps its own row and column, shifted by the headers
    let mut rows = blank(25);
    rows[0] = std::iter::once(String::new())
        .chain(Letter::all().map(|l| l.to_string().to_uppercase()))
        .collect();
    rows[1 + 11][1 + 15] = "[R U R', D]".to_owned();
    // Buffer rows are ignored entirely
    rows[1 + 2][1 + 15] = "garbage (".to_owned();

    let report = validate(&rows, &config(PieceType::Corner, true, true)).unwrap();
    let get = |t1, t2| report.get(letter(t1), letter(t2));

    assert_eq!(get('p', 'l'), Some(CommValidity::Valid));
    assert_eq!(get('p', 'c'), None);
    assert_eq!(report.count(CommValidity::ParsingError), 0);
}

#[test_log::test]
fn test_edge_sheet() {
    // Without c and i: a b d e f g h j k l m n o p q r s t u ...
    let mut rows = blank(22);
    rows[0][18] = "[M', U2]".to_owned();
    rows[10][3] = "M: U / M'".to_owned();

    let report = validate(&rows, &config(PieceType::Edge, false, false)).unwrap();
    let get = |t1, t2| report.get(letter(t1), letter(t2));

    assert_eq!(get('u', 'a'), Some(CommValidity::Valid));
    assert_eq!(get('e', 'm'), Some(CommValidity::Valid));
    assert_eq!(report.count(CommValidity::Valid), 2 + 11 * 4);
}

#[test_log::test]
fn test_doubled_group_is_a_parsing_error() {
    let mut rows = blank(21);
    rows[9][12] = "[R U R', D]2".to_owned();

    let report = validate(&rows, &config(PieceType::Corner, false, false)).unwrap();
    let verdict = report.get(letter('p'), letter('l'));

    assert_eq!(verdict, Some(CommValidity::ParsingError));
    assert_eq!(report.count(CommValidity::IllegalMove), 0);
}

#[test_log::test]
fn test_mismatched_sheet_is_rejected() {
    let rows = blank(21);
    let err = validate(&rows, &config(PieceType::Edge, false, false)).unwrap_err();
    assert!(matches!(err, SheetError::RowCount { found: 21, .. }));
    assert!(err.to_string().contains("21 rows, but 22 were expected"));

    let mut rows = blank(24);
    rows[23].push(String::new());
    let err = validate(&rows, &config(PieceType::Edge, false, true)).unwrap_err();
    assert!(matches!(err, SheetError::ColumnCount { row: 23, .. }));
    assert!(err.to_string().contains("25 columns, but 24 were expected"));
}
