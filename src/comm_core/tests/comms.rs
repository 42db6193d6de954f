use comm_core::{
    Comm, CommChecker, CommValidity, CubeState, LabelingTables, Letter, PieceType, Sequence,
};

fn letter(c: char) -> Letter {
    Letter::try_from(c).unwrap()
}

fn check(comm: &str, piece_type: PieceType, t1: char, t2: char) -> CommValidity {
    let tables = LabelingTables::speffz().unwrap();
    let comm = comm.parse::<Comm>().unwrap();

    CommChecker::new(&tables)
        .check_comm(&comm, piece_type, letter('c'), letter(t1), letter(t2))
        .unwrap()
}

fn classify(cell: &str, piece_type: PieceType, t1: char, t2: char) -> CommValidity {
    let tables = LabelingTables::speffz().unwrap();
    CommChecker::new(&tables)
        .classify_cell(cell, piece_type, letter('c'), letter(t1), letter(t2))
        .unwrap()
}

#[test_log::test]
fn test_valid_corner_comms() {
    let cases = [
        ("[R U R', D]", 'p', 'l'),
        ("[R' D' R, U2]", 'a', 'p'),
        ("[D: [R U R', D2]]", 'l', 't'),
    ];

    for (comm, t1, t2) in cases {
        let forward = check(comm, PieceType::Corner, t1, t2);
        let backward = check(comm, PieceType::Corner, t2, t1);

        assert_eq!(forward, CommValidity::Valid, "{comm}");
        assert_eq!(backward, CommValidity::IncorrectCycle, "{comm} reversed");
    }
}

#[test_log::test]
fn test_valid_edge_comms() {
    let cases = [
        ("[M', U2]", 'u', 'a'),
        ("M2' : (U M U M')2", 's', 'm'),
        ("[U: [R' F R, S]]", 'b', 'q'),
        ("M: U / M'", 'e', 'm'),
        ("[U' : [S , R' B R]]", 'o', 'w'),
        ("[R' : [U' R' U , M]]", 'q', 'v'),
        ("[L F' L' , S]", 'e', 'x'),
        ("[U' R' U, M']", 'k', 't'),
    ];

    for (comm, t1, t2) in cases {
        let forward = check(comm, PieceType::Edge, t1, t2);
        let backward = check(comm, PieceType::Edge, t2, t1);

        assert_eq!(forward, CommValidity::Valid, "{comm}");
        assert_eq!(backward, CommValidity::IncorrectCycle, "{comm} reversed");
    }
}

#[test_log::test]
fn test_comm_checked_for_the_wrong_targets() {
    // Right piece type, but it cycles pieces outside of the named ones
    assert_eq!(
        check("[R U R', D]", PieceType::Corner, 'p', 'v'),
        CommValidity::DisruptsOtherPieces
    );
    assert_eq!(
        check("[R U R', D2]", PieceType::Corner, 'p', 'l'),
        CommValidity::DisruptsOtherPieces
    );
    // Corner comm checked as an edge comm
    assert_eq!(
        check("[R U R', D]", PieceType::Edge, 'p', 'l'),
        CommValidity::DisruptsOtherPieces
    );
    assert_eq!(
        check("[R, U]", PieceType::Corner, 'p', 'l'),
        CommValidity::DisruptsOtherPieces
    );
}

#[test_log::test]
fn test_two_flip_is_not_a_cycle() {
    let comm = "[R' E R : U'] [R E2 R' : U]".parse::<Comm>().unwrap();

    let mut cube = CubeState::new();
    cube.execute_all(&comm.to_sequence());

    let tables = LabelingTables::speffz().unwrap();
    assert_eq!(
        tables.report(PieceType::Edge, &cube).unwrap().to_string(),
        "abidelghcjkfmnopqrstuvwx"
    );
    let corners = tables.report(PieceType::Corner, &cube).unwrap();
    assert!(corners.is_identity());

    assert_eq!(
        check("[R' E R : U'] [R E2 R' : U]", PieceType::Edge, 'f', 'l'),
        CommValidity::IncorrectCycle
    );
}

#[test_log::test]
fn test_cells_around_the_buffer() {
    let corner = |cell, t1, t2| classify(cell, PieceType::Corner, t1, t2);

    // Same-piece pairs expect an empty cell
    assert_eq!(corner("", 'a', 'e'), CommValidity::Valid);
    assert_eq!(
        classify("   ", PieceType::Edge, 'a', 'q'),
        CommValidity::Valid
    );
    assert_eq!(corner("[R, U]", 'a', 'e'), CommValidity::ShouldBeEmpty);

    assert_eq!(corner("", 'p', 'l'), CommValidity::UnexpectedEmpty);
    assert_eq!(corner("[R U R', D]", 'p', 'l'), CommValidity::Valid);

    let reversed = corner("[R U R', D]", 'l', 'p');
    assert_eq!(reversed, CommValidity::IncorrectCycle);
}

#[test_log::test]
fn test_unparsable_cells() {
    let cases = [
        ("[R U R', D", CommValidity::UnbalancedBrackets),
        ("]R U R', D[", CommValidity::UnbalancedBrackets),
        ("[R U R', P]", CommValidity::IllegalMove),
        ("(R U R')3 D", CommValidity::ParsingError),
        ("[R U R', D]2", CommValidity::ParsingError),
        ("[R U R': D]'", CommValidity::ParsingError),
    ];

    for (cell, expected) in cases {
        let verdict = classify(cell, PieceType::Corner, 'p', 'l');
        assert_eq!(verdict, expected, "{cell}");
    }
}

#[test_log::test]
fn test_expansion_round_trip() {
    let comm = "[U: [S, R' B R]]".parse::<Comm>().unwrap();
    let moves = comm.to_sequence();
    assert_eq!(moves.to_string(), "U S R' B R S' R' B' R U'");

    let mut cube = CubeState::new();
    cube.execute_all(&moves);
    assert!(!cube.is_solved());
    cube.execute_all(&moves.inverse());
    assert_eq!(cube, CubeState::new());

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..20 {
        let scramble = Sequence::random(30, false, &mut rng);
        let mut cube = CubeState::new();
        cube.execute_all(&scramble);
        cube.execute_all(&scramble.inverse());
        assert!(cube.is_solved());
        assert_eq!(cube, CubeState::new());
    }
}
