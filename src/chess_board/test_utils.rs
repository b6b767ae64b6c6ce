use super::{ChessPosition, MoveMatrix};

/// Compares the marked cells of `matrix` with the expected squares, e.g. `vec!["e3", "e4"]`.
pub fn assert_marked(matrix: &MoveMatrix, mut expected: Vec<&str>) {
    let mut marked: Vec<String> = matrix
        .marked_fields()
        .map(|f| ChessPosition::from_field(f).map(|p| p.to_string()).unwrap_or_default())
        .collect();
    marked.sort();
    expected.sort();

    assert_eq!(marked, expected);
}

pub fn pos(square: &str) -> ChessPosition {
    square.parse().unwrap()
}
