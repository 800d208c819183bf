//! Property-based tests for the AocSolver derive macro

use aoc22_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};
use proptest::prelude::*;

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct MinMax;

impl AocParser for MinMax {
    type SharedData<'a> = Vec<i64>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        input
            .lines()
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, l)| l.parse().map_err(|e| ParseError::at_line(i, e)))
            .collect()
    }
}

impl PartSolver<1> for MinMax {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .min()
            .map(ToString::to_string)
            .ok_or_else(|| SolveError::no_solution("empty input"))
    }
}

impl PartSolver<2> for MinMax {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .max()
            .map(ToString::to_string)
            .ok_or_else(|| SolveError::no_solution("empty input"))
    }
}

fn render(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn solve_part_dispatches_to_part_solver(
        numbers in prop::collection::vec(-1000i64..1000, 1..8),
        part in 1u8..=2
    ) {
        let input = render(&numbers);
        let mut via_dispatch = MinMax::parse(&input).unwrap();
        let mut direct = MinMax::parse(&input).unwrap();

        let dispatched = <MinMax as Solver>::solve_part(&mut via_dispatch, part).unwrap();
        let expected = match part {
            1 => <MinMax as PartSolver<1>>::solve(&mut direct).unwrap(),
            _ => <MinMax as PartSolver<2>>::solve(&mut direct).unwrap(),
        };
        prop_assert_eq!(dispatched, expected);
    }

    #[test]
    fn undeclared_parts_are_not_implemented(part in prop_oneof![Just(0u8), 3u8..=255]) {
        let mut shared = MinMax::parse("1\n2").unwrap();
        match <MinMax as Solver>::solve_part(&mut shared, part) {
            Err(SolveError::PartNotImplemented(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "expected PartNotImplemented, got {:?}", other),
        }
    }
}

#[test]
fn parts_constant_matches_attribute() {
    assert_eq!(<MinMax as Solver>::PARTS, 2);
}

#[test]
fn no_solution_is_distinct_from_failure() {
    let mut shared = MinMax::parse("").unwrap();
    assert!(matches!(
        <MinMax as Solver>::solve_part(&mut shared, 1),
        Err(SolveError::NoSolution(_))
    ));
}

#[test]
fn parse_error_reports_line_number() {
    let err = MinMax::parse("1\n2\nx").unwrap_err();
    assert!(err.to_string().contains("line 3"), "{}", err);
}
