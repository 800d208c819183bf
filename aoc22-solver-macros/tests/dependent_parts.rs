use aoc22_solver::{AocParser, AocSolver, DynSolver, ParseError, PartSolver, SolveError, Solver, SolverInstance};

#[derive(Debug)]
struct Readings {
    values: Vec<u32>,
    sorted: Option<Vec<u32>>,
}

impl Readings {
    fn sorted(&mut self) -> &[u32] {
        let values = &self.values;
        self.sorted.get_or_insert_with(|| {
            let mut v = values.clone();
            v.sort_unstable();
            v
        })
    }
}

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Median;

impl AocParser for Median {
    type SharedData<'a> = Readings;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let values = input
            .lines()
            .enumerate()
            .map(|(i, l)| l.trim().parse().map_err(|e| ParseError::at_line(i, e)))
            .collect::<Result<Vec<u32>, _>>()?;
        if values.is_empty() {
            return Err(ParseError::MissingData("no readings".into()));
        }
        Ok(Readings {
            values,
            sorted: None,
        })
    }
}

impl PartSolver<1> for Median {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sorted = shared.sorted();
        Ok(sorted[sorted.len() / 2].to_string())
    }
}

impl PartSolver<2> for Median {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sorted = shared.sorted();
        Ok((sorted[sorted.len() - 1] - sorted[0]).to_string())
    }
}

#[test]
fn test_part1_caches_sorted_values() {
    let mut shared = Median::parse("5\n1\n9").unwrap();
    assert_eq!(<Median as Solver>::solve_part(&mut shared, 1).unwrap(), "5");
    assert_eq!(shared.sorted.as_deref(), Some(&[1, 5, 9][..]));
}

#[test]
fn test_part2_solves_without_part1() {
    let mut shared = Median::parse("5\n1\n9").unwrap();
    assert_eq!(<Median as Solver>::solve_part(&mut shared, 2).unwrap(), "8");
}

#[test]
fn test_instance_records_parse_timing() {
    let mut instance = SolverInstance::<Median>::new(2022, 1, "3\n4").unwrap();
    let parsed = instance.parse_timing();
    assert!(parsed.end >= parsed.start);
    assert_eq!(instance.parts(), 2);
    let result = instance.solve(2).unwrap();
    assert_eq!(result.answer, "1");
    assert_eq!(result.part, 2);
    assert!(result.timing.end >= result.timing.start);
}

#[test]
fn test_empty_input_rejected() {
    assert!(matches!(Median::parse(""), Err(ParseError::MissingData(_))));
}
