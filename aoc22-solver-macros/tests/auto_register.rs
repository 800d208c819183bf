use aoc22_solver::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError,
    SolverRegistryBuilder,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2015, day = 24, title = "Word Lengths", tags = ["test", "strings"])]
struct WordLengths;

impl AocParser for WordLengths {
    type SharedData<'a> = Vec<&'a str>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input.split_whitespace().collect())
    }
}

impl PartSolver<1> for WordLengths {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

impl PartSolver<2> for WordLengths {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|w| w.len()).sum::<usize>().to_string())
    }
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2015, day = 25)]
struct Untitled;

impl AocParser for Untitled {
    type SharedData<'a> = ();

    fn parse(_input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(())
    }
}

impl PartSolver<1> for Untitled {
    fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok("done".into())
    }
}

#[test]
fn test_plugin_is_discovered() {
    let registry = SolverRegistryBuilder::new()
        .register_all_plugins()
        .expect("plugins register")
        .build();

    let info = registry.storage().get_info(2015, 24).expect("registered");
    assert_eq!(info.parts, 2);
    assert_eq!(info.title, "Word Lengths");
    assert_eq!(info.tags, &["test", "strings"]);

    let mut solver = registry
        .create_solver(2015, 24, "borrowed words only")
        .expect("parses");
    assert_eq!(solver.solve(1).unwrap().answer, "3");
    assert_eq!(solver.solve(2).unwrap().answer, "17");
}

#[test]
fn test_untitled_plugin_defaults() {
    let registry = SolverRegistryBuilder::new()
        .register_all_plugins()
        .expect("plugins register")
        .build();

    let info = registry.storage().get_info(2015, 25).expect("registered");
    assert_eq!(info.title, "");
    assert!(info.tags.is_empty());
    assert_eq!(info.parts, 1);
}

#[test]
fn test_tag_filter() {
    let registry = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"strings"))
        .expect("plugins register")
        .build();

    assert!(registry.storage().contains(2015, 24));
    assert!(!registry.storage().contains(2015, 25));
}
