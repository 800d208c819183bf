use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::{parse_lines, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 20, title = "Grove Positioning System", tags = ["simulation", "modular"])]
pub struct GrovePositioningSystem;

const DECRYPTION_KEY: i64 = 811_589_153;
const DECRYPTED_ROUNDS: usize = 10;
const COORDINATE_OFFSETS: [usize; 3] = [1000, 2000, 3000];

/// Mix `numbers` `rounds` times, returning the final arrangement
///
/// Elements move in their original order; each is tracked by its original
/// position since values repeat. A move wraps modulo `len - 1`.
pub fn mix(numbers: &[i64], rounds: usize) -> Vec<i64> {
    let len = numbers.len();
    if len < 2 {
        return numbers.to_vec();
    }
    // arrangement of original indices
    let mut order: Vec<usize> = (0..len).collect();
    let cycle = (len - 1) as i64;

    for _ in 0..rounds {
        for (original, &value) in numbers.iter().enumerate() {
            let Some(from) = order.iter().position(|&i| i == original) else {
                continue;
            };
            order.remove(from);
            let to = (from as i64 + value).rem_euclid(cycle) as usize;
            order.insert(to, original);
        }
    }
    order.into_iter().map(|i| numbers[i]).collect()
}

/// Sum of the values 1000, 2000 and 3000 places after the zero
pub fn grove_coordinates(mixed: &[i64]) -> Option<i64> {
    let zero = mixed.iter().position(|&v| v == 0)?;
    Some(
        COORDINATE_OFFSETS
            .iter()
            .map(|offset| mixed[(zero + offset) % mixed.len()])
            .sum(),
    )
}

impl AocParser for GrovePositioningSystem {
    type SharedData<'a> = Vec<i64>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let numbers: Vec<i64> = parse_lines(input, |line| parse_num(line, "number"))?;
        match numbers.iter().filter(|&&v| v == 0).count() {
            1 => Ok(numbers),
            zeros => Err(ParseError::InvalidFormat(format!(
                "expected exactly one zero, found {}",
                zeros
            ))),
        }
    }
}

impl PartSolver<1> for GrovePositioningSystem {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grove_coordinates(&mix(shared, 1))
            .map(|sum| sum.to_string())
            .ok_or_else(|| SolveError::no_solution("no zero in the file"))
    }
}

impl PartSolver<2> for GrovePositioningSystem {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let decrypted = shared
            .iter()
            .map(|v| v.checked_mul(DECRYPTION_KEY))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SolveError::SolveFailed("decryption key overflows a value".into()))?;
        grove_coordinates(&mix(&decrypted, DECRYPTED_ROUNDS))
            .map(|sum| sum.to_string())
            .ok_or_else(|| SolveError::no_solution("no zero in the file"))
    }
}
