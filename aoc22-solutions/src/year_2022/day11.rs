use std::collections::VecDeque;

use anyhow::{bail, ensure, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use regex::Regex;

use crate::utils::chunks::{blocks, parse_list, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 11, title = "Monkey in the Middle", tags = ["simulation", "modular"])]
pub struct MonkeyInTheMiddle;

const MONKEY_PATTERN: &str = r"(?m)^Monkey (\d+):\s*
\s*Starting items:\s*([\d, ]*)\s*
\s*Operation: new = old ([+*]) (old|\d+)\s*
\s*Test: divisible by (\d+)\s*
\s*If true: throw to monkey (\d+)\s*
\s*If false: throw to monkey (\d+)\s*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add(u64),
    Mul(u64),
    Square,
}

impl Operation {
    fn apply(self, old: u64) -> Option<u64> {
        match self {
            Operation::Add(v) => old.checked_add(v),
            Operation::Mul(v) => old.checked_mul(v),
            Operation::Square => old.checked_mul(old),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monkey {
    pub items: VecDeque<u64>,
    pub operation: Operation,
    pub divisor: u64,
    pub if_true: usize,
    pub if_false: usize,
}

impl Monkey {
    fn target(&self, worry: u64) -> usize {
        if worry % self.divisor == 0 {
            self.if_true
        } else {
            self.if_false
        }
    }
}

fn parse_monkeys(input: &str) -> anyhow::Result<Vec<Monkey>> {
    let pattern = Regex::new(MONKEY_PATTERN)?;
    let mut monkeys = Vec::new();

    for (i, block) in blocks(input).enumerate() {
        let caps = pattern
            .captures(block)
            .with_context(|| format!("monkey block {} is malformed", i + 1))?;
        let id: usize = parse_num(&caps[1], "monkey id")?;
        ensure!(id == i, "monkey {} listed in position {}", id, i);

        let items = match caps[2].trim() {
            "" => VecDeque::new(),
            list => parse_list::<u64>(list)?.into(),
        };
        let operation = match (&caps[3], &caps[4]) {
            ("*", "old") => Operation::Square,
            ("*", v) => Operation::Mul(parse_num(v, "operand")?),
            ("+", "old") => bail!("monkey {}: 'old + old' is not supported", id),
            ("+", v) => Operation::Add(parse_num(v, "operand")?),
            (op, _) => bail!("monkey {}: unknown operator '{}'", id, op),
        };
        let divisor: u64 = parse_num(&caps[5], "divisor")?;
        ensure!(divisor > 0, "monkey {}: divisor must be positive", id);

        monkeys.push(Monkey {
            items,
            operation,
            divisor,
            if_true: parse_num(&caps[6], "target")?,
            if_false: parse_num(&caps[7], "target")?,
        });
    }

    ensure!(!monkeys.is_empty(), "no monkeys");
    for (id, m) in monkeys.iter().enumerate() {
        for target in [m.if_true, m.if_false] {
            ensure!(target < monkeys.len(), "monkey {} throws to unknown monkey {}", id, target);
            ensure!(target != id, "monkey {} throws to itself", id);
        }
    }
    Ok(monkeys)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Least common multiple of every divisor, `None` if it does not fit in a `u64`
fn common_modulus(monkeys: &[Monkey]) -> Option<u64> {
    monkeys
        .iter()
        .try_fold(1u64, |acc, m| (acc / gcd(acc, m.divisor)).checked_mul(m.divisor))
}

/// Play `rounds` rounds and return the product of the two busiest inspection counts.
///
/// With `relief` each worry level is divided by it after inspection; without it
/// levels are kept modulo the least common multiple of every divisor.
pub fn simulate(
    monkeys: &[Monkey],
    rounds: usize,
    relief: Option<u64>,
) -> Result<u64, SolveError> {
    if monkeys.iter().any(|m| m.divisor == 0) {
        return Err(SolveError::SolveFailed("divisors must be positive".into()));
    }
    if monkeys.iter().any(|m| m.if_true >= monkeys.len() || m.if_false >= monkeys.len()) {
        return Err(SolveError::SolveFailed("a monkey throws to an unknown monkey".into()));
    }
    let modulus = match relief {
        Some(0) => return Err(SolveError::SolveFailed("relief divisor must be positive".into())),
        Some(_) => None,
        None => Some(common_modulus(monkeys).ok_or_else(|| {
            SolveError::SolveFailed("divisors have no common multiple within u64".into())
        })?),
    };
    let mut monkeys = monkeys.to_vec();
    let mut inspections = vec![0u64; monkeys.len()];

    for _ in 0..rounds {
        for id in 0..monkeys.len() {
            while let Some(worry) = monkeys[id].items.pop_front() {
                inspections[id] += 1;
                let worry = monkeys[id].operation.apply(worry).ok_or_else(|| {
                    SolveError::SolveFailed(format!("worry level overflowed at monkey {}", id).into())
                })?;
                let worry = match (relief, modulus) {
                    (Some(divisor), _) => worry / divisor,
                    (None, Some(modulus)) => worry % modulus,
                    (None, None) => worry,
                };
                let target = monkeys[id].target(worry);
                monkeys[target].items.push_back(worry);
            }
        }
    }

    inspections.sort_unstable_by(|a, b| b.cmp(a));
    match inspections.as_slice() {
        [first, second, ..] => Ok(first * second),
        _ => Err(SolveError::no_solution("monkey business needs at least two monkeys")),
    }
}

impl AocParser for MonkeyInTheMiddle {
    type SharedData<'a> = Vec<Monkey>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_monkeys(input).map_err(|e| ParseError::InvalidFormat(format!("{:#}", e)))
    }
}

impl PartSolver<1> for MonkeyInTheMiddle {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        simulate(shared, 20, Some(3)).map(|v| v.to_string())
    }
}

impl PartSolver<2> for MonkeyInTheMiddle {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        simulate(shared, 10_000, None).map(|v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day11.txt");

    #[test]
    fn test_parse_monkeys() {
        let monkeys = MonkeyInTheMiddle::parse(EXAMPLE).unwrap();
        assert_eq!(monkeys.len(), 4);
        assert_eq!(monkeys[0].items, VecDeque::from([79, 98]));
        assert_eq!(monkeys[0].operation, Operation::Mul(19));
        assert_eq!(monkeys[2].operation, Operation::Square);
        assert_eq!((monkeys[3].if_true, monkeys[3].if_false), (0, 1));
    }

    #[test]
    fn test_with_relief() {
        let mut monkeys = MonkeyInTheMiddle::parse(EXAMPLE).unwrap();
        assert_eq!(MonkeyInTheMiddle::solve_part(&mut monkeys, 1).unwrap(), "10605");
    }

    #[test]
    fn test_without_relief() {
        let mut monkeys = MonkeyInTheMiddle::parse(EXAMPLE).unwrap();
        assert_eq!(MonkeyInTheMiddle::solve_part(&mut monkeys, 2).unwrap(), "2713310158");
    }

    #[test]
    fn test_parts_do_not_share_state() {
        let mut monkeys = MonkeyInTheMiddle::parse(EXAMPLE).unwrap();
        let first = MonkeyInTheMiddle::solve_part(&mut monkeys, 1).unwrap();
        let again = MonkeyInTheMiddle::solve_part(&mut monkeys, 1).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_unknown_target_rejected() {
        let input = EXAMPLE.replace("throw to monkey 3", "throw to monkey 7");
        let err = MonkeyInTheMiddle::parse(&input).unwrap_err();
        assert!(err.to_string().contains("unknown monkey 7"), "{}", err);
    }

    fn monkey(items: &[u64], divisor: u64, if_true: usize, if_false: usize) -> Monkey {
        Monkey {
            items: items.iter().copied().collect(),
            operation: Operation::Add(1),
            divisor,
            if_true,
            if_false,
        }
    }

    #[test]
    fn test_common_modulus_is_lcm() {
        let monkeys = [monkey(&[], 4, 1, 1), monkey(&[], 6, 0, 0)];
        assert_eq!(common_modulus(&monkeys), Some(12));
    }

    #[test]
    fn test_shared_large_divisor() {
        let monkeys = [monkey(&[1], 1 << 32, 1, 1), monkey(&[2], 1 << 32, 0, 0)];
        assert_eq!(common_modulus(&monkeys), Some(1 << 32));
        assert_eq!(simulate(&monkeys, 10, None).unwrap(), 19 * 20);
    }

    #[test]
    fn test_modulus_overflow_reported() {
        let monkeys = [
            monkey(&[1], 1_000_000_007, 1, 2),
            monkey(&[], 998_244_353, 2, 0),
            monkey(&[], 1_000_000_009, 0, 1),
        ];
        assert!(matches!(simulate(&monkeys, 10, None), Err(SolveError::SolveFailed(_))));
        assert!(simulate(&monkeys, 10, Some(3)).is_ok());
    }

    #[test]
    fn test_zero_relief_rejected() {
        let monkeys = MonkeyInTheMiddle::parse(EXAMPLE).unwrap();
        assert!(matches!(simulate(&monkeys, 1, Some(0)), Err(SolveError::SolveFailed(_))));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let input = EXAMPLE.replace("divisible by 23", "divisible by 0");
        assert!(MonkeyInTheMiddle::parse(&input).is_err());
    }
}
