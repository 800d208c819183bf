use std::collections::{HashMap, VecDeque};

use anyhow::{bail, ensure, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::{parse_lines, parse_num};
use crate::utils::dp_cache::{DpCache, DpProblem, VecBackend};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 21, title = "Monkey Math", tags = ["expression-tree", "memoization"])]
pub struct MonkeyMath;

const ROOT: &str = "root";
const HUMAN: &str = "humn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(match s {
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            _ => bail!("unknown operator '{}'", s),
        })
    }

    fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
            Op::Div => a.checked_div(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Number(i64),
    Op(Op, usize, usize),
}

/// Every monkey's job, indexed by position in the input
#[derive(Debug, Clone)]
pub struct Troop {
    names: Vec<String>,
    jobs: Vec<Job>,
    root: usize,
    human: Option<usize>,
}

impl Troop {
    fn new(lines: &[(String, String)]) -> anyhow::Result<Self> {
        let index: HashMap<&str, usize> = lines
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.as_str(), i))
            .collect();
        ensure!(index.len() == lines.len(), "a monkey is listed twice");
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .with_context(|| format!("unknown monkey '{}'", name))
        };

        let jobs = lines
            .iter()
            .map(|(_, job)| match job.split_whitespace().collect::<Vec<_>>().as_slice() {
                [number] => Ok(Job::Number(parse_num(*number, "number")?)),
                [a, op, b] => Ok(Job::Op(Op::parse(*op)?, lookup(*a)?, lookup(*b)?)),
                _ => bail!("malformed job '{}'", job),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let root = lookup(ROOT)?;
        let human = index.get(HUMAN).copied();
        let troop = Self {
            names: lines.iter().map(|(name, _)| name.clone()).collect(),
            jobs,
            root,
            human,
        };
        troop.check_acyclic()?;
        Ok(troop)
    }

    fn operands(&self, id: usize) -> Vec<usize> {
        match self.jobs[id] {
            Job::Number(_) => Vec::new(),
            Job::Op(_, a, b) => vec![a, b],
        }
    }

    /// Kahn's algorithm over "waits for" edges
    fn check_acyclic(&self) -> anyhow::Result<()> {
        let mut waiting_on: Vec<usize> = (0..self.jobs.len()).map(|id| self.operands(id).len()).collect();
        let mut listeners: Vec<Vec<usize>> = vec![Vec::new(); self.jobs.len()];
        for id in 0..self.jobs.len() {
            for operand in self.operands(id) {
                listeners[operand].push(id);
            }
        }

        let mut ready: VecDeque<usize> = (0..self.jobs.len()).filter(|&id| waiting_on[id] == 0).collect();
        let mut resolved = 0;
        while let Some(id) = ready.pop_front() {
            resolved += 1;
            for &listener in &listeners[id] {
                waiting_on[listener] -= 1;
                if waiting_on[listener] == 0 {
                    ready.push_back(listener);
                }
            }
        }
        if resolved < self.jobs.len() {
            let stuck = waiting_on.iter().position(|&w| w > 0).unwrap_or(0);
            bail!("monkey '{}' depends on a cycle", self.names[stuck]);
        }
        Ok(())
    }

    /// Number yelled by `root`, or `None` on overflow or division by zero
    pub fn root_value(&self) -> Option<i64> {
        let cache = DpCache::new(VecBackend::with_capacity(self.jobs.len()), self);
        cache.get(&self.root)
    }

    /// Number `humn` must yell for both sides of `root` to be equal
    pub fn human_value(&self) -> Result<i64, SolveError> {
        let Some(human) = self.human else {
            return Err(SolveError::no_solution("there is no humn monkey"));
        };
        let Job::Op(_, left, right) = self.jobs[self.root] else {
            return Err(SolveError::no_solution("root does not compare two monkeys"));
        };
        let overflow = || SolveError::SolveFailed("arithmetic overflow while folding constants".into());
        let left = self.expression(left, human).ok_or_else(overflow)?;
        let right = self.expression(right, human).ok_or_else(overflow)?;
        match (left, right) {
            (Expr::Known(target), unknown) | (unknown, Expr::Known(target)) => unknown.solve(target),
            _ => Err(SolveError::no_solution("humn appears on both sides of root")),
        }
    }

    /// Expression for `id` with every subtree not involving `human` folded to a constant
    fn expression(&self, id: usize, human: usize) -> Option<Expr> {
        if id == human {
            return Some(Expr::Unknown);
        }
        match self.jobs[id] {
            Job::Number(n) => Some(Expr::Known(n)),
            Job::Op(op, a, b) => match (self.expression(a, human)?, self.expression(b, human)?) {
                (Expr::Known(a), Expr::Known(b)) => op.apply(a, b).map(Expr::Known),
                (a, b) => Some(Expr::Op(op, Box::new(a), Box::new(b))),
            },
        }
    }
}

impl DpProblem<usize, Option<i64>> for &Troop {
    fn deps(&self, id: &usize) -> Vec<usize> {
        self.operands(*id)
    }

    fn compute(&self, id: &usize, deps: Vec<Option<i64>>) -> Option<i64> {
        match (self.jobs[*id], deps.as_slice()) {
            (Job::Number(n), _) => Some(n),
            (Job::Op(op, _, _), [Some(a), Some(b)]) => op.apply(*a, *b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Unknown,
    Known(i64),
    Op(Op, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Value of the unknown that makes this expression equal `target`
    ///
    /// Walks down the single path to the unknown, undoing each operation.
    fn solve(self, mut target: i64) -> Result<i64, SolveError> {
        let inexact = |what: &str| SolveError::no_solution(format!("no integer solution: {}", what));
        let overflow = || SolveError::SolveFailed("arithmetic overflow while inverting".into());
        let mut expr = self;
        loop {
            expr = match expr {
                Expr::Unknown => return Ok(target),
                Expr::Known(k) if k == target => {
                    return Err(SolveError::no_solution("humn does not affect the result"));
                }
                Expr::Known(_) => return Err(SolveError::no_solution("sides of root can never match")),
                Expr::Op(op, left, right) => match (*left, *right) {
                    (Expr::Known(k), unknown) => {
                        target = match op {
                            Op::Add => target.checked_sub(k).ok_or_else(overflow)?,
                            Op::Sub => k.checked_sub(target).ok_or_else(overflow)?,
                            Op::Mul => {
                                if k == 0 || target % k != 0 {
                                    return Err(inexact("product"));
                                }
                                target / k
                            }
                            Op::Div => {
                                if target == 0 || k % target != 0 {
                                    return Err(inexact("divisor"));
                                }
                                k / target
                            }
                        };
                        unknown
                    }
                    (unknown, Expr::Known(k)) => {
                        target = match op {
                            Op::Add => target.checked_sub(k).ok_or_else(overflow)?,
                            Op::Sub => target.checked_add(k).ok_or_else(overflow)?,
                            Op::Mul => {
                                if k == 0 || target % k != 0 {
                                    return Err(inexact("product"));
                                }
                                target / k
                            }
                            Op::Div => target.checked_mul(k).ok_or_else(overflow)?,
                        };
                        unknown
                    }
                    _ => return Err(SolveError::no_solution("humn appears more than once")),
                },
            };
        }
    }
}

fn parse_line(line: &str) -> anyhow::Result<(String, String)> {
    let (name, job) = line
        .split_once(':')
        .with_context(|| format!("expected 'name: job', got '{}'", line))?;
    Ok((name.trim().to_string(), job.trim().to_string()))
}

impl AocParser for MonkeyMath {
    type SharedData<'a> = Troop;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let lines = parse_lines(input, parse_line)?;
        Troop::new(&lines).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for MonkeyMath {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .root_value()
            .map(|v| v.to_string())
            .ok_or_else(|| SolveError::SolveFailed("overflow or division by zero".into()))
    }
}

impl PartSolver<2> for MonkeyMath {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared.human_value().map(|v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day21.txt");

    #[test]
    fn test_root_value() {
        let mut troop = MonkeyMath::parse(EXAMPLE).unwrap();
        assert_eq!(MonkeyMath::solve_part(&mut troop, 1).unwrap(), "152");
    }

    #[test]
    fn test_human_value() {
        let mut troop = MonkeyMath::parse(EXAMPLE).unwrap();
        assert_eq!(MonkeyMath::solve_part(&mut troop, 2).unwrap(), "301");
    }

    #[test]
    fn test_inverse_depends_on_operand_side() {
        // root: (10 - humn) == 4  and  (humn / 2) == 4
        let sub = MonkeyMath::parse("root: a + k\na: t - humn\nt: 10\nk: 4\nhumn: 0\n").unwrap();
        assert_eq!(sub.human_value().unwrap(), 6);
        let div = MonkeyMath::parse("root: a + k\na: humn / t\nt: 2\nk: 4\nhumn: 0\n").unwrap();
        assert_eq!(div.human_value().unwrap(), 8);
        let rdiv = MonkeyMath::parse("root: a + k\na: t / humn\nt: 12\nk: 4\nhumn: 0\n").unwrap();
        assert_eq!(rdiv.human_value().unwrap(), 3);
    }

    #[test]
    fn test_inexact_inverse_has_no_solution() {
        let troop = MonkeyMath::parse("root: a + k\na: humn * t\nt: 3\nk: 4\nhumn: 0\n").unwrap();
        assert!(matches!(troop.human_value(), Err(SolveError::NoSolution(_))));
    }

    #[test]
    fn test_root_without_human() {
        let mut troop = MonkeyMath::parse("root: a * b\na: 6\nb: 7\n").unwrap();
        assert_eq!(MonkeyMath::solve_part(&mut troop, 1).unwrap(), "42");
        assert!(matches!(troop.human_value(), Err(SolveError::NoSolution(_))));
    }

    #[test]
    fn test_root_yelling_a_number() {
        let mut troop = MonkeyMath::parse("root: 5\nhumn: 1\n").unwrap();
        assert_eq!(MonkeyMath::solve_part(&mut troop, 1).unwrap(), "5");
        assert!(matches!(
            MonkeyMath::solve_part(&mut troop, 2),
            Err(SolveError::NoSolution(_))
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = MonkeyMath::parse("root: a + b\na: b * c\nb: a - c\nc: 2\nhumn: 5\n").unwrap_err();
        assert!(err.to_string().contains("cycle"), "{}", err);
    }

    #[test]
    fn test_unknown_monkey_rejected() {
        let err = MonkeyMath::parse("root: a + zzzz\na: 1\nhumn: 5\n").unwrap_err();
        assert!(err.to_string().contains("zzzz"), "{}", err);
    }
}
