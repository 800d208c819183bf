use anyhow::bail;
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::{parse_lines, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 10, title = "Cathode-Ray Tube", tags = ["simulation", "rendering"])]
pub struct CathodeRayTube;

const SCREEN_WIDTH: usize = 40;
const SCREEN_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Noop,
    Addx(i64),
}

impl Instruction {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        Ok(match words.as_slice() {
            ["noop"] => Instruction::Noop,
            ["addx", value] => Instruction::Addx(parse_num(value, "addx operand")?),
            _ => bail!("unknown instruction '{}'", line),
        })
    }
}

/// Value of X during each cycle; index 0 is cycle 1
pub fn register_trace(program: &[Instruction]) -> Vec<i64> {
    let mut x = 1;
    let mut trace = Vec::with_capacity(program.len() * 2);
    for instruction in program {
        match instruction {
            Instruction::Noop => trace.push(x),
            Instruction::Addx(v) => {
                trace.extend([x, x]);
                x += v;
            }
        }
    }
    trace
}

/// Sum of `cycle * X` at cycles 20, 60, 100, ...
pub fn signal_strength(trace: &[i64]) -> i64 {
    trace
        .iter()
        .enumerate()
        .skip(19)
        .step_by(40)
        .map(|(i, x)| (i as i64 + 1) * x)
        .sum()
}

/// Draw the CRT; a pixel is lit when the sprite centred on X covers its column.
pub fn render(trace: &[i64]) -> String {
    trace
        .chunks(SCREEN_WIDTH)
        .take(SCREEN_HEIGHT)
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, x)| if (x - col as i64).abs() <= 1 { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl AocParser for CathodeRayTube {
    type SharedData<'a> = Vec<i64>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let program = parse_lines(input, Instruction::parse)?;
        Ok(register_trace(&program))
    }
}

impl PartSolver<1> for CathodeRayTube {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(signal_strength(shared).to_string())
    }
}

impl PartSolver<2> for CathodeRayTube {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.len() < SCREEN_WIDTH * SCREEN_HEIGHT {
            return Err(SolveError::no_solution(format!(
                "program runs {} cycles, a full frame needs {}",
                shared.len(),
                SCREEN_WIDTH * SCREEN_HEIGHT
            )));
        }
        Ok(render(shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day10.txt");

    #[test]
    fn test_small_program_trace() {
        let program = parse_lines("noop\naddx 3\naddx -5\n", Instruction::parse).unwrap();
        assert_eq!(register_trace(&program), vec![1, 1, 1, 4, 4]);
    }

    #[test]
    fn test_signal_strength() {
        let mut trace = CathodeRayTube::parse(EXAMPLE).unwrap();
        assert_eq!(trace[19], 21);
        assert_eq!(trace[219], 18);
        assert_eq!(CathodeRayTube::solve_part(&mut trace, 1).unwrap(), "13140");
    }

    #[test]
    fn test_render() {
        let mut trace = CathodeRayTube::parse(EXAMPLE).unwrap();
        let expected = "\
##..##..##..##..##..##..##..##..##..##..
###...###...###...###...###...###...###.
####....####....####....####....####....
#####.....#####.....#####.....#####.....
######......######......######......####
#######.......#######.......#######.....";
        assert_eq!(CathodeRayTube::solve_part(&mut trace, 2).unwrap(), expected);
    }

    #[test]
    fn test_short_program_has_no_frame() {
        let mut trace = CathodeRayTube::parse("noop\n").unwrap();
        assert!(matches!(
            CathodeRayTube::solve_part(&mut trace, 2),
            Err(SolveError::NoSolution(_))
        ));
    }

    #[test]
    fn test_unknown_instruction_rejected() {
        assert!(CathodeRayTube::parse("noop\nmulx 3\n").is_err());
        assert!(CathodeRayTube::parse("addx\n").is_err());
    }
}
