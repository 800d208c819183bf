use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, ensure};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use itertools::Itertools;

use crate::utils::chunks::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 13, title = "Distress Signal", tags = ["parsing", "sorting"])]
pub struct DistressSignal;

/// Packets compare by value, so `[3]` and `3` are equal.
#[derive(Debug, Clone)]
pub enum Packet {
    List(Vec<Packet>),
    Integer(u32),
}

impl Ord for Packet {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Packet::Integer(a), Packet::Integer(b)) => a.cmp(b),
            (Packet::List(a), Packet::List(b)) => a.cmp(b),
            (Packet::Integer(_), Packet::List(b)) => std::slice::from_ref(self).cmp(b.as_slice()),
            (Packet::List(a), Packet::Integer(_)) => a.as_slice().cmp(std::slice::from_ref(other)),
        }
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Packet {}

impl PartialOrd for Packet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Integer(v) => write!(f, "{}", v),
            Packet::List(items) => write!(f, "[{}]", items.iter().join(",")),
        }
    }
}

impl FromStr for Packet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let bytes = s.trim().as_bytes();
        let (packet, used) = parse_packet(bytes, 0)?;
        ensure!(used == bytes.len(), "trailing characters after packet at {}", used);
        Ok(packet)
    }
}

/// Parse one packet starting at `at`, returning it and the offset just past it.
fn parse_packet(bytes: &[u8], at: usize) -> anyhow::Result<(Packet, usize)> {
    match bytes.get(at) {
        Some(b'[') => {
            let mut items = Vec::new();
            let mut at = at + 1;
            if bytes.get(at) == Some(&b']') {
                return Ok((Packet::List(items), at + 1));
            }
            loop {
                let (item, next) = parse_packet(bytes, at)?;
                items.push(item);
                match bytes.get(next) {
                    Some(b',') => at = next + 1,
                    Some(b']') => return Ok((Packet::List(items), next + 1)),
                    Some(&c) => bail!("unexpected '{}' at {}", c as char, next),
                    None => bail!("unterminated list"),
                }
            }
        }
        Some(c) if c.is_ascii_digit() => {
            let end = bytes[at..]
                .iter()
                .position(|b| !b.is_ascii_digit())
                .map_or(bytes.len(), |len| at + len);
            let digits = std::str::from_utf8(&bytes[at..end])?;
            Ok((Packet::Integer(digits.parse()?), end))
        }
        Some(&c) => bail!("unexpected '{}' at {}", c as char, at),
        None => Err(anyhow!("packet ends early")),
    }
}

fn divider(value: u32) -> Packet {
    Packet::List(vec![Packet::List(vec![Packet::Integer(value)])])
}

impl AocParser for DistressSignal {
    type SharedData<'a> = Vec<Packet>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let packets = parse_lines(input, str::parse::<Packet>)?;
        if packets.len() % 2 != 0 {
            return Err(ParseError::MissingData("packets must come in pairs".to_string()));
        }
        Ok(packets)
    }
}

impl PartSolver<1> for DistressSignal {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum: usize = shared
            .iter()
            .tuples()
            .positions(|(left, right)| left <= right)
            .map(|i| i + 1)
            .sum();
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for DistressSignal {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let dividers = [divider(2), divider(6)];
        // 1-based position after sorting: earlier dividers plus smaller packets
        let key: usize = dividers
            .iter()
            .enumerate()
            .map(|(i, d)| 1 + i + shared.iter().filter(|p| *p < d).count())
            .product();
        Ok(key.to_string())
    }
}
