use std::collections::HashMap;

use anyhow::{bail, ensure, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use regex::Regex;

use crate::utils::chunks::{parse_lines, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 16, title = "Proboscidea Volcanium", tags = ["graph", "search", "bitmask"])]
pub struct ProboscideaVolcanium;

const START: &str = "AA";
const SOLO_MINUTES: u32 = 30;
const PAIR_MINUTES: u32 = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValveReport {
    name: String,
    flow: u32,
    tunnels: Vec<String>,
}

fn parse_report(pattern: &Regex, line: &str) -> anyhow::Result<ValveReport> {
    let caps = pattern
        .captures(line)
        .with_context(|| format!("expected a valve report, got '{}'", line))?;
    Ok(ValveReport {
        name: caps[1].to_string(),
        flow: parse_num(&caps[2], "flow rate")?,
        tunnels: caps[3].split(',').map(|t| t.trim().to_string()).collect(),
    })
}

/// Start valve plus every valve worth opening, with travel times between them
#[derive(Debug, Clone)]
pub struct ValveNetwork {
    /// Flow rate of each useful valve; bit `i` of an opened-set mask is valve `i`
    pub flows: Vec<u32>,
    /// `distance[i][j]` in minutes; index `flows.len()` is the start valve
    distance: Vec<Vec<u32>>,
}

impl ValveNetwork {
    fn new(reports: &[ValveReport]) -> anyhow::Result<Self> {
        let index: HashMap<&str, usize> = reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.as_str(), i))
            .collect();
        ensure!(index.len() == reports.len(), "a valve is reported twice");
        let start = *index.get(START).with_context(|| format!("no valve named {}", START))?;

        // Floyd–Warshall over the full tunnel graph
        let n = reports.len();
        let mut dist = vec![vec![u32::MAX; n]; n];
        for (i, report) in reports.iter().enumerate() {
            dist[i][i] = 0;
            for tunnel in &report.tunnels {
                match index.get(tunnel.as_str()) {
                    Some(&j) => dist[i][j] = 1,
                    None => bail!("valve {} leads to unknown valve {}", report.name, tunnel),
                }
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let through = dist[i][k].saturating_add(dist[k][j]);
                    if through < dist[i][j] {
                        dist[i][j] = through;
                    }
                }
            }
        }

        let mut nodes: Vec<usize> = (0..n).filter(|&i| reports[i].flow > 0).collect();
        ensure!(nodes.len() < 64, "{} valves with flow do not fit in a bitmask", nodes.len());
        let flows = nodes.iter().map(|&i| reports[i].flow).collect();
        nodes.push(start);
        let distance = nodes
            .iter()
            .map(|&i| nodes.iter().map(|&j| dist[i][j]).collect())
            .collect();

        Ok(Self { flows, distance })
    }

    fn start(&self) -> usize {
        self.flows.len()
    }

    /// Best pressure released for every set of valves that can be opened within `minutes`
    pub fn best_by_opened_set(&self, minutes: u32) -> HashMap<u64, u32> {
        let mut best = HashMap::new();
        self.explore(self.start(), minutes, 0, 0, &mut best);
        best
    }

    fn explore(&self, at: usize, minutes_left: u32, opened: u64, released: u32, best: &mut HashMap<u64, u32>) {
        let entry = best.entry(opened).or_insert(0);
        *entry = (*entry).max(released);

        for (next, &flow) in self.flows.iter().enumerate() {
            if opened & (1 << next) != 0 {
                continue;
            }
            // travel plus one minute to open
            let cost = self.distance[at][next].saturating_add(1);
            if cost >= minutes_left {
                continue;
            }
            let remaining = minutes_left - cost;
            self.explore(next, remaining, opened | (1 << next), released + flow * remaining, best);
        }
    }
}

/// Best total for two workers opening disjoint sets of valves
pub fn best_disjoint_pair(best: &HashMap<u64, u32>) -> u32 {
    let mut sets: Vec<(u64, u32)> = best.iter().map(|(&mask, &p)| (mask, p)).collect();
    sets.sort_unstable_by(|a, b| b.1.cmp(&a.1));

    let mut result = 0;
    for (i, &(mask_a, a)) in sets.iter().enumerate() {
        if a * 2 < result {
            break;
        }
        for &(mask_b, b) in &sets[i..] {
            if a + b <= result {
                break;
            }
            if mask_a & mask_b == 0 {
                result = a + b;
            }
        }
    }
    result
}

impl AocParser for ProboscideaVolcanium {
    type SharedData<'a> = ValveNetwork;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let pattern = Regex::new(
            r"^Valve (\w+) has flow rate=(\d+); tunnels? leads? to valves? (\w+(?:, \w+)*)$",
        )
        .map_err(|e| ParseError::Other(e.to_string()))?;
        let reports = parse_lines(input, |line| parse_report(&pattern, line))?;
        ValveNetwork::new(&reports).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for ProboscideaVolcanium {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let best = shared.best_by_opened_set(SOLO_MINUTES);
        Ok(best.values().max().copied().unwrap_or(0).to_string())
    }
}

impl PartSolver<2> for ProboscideaVolcanium {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let best = shared.best_by_opened_set(PAIR_MINUTES);
        Ok(best_disjoint_pair(&best).to_string())
    }
}
