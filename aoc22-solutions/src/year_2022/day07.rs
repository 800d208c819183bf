use std::collections::BTreeMap;

use anyhow::{bail, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::parse_lines;
use crate::utils::dp_cache::{DpCache, DpProblem, VecBackend};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 7, title = "No Space Left On Device", tags = ["tree", "memoization"])]
pub struct NoSpaceLeftOnDevice;

const SMALL_DIR_LIMIT: u64 = 100_000;
const DISK_CAPACITY: u64 = 70_000_000;
const REQUIRED_FREE: u64 = 30_000_000;

/// One line of the recorded terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalLine {
    Cd(CdTarget),
    Ls,
    Dir(String),
    File { name: String, size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdTarget {
    Root,
    Parent,
    Child(String),
}

impl TerminalLine {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        Ok(match words.as_slice() {
            ["$", "cd", "/"] => TerminalLine::Cd(CdTarget::Root),
            ["$", "cd", ".."] => TerminalLine::Cd(CdTarget::Parent),
            ["$", "cd", name] => TerminalLine::Cd(CdTarget::Child(name.to_string())),
            ["$", "ls"] => TerminalLine::Ls,
            ["dir", name] => TerminalLine::Dir(name.to_string()),
            [size, name] => TerminalLine::File {
                name: name.to_string(),
                size: size
                    .parse()
                    .with_context(|| format!("invalid file size '{}'", size))?,
            },
            _ => bail!("unrecognised terminal line '{}'", line),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub name: String,
    children: BTreeMap<String, usize>,
    files: BTreeMap<String, u64>,
}

impl Directory {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn file_total(&self) -> u64 {
        self.files.values().sum()
    }
}

/// Directory tree stored as an arena; index 0 is the root.
#[derive(Debug, Clone)]
pub struct Filesystem {
    dirs: Vec<Directory>,
}

impl Filesystem {
    pub const ROOT: usize = 0;

    /// Replay a terminal session.
    ///
    /// `cd name` creates the directory on first sight, `cd ..` at the root
    /// stays at the root and repeated listings of one directory don't double count.
    pub fn build<'a>(session: impl IntoIterator<Item = &'a TerminalLine>) -> Self {
        let mut fs = Filesystem {
            dirs: vec![Directory::new("/")],
        };
        let mut path = vec![Self::ROOT];

        for line in session {
            let cwd = path.last().copied().unwrap_or(Self::ROOT);
            match line {
                TerminalLine::Cd(CdTarget::Root) => path.truncate(1),
                TerminalLine::Cd(CdTarget::Parent) => {
                    if path.len() > 1 {
                        path.pop();
                    }
                }
                TerminalLine::Cd(CdTarget::Child(name)) => path.push(fs.child(cwd, name)),
                TerminalLine::Ls => {}
                TerminalLine::Dir(name) => {
                    fs.child(cwd, name);
                }
                TerminalLine::File { name, size } => {
                    fs.dirs[cwd].files.insert(name.clone(), *size);
                }
            }
        }
        fs
    }

    fn child(&mut self, parent: usize, name: &str) -> usize {
        if let Some(&id) = self.dirs[parent].children.get(name) {
            return id;
        }
        let id = self.dirs.len();
        self.dirs.push(Directory::new(name));
        self.dirs[parent].children.insert(name.to_string(), id);
        id
    }

    /// Number of directories, the root included
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn dir(&self, id: usize) -> &Directory {
        &self.dirs[id]
    }

    /// Recursive size of every directory, indexed like the arena
    pub fn total_sizes(&self) -> Vec<u64> {
        let cache = DpCache::new(VecBackend::with_capacity(self.dirs.len()), self);
        (0..self.dirs.len()).map(|id| cache.get(&id)).collect()
    }
}

impl DpProblem<usize, u64> for &Filesystem {
    fn deps(&self, id: &usize) -> Vec<usize> {
        self.dirs[*id].children.values().copied().collect()
    }

    fn compute(&self, id: &usize, deps: Vec<u64>) -> u64 {
        self.dirs[*id].file_total() + deps.iter().sum::<u64>()
    }
}

#[derive(Debug)]
pub struct SharedData {
    filesystem: Filesystem,
    sizes: Option<Vec<u64>>,
}

impl SharedData {
    fn sizes(&mut self) -> &[u64] {
        let filesystem = &self.filesystem;
        self.sizes.get_or_insert_with(|| filesystem.total_sizes())
    }
}

/// Sum of all directory sizes not exceeding `limit`
pub fn sum_of_small_dirs(sizes: &[u64], limit: u64) -> u64 {
    sizes.iter().filter(|&&s| s <= limit).sum()
}

/// Smallest directory whose deletion frees enough space for an update
pub fn smallest_dir_to_delete(sizes: &[u64], capacity: u64, required_free: u64) -> Option<u64> {
    let used = *sizes.get(Filesystem::ROOT)?;
    let free = capacity.saturating_sub(used);
    let needed = required_free.saturating_sub(free);
    sizes.iter().copied().filter(|&s| s >= needed).min()
}

impl AocParser for NoSpaceLeftOnDevice {
    type SharedData<'a> = SharedData;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let session = parse_lines(input, TerminalLine::parse)?;
        Ok(SharedData {
            filesystem: Filesystem::build(&session),
            sizes: None,
        })
    }
}

impl PartSolver<1> for NoSpaceLeftOnDevice {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sum_of_small_dirs(shared.sizes(), SMALL_DIR_LIMIT).to_string())
    }
}

impl PartSolver<2> for NoSpaceLeftOnDevice {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        smallest_dir_to_delete(shared.sizes(), DISK_CAPACITY, REQUIRED_FREE)
            .map(|s| s.to_string())
            .ok_or_else(|| SolveError::no_solution("no directory frees enough space"))
    }
}
