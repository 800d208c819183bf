use std::collections::HashSet;

use anyhow::bail;
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rayon::prelude::*;

use crate::utils::chunks::{parse_lines, parse_list};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 18, title = "Boiling Boulders", tags = ["3d", "flood-fill", "parallel"])]
pub struct BoilingBoulders;

pub type Cube = [i32; 3];

const FACES: [Cube; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Face neighbours of `cube`; `None` where a coordinate would leave the `i32` range
fn neighbors(cube: Cube) -> impl Iterator<Item = Option<Cube>> {
    FACES.into_iter().map(move |d| {
        Some([
            cube[0].checked_add(d[0])?,
            cube[1].checked_add(d[1])?,
            cube[2].checked_add(d[2])?,
        ])
    })
}

/// Largest bounding box the pocket search will allocate
const MAX_VOLUME_CELLS: usize = 1 << 27;

/// Occupancy over the bounding box of a set of cubes
struct Volume {
    min: Cube,
    extent: [usize; 3],
    occupied: Vec<bool>,
}

impl Volume {
    fn new(cubes: &HashSet<Cube>) -> Result<Self, SolveError> {
        let Some(&first) = cubes.iter().next() else {
            return Err(SolveError::no_solution("no cubes"));
        };
        let (mut min, mut max) = (first, first);
        for cube in cubes {
            for axis in 0..3 {
                min[axis] = min[axis].min(cube[axis]);
                max[axis] = max[axis].max(cube[axis]);
            }
        }

        let too_large = || SolveError::SolveFailed("droplet bounding box is too large".into());
        let mut extent = [0usize; 3];
        for axis in 0..3 {
            let span = i64::from(max[axis]) - i64::from(min[axis]) + 1;
            extent[axis] = usize::try_from(span).map_err(|_| too_large())?;
        }
        let size = extent
            .iter()
            .try_fold(1usize, |acc, &e| acc.checked_mul(e))
            .filter(|&size| size <= MAX_VOLUME_CELLS)
            .ok_or_else(too_large)?;

        let mut volume = Self {
            min,
            extent,
            occupied: vec![false; size],
        };
        for &cube in cubes {
            if let Some(idx) = volume.index(cube) {
                volume.occupied[idx] = true;
            }
        }
        Ok(volume)
    }

    fn index(&self, cube: Cube) -> Option<usize> {
        let mut idx = 0;
        for axis in 0..3 {
            let offset = usize::try_from(i64::from(cube[axis]) - i64::from(self.min[axis])).ok()?;
            if offset >= self.extent[axis] {
                return None;
            }
            idx = idx * self.extent[axis] + offset;
        }
        Some(idx)
    }

    fn cube(&self, mut idx: usize) -> Cube {
        let mut cube = [0; 3];
        for axis in (0..3).rev() {
            let extent = self.extent[axis];
            cube[axis] = (i64::from(self.min[axis]) + (idx % extent) as i64) as i32;
            idx /= extent;
        }
        cube
    }

    /// Empty components that never reach outside the box
    fn pockets(&self) -> Vec<HashSet<Cube>> {
        let mut visited = self.occupied.clone();
        let mut pockets = Vec::new();

        for start in 0..visited.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut component = HashSet::new();
            let mut stack = vec![self.cube(start)];
            let mut escapes = false;

            while let Some(cube) = stack.pop() {
                component.insert(cube);
                for next in neighbors(cube) {
                    match next.and_then(|n| self.index(n).map(|idx| (n, idx))) {
                        None => escapes = true,
                        Some((n, idx)) if !visited[idx] => {
                            visited[idx] = true;
                            stack.push(n);
                        }
                        Some(_) => {}
                    }
                }
            }
            if !escapes {
                pockets.push(component);
            }
        }
        pockets
    }
}

/// Faces of `cubes` not shared with another cube of the set
fn open_faces(cubes: &HashSet<Cube>) -> usize {
    cubes
        .iter()
        .map(|&cube| {
            neighbors(cube)
                .filter(|n| !n.is_some_and(|n| cubes.contains(&n)))
                .count()
        })
        .sum()
}

/// Number of cube faces not touching another cube
///
/// With `exclude_pockets`, faces facing a sealed air pocket are not counted.
/// That needs a dense scan of the bounding box, which fails when the box is
/// unreasonably large.
pub fn surface_area(cubes: &HashSet<Cube>, exclude_pockets: bool) -> Result<usize, SolveError> {
    let total = open_faces(cubes);
    if !exclude_pockets || cubes.is_empty() {
        return Ok(total);
    }

    // Every face between a cube and a pocket is also a face of the pocket.
    let pocket_area: usize = Volume::new(cubes)?
        .pockets()
        .par_iter()
        .map(open_faces)
        .sum();
    Ok(total - pocket_area)
}

fn parse_cube(line: &str) -> anyhow::Result<Cube> {
    match parse_list::<i32>(line)?.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => bail!("expected 'x,y,z', got '{}'", line),
    }
}

impl AocParser for BoilingBoulders {
    type SharedData<'a> = HashSet<Cube>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let cubes = parse_lines(input, parse_cube)?;
        let count = cubes.len();
        let cubes: HashSet<Cube> = cubes.into_iter().collect();
        if cubes.len() != count {
            return Err(ParseError::InvalidFormat("a cube is listed twice".to_string()));
        }
        Ok(cubes)
    }
}

impl PartSolver<1> for BoilingBoulders {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        surface_area(shared, false).map(|v| v.to_string())
    }
}

impl PartSolver<2> for BoilingBoulders {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        surface_area(shared, true).map(|v| v.to_string())
    }
}
