// SPDX-License-Identifier: MIT

//! Grid geometry: axes, program-id coordinates and launch shapes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DebugError;

/// One of the three grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Axis> {
        Axis::ALL.get(index).copied()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Program-id triple of a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pid: [u32; 3],
}

impl Coordinate {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { pid: [x, y, z] }
    }

    /// The first invocation of any grid
    pub fn origin() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: Axis) -> u32 {
        self.pid[axis.index()]
    }
}

impl From<[u32; 3]> for Coordinate {
    fn from(pid: [u32; 3]) -> Self {
        Self { pid }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.pid[0], self.pid[1], self.pid[2])
    }
}

/// Anything that can report the program id along an axis.
///
/// The pure evaluator only ever sees a `Coordinate`; this trait lets both a
/// bare coordinate (host tests) and a launched invocation context feed it.
pub trait ProgramId {
    fn program_id(&self, axis: Axis) -> u32;

    fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.program_id(Axis::X),
            self.program_id(Axis::Y),
            self.program_id(Axis::Z),
        )
    }
}

impl ProgramId for Coordinate {
    fn program_id(&self, axis: Axis) -> u32 {
        self.get(axis)
    }

    fn coordinate(&self) -> Coordinate {
        *self
    }
}

/// Launch extents along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct GridShape {
    dims: [u32; 3],
}

impl GridShape {
    /// Build a grid, every extent must be at least 1
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self, DebugError> {
        let dims = [x, y, z];
        if let Some(axis) = dims.iter().position(|d| *d == 0) {
            return Err(DebugError::config(format!(
                "grid extent along axis {} must be at least 1",
                axis
            )));
        }
        Ok(Self { dims })
    }

    /// A single-invocation grid
    pub fn single() -> Self {
        Self { dims: [1, 1, 1] }
    }

    pub fn extent(&self, axis: Axis) -> u32 {
        self.dims[axis.index()]
    }

    /// Total number of invocations, saturating at `usize::MAX`
    pub fn len(&self) -> usize {
        self.dims
            .iter()
            .fold(1usize, |acc, d| acc.saturating_mul(*d as usize))
    }

    pub fn contains(&self, pid: &Coordinate) -> bool {
        Axis::ALL.iter().all(|a| pid.get(*a) < self.extent(*a))
    }

    /// Every coordinate in the grid, axis 0 varying fastest
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let [dx, dy, dz] = self.dims;
        (0..dz).flat_map(move |z| {
            (0..dy).flat_map(move |y| (0..dx).map(move |x| Coordinate::new(x, y, z)))
        })
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::single()
    }
}

impl TryFrom<Vec<u32>> for GridShape {
    type Error = DebugError;

    fn try_from(dims: Vec<u32>) -> Result<Self, Self::Error> {
        if dims.is_empty() || dims.len() > 3 {
            return Err(DebugError::config(format!(
                "grid must have 1 to 3 dimensions, got {}",
                dims.len()
            )));
        }
        let get = |i: usize| dims.get(i).copied().unwrap_or(1);
        GridShape::new(get(0), get(1), get(2))
    }
}

impl From<GridShape> for Vec<u32> {
    fn from(grid: GridShape) -> Self {
        grid.dims.to_vec()
    }
}

impl FromStr for GridShape {
    type Err = DebugError;

    /// Parse `"4"`, `"4,2"` or `"4,2,1"`; missing extents are 1
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dims = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| DebugError::config(format!("invalid grid extent '{}' in '{}'", part, s)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        GridShape::try_from(dims)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.dims[0], self.dims[1], self.dims[2])
    }
}
