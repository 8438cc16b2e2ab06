use alloc::vec::Vec;
use core::fmt;
use ndarray::IxDyn;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Coordinates of a single cell, one component per axis.
///
/// Boards up to rank 4 keep their coordinates inline.
pub type Coord = SmallVec<[usize; 4]>;

/// Count type used for the number of mines adjacent to a cell.
pub type MineCount = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for &Dimensions {
    type Output = IxDyn;

    fn to_nd_index(self) -> Self::Output {
        IxDyn(self.as_slice())
    }
}

/// Size of every axis of a board, fixed for the lifetime of a game.
///
/// Always has a rank of at least one and every axis holds at least one cell.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Dimensions(Coord);

impl Dimensions {
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> Result<Self> {
        let sizes: Coord = sizes.into_iter().collect();
        if sizes.is_empty() || sizes.contains(&0) {
            return Err(GameError::InvalidDimensions);
        }
        // same limit ndarray puts on the element count of an array
        sizes
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .filter(|&total| isize::try_from(total).is_ok())
            .ok_or(GameError::InvalidDimensions)?;
        Ok(Self(sizes))
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Product of all axis sizes, never larger than `isize::MAX`.
    pub fn total_cells(&self) -> usize {
        self.0.iter().product()
    }

    pub fn contains(&self, coords: &[usize]) -> bool {
        coords.len() == self.rank() && coords.iter().zip(&self.0).all(|(&c, &size)| c < size)
    }

    pub fn validate_coords(&self, coords: &[usize]) -> Result<Coord> {
        if self.contains(coords) {
            Ok(Coord::from_slice(coords))
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

impl fmt::Debug for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl TryFrom<Vec<usize>> for Dimensions {
    type Error = GameError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        Self::new(sizes)
    }
}

impl From<Dimensions> for Vec<usize> {
    fn from(dimensions: Dimensions) -> Self {
        dimensions.0.into_vec()
    }
}
