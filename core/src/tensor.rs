use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};
use ndarray::{ArrayD, ArrayViewD, Zip};
use serde::{Deserialize, Serialize};

use crate::*;

/// Storage addressed by coordinates of a runtime-known rank.
///
/// The shape never changes after allocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tensor<T> {
    cells: ArrayD<T>,
}

impl<T: Clone> Tensor<T> {
    /// Allocates a tensor of the given dimensions with every cell set to `fill`.
    pub fn allocate(dimensions: &Dimensions, fill: T) -> Self {
        Self {
            cells: ArrayD::from_elem(dimensions.to_nd_index(), fill),
        }
    }

    pub fn to_nested(&self) -> Nested<T> {
        nest(self.cells.view())
    }
}

impl<T> Tensor<T> {
    pub fn shape(&self) -> &[usize] {
        self.cells.shape()
    }

    pub fn rank(&self) -> usize {
        self.cells.ndim()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, coords: &[usize]) -> Result<&T> {
        self.check_rank(coords)?;
        self.cells.get(coords).ok_or(GameError::OutOfBounds)
    }

    pub fn get_mut(&mut self, coords: &[usize]) -> Result<&mut T> {
        self.check_rank(coords)?;
        self.cells.get_mut(coords).ok_or(GameError::OutOfBounds)
    }

    pub fn set(&mut self, coords: &[usize], value: T) -> Result<()> {
        *self.get_mut(coords)? = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Tensor<U> {
        Tensor {
            cells: self.cells.map(f),
        }
    }

    /// Combines two tensors of the same shape cell by cell.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn zip_map<S, U>(&self, other: &Tensor<S>, mut f: impl FnMut(&T, &S) -> U) -> Tensor<U> {
        Tensor {
            cells: Zip::from(&self.cells)
                .and(&other.cells)
                .map_collect(|a, b| f(a, b)),
        }
    }

    pub fn as_array(&self) -> &ArrayD<T> {
        &self.cells
    }

    pub fn into_array(self) -> ArrayD<T> {
        self.cells
    }

    fn check_rank(&self, coords: &[usize]) -> Result<()> {
        if coords.len() == self.rank() {
            Ok(())
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}

impl<T> Index<&[usize]> for Tensor<T> {
    type Output = T;

    fn index(&self, coords: &[usize]) -> &Self::Output {
        &self.cells[coords]
    }
}

impl<T> IndexMut<&[usize]> for Tensor<T> {
    fn index_mut(&mut self, coords: &[usize]) -> &mut Self::Output {
        &mut self.cells[coords]
    }
}

fn nest<T: Clone>(view: ArrayViewD<'_, T>) -> Nested<T> {
    if view.ndim() <= 1 {
        Nested::Branch(view.iter().cloned().map(Nested::Leaf).collect())
    } else {
        Nested::Branch(view.outer_iter().map(nest).collect())
    }
}

/// Nested-list view of a tensor, one level of lists per axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    Leaf(T),
    Branch(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub const fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// Child lists or values, empty for a leaf.
    pub fn children(&self) -> &[Nested<T>] {
        match self {
            Self::Leaf(_) => &[],
            Self::Branch(children) => children,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => fmt::Display::fmt(value, f),
            Self::Branch(children) => {
                f.write_str("[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(child, f)?;
                }
                f.write_str("]")
            }
        }
    }
}
