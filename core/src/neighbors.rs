use hashbrown::HashSet;
use ndarray::Dimension;

use crate::*;

pub trait NeighborIterExt {
    fn iter_neighbors(&self, coords: &[usize]) -> NeighborIter;
}

impl NeighborIterExt for Dimensions {
    fn iter_neighbors(&self, coords: &[usize]) -> NeighborIter {
        NeighborIter::new(coords, self.as_slice())
    }
}

impl<T> NeighborIterExt for Tensor<T> {
    fn iter_neighbors(&self, coords: &[usize]) -> NeighborIter {
        NeighborIter::new(coords, self.shape())
    }
}

impl Dimensions {
    /// Every cell of the board, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = Coord> + use<> {
        ndarray::indices(self.to_nd_index())
            .into_iter()
            .map(|index| Coord::from_slice(index.slice()))
    }

    pub fn all_cells(&self) -> HashSet<Coord> {
        self.iter_cells().collect()
    }
}

/// Chebyshev neighborhood of a cell: everything reachable by moving at most one step along every axis at once.
///
/// Each axis only contributes the candidates that stay inside the board, so the work follows the number of actual
/// neighbors instead of the rank.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord,
    lows: Coord,
    highs: Coord,
    next: Option<Coord>,
}

impl NeighborIter {
    fn new(center: &[usize], bounds: &[usize]) -> Self {
        let mut lows = Coord::with_capacity(center.len());
        let mut highs = Coord::with_capacity(center.len());
        for (&c, &size) in center.iter().zip(bounds) {
            lows.push(c.saturating_sub(1));
            highs.push(c.saturating_add(1).min(size.saturating_sub(1)));
        }

        let exhausted = center.len() != bounds.len()
            || lows.iter().zip(&highs).any(|(low, high)| low > high);
        Self {
            center: Coord::from_slice(center),
            next: (!exhausted).then(|| lows.clone()),
            lows,
            highs,
        }
    }

    /// Odometer step over the per-axis candidate ranges, last axis fastest.
    fn successor(&self, current: &[usize]) -> Option<Coord> {
        let mut next = Coord::from_slice(current);
        for axis in (0..next.len()).rev() {
            if next[axis] < self.highs[axis] {
                next[axis] += 1;
                return Some(next);
            }
            next[axis] = self.lows[axis];
        }
        None
    }
}

impl Iterator for NeighborIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next.take()?;
            self.next = self.successor(&current);

            if current != self.center {
                return Some(current);
            }
        }
    }
}
