#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use neighbors::*;
pub use planar::*;
pub use render::*;
pub use tensor::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod neighbors;
mod planar;
mod render;
mod tensor;
mod tile;
mod types;

/// What to do when the same bomb coordinates are listed more than once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateBombs {
    #[default]
    Reject,
    /// Keep the first occurrence and ignore the rest.
    Merge,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub dimensions: Dimensions,
    pub bombs: Vec<Coord>,
    #[serde(default)]
    pub duplicate_bombs: DuplicateBombs,
}

impl GameConfig {
    pub fn new(dimensions: Dimensions, bombs: Vec<Coord>) -> Self {
        Self {
            dimensions,
            bombs,
            duplicate_bombs: Default::default(),
        }
    }

    pub fn with_duplicate_bombs(mut self, duplicate_bombs: DuplicateBombs) -> Self {
        self.duplicate_bombs = duplicate_bombs;
        self
    }

    /// Checks every bomb against the dimensions and applies the duplicate policy.
    pub fn validated_bombs(&self) -> Result<Vec<Coord>> {
        let mut seen = HashSet::with_capacity(self.bombs.len());
        let mut bombs = Vec::with_capacity(self.bombs.len());

        for bomb in &self.bombs {
            let coords = self.dimensions.validate_coords(bomb)?;
            if !seen.insert(coords.clone()) {
                match self.duplicate_bombs {
                    DuplicateBombs::Reject => return Err(GameError::DuplicateBomb),
                    DuplicateBombs::Merge => {
                        log::warn!("Ignoring duplicate bomb at {:?}", coords);
                        continue;
                    }
                }
            }
            bombs.push(coords);
        }

        Ok(bombs)
    }
}

/// Starts a game on a board of the given dimensions with bombs at the given coordinates.
///
/// Duplicate bombs are rejected, use [`GameState::new`] with a [`GameConfig`] to merge them instead.
pub fn new_game<D, B, C>(dimensions: D, bombs: B) -> Result<GameState>
where
    D: IntoIterator<Item = usize>,
    B: IntoIterator<Item = C>,
    C: AsRef<[usize]>,
{
    let dimensions = Dimensions::new(dimensions)?;
    let bombs = bombs
        .into_iter()
        .map(|bomb| Coord::from_slice(bomb.as_ref()))
        .collect();
    GameState::new(&GameConfig::new(dimensions, bombs))
}
