use alloc::collections::VecDeque;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ongoing -> Defeat
/// - Ongoing -> Victory
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Ongoing,
    Defeat,
    Victory,
}

impl GameStatus {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Defeat | Self::Victory)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ongoing
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ongoing => "ongoing",
            Self::Defeat => "defeat",
            Self::Victory => "victory",
        })
    }
}

/// Represents a game from creation to victory or defeat
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    dimensions: Dimensions,
    board: Tensor<BoardCell>,
    mask: Tensor<bool>,
    status: GameStatus,
    #[serde(skip_serializing)]
    hidden_safe: usize,
}

/// Serialized form of [`GameState`], checked before it becomes a game.
#[derive(Deserialize)]
struct RawGameState {
    dimensions: Dimensions,
    board: Tensor<BoardCell>,
    mask: Tensor<bool>,
    status: GameStatus,
}

impl TryFrom<RawGameState> for GameState {
    type Error = GameError;

    fn try_from(raw: RawGameState) -> Result<Self> {
        let RawGameState {
            dimensions,
            board,
            mask,
            status,
        } = raw;

        if board.shape() != dimensions.as_slice() || mask.shape() != dimensions.as_slice() {
            return Err(GameError::InvalidDimensions);
        }

        // the counter is derived state, never taken from the input
        let hidden_safe = board
            .iter()
            .zip(mask.iter())
            .filter(|&(cell, &revealed)| !cell.is_mine() && !revealed)
            .count();

        Ok(Self {
            dimensions,
            board,
            mask,
            status,
            hidden_safe,
        })
    }
}

impl GameState {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let dimensions = config.dimensions.clone();
        let bombs = config.validated_bombs()?;

        let mut board = Tensor::allocate(&dimensions, BoardCell::Count(0));
        let mask = Tensor::allocate(&dimensions, false);

        // counts first, markers after, so a mine next to another mine still ends up as a marker
        for bomb in &bombs {
            for neighbor in dimensions.iter_neighbors(bomb) {
                if let BoardCell::Count(count) = board.get_mut(&neighbor)? {
                    *count += 1;
                }
            }
        }
        for bomb in &bombs {
            board.set(bomb, BoardCell::Mine)?;
        }

        let hidden_safe = dimensions.total_cells() - bombs.len();
        log::debug!(
            "New game with dimensions {:?} and {} bombs",
            dimensions,
            bombs.len()
        );

        Ok(Self {
            dimensions,
            board,
            mask,
            status: Default::default(),
            hidden_safe,
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn board(&self) -> &Tensor<BoardCell> {
        &self.board
    }

    pub fn mask(&self) -> &Tensor<bool> {
        &self.mask
    }

    /// How many cells without a mine are still hidden
    pub fn hidden_safe_cells(&self) -> usize {
        self.hidden_safe
    }

    pub fn cell_at(&self, coords: &[usize]) -> Result<BoardCell> {
        let coords = self.dimensions.validate_coords(coords)?;
        Ok(self.board[&coords[..]])
    }

    pub fn is_revealed(&self, coords: &[usize]) -> Result<bool> {
        let coords = self.dimensions.validate_coords(coords)?;
        Ok(self.mask[&coords[..]])
    }

    /// Scans the whole board, see [`is_won`].
    pub fn is_won(&self) -> bool {
        is_won(&self.board, &self.mask, self.dimensions.iter_cells())
    }

    /// Dig at `coords`, flood-filling through cells without adjacent mines.
    ///
    /// Returns how many cells were newly revealed. Digging an already revealed cell or digging after the game ended
    /// does nothing and returns 0.
    pub fn dig(&mut self, coords: &[usize]) -> Result<usize> {
        let coords = self.dimensions.validate_coords(coords)?;

        if self.status.is_finished() || self.mask[&coords[..]] {
            return Ok(0);
        }

        self.mask[&coords[..]] = true;
        let mut revealed = 1;

        let cell = self.board[&coords[..]];
        match cell {
            BoardCell::Mine => {
                log::debug!("Dug mine at {:?}", coords);
                self.status = GameStatus::Defeat;
                return Ok(revealed);
            }
            BoardCell::Count(0) => revealed += self.flood_fill(&coords),
            BoardCell::Count(_) => {}
        }

        self.hidden_safe -= revealed;
        log::debug!(
            "Dug at {:?}, revealed {}, {} safe cells left",
            coords,
            revealed,
            self.hidden_safe
        );

        if self.hidden_safe == 0 {
            log::debug!("All safe cells revealed");
            self.status = GameStatus::Victory;
        }

        Ok(revealed)
    }

    /// Reveals the connected region around an already revealed empty cell, returning how many cells it opened.
    fn flood_fill(&mut self, origin: &[usize]) -> usize {
        let mut revealed = 0;
        let mut to_visit: VecDeque<Coord> = self
            .dimensions
            .iter_neighbors(origin)
            .filter(|pos| !self.mask[&pos[..]])
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            // the mask doubles as the visited set
            if self.mask[&visit_coords[..]] {
                continue;
            }

            let cell = self.board[&visit_coords[..]];
            if cell.is_mine() {
                continue;
            }

            self.mask[&visit_coords[..]] = true;
            revealed += 1;
            log::trace!("Flood opened cell at {:?}: {}", visit_coords, cell);

            if cell.is_empty() {
                to_visit.extend(
                    self.dimensions
                        .iter_neighbors(&visit_coords)
                        .filter(|pos| !self.mask[&pos[..]]),
                );
            }
        }

        revealed
    }
}

/// Whether every safe cell among `cells` is revealed and every mine is still hidden.
pub fn is_won(
    board: &Tensor<BoardCell>,
    mask: &Tensor<bool>,
    cells: impl IntoIterator<Item = Coord>,
) -> bool {
    let mut total = 0;
    let mut mines = 0;
    let mut revealed_safe = 0;

    for cell in cells {
        total += 1;
        let revealed = mask[&cell[..]];
        match board[&cell[..]] {
            BoardCell::Mine if revealed => return false,
            BoardCell::Mine => mines += 1,
            BoardCell::Count(_) if !revealed => return false,
            BoardCell::Count(_) => revealed_safe += 1,
        }
    }

    revealed_safe == total - mines
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn game(dims: &[usize], bombs: &[&[usize]]) -> GameState {
        new_game(dims.iter().copied(), bombs.iter().copied()).unwrap()
    }

    fn revealed_cells(game: &GameState) -> Vec<Coord> {
        game.dimensions()
            .iter_cells()
            .filter(|cell| game.mask()[&cell[..]])
            .collect()
    }

    fn sample_2d() -> GameState {
        game(&[2, 4], &[&[0, 0], &[1, 0], &[1, 1]])
    }

    fn sample_3d() -> GameState {
        game(&[2, 4, 2], &[&[0, 0, 1], &[1, 0, 0], &[1, 1, 1]])
    }

    #[test]
    fn new_game_counts_adjacent_mines() {
        use BoardCell::*;

        let game = sample_2d();

        let expected = [
            [Mine, Count(3), Count(1), Count(0)],
            [Mine, Mine, Count(1), Count(0)],
        ];
        for (r, row) in expected.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                assert_eq!(game.cell_at(&[r, c]), Ok(cell), "cell ({r}, {c})");
            }
        }
        assert!(game.mask().iter().all(|&revealed| !revealed));
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.hidden_safe_cells(), 5);
    }

    #[test]
    fn new_game_counts_in_three_dimensions() {
        use BoardCell::*;

        let game = sample_3d();

        let expected = [
            [[Count(3), Mine], [Count(3), Count(3)], [Count(1), Count(1)], [Count(0), Count(0)]],
            [[Mine, Count(3)], [Count(3), Mine], [Count(1), Count(1)], [Count(0), Count(0)]],
        ];
        for (x, plane) in expected.iter().enumerate() {
            for (y, row) in plane.iter().enumerate() {
                for (z, &cell) in row.iter().enumerate() {
                    assert_eq!(game.cell_at(&[x, y, z]), Ok(cell), "cell ({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn board_counts_match_mine_neighbors() {
        let game = game(
            &[3, 4, 3],
            &[&[0, 0, 0], &[1, 1, 1], &[2, 3, 2], &[1, 2, 1], &[0, 3, 0]],
        );
        let board = game.board();

        for cell in game.dimensions().iter_cells() {
            if let BoardCell::Count(count) = board[&cell[..]] {
                let mines = board
                    .iter_neighbors(&cell)
                    .filter(|pos| board[&pos[..]].is_mine())
                    .count();
                assert_eq!(count as usize, mines, "cell {cell:?}");
            }
        }
        assert_eq!(board.iter().filter(|cell| cell.is_mine()).count(), 5);
    }

    #[test]
    fn dig_flood_fill_then_victory() {
        let mut game = sample_2d();

        assert_eq!(game.dig(&[0, 1]), Ok(1));
        assert_eq!(game.status(), GameStatus::Ongoing);

        assert_eq!(game.dig(&[0, 3]), Ok(4));
        assert_eq!(game.status(), GameStatus::Victory);
        assert!(game.is_won());
    }

    #[test]
    fn dig_from_hidden_board_leaves_isolated_count_hidden() {
        let mut game = sample_2d();

        assert_eq!(game.dig(&[0, 3]), Ok(4));

        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.is_revealed(&[0, 1]), Ok(false));
        assert_eq!(game.hidden_safe_cells(), 1);
    }

    #[test]
    fn dig_mine_is_defeat() {
        let mut game = sample_2d();

        assert_eq!(game.dig(&[0, 0]), Ok(1));

        assert_eq!(game.status(), GameStatus::Defeat);
        assert_eq!(revealed_cells(&game), [Coord::from_slice(&[0, 0])]);
    }

    #[test]
    fn dig_three_dimensional_region() {
        let mut game = sample_3d();

        assert_eq!(game.dig(&[0, 3, 0]), Ok(8));

        assert_eq!(game.status(), GameStatus::Ongoing);
        let revealed = revealed_cells(&game);
        assert_eq!(revealed.len(), 8);
        assert!(revealed.iter().all(|cell| cell[1] >= 2));
    }

    #[test]
    fn dig_three_dimensional_mine() {
        let mut game = sample_3d();
        game.dig(&[0, 1, 1]).unwrap();

        assert_eq!(game.dig(&[0, 0, 1]), Ok(1));

        assert_eq!(game.status(), GameStatus::Defeat);
        assert_eq!(revealed_cells(&game).len(), 2);
    }

    #[test]
    fn dig_twice_reveals_nothing_new() {
        let mut game = sample_3d();

        assert_eq!(game.dig(&[0, 1, 0]), Ok(1));
        let before = game.clone();

        assert_eq!(game.dig(&[0, 1, 0]), Ok(0));
        assert_eq!(game, before);
    }

    #[test]
    fn finished_game_ignores_digs() {
        let mut game = sample_2d();
        game.dig(&[1, 0]).unwrap();
        let lost = game.clone();

        assert_eq!(game.dig(&[0, 3]), Ok(0));
        assert_eq!(game.dig(&[0, 0]), Ok(0));
        assert_eq!(game, lost);

        let mut game = sample_2d();
        game.dig(&[0, 1]).unwrap();
        game.dig(&[0, 3]).unwrap();
        let won = game.clone();

        assert_eq!(game.dig(&[1, 1]), Ok(0));
        assert_eq!(game, won);
        assert_eq!(game.status(), GameStatus::Victory);
    }

    #[test]
    fn invalid_dig_coordinates_are_errors() {
        let mut game = sample_2d();

        assert_eq!(game.dig(&[2, 0]), Err(GameError::InvalidCoords));
        assert_eq!(game.dig(&[0]), Err(GameError::InvalidCoords));
        assert_eq!(game.dig(&[0, 0, 0]), Err(GameError::InvalidCoords));
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // [0, 0, 1, ., 1, 0, 0]
        let mut game = game(&[7], &[&[3]]);

        assert_eq!(game.dig(&[0]), Ok(3));
        assert_eq!(
            revealed_cells(&game),
            [0, 1, 2].map(|i| Coord::from_slice(&[i]))
        );

        assert_eq!(game.dig(&[6]), Ok(3));
        assert_eq!(game.status(), GameStatus::Victory);
        assert_eq!(game.is_revealed(&[3]), Ok(false));
    }

    #[test]
    fn flood_fill_follows_diagonals() {
        // the empty top-left block only touches the rest of the empty cells via (1, 1) -> (2, 2)
        let mut game = game(&[5, 5], &[&[0, 3], &[3, 0]]);

        let revealed = game.dig(&[4, 4]).unwrap();

        assert_eq!(revealed, 21);
        assert_eq!(game.is_revealed(&[0, 0]), Ok(true));
        assert_eq!(game.is_revealed(&[0, 4]), Ok(false));
        assert_eq!(game.is_revealed(&[4, 0]), Ok(false));
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn board_without_mines_is_won_by_one_dig() {
        let mut game = game(&[3, 2, 2], &[]);

        assert_eq!(game.dig(&[2, 1, 1]), Ok(12));
        assert_eq!(game.status(), GameStatus::Victory);
    }

    #[test]
    fn board_full_of_mines_is_lost_by_one_dig() {
        let mut game = game(&[2], &[&[0], &[1]]);
        assert_eq!(game.hidden_safe_cells(), 0);

        assert_eq!(game.dig(&[1]), Ok(1));
        assert_eq!(game.status(), GameStatus::Defeat);
    }

    #[test]
    fn is_won_requires_exact_mask() {
        let game = sample_2d();
        let cells = || game.dimensions().iter_cells();
        let mut mask = Tensor::allocate(game.dimensions(), false);

        assert!(!is_won(game.board(), &mask, cells()));

        for cell in cells() {
            mask[&cell[..]] = !game.board()[&cell[..]].is_mine();
        }
        assert!(is_won(game.board(), &mask, cells()));

        mask[&[0, 0][..]] = true;
        assert!(!is_won(game.board(), &mask, cells()));
    }

    #[test]
    fn victory_counter_agrees_with_scan() {
        let mut game = sample_3d();
        let safe: Vec<Coord> = game
            .dimensions()
            .iter_cells()
            .filter(|cell| !game.board()[&cell[..]].is_mine())
            .collect();

        for cell in &safe {
            game.dig(cell).unwrap();
            assert_eq!(game.status() == GameStatus::Victory, game.is_won());
        }
        assert_eq!(game.status(), GameStatus::Victory);
    }

    #[test]
    fn high_rank_board_with_unit_axes_plays_through() {
        let mut dims = [1; 20];
        dims[0] = 2;
        let mut other = [0; 20];
        other[0] = 1;
        let mut game = game(&dims, &[&[0; 20]]);

        assert_eq!(game.cell_at(&other), Ok(BoardCell::Count(1)));
        assert_eq!(game.dig(&other), Ok(1));
        assert_eq!(game.status(), GameStatus::Victory);
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_allocation() {
        assert_eq!(
            new_game([usize::MAX, 2], [[0usize, 0]]),
            Err(GameError::InvalidDimensions)
        );
    }

    #[test]
    fn serde_roundtrip_keeps_progress() {
        let mut game = sample_3d();
        game.dig(&[0, 3, 0]).unwrap();

        let value = serde_json::to_value(&game).unwrap();
        assert!(value.get("hidden_safe").is_none());

        let restored: GameState = serde_json::from_value(value).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.hidden_safe_cells(), 5);
    }

    #[test]
    fn deserialize_rejects_mismatched_shapes() {
        let mut game = sample_2d();
        game.dig(&[0, 1]).unwrap();
        let value = serde_json::to_value(&game).unwrap();
        let small = Dimensions::new([1]).unwrap();

        let mut bad_mask = value.clone();
        bad_mask["mask"] = serde_json::to_value(Tensor::allocate(&small, false)).unwrap();
        assert!(serde_json::from_value::<GameState>(bad_mask).is_err());

        let mut bad_board = value;
        bad_board["board"] =
            serde_json::to_value(Tensor::allocate(&small, BoardCell::Count(0))).unwrap();
        assert!(serde_json::from_value::<GameState>(bad_board).is_err());
    }

    #[test]
    fn deserialize_recounts_hidden_safe_cells() {
        let mut game = sample_2d();
        game.dig(&[0, 1]).unwrap();
        let mut value = serde_json::to_value(&game).unwrap();
        value["hidden_safe"] = serde_json::json!(0);

        let mut restored: GameState = serde_json::from_value(value).unwrap();
        assert_eq!(restored.hidden_safe_cells(), 4);
        assert_eq!(restored.status(), GameStatus::Ongoing);

        assert_eq!(restored.dig(&[1, 3]), Ok(4));
        assert_eq!(restored.status(), GameStatus::Victory);
        assert!(restored.is_won());
    }
}
