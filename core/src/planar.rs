//! Two-dimensional shorthands, addressing cells by `(row, col)`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use ndarray::Ix2;

use crate::*;

pub fn new_game_2d(num_rows: usize, num_cols: usize, bombs: &[(usize, usize)]) -> Result<GameState> {
    new_game([num_rows, num_cols], bombs.iter().map(|&(row, col)| [row, col]))
}

pub fn dig_2d(game: &mut GameState, row: usize, col: usize) -> Result<usize> {
    game.dig(&[row, col])
}

/// Renders a two-dimensional game as rows of display strings.
pub fn render_2d(game: &GameState, xray: bool) -> Result<Vec<Vec<String>>> {
    let rendered = game
        .render(xray)
        .into_array()
        .into_dimensionality::<Ix2>()
        .map_err(|_| GameError::InvalidDimensions)?;

    Ok(rendered
        .outer_iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect())
}
