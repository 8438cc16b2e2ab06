use alloc::string::{String, ToString};
use core::fmt;

use crate::*;

impl GameState {
    /// Prepares the board for display.
    ///
    /// Hidden cells show as [`Glyph::Hidden`] unless `xray` is set, in which case the whole board is shown.
    pub fn render(&self, xray: bool) -> Tensor<Glyph> {
        self.board().zip_map(self.mask(), |&cell, &revealed| {
            if xray || revealed {
                cell.into()
            } else {
                Glyph::Hidden
            }
        })
    }

    /// Same as [`GameState::render`] but as nested lists of display strings.
    pub fn render_nested(&self, xray: bool) -> Nested<String> {
        self.render(xray).map(ToString::to_string).to_nested()
    }

    /// Human readable dump of every field, for debugging.
    ///
    /// The game status is printed under `status:`. Dumps from the earlier Python tooling labelled the same line
    /// `state:`, so scripts scraping that label need updating.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

fn write_field<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    value: &Nested<T>,
) -> fmt::Result {
    let children = value.children();
    if children.iter().any(Nested::is_branch) {
        writeln!(f, "{name}:")?;
        for child in children {
            writeln!(f, "    {child}")?;
        }
        Ok(())
    } else {
        writeln!(f, "{name}: {value}")
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, "board", &self.board().to_nested())?;
        writeln!(f, "dimensions: {:?}", self.dimensions())?;
        write_field(f, "mask", &self.mask().to_nested())?;
        write!(f, "status: {}", self.status())
    }
}
