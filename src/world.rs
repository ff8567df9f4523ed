//! The world grid: a fixed-size character buffer holding one rendered frame.
//!
//! Besides being what the render sink blits, the grid is the surface the
//! collision resolver reads back to decide whether a projectile is over
//! something solid.

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const BLANK: char = ' ';
pub const PLAYER_SHOT_GLYPH: char = '|';
pub const ENEMY_SHOT_GLYPH: char = '*';
pub const EXPLOSION_GLYPH: char = 'x';
pub const PLAYER_GLYPH: &str = "<I>";
pub const PLAYER_HIT_GLYPH: char = 'X';
/// Shield glyph indexed by remaining strength
pub const SHIELD_GLYPHS: [char; 4] = [' ', '-', '=', '#'];

/// Glyphs a projectile passes through without registering a hit.
pub const TRANSPARENT_GLYPHS: [char; 6] = [BLANK, '-', '=', '#', ENEMY_SHOT_GLYPH, PLAYER_SHOT_GLYPH];

pub fn is_transparent(glyph: char) -> bool {
    TRANSPARENT_GLYPHS.contains(&glyph)
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Whether (row, col) lies inside the grid. Callers clip with this
    /// before writing entities that may overhang the screen.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Set one cell. Writing outside the grid is a caller bug.
    pub fn write(&mut self, row: usize, col: usize, glyph: char) {
        debug_assert!(row < self.height && col < self.width, "write out of grid: ({row}, {col})");
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = glyph;
        }
    }

    /// Write a run of glyphs starting at (row, col), dropping anything that
    /// falls off the grid.
    pub fn write_clipped(&mut self, row: i32, col: i32, glyphs: impl IntoIterator<Item = char>) {
        for (k, glyph) in glyphs.into_iter().enumerate() {
            let c = col + k as i32;
            if self.contains(row, c) {
                self.write(row as usize, c as usize, glyph);
            }
        }
    }

    /// Glyph at (row, col); blank for anything outside the grid.
    pub fn read_at(&self, row: usize, col: usize) -> char {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col]
        } else {
            BLANK
        }
    }

    /// One screen row as a slice of glyphs.
    pub fn row(&self, row: usize) -> &[char] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == BLANK)
    }
}
