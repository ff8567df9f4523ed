//! Destructible cover between the player and the formation.

use crate::consts::{SCREEN_HEIGHT, SHIELD_COUNT, SHIELD_HEIGHT, SHIELD_LENGTH, SHIELD_MAX_STRENGTH, SHIELD_ROW, SHIELD_SPACING};
use crate::world::{WorldGrid, SHIELD_GLYPHS};

/// A block of SHIELD_LENGTH x SHIELD_HEIGHT cells, each with its own strength.
#[derive(Clone, Debug, PartialEq)]
pub struct Shield {
    pub x: i32,
    pub y: i32,
    strength: [u8; SHIELD_LENGTH * SHIELD_HEIGHT],
}

impl Shield {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            strength: [SHIELD_MAX_STRENGTH; SHIELD_LENGTH * SHIELD_HEIGHT],
        }
    }

    fn offset(&self, col: i32, row: i32) -> Option<usize> {
        let dx = col - self.x;
        let dy = row - self.y;
        if (0..SHIELD_LENGTH as i32).contains(&dx) && (0..SHIELD_HEIGHT as i32).contains(&dy) {
            Some(dy as usize * SHIELD_LENGTH + dx as usize)
        } else {
            None
        }
    }

    /// Absorb a hit at screen (col, row).
    ///
    /// Returns false outside the footprint or on a worn-out cell, which
    /// projectiles pass straight through. Otherwise the cell loses one point
    /// of strength and the hit is absorbed.
    pub fn hit(&mut self, col: i32, row: i32) -> bool {
        match self.offset(col, row) {
            Some(i) if self.strength[i] > 0 => {
                self.strength[i] -= 1;
                true
            }
            _ => false,
        }
    }

    /// Strength of the cell at local (col, row), None outside the shield.
    pub fn strength_at(&self, col: usize, row: usize) -> Option<u8> {
        if col < SHIELD_LENGTH && row < SHIELD_HEIGHT {
            Some(self.strength[row * SHIELD_LENGTH + col])
        } else {
            None
        }
    }

    pub fn total_strength(&self) -> u32 {
        self.strength.iter().map(|&s| s as u32).sum()
    }

    pub fn draw(&self, grid: &mut WorldGrid) {
        for row in 0..SHIELD_HEIGHT {
            let glyphs = self.strength[row * SHIELD_LENGTH..(row + 1) * SHIELD_LENGTH]
                .iter()
                .map(|&s| SHIELD_GLYPHS[s as usize]);
            grid.write_clipped(self.y + row as i32, self.x, glyphs);
        }
    }
}

/// The three shields of a fresh round, evenly spaced above the player.
pub fn standard_shields() -> Vec<Shield> {
    debug_assert!(SHIELD_ROW + (SHIELD_HEIGHT as i32) < SCREEN_HEIGHT as i32);
    (0..SHIELD_COUNT)
        .map(|i| Shield::new((i as i32 + 1) * SHIELD_SPACING, SHIELD_ROW))
        .collect()
}

/// Offer a hit at (col, row) to each shield in turn; at most one absorbs it.
pub fn absorb_hit(shields: &mut [Shield], col: i32, row: i32) -> bool {
    shields.iter_mut().any(|s| s.hit(col, row))
}
