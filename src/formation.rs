//! The enemy formation: a rigid 10x4 block that sweeps sideways, steps down
//! at each screen edge and speeds up as it descends.

use crate::consts::{
    ALIEN_COL_SPACING, ALIEN_GLYPH_WIDTH, ALIEN_ROW_SPACING, FORMATION_COLS, FORMATION_ROWS,
    FORMATION_SIZE, FORMATION_START_X, FORMATION_START_Y, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::world::{WorldGrid, EXPLOSION_GLYPH};

/// Two animation frames per formation row, ALIEN_GLYPH_WIDTH characters each.
pub const ALIEN_GLYPHS: [&str; 4] = ["<o>>o<", "}O{-O-", "[T]]+[", "(+)-x-"];

/// Screen columns from the formation origin to just past the rightmost enemy.
pub const BLOCK_WIDTH: i32 = (FORMATION_COLS as i32 - 1) * ALIEN_COL_SPACING + ALIEN_GLYPH_WIDTH as i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Alive,
    Exploding,
    Dead,
}

/// The single enemy currently blowing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplodingEnemy {
    pub index: usize,
    pub elapsed: f32,
}

/// What the formation did on a call to [`Formation::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    /// Not yet time to move
    Held,
    /// Moved one column sideways
    Shifted,
    /// Hit an edge: reversed, dropped one row and nudged inward
    Reversed,
    /// Reached the bottom of the screen; the round is lost
    Landed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    cells: [EnemyState; FORMATION_SIZE],
    /// Screen position of the top-left enemy
    pub x: i32,
    pub y: i32,
    /// +1 sweeping right, -1 sweeping left
    pub step: i32,
    /// 0 or ALIEN_GLYPH_WIDTH: which half of the glyph string is shown
    pub frame_offset: usize,
    /// Seconds between movement/animation ticks
    pub anim_delay: f32,
    /// Seconds accumulated towards the next tick
    pub anim_elapsed: f32,
    exploding: Option<ExplodingEnemy>,
}

impl Formation {
    pub fn new(anim_delay: f32) -> Self {
        Self {
            cells: [EnemyState::Alive; FORMATION_SIZE],
            x: FORMATION_START_X,
            y: FORMATION_START_Y,
            step: 1,
            frame_offset: 0,
            anim_delay,
            anim_elapsed: 0.0,
            exploding: None,
        }
    }

    pub fn index(row: usize, col: usize) -> usize {
        row * FORMATION_COLS + col
    }

    pub fn state(&self, row: usize, col: usize) -> EnemyState {
        self.cells[Self::index(row, col)]
    }

    pub fn cells(&self) -> &[EnemyState] {
        &self.cells
    }

    pub fn exploding(&self) -> Option<ExplodingEnemy> {
        self.exploding
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&s| s == EnemyState::Alive).count()
    }

    /// No enemy is alive or still exploding.
    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(|&s| s == EnemyState::Dead)
    }

    /// Screen (x, y) of the leftmost glyph column of enemy (row, col).
    pub fn screen_pos(&self, row: usize, col: usize) -> (i32, i32) {
        (
            self.x + col as i32 * ALIEN_COL_SPACING,
            self.y + row as i32 * ALIEN_ROW_SPACING,
        )
    }

    pub fn has_landed(&self) -> bool {
        self.y + FORMATION_ROWS as i32 >= SCREEN_HEIGHT as i32
    }

    /// Accumulate elapsed time; returns true when it is time to move.
    pub fn accumulate(&mut self, dt: f32) -> bool {
        self.anim_elapsed += dt;
        self.anim_elapsed >= self.anim_delay
    }

    /// Move the block if it is time to.
    ///
    /// At an edge the direction flips, the block drops a row, steps one
    /// column back inward and the movement delay shrinks by `delay_step`
    /// down to `min_delay`.
    pub fn advance(&mut self, time_to_move: bool, delay_step: f32, min_delay: f32) -> FormationStep {
        if self.has_landed() {
            return FormationStep::Landed;
        }
        if !time_to_move {
            return FormationStep::Held;
        }
        let at_right = self.x + BLOCK_WIDTH >= SCREEN_WIDTH as i32;
        let at_left = self.x <= 0;
        if (at_right && self.step > 0) || (at_left && self.step < 0) {
            self.step = -self.step;
            self.y += 1;
            self.x += self.step;
            self.anim_delay = (self.anim_delay - delay_step).max(min_delay);
            log::debug!(
                "formation reversed at x={} y={} delay={:.3}",
                self.x,
                self.y,
                self.anim_delay
            );
            FormationStep::Reversed
        } else {
            self.x += self.step;
            FormationStep::Shifted
        }
    }

    /// Swap animation frames and restart the tick timer.
    pub fn flip_frame(&mut self) {
        self.frame_offset = if self.frame_offset == 0 { ALIEN_GLYPH_WIDTH } else { 0 };
        self.anim_elapsed = 0.0;
    }

    /// Find the Alive enemy whose glyph covers screen (col, row), scanning
    /// in row-major order.
    pub fn enemy_at(&self, col: i32, row: i32) -> Option<(usize, usize)> {
        for r in 0..FORMATION_ROWS {
            for c in 0..FORMATION_COLS {
                if self.state(r, c) != EnemyState::Alive {
                    continue;
                }
                let (ex, ey) = self.screen_pos(r, c);
                if ey == row && (ex..ex + ALIEN_GLYPH_WIDTH as i32).contains(&col) {
                    return Some((r, c));
                }
            }
        }
        None
    }

    /// Mark an Alive enemy as exploding and restart the explosion timer.
    ///
    /// Only one enemy explodes at a time: one still exploding from an
    /// earlier hit is finished off first and its index returned.
    pub fn strike(&mut self, row: usize, col: usize) -> Option<usize> {
        let index = Self::index(row, col);
        if self.cells[index] != EnemyState::Alive {
            return None;
        }
        let finished = self.exploding.take().map(|e| {
            self.cells[e.index] = EnemyState::Dead;
            e.index
        });
        self.cells[index] = EnemyState::Exploding;
        self.exploding = Some(ExplodingEnemy { index, elapsed: 0.0 });
        finished
    }

    /// Advance the explosion timer; returns the index of an enemy that just died.
    pub fn tick_explosion(&mut self, dt: f32, duration: f32) -> Option<usize> {
        let e = self.exploding.as_mut()?;
        e.elapsed += dt;
        if e.elapsed < duration {
            return None;
        }
        let index = e.index;
        self.cells[index] = EnemyState::Dead;
        self.exploding = None;
        Some(index)
    }

    /// Alive enemies with their screen positions, in row-major order.
    pub fn alive_positions(&self) -> impl Iterator<Item = (usize, usize, i32, i32)> + '_ {
        (0..FORMATION_ROWS)
            .flat_map(|r| (0..FORMATION_COLS).map(move |c| (r, c)))
            .filter(|&(r, c)| self.state(r, c) == EnemyState::Alive)
            .map(|(r, c)| {
                let (x, y) = self.screen_pos(r, c);
                (r, c, x, y)
            })
    }

    pub fn draw(&self, grid: &mut WorldGrid) {
        for r in 0..FORMATION_ROWS {
            let frame = &ALIEN_GLYPHS[r % ALIEN_GLYPHS.len()][self.frame_offset..self.frame_offset + ALIEN_GLYPH_WIDTH];
            for c in 0..FORMATION_COLS {
                let (x, y) = self.screen_pos(r, c);
                match self.state(r, c) {
                    EnemyState::Alive => grid.write_clipped(y, x, frame.chars()),
                    EnemyState::Exploding => {
                        grid.write_clipped(y, x, std::iter::repeat(EXPLOSION_GLYPH).take(ALIEN_GLYPH_WIDTH))
                    }
                    EnemyState::Dead => {}
                }
            }
        }
    }
}
