//! Projectiles: the player's single reusable shot and the enemies' shared pool.

use crate::world::{WorldGrid, ENEMY_SHOT_GLYPH, PLAYER_SHOT_GLYPH};

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    /// Rows per second; negative travels up the screen
    pub speed: f32,
    pub glyph: char,
}

impl Projectile {
    pub fn new(glyph: char, speed: f32) -> Self {
        Self {
            visible: false,
            x: 0.0,
            y: 0.0,
            speed,
            glyph,
        }
    }

    pub fn player_shot(speed: f32) -> Self {
        Self::new(PLAYER_SHOT_GLYPH, -speed.abs())
    }

    pub fn enemy_shot(speed: f32) -> Self {
        Self::new(ENEMY_SHOT_GLYPH, speed.abs())
    }

    pub fn launch(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.visible = true;
    }

    pub fn advance(&mut self, dt: f32) {
        self.y += self.speed * dt;
    }

    /// Rounded screen cell (col, row).
    pub fn cell(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    pub fn draw(&self, grid: &mut WorldGrid) {
        if self.visible {
            let (col, row) = self.cell();
            grid.write_clipped(row, col, [self.glyph]);
        }
    }
}

/// Fixed number of enemy shot slots; a slot is free while invisible.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(capacity: usize, speed: f32) -> Self {
        Self {
            slots: vec![Projectile::enemy_shot(speed); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.visible).count()
    }

    /// Launch from the first free slot. A full pool drops the shot.
    pub fn claim(&mut self, x: f32, y: f32) -> bool {
        match self.slots.iter_mut().find(|p| !p.visible) {
            Some(p) => {
                p.launch(x, y);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.slots.iter_mut()
    }

    pub fn draw(&self, grid: &mut WorldGrid) {
        for p in &self.slots {
            p.draw(grid);
        }
    }
}
