//! Terminal rendering of the world grid, HUD and round-over overlay.
//!
//! The sink blits the whole world grid every frame, then paints the HUD on
//! row 0 and any overlay. Nothing here feeds back into the simulation.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use console_invaders::consts::{PLAYER_ROW, SCREEN_HEIGHT, SCREEN_WIDTH, SHIELD_HEIGHT, SHIELD_ROW};
use console_invaders::entities::RoundState;
use console_invaders::session::{fps, RenderSink, RoundSummary};
use console_invaders::world::{ENEMY_SHOT_GLYPH, EXPLOSION_GLYPH, PLAYER_HIT_GLYPH, PLAYER_SHOT_GLYPH};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_DEFAULT: Color = Color::Green;
const C_SHIELD: Color = Color::DarkYellow;
const C_EXPLOSION: Color = Color::Red;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

fn glyph_color(row: usize, glyph: char) -> Color {
    let shield_rows = SHIELD_ROW as usize..SHIELD_ROW as usize + SHIELD_HEIGHT;
    match glyph {
        PLAYER_SHOT_GLYPH => C_SHOT_PLAYER,
        ENEMY_SHOT_GLYPH => C_SHOT_ENEMY,
        EXPLOSION_GLYPH | PLAYER_HIT_GLYPH => C_EXPLOSION,
        '#' | '=' | '-' if shield_rows.contains(&row) => C_SHIELD,
        _ if row == PLAYER_ROW as usize => C_PLAYER,
        _ => C_DEFAULT,
    }
}

pub struct TerminalSink<W: Write> {
    out: W,
    high_score: u32,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, high_score: u32) -> Self {
        Self { out, high_score }
    }

    /// Full-buffer blit of the world grid, one colour run at a time.
    fn draw_world(&mut self, state: &RoundState) -> std::io::Result<()> {
        for (r, row) in state.world.rows().enumerate() {
            self.out.queue(cursor::MoveTo(0, r as u16))?;
            let mut run = String::with_capacity(SCREEN_WIDTH);
            let mut run_color = None;
            for &glyph in row {
                let color = glyph_color(r, glyph);
                if run_color != Some(color) && !run.is_empty() {
                    self.flush_run(&mut run, run_color)?;
                }
                run_color = Some(color);
                run.push(glyph);
            }
            self.flush_run(&mut run, run_color)?;
        }
        Ok(())
    }

    fn flush_run(&mut self, run: &mut String, color: Option<Color>) -> std::io::Result<()> {
        if let Some(color) = color {
            self.out.queue(style::SetForegroundColor(color))?;
        }
        self.out.queue(Print(run.as_str()))?;
        run.clear();
        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self, state: &RoundState, paused: bool) -> std::io::Result<()> {
        let fps_text = match fps(state.last_dt) {
            Some(f) => format!("{:.1}", f),
            None => "--".to_string(),
        };
        let hud = format!(
            "Score: {:6}   Lives: {:2}   FPS: {}   Hi: {:6}{}",
            state.score(),
            state.lives(),
            fps_text,
            self.high_score.max(state.score()),
            if paused { "   [PAUSED]" } else { "" }
        );
        self.out.queue(cursor::MoveTo(2, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD))?;
        self.out.queue(Print(hud))?;
        Ok(())
    }

    // ── Round-over overlay ────────────────────────────────────────────────────

    fn draw_round_over(&mut self, summary: &RoundSummary) -> std::io::Result<()> {
        let title = if summary.end.is_victory() { "YOU WIN!" } else { "GAME OVER!" };
        let best_line = if summary.score >= self.high_score && summary.score > 0 {
            format!("NEW BEST: {}", summary.score)
        } else {
            format!("Best: {}", self.high_score)
        };
        let lines: [(String, Color); 5] = [
            (title.to_string(), Color::Red),
            (summary.end.describe().to_string(), Color::White),
            (format!("Final Score: {}", summary.score), Color::Yellow),
            (best_line, Color::Yellow),
            ("Space: restart   Esc: quit".to_string(), C_HINT),
        ];

        let cx = (SCREEN_WIDTH / 2) as u16;
        let start_row = (SCREEN_HEIGHT / 2) as u16 - lines.len() as u16 / 2;
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(msg))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, SCREEN_HEIGHT as u16))?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn present(&mut self, state: &RoundState) -> std::io::Result<()> {
        self.draw_world(state)?;
        self.draw_hud(state, false)?;
        self.finish()
    }

    fn present_paused(&mut self, state: &RoundState) -> std::io::Result<()> {
        self.draw_world(state)?;
        self.draw_hud(state, true)?;
        self.finish()
    }

    fn present_round_over(&mut self, state: &RoundState, summary: &RoundSummary) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_world(state)?;
        self.draw_hud(state, false)?;
        self.draw_round_over(summary)?;
        self.high_score = self.high_score.max(summary.score);
        self.finish()
    }
}
