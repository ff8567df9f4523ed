//! Round driver
//!
//! Runs the frame stepper against abstract collaborators: an input source,
//! a frame clock and a render sink. The binary plugs in the terminal; tests
//! plug in scripted input and a fixed clock.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::compute::{init_round, step};
use crate::config::GameConfig;
use crate::entities::{RoundEnd, RoundState};
use crate::input::{InputSource, KeyLatch};

/// Poll interval of the post-round restart loop
pub const RESTART_POLL: Duration = Duration::from_millis(5);

/// Measures elapsed time between successive frames.
pub trait FrameClock {
    /// Seconds since the previous call (or since the last reset).
    fn delta(&mut self) -> f32;
    /// Start measuring afresh, discarding time spent outside the loop.
    fn reset(&mut self);
}

/// Monotonic wall clock.
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// A clock that reports the same delta every frame.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub f32);

impl FrameClock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.0
    }

    fn reset(&mut self) {}
}

/// Receives every finished frame.
pub trait RenderSink {
    fn present(&mut self, state: &RoundState) -> io::Result<()>;

    /// Show a frame while the game is paused; the default presents it as is.
    fn present_paused(&mut self, state: &RoundState) -> io::Result<()> {
        self.present(state)
    }

    /// Show the end-of-round message; the default just presents the final frame.
    fn present_round_over(&mut self, state: &RoundState, _summary: &RoundSummary) -> io::Result<()> {
        self.present(state)
    }
}

/// What the shell gets back when a round stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub end: RoundEnd,
    pub score: u32,
    pub lives: u32,
    pub frames: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartDecision {
    Restart,
    Quit,
}

/// Frames per second for a frame of `dt` seconds; None for a zero or
/// negative delta.
pub fn fps(dt: f32) -> Option<f32> {
    if dt > 0.0 && dt.is_finite() {
        Some(1.0 / dt)
    } else {
        None
    }
}

/// Step `state` until the round ends or the player quits.
///
/// The pause key toggles a pause during which nothing is stepped; the
/// clock is reset on resume so the paused time is not simulated.
pub fn run_round<I, C, S, R>(
    state: &mut RoundState,
    input: &mut I,
    clock: &mut C,
    sink: &mut S,
    rng: &mut R,
) -> io::Result<RoundSummary>
where
    I: InputSource,
    C: FrameClock,
    S: RenderSink,
    R: Rng,
{
    let frame_cap = Duration::from_millis(state.config.frame_cap_ms);
    let mut pause_latch = KeyLatch::default();
    let mut paused = false;
    clock.reset();

    loop {
        let frame_start = Instant::now();
        let dt = clock.delta();
        let keys = input.sample();

        if pause_latch.trigger(keys.pause) {
            paused = !paused;
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
            if !paused {
                clock.reset();
            }
        }

        if paused && !keys.quit {
            sink.present_paused(state)?;
        } else {
            let status = step(state, &keys, dt, rng);
            sink.present(state)?;
            if let Some(end) = status.round_end() {
                return Ok(RoundSummary {
                    end,
                    score: state.score(),
                    lives: state.lives(),
                    frames: state.frame,
                });
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_cap {
            thread::sleep(frame_cap - elapsed);
        }
    }
}

/// Wait for fire (restart) or quit after a round ends. Fire must be
/// released first so a held key does not skip the round-over screen.
pub fn await_restart<I: InputSource>(input: &mut I, poll: Duration) -> RestartDecision {
    let mut fire = KeyLatch::disarmed();
    loop {
        let keys = input.sample();
        if keys.quit {
            return RestartDecision::Quit;
        }
        if fire.trigger(keys.fire) {
            return RestartDecision::Restart;
        }
        thread::sleep(poll);
    }
}

/// Play rounds back to back until the player quits.
///
/// `on_round_end` sees every summary, including the final quit.
pub fn run_session<I, C, S, R, F>(
    config: &GameConfig,
    input: &mut I,
    clock: &mut C,
    sink: &mut S,
    rng: &mut R,
    mut on_round_end: F,
) -> io::Result<()>
where
    I: InputSource,
    C: FrameClock,
    S: RenderSink,
    R: Rng,
    F: FnMut(&RoundSummary),
{
    loop {
        let mut state = init_round(config);
        let summary = run_round(&mut state, input, clock, sink, rng)?;
        on_round_end(&summary);
        if summary.end == RoundEnd::Quit {
            return Ok(());
        }
        sink.present_round_over(&state, &summary)?;
        if await_restart(input, RESTART_POLL) == RestartDecision::Quit {
            log::info!("Leaving after round-over screen");
            return Ok(());
        }
    }
}
