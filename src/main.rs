mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use console_invaders::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use console_invaders::input::{InputSnapshot, InputSource, Key, KeyHolds};
use console_invaders::session::{run_session, WallClock};
use console_invaders::GameConfig;

use display::TerminalSink;

// ── Keyboard input ────────────────────────────────────────────────────────────

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Pause => Some(Key::Pause),
        _ => None,
    }
}

/// Turns the terminal's key event stream into held/not-held key state.
///
/// Keyboard-enhancement terminals (kitty protocol) report releases, which
/// drop the key at once; elsewhere a key expires after its hold window.
struct KeyboardInput {
    rx: mpsc::Receiver<Event>,
    holds: KeyHolds,
}

impl KeyboardInput {
    fn new(rx: mpsc::Receiver<Event>) -> Self {
        Self {
            rx,
            holds: KeyHolds::default(),
        }
    }
}

impl InputSource for KeyboardInput {
    fn sample(&mut self) -> InputSnapshot {
        let now = Instant::now();
        while let Ok(ev) = self.rx.try_recv() {
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev {
                let Some(key) = map_key(code, modifiers) else {
                    continue;
                };
                match kind {
                    KeyEventKind::Press => self.holds.press(key, now),
                    KeyEventKind::Repeat => self.holds.repeat(key, now),
                    KeyEventKind::Release => self.holds.release(key),
                }
            }
        }
        self.holds.snapshot(now)
    }
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".console_invaders_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    if let Err(e) = std::fs::write(high_score_path(), score.to_string()) {
        log::warn!("Could not save high score: {}", e);
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file in the temp directory; stderr would scribble over the game.
fn init_logging() {
    let path = std::env::temp_dir().join("coninv.log");
    if let Ok(file) = std::fs::File::create(&path) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = GameConfig::load();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: mpsc::Receiver<Event>, config: &GameConfig) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    if (width as usize) < SCREEN_WIDTH || (height as usize) < SCREEN_HEIGHT + 1 {
        log::warn!(
            "Terminal is {}x{}, the game needs {}x{}",
            width,
            height,
            SCREEN_WIDTH,
            SCREEN_HEIGHT + 1
        );
    }

    let mut high_score = load_high_score();
    let mut input = KeyboardInput::new(rx);
    let mut sink = TerminalSink::new(out, high_score);
    let mut clock = WallClock::new();
    let mut rng = match config.seed {
        Some(seed) => {
            log::info!("Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    run_session(config, &mut input, &mut clock, &mut sink, &mut rng, |summary| {
        log::info!("Round ended: {:?}", summary);
        // Persist new high score if beaten
        if summary.score > high_score {
            high_score = summary.score;
            save_high_score(high_score);
        }
    })
}
