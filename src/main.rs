mod display;
mod keypad;

use std::fs::File;
use std::io::{self, stdout, BufWriter, Stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use nebula_conqueror::config::Config;
use nebula_conqueror::game::Game;
use nebula_conqueror::hal::{Delay, Display, Keypad, Note, ScanLine, SenseLine, Speaker};
use nebula_conqueror::tone::{Pin, ToneChannel, ToneGenerator};

use display::LcdScreen;
use keypad::HeldKeys;

/// Poll interval of the tone thread while the laser is silent.
const TONE_IDLE: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(name = "nebula_conqueror", about = "Side-scrolling shooter on an emulated 20x4 LCD")]
struct Args {
    /// Seed for enemy spawn rolls.
    #[arg(long, default_value_t = 100)]
    seed: u64,

    /// Minimum wall-clock length of one scheduler tick, in milliseconds.
    #[arg(long, default_value_t = 1)]
    tick_ms: u64,

    /// Divide every subsystem period by this factor.
    #[arg(long, default_value_t = 1)]
    speed: u32,

    /// Write tracing output here (filtered by RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Board ─────────────────────────────────────────────────────────────────────

/// The terminal as the game's hardware: LCD, keypad, speaker and delay.
struct Terminal {
    screen: LcdScreen<BufWriter<Stdout>>,
    keys: HeldKeys,
    tone: Arc<ToneChannel>,
}

impl Display for Terminal {
    fn move_cursor(&mut self, address: u8) -> io::Result<()> {
        self.screen.move_cursor(address)
    }

    fn write_glyph(&mut self, code: u8) -> io::Result<()> {
        self.screen.write_glyph(code)
    }
}

impl Keypad for Terminal {
    fn set_strobe(&mut self, high: ScanLine, low: ScanLine) {
        self.keys.set_strobe(high, low);
    }

    fn read_bit(&mut self, line: SenseLine) -> bool {
        self.keys.read_bit(line)
    }
}

impl Speaker for Terminal {
    fn arm_tone(&mut self, pitch: u32) {
        self.tone.request(pitch);
    }

    fn play_note(&mut self, note: Note) {
        thread::sleep(note.duration());
    }
}

impl Delay for Terminal {
    fn delay_ms(&mut self, ms: u32) {
        // Whatever was drawn before the pause has to be visible during it.
        let _ = self.screen.flush();
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

// ── Tone timer ────────────────────────────────────────────────────────────────

/// Stand-in for the periodic timer interrupt. The terminal cannot toggle a
/// speaker pin, so pulses are traced and `sounding` tells the UI to show a
/// note while a sound plays out.
fn spawn_tone_timer(channel: Arc<ToneChannel>, sounding: Arc<AtomicBool>) {
    thread::spawn(move || {
        let mut generator = ToneGenerator::default();
        loop {
            let (rise, _fall) = generator.service(&channel);
            let active = generator.is_active();
            sounding.store(active, Ordering::Relaxed);
            if rise == Pin::High {
                tracing::trace!(pitch = generator.pitch(), "laser pulse");
            }
            if active {
                // 1000 timer clocks ≈ 2.7 ms
                let half = Duration::from_micros(u64::from(generator.pitch()) * 27 / 10);
                thread::sleep(half * 2);
            } else {
                thread::sleep(TONE_IDLE);
            }
        }
    });
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nebula_conqueror=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;
    tracing::info!(?args, "starting");

    let mut out = stdout();
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events let keys open as soon as they are let go; terminals
    // without the protocol fall back to the hold window in `keypad`.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let tone = Arc::new(ToneChannel::new());
    let sounding = Arc::new(AtomicBool::new(false));
    spawn_tone_timer(Arc::clone(&tone), Arc::clone(&sounding));

    let result = run(&args, &rx, tone, &sounding);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!(error = %err, "game loop failed");
    }
    result
}

fn run(
    args: &Args,
    rx: &mpsc::Receiver<Event>,
    tone: Arc<ToneChannel>,
    sounding: &AtomicBool,
) -> anyhow::Result<()> {
    let mut board = Terminal {
        screen: LcdScreen::new(BufWriter::new(stdout())),
        keys: HeldKeys::new(),
        tone,
    };
    board.screen.draw_frame()?;

    let mut game = Game::new(Config::default().scaled(args.speed));
    let mut rng = StdRng::seed_from_u64(args.seed);
    let tick = Duration::from_millis(args.tick_ms);

    loop {
        let tick_start = Instant::now();

        if board.keys.pump(rx) {
            break;
        }

        game.tick(&mut board, &mut rng)?;
        board.screen.show_tone(sounding.load(Ordering::Relaxed))?;
        board.screen.flush()?;

        let elapsed = tick_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }

    tracing::info!(ticks = game.ticks(), "quit");
    Ok(())
}
