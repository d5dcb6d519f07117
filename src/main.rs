use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

mod card;
mod config;
mod effects;
mod error;
mod fireworks;
mod surface;

use config::Config;
use effects::Effect;
use error::{CardError, CardResult};

static BG_COLOR: OnceLock<(u8, u8, u8)> = OnceLock::new();

pub fn get_bg_color() -> (u8, u8, u8) {
    *BG_COLOR.get().unwrap_or(&config::DEFAULT_BG)
}

fn init_logging(config: &Config) -> CardResult<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).map_err(|e| CardError::logging(format!("{}: {e}", path.display())))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::from(config.log_level))
        .try_init()
        .map_err(|e| CardError::logging(e.to_string()))
}

fn is_exit_key(event: &Event) -> bool {
    let Event::Key(key_event) = event else {
        return false;
    };
    key_event.kind == KeyEventKind::Press
        && (key_event.code == KeyCode::Char('q')
            || key_event.code == KeyCode::Esc
            || (key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(event::KeyModifiers::CONTROL)))
}

fn frame_loop<E: Effect>(stdout: &mut BufWriter<Stdout>, config: &Config) -> CardResult<()> {
    let (cols, rows) = terminal::size()?;
    let mut effect = E::new(cols as usize, rows as usize * 2, config);

    let started = Instant::now();
    let frame = Duration::from_secs_f64(1.0 / config.fps as f64);
    let mut next_frame = started;

    loop {
        // Spend the time until the next frame waiting on input.
        let now = Instant::now();
        if now < next_frame {
            if event::poll(next_frame - now)? {
                let event = event::read()?;
                if is_exit_key(&event) {
                    break;
                }
                match &event {
                    Event::Resize(cols, rows) => {
                        tracing::info!(cols, rows, "terminal resized");
                        effect = E::new(*cols as usize, *rows as usize * 2, config);
                        execute!(stdout, Clear(ClearType::All))?;
                    }
                    _ => effect.handle_event(&event),
                }
            }
            continue;
        }

        // Drop frames rather than bunching them up after a stall.
        next_frame = (next_frame + frame).max(now);
        let now_ms = now.duration_since(started).as_secs_f64() * 1000.0;
        effect.update(now_ms);
        effect.render(stdout)?;
    }

    Ok(())
}

fn run_effect<E: Effect>(config: &Config) -> CardResult<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let result = frame_loop::<E>(&mut stdout, config);

    // Restore the terminal even when the loop failed.
    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn run() -> CardResult<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let _ = BG_COLOR.set(config.bg_color);
    tracing::info!(
        fps = config.fps,
        seed = ?config.seed,
        intro_ms = config.intro_ms,
        "starting greeting card"
    );

    run_effect::<effects::greeting::GreetingCardEffect>(&config)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("greetcard: {err}");
        std::process::exit(1);
    }
}
