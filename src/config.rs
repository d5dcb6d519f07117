use crate::error::CardError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_BG: (u8, u8, u8) = (0x0a, 0x0a, 0x1a);

/// Animated New Year greeting card for the terminal.
///
/// Click anywhere to launch a firework. Press 'm' or click the note in the
/// corner to toggle music. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Parser, Debug, Clone)]
#[command(name = "greetcard", version)]
pub struct Config {
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_parser = parse_hex_color, default_value = "0a0a1a")]
    pub bg_color: (u8, u8, u8),

    /// Target frame rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Logical pixels per half-block pixel
    #[arg(long, default_value_t = 4.0, value_parser = parse_scale)]
    pub scale: f32,

    /// How long the intro title holds before the letter (ms)
    #[arg(long, default_value_t = 3000)]
    pub intro_ms: u64,

    /// Start without background music
    #[arg(long)]
    pub no_music: bool,

    /// Seed for a reproducible show
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the animation)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_BG,
            fps: 60,
            scale: 4.0,
            intro_ms: 3000,
            no_music: false,
            seed: None,
            log_file: None,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

pub fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), CardError> {
    let invalid = || CardError::InvalidColor(hex.to_string());
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;

    Ok((r, g, b))
}

fn parse_scale(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CardError::InvalidScale(value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("1a1b26").unwrap(), (0x1a, 0x1b, 0x26));
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), (255, 255, 255));
        assert!(parse_hex_color("12345").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn defaults_match_cli_defaults() {
        let parsed = Config::try_parse_from(["greetcard"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.bg_color, default.bg_color);
        assert_eq!(parsed.fps, default.fps);
        assert_eq!(parsed.scale, default.scale);
        assert_eq!(parsed.intro_ms, default.intro_ms);
        assert_eq!(parsed.no_music, default.no_music);
        assert_eq!(parsed.log_level, default.log_level);
        assert!(parsed.seed.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::try_parse_from(["greetcard", "--bg-color", "nope"]).is_err());
        assert!(Config::try_parse_from(["greetcard", "--scale", "0"]).is_err());
        assert!(Config::try_parse_from(["greetcard", "--fps", "0"]).is_err());
    }

    #[test]
    fn parses_full_command_line() {
        let cfg = Config::try_parse_from([
            "greetcard",
            "--bg-color",
            "102030",
            "--seed",
            "7",
            "--scale",
            "2.5",
            "--log-level",
            "debug",
            "--no-music",
        ])
        .unwrap();
        assert_eq!(cfg.bg_color, (0x10, 0x20, 0x30));
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.scale, 2.5);
        assert!(cfg.no_music);
        assert_eq!(tracing::Level::from(cfg.log_level), tracing::Level::DEBUG);
    }
}
