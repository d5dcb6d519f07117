use crate::config::Config;
use crossterm::event::Event;
use std::io::{BufWriter, Stdout};

pub mod greeting;

pub trait Effect {
    /// `width` is in terminal columns, `height` in half-block rows (two per
    /// terminal row).
    fn new(width: usize, height: usize, config: &Config) -> Self
    where
        Self: Sized;
    /// Advance one frame. `now_ms` is monotonic time since the card opened.
    fn update(&mut self, now_ms: f64);
    fn render(&mut self, stdout: &mut BufWriter<Stdout>) -> std::io::Result<()>;
    fn handle_event(&mut self, _event: &Event) {}
}
