use crate::surface::TextOverlay;

const FADE_IN_MS: f64 = 800.0;
const FADE_OUT_MS: f64 = 1500.0;
const HEADLINE: &str = "✦  H A P P Y   N E W   Y E A R  ✦";
const SUBTITLE: &str = "a little letter is on its way";
const GOLD: (u8, u8, u8) = (0xfc, 0xd3, 0x4d);
const BLUSH: (u8, u8, u8) = (0xf9, 0xa8, 0xd4);

/// Centered headline shown over the opening burst of fireworks.
#[derive(Default)]
pub struct Title {
    shown_at: Option<f64>,
    hidden_at: Option<f64>,
}

impl Title {
    pub fn show(&mut self, now_ms: f64) {
        self.shown_at.get_or_insert(now_ms);
    }

    pub fn fade_out(&mut self, now_ms: f64) {
        self.hidden_at.get_or_insert(now_ms);
    }

    pub fn opacity(&self, now_ms: f64) -> f32 {
        let Some(shown) = self.shown_at else {
            return 0.0;
        };
        let fade_in = ((now_ms - shown) / FADE_IN_MS).clamp(0.0, 1.0);
        let fade_out = match self.hidden_at {
            Some(hidden) => 1.0 - ((now_ms - hidden) / FADE_OUT_MS).clamp(0.0, 1.0),
            None => 1.0,
        };
        (fade_in * fade_out) as f32
    }

    pub fn draw(&self, now_ms: f64, overlay: &mut TextOverlay) {
        let opacity = self.opacity(now_ms);
        if opacity <= 0.0 {
            return;
        }
        let mid = overlay.rows() as isize / 2;
        centered(overlay, mid - 1, HEADLINE, GOLD, opacity);
        centered(overlay, mid + 1, SUBTITLE, BLUSH, opacity * 0.8);
    }
}

fn centered(overlay: &mut TextOverlay, row: isize, text: &str, color: (u8, u8, u8), opacity: f32) {
    let len = text.chars().count() as isize;
    let col = (overlay.cols() as isize - len) / 2;
    overlay.put_str(col, row, text, color, opacity);
}
