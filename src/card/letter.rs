use crate::surface::{Paint, Rect, Rgba, Surface, TextOverlay};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Message,
    Wish,
    Ending,
}

impl LineStyle {
    fn color(self) -> (u8, u8, u8) {
        match self {
            LineStyle::Message => (0xfb, 0xbf, 0x24),
            LineStyle::Wish => (0xf9, 0xa8, 0xd4),
            LineStyle::Ending => (0xfc, 0xd3, 0x4d),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Line {
    pub text: &'static str,
    pub style: LineStyle,
    /// Delay before the next line; zero ends the letter.
    pub duration_ms: f64,
    pub divider: bool,
}

pub fn default_script() -> Vec<Line> {
    vec![
        Line { text: "Hey you, hello there!", style: LineStyle::Message, duration_ms: 3000.0, divider: false },
        Line {
            text: "A new year is starting, and I have a few words I wanted to send your way.",
            style: LineStyle::Wish,
            duration_ms: 4000.0,
            divider: false,
        },
        Line {
            text: "Wishing you good health, bright days, and all the best things finding their way to you.",
            style: LineStyle::Wish,
            duration_ms: 5000.0,
            divider: false,
        },
        Line {
            text: "May every meal and every season of the year ahead be gentle and calm for you.",
            style: LineStyle::Wish,
            duration_ms: 5000.0,
            divider: false,
        },
        Line {
            text: "And here's hoping we get to share a lot more of it together.",
            style: LineStyle::Wish,
            duration_ms: 4000.0,
            divider: false,
        },
        Line { text: "Happy New Year!", style: LineStyle::Ending, duration_ms: 0.0, divider: true },
    ]
}

const CARD_FADE_MS: f64 = 800.0;
const LINE_FADE_MS: f64 = 400.0;
const MAX_CARD_COLS: usize = 60;
const MAX_CARD_ROWS: usize = 14;
const CARD_TINT: (u8, u8, u8) = (22, 16, 42);
const BORDER: (u8, u8, u8) = (0xfd, 0xe6, 0x8a);

/// Card position in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub col: usize,
    pub row: usize,
    pub cols: usize,
    pub rows: usize,
}

impl CellRect {
    /// Logical-pixel rectangle under these cells on a half-block canvas.
    pub fn to_logical(self, scale: f32) -> Rect {
        Rect::new(
            self.col as f32 * scale,
            self.row as f32 * 2.0 * scale,
            self.cols as f32 * scale,
            self.rows as f32 * 2.0 * scale,
        )
    }
}

/// The scrolling letter: lines appear one after another and stay.
pub struct Letter {
    script: Vec<Line>,
    shown_at: Option<f64>,
    revealed_at: Vec<f64>,
    next_due: Option<f64>,
}

impl Letter {
    pub fn new(script: Vec<Line>) -> Self {
        Self {
            script,
            shown_at: None,
            revealed_at: Vec::new(),
            next_due: None,
        }
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    #[cfg(test)]
    pub fn revealed(&self) -> usize {
        self.revealed_at.len()
    }

    pub fn show(&mut self, now_ms: f64) {
        self.shown_at.get_or_insert(now_ms);
    }

    /// Reveal the first line now and schedule the rest.
    pub fn start(&mut self, now_ms: f64) {
        if self.revealed_at.is_empty() && self.next_due.is_none() && !self.script.is_empty() {
            self.next_due = Some(now_ms);
            self.update(now_ms);
        }
    }

    pub fn update(&mut self, now_ms: f64) {
        while let Some(due) = self.next_due {
            if now_ms < due {
                break;
            }
            let idx = self.revealed_at.len();
            let line = &self.script[idx];
            self.revealed_at.push(due);
            tracing::info!(line = idx, "letter line revealed");

            self.next_due = if line.duration_ms > 0.0 && idx + 1 < self.script.len() {
                Some(due + line.duration_ms)
            } else {
                None
            };
        }
    }

    pub fn card_rect(&self, cols: usize, rows: usize) -> Option<CellRect> {
        self.shown_at?;
        let card_cols = cols.saturating_sub(4).min(MAX_CARD_COLS).max(8.min(cols));
        let card_rows = rows.saturating_sub(4).min(MAX_CARD_ROWS).max(4.min(rows));
        Some(CellRect {
            col: (cols - card_cols) / 2,
            row: (rows - card_rows) / 2,
            cols: card_cols,
            rows: card_rows,
        })
    }

    /// Text rows for the revealed lines, wrapped to `width` columns.
    fn layout(&self, width: usize, now_ms: f64) -> Vec<(String, LineStyle, f32)> {
        let mut rows = Vec::new();
        for (line, &at) in self.script.iter().zip(&self.revealed_at) {
            let opacity = ((now_ms - at) / LINE_FADE_MS).clamp(0.0, 1.0) as f32;
            if line.divider {
                rows.push((String::new(), line.style, opacity));
                rows.push(("─".repeat(width), line.style, opacity * 0.5));
            }
            for text in wrap(line.text, width) {
                rows.push((text, line.style, opacity));
            }
            rows.push((String::new(), line.style, opacity));
        }
        // No trailing spacer after the newest line.
        rows.pop();
        rows
    }

    pub fn draw<S: Surface + ?Sized>(&self, now_ms: f64, scale: f32, surface: &mut S, overlay: &mut TextOverlay) {
        let Some(shown_at) = self.shown_at else {
            return;
        };
        let Some(card) = self.card_rect(overlay.cols(), overlay.rows()) else {
            return;
        };
        let fade = ((now_ms - shown_at) / CARD_FADE_MS).clamp(0.0, 1.0) as f32;

        let area = card.to_logical(scale);
        let previous = surface.global_alpha();
        surface.set_global_alpha(0.6 * fade);
        surface.fill_rect(area.x, area.y, area.w, area.h, &Paint::Solid(Rgba::opaque(CARD_TINT)));
        surface.set_global_alpha(previous);

        draw_border(overlay, card, fade);

        let inner_cols = card.cols.saturating_sub(4);
        let inner_rows = card.rows.saturating_sub(2);
        let rows = self.layout(inner_cols, now_ms);
        // Keep the newest line in view.
        let skip = rows.len().saturating_sub(inner_rows);
        for (i, (text, style, opacity)) in rows.iter().skip(skip).enumerate() {
            let len = text.chars().count();
            let indent = if *style == LineStyle::Ending { inner_cols.saturating_sub(len) / 2 } else { 0 };
            overlay.put_str(
                (card.col + 2 + indent) as isize,
                (card.row + 1 + i) as isize,
                text,
                style.color(),
                opacity * fade,
            );
        }
    }
}

fn draw_border(overlay: &mut TextOverlay, card: CellRect, opacity: f32) {
    if card.cols < 2 || card.rows < 2 {
        return;
    }
    let (left, top) = (card.col as isize, card.row as isize);
    let right = left + card.cols as isize - 1;
    let bottom = top + card.rows as isize - 1;
    let alpha = opacity * 0.7;

    for col in left + 1..right {
        overlay.put(col, top, '─', BORDER, alpha);
        overlay.put(col, bottom, '─', BORDER, alpha);
    }
    for row in top + 1..bottom {
        overlay.put(left, row, '│', BORDER, alpha);
        overlay.put(right, row, '│', BORDER, alpha);
    }
    overlay.put(left, top, '╭', BORDER, alpha);
    overlay.put(right, top, '╮', BORDER, alpha);
    overlay.put(left, bottom, '╰', BORDER, alpha);
    overlay.put(right, bottom, '╯', BORDER, alpha);
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
