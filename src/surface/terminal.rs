use super::Canvas;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: (u8, u8, u8),
    pub opacity: f32,
}

/// Text drawn on top of the raster, addressed in terminal cells.
pub struct TextOverlay {
    cols: usize,
    rows: usize,
    cells: Vec<Option<Glyph>>,
}

impl TextOverlay {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Glyph> {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    pub fn put(&mut self, col: isize, row: isize, ch: char, color: (u8, u8, u8), opacity: f32) {
        if col < 0 || row < 0 || opacity <= 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = Some(Glyph {
                ch,
                color,
                opacity: opacity.min(1.0),
            });
        }
    }

    pub fn put_str(&mut self, col: isize, row: isize, text: &str, color: (u8, u8, u8), opacity: f32) {
        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                self.put(col + i as isize, row, ch, color, opacity);
            }
        }
    }
}

/// Serialises a [`Canvas`] plus [`TextOverlay`] into one ANSI frame.
pub struct TerminalPresenter {
    output_buf: Vec<u8>,
}

impl TerminalPresenter {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    pub fn present<W: Write>(&mut self, canvas: &Canvas, overlay: &TextOverlay, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let width = canvas.raster_width();
        let height = canvas.raster_height();

        let mut prev_top_color: (u8, u8, u8) = (255, 255, 255);
        let mut prev_bot_color: (u8, u8, u8) = (255, 255, 255);

        for y in (0..height).step_by(2) {
            for x in 0..width {
                let top_color = canvas.pixel(x, y);
                let bot_color = if y + 1 < height { canvas.pixel(x, y + 1) } else { top_color };

                let (ch, bg, fg) = match overlay.get(x, y / 2) {
                    Some(glyph) => {
                        let bg = average(top_color, bot_color);
                        (glyph.ch, bg, mix(bg, glyph.color, glyph.opacity))
                    }
                    None => ('▄', top_color, bot_color),
                };

                if bg != prev_top_color {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    prev_top_color = bg;
                }
                if fg != prev_bot_color {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    prev_bot_color = fg;
                }

                let mut utf8 = [0u8; 4];
                self.output_buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top_color = (255, 255, 255);
            prev_bot_color = (255, 255, 255);
            if y + 2 < height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

fn average(a: (u8, u8, u8), b: (u8, u8, u8)) -> (u8, u8, u8) {
    (
        ((a.0 as u16 + b.0 as u16) / 2) as u8,
        ((a.1 as u16 + b.1 as u16) / 2) as u8,
        ((a.2 as u16 + b.2 as u16) / 2) as u8,
    )
}

fn mix(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_starts_at_home_and_uses_half_blocks() {
        let canvas = Canvas::new(3, 4, 1.0, (10, 10, 26));
        let overlay = TextOverlay::new(3, 2);
        let mut presenter = TerminalPresenter::new(3, 2);
        let mut out = Vec::new();
        presenter.present(&canvas, &overlay, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches('▄').count(), 6);
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn unchanged_colours_are_not_repeated() {
        let canvas = Canvas::new(8, 2, 1.0, (1, 2, 3));
        let overlay = TextOverlay::new(8, 1);
        let mut presenter = TerminalPresenter::new(8, 1);
        let mut out = Vec::new();
        presenter.present(&canvas, &overlay, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\x1b[48;2;1;2;3m").count(), 1);
        assert_eq!(text.matches("\x1b[38;2;1;2;3m").count(), 1);
    }

    #[test]
    fn overlay_glyph_replaces_half_block() {
        let canvas = Canvas::new(4, 2, 1.0, (0, 0, 0));
        let mut overlay = TextOverlay::new(4, 1);
        overlay.put_str(1, 0, "hi", (255, 255, 255), 1.0);
        let mut presenter = TerminalPresenter::new(4, 1);
        let mut out = Vec::new();
        presenter.present(&canvas, &overlay, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hi"));
        assert_eq!(text.matches('▄').count(), 2);
        assert!(text.contains("\x1b[38;2;255;255;255m"));
    }

    #[test]
    fn overlay_ignores_out_of_bounds_and_invisible_glyphs() {
        let mut overlay = TextOverlay::new(2, 2);
        overlay.put(-1, 0, 'x', (1, 1, 1), 1.0);
        overlay.put(5, 0, 'x', (1, 1, 1), 1.0);
        overlay.put(0, 0, 'x', (1, 1, 1), 0.0);
        for row in 0..2 {
            for col in 0..2 {
                assert!(overlay.get(col, row).is_none());
            }
        }
    }
}
