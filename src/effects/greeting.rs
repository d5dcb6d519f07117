use super::Effect;
use crate::card::letter::CellRect;
use crate::card::{Cue, CursorTrail, Hearts, Letter, Motes, Music, Sequencer, Title, letter};
use crate::config::Config;
use crate::fireworks::FireworksShow;
use crate::surface::{Canvas, Rect, TerminalPresenter, TextOverlay};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::io::{BufWriter, Stdout};

const NOTE_ON: (u8, u8, u8) = (0xfb, 0xbf, 0x24);
const NOTE_OFF: (u8, u8, u8) = (0x6b, 0x72, 0x80);

/// The whole card: fireworks underneath, decorations and text on top.
///
/// `trails` belongs to the fireworks alone and carries their fading
/// history from frame to frame. Each frame starts `frame` as a copy of it
/// and paints the decorations there, so they never feed back into the fade.
pub struct GreetingCardEffect {
    cols: usize,
    rows: usize,
    scale: f32,
    now_ms: f64,
    trails: Canvas,
    frame: Canvas,
    overlay: TextOverlay,
    presenter: TerminalPresenter,
    show: FireworksShow,
    sequencer: Sequencer,
    title: Title,
    letter: Letter,
    motes: Motes,
    hearts: Hearts,
    sparkles: CursorTrail,
    music: Music,
    rng: fastrand::Rng,
}

impl GreetingCardEffect {
    /// Terminal cell to logical pixel, at the centre of the cell.
    fn cell_to_logical(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.5) * self.scale,
            (row as f32 * 2.0 + 1.0) * self.scale,
        )
    }

    /// Cells holding the music note in the top-right corner.
    fn music_toggle(&self) -> CellRect {
        CellRect {
            col: self.cols.saturating_sub(3),
            row: 0,
            cols: 3.min(self.cols),
            rows: 1.min(self.rows),
        }
    }

    fn control_regions(&self) -> Vec<Rect> {
        let mut regions = vec![self.music_toggle().to_logical(self.scale)];
        if let Some(card) = self.letter.card_rect(self.cols, self.rows) {
            regions.push(card.to_logical(self.scale));
        }
        regions
    }

    fn draw_music_toggle(&mut self) {
        let (ch, color) = if self.music.is_playing() { ('♫', NOTE_ON) } else { ('♪', NOTE_OFF) };
        let toggle = self.music_toggle();
        self.overlay.put(toggle.col as isize + 1, toggle.row as isize, ch, color, 0.9);
    }

    fn apply(&mut self, at_ms: f64, cue: Cue) {
        match cue {
            Cue::ShowTitle => self.title.show(at_ms),
            Cue::FadeOutIntro => self.title.fade_out(at_ms),
            Cue::EnterAmbient => self.show.switch_to_ambient(),
            Cue::ShowLetter => {
                self.letter.show(at_ms);
                self.hearts.start(at_ms);
                let regions = self.control_regions();
                self.show.set_control_regions(regions);
            }
            Cue::StartLines => self.letter.start(at_ms),
        }
    }

    #[cfg(test)]
    pub fn fireworks(&self) -> &FireworksShow {
        &self.show
    }
}

impl Effect for GreetingCardEffect {
    fn new(width: usize, height: usize, config: &Config) -> Self {
        let rows = height.div_ceil(2);
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let bg_color = crate::get_bg_color();

        tracing::info!(cols = width, rows, scale = config.scale, "card created");

        let mut music = Music::new(!config.no_music);
        music.start();

        let mut card = Self {
            cols: width,
            rows,
            scale: config.scale,
            now_ms: 0.0,
            trails: Canvas::new(width, height, config.scale, bg_color),
            frame: Canvas::new(width, height, config.scale, bg_color),
            overlay: TextOverlay::new(width, rows),
            presenter: TerminalPresenter::new(width, rows),
            show: FireworksShow::new(rng.fork(), bg_color),
            sequencer: Sequencer::new(config.intro_ms as f64),
            title: Title::default(),
            letter: Letter::new(letter::default_script()),
            motes: Motes::new(&mut rng),
            hearts: Hearts::new(),
            sparkles: CursorTrail::new(&mut rng),
            music,
            rng,
        };
        let regions = card.control_regions();
        card.show.set_control_regions(regions);
        card
    }

    fn update(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        if !self.sequencer.is_finished() {
            for (at_ms, cue) in self.sequencer.poll(now_ms) {
                self.apply(at_ms, cue);
            }
        }
        self.letter.update(now_ms);
        self.hearts.update(now_ms, &mut self.rng);
        self.sparkles.update(now_ms);

        self.show.tick(now_ms, &mut self.trails);

        self.frame.copy_from(&self.trails);
        self.motes.draw(now_ms, &mut self.frame);
        self.sparkles.draw(now_ms, &mut self.frame);

        self.overlay.clear();
        self.hearts.draw(now_ms, &mut self.overlay);
        self.title.draw(now_ms, &mut self.overlay);
        self.letter.draw(now_ms, self.scale, &mut self.frame, &mut self.overlay);
        self.draw_music_toggle();
    }

    fn render(&mut self, stdout: &mut BufWriter<Stdout>) -> std::io::Result<()> {
        self.presenter.present(&self.frame, &self.overlay, stdout)
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('m') => {
                self.music.toggle();
            }
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                let (x, y) = self.cell_to_logical(*column, *row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        if self.music_toggle().to_logical(self.scale).contains(x, y) {
                            self.music.toggle();
                        } else if !self.show.click(x, y) {
                            tracing::debug!(x, y, "click inside letter ignored");
                        }
                    }
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.sparkles.pointer_moved(x, y, self.now_ms);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}
