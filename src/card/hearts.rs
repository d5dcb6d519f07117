use crate::surface::TextOverlay;

const EMITTERS: usize = 8;
const STAGGER_MS: f64 = 500.0;

const SYMBOLS: [(char, (u8, u8, u8)); 5] = [
    ('♥', (0xfb, 0xbf, 0x24)),
    ('♥', (0xf4, 0x72, 0xb6)),
    ('✦', (0xfd, 0xe6, 0x8a)),
    ('❀', (0xf9, 0xa8, 0xd4)),
    ('✧', (0xc0, 0x84, 0xfc)),
];

#[derive(Clone, Copy, Debug)]
struct Flight {
    symbol: usize,
    col_frac: f32,
    start_ms: f64,
    duration_ms: f64,
}

impl Flight {
    fn new(rng: &mut fastrand::Rng, spawned_ms: f64) -> Self {
        let duration_ms = 10_000.0 + rng.f64() * 15_000.0;
        let delay_ms = rng.f64() * 3000.0;
        Self {
            symbol: rng.usize(0..SYMBOLS.len()),
            col_frac: rng.f32(),
            start_ms: spawned_ms + delay_ms,
            duration_ms,
        }
    }

    fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[derive(Default)]
struct Emitter {
    first_at: f64,
    flight: Option<Flight>,
}

/// Little symbols floating up behind the letter once it is on screen.
#[derive(Default)]
pub struct Hearts {
    emitters: Vec<Emitter>,
}

impl Hearts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        !self.emitters.is_empty()
    }

    pub fn start(&mut self, now_ms: f64) {
        if self.is_running() {
            return;
        }
        self.emitters = (0..EMITTERS)
            .map(|i| Emitter {
                first_at: now_ms + i as f64 * STAGGER_MS,
                flight: None,
            })
            .collect();
    }

    /// Launch first flights and replace finished ones.
    pub fn update(&mut self, now_ms: f64, rng: &mut fastrand::Rng) {
        for emitter in &mut self.emitters {
            match emitter.flight {
                None if now_ms >= emitter.first_at => {
                    emitter.flight = Some(Flight::new(rng, emitter.first_at));
                }
                Some(flight) if now_ms >= flight.end_ms() => {
                    emitter.flight = Some(Flight::new(rng, flight.end_ms()));
                }
                _ => {}
            }
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.emitters.iter().filter(|e| e.flight.is_some()).count()
    }

    pub fn draw(&self, now_ms: f64, overlay: &mut TextOverlay) {
        let cols = overlay.cols() as f32;
        let rows = overlay.rows() as f32;
        for flight in self.emitters.iter().filter_map(|e| e.flight.as_ref()) {
            if now_ms < flight.start_ms {
                continue;
            }
            let t = ((now_ms - flight.start_ms) / flight.duration_ms).clamp(0.0, 1.0) as f32;
            let row = rows - t * (rows + 1.0);
            let col = flight.col_frac * cols;
            let opacity = (t / 0.1).min((1.0 - t) / 0.1).clamp(0.0, 1.0) * 0.8;
            let (ch, color) = SYMBOLS[flight.symbol];
            overlay.put(col as isize, row.floor() as isize, ch, color, opacity);
        }
    }
}
