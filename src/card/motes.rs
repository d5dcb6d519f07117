use crate::surface::{RadialGradient, Rgba, Surface};
use noise::{NoiseFn, Perlin};

pub const MOTE_COUNT: usize = 18;

// hsl(45, 80%, 70%) and hsl(330, 80%, 70%)
const AMBER: (u8, u8, u8) = (240, 209, 117);
const ROSE: (u8, u8, u8) = (240, 117, 179);

const SWAY_PX: f64 = 24.0;

struct Mote {
    x_frac: f32,
    size: f32,
    duration_ms: f64,
    phase: f64,
    color: (u8, u8, u8),
    lane: f64,
}

/// Soft dots drifting up through the whole card, behind everything else.
pub struct Motes {
    motes: Vec<Mote>,
    noise: Perlin,
}

impl Motes {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        let motes = (0..MOTE_COUNT)
            .map(|i| {
                let duration_ms = 8000.0 + rng.f64() * 12_000.0;
                Mote {
                    x_frac: rng.f32(),
                    size: 2.0 + rng.f32() * 4.0,
                    duration_ms,
                    // Start part-way through the cycle so the screen is
                    // populated from the first frame.
                    phase: rng.f64(),
                    color: if rng.bool() { AMBER } else { ROSE },
                    lane: i as f64 * 7.31,
                }
            })
            .collect();
        Self {
            motes,
            noise: Perlin::new(rng.u32(..)),
        }
    }

    /// Position, radius and opacity of mote `i` at `now_ms`.
    fn state(&self, i: usize, now_ms: f64, width: f32, height: f32) -> (f32, f32, f32, f32) {
        let m = &self.motes[i];
        let progress = (now_ms / m.duration_ms + m.phase).fract();
        let travel = height + m.size * 2.0;
        let y = height + m.size - progress as f32 * travel;
        let sway = self.noise.get([m.lane, now_ms * 0.0002]) * SWAY_PX;
        let x = m.x_frac * width + sway as f32;
        let opacity = (progress * std::f64::consts::PI).sin() as f32 * 0.7;
        (x, y, m.size, opacity)
    }

    pub fn draw<S: Surface + ?Sized>(&self, now_ms: f64, surface: &mut S) {
        let (width, height) = (surface.width(), surface.height());
        for i in 0..self.motes.len() {
            let (x, y, size, opacity) = self.state(i, now_ms, width, height);
            if opacity <= 0.0 {
                continue;
            }
            let glow = RadialGradient::new(x, y, size)
                .with_stop(0.0, Rgba::from_rgb(self.motes[i].color, opacity))
                .with_stop(1.0, Rgba::TRANSPARENT);
            surface.fill_circle(x, y, size, &glow.into());
        }
    }
}
