use crate::surface::{RadialGradient, Rgba, Surface};

const THROTTLE_MS: f64 = 100.0;
const LIFETIME_MS: f64 = 600.0;
const RADIUS: f32 = 4.0;
const INNER: (u8, u8, u8) = (0xfd, 0xe6, 0x8a);
const OUTER: (u8, u8, u8) = (0xfb, 0xbf, 0x24);

struct Sparkle {
    x: f32,
    y: f32,
    born_ms: f64,
}

/// Short-lived glints left behind the mouse pointer.
pub struct CursorTrail {
    sparkles: Vec<Sparkle>,
    last_spawn_ms: Option<f64>,
    drift: (f32, f32),
}

impl CursorTrail {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self {
            sparkles: Vec::new(),
            last_spawn_ms: None,
            // Every glint drifts the same way for the whole session.
            drift: (rng.f32() * 20.0 - 10.0, rng.f32() * 20.0 - 10.0),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sparkles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sparkles.is_empty()
    }

    /// Record a pointer move; ignored if the previous glint is under 100 ms old.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        if self.last_spawn_ms.is_some_and(|last| now_ms - last < THROTTLE_MS) {
            return false;
        }
        self.last_spawn_ms = Some(now_ms);
        self.sparkles.push(Sparkle { x, y, born_ms: now_ms });
        true
    }

    pub fn update(&mut self, now_ms: f64) {
        self.sparkles.retain(|s| now_ms - s.born_ms < LIFETIME_MS);
    }

    pub fn draw<S: Surface + ?Sized>(&self, now_ms: f64, surface: &mut S) {
        for s in &self.sparkles {
            let t = ((now_ms - s.born_ms) / LIFETIME_MS).clamp(0.0, 1.0) as f32;
            let scale = 1.0 - t;
            if scale <= 0.0 {
                continue;
            }
            let x = s.x + self.drift.0 * t;
            let y = s.y + self.drift.1 * t;
            let radius = RADIUS * scale;
            let glint = RadialGradient::new(x, y, radius)
                .with_stop(0.0, Rgba::from_rgb(INNER, scale))
                .with_stop(1.0, Rgba::from_rgb(OUTER, 0.0));
            surface.fill_circle(x, y, radius, &glint.into());
        }
    }
}
