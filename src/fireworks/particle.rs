use crate::surface::{Paint, RadialGradient, Rgba, Surface};

const DRAG: f32 = 0.98;
const GRAVITY: f32 = 0.025;
const GLOW_ALPHA: f32 = 0x70 as f32 / 255.0;

/// One fragment of an exploded firework.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    pub decay: f32,
    pub color: (u8, u8, u8),
    pub size: f32,
}

impl Particle {
    pub fn new(rng: &mut fastrand::Rng, x: f32, y: f32, angle: f32, speed: f32, color: (u8, u8, u8)) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            alpha: 1.0,
            decay: 0.007 + rng.f32() * 0.014,
            color,
            size: 1.5 + rng.f32() * 1.5,
        }
    }

    pub fn update(&mut self) {
        self.vx *= DRAG;
        self.vy *= DRAG;
        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.alpha -= self.decay;
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.alpha <= 0.0 {
            return;
        }
        let previous = surface.global_alpha();
        surface.set_global_alpha(self.alpha);

        let glow_radius = self.size * 3.0;
        let glow = RadialGradient::new(self.x, self.y, glow_radius)
            .with_stop(0.0, Rgba::from_rgb(self.color, GLOW_ALPHA))
            .with_stop(1.0, Rgba::TRANSPARENT);
        surface.fill_circle(self.x, self.y, glow_radius, &glow.into());
        surface.fill_circle(self.x, self.y, self.size, &Paint::Solid(Rgba::opaque(self.color)));

        surface.set_global_alpha(previous);
    }
}
