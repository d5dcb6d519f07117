use super::palette;
use super::particle::Particle;
use crate::surface::{Paint, RadialGradient, Rgba, Surface};
use std::collections::VecDeque;
use std::f32::consts::TAU;

const GRAVITY: f32 = 0.035;
pub const TRAIL_LEN: usize = 8;
const TRAIL_FADE: f32 = 0.12;
const CORE_RADIUS: f32 = 2.0;
const HALO_RADIUS: f32 = 10.0;
const HALO_ALPHA: f32 = 0x50 as f32 / 255.0;

#[derive(Clone, Copy, Debug)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// A rising shell. It bursts into [`Particle`]s on the first frame it
/// reaches its target altitude or stops climbing.
#[derive(Clone, Debug)]
pub struct Firework {
    pub x: f32,
    pub y: f32,
    pub target_y: f32,
    pub vx: f32,
    pub vy: f32,
    pub trail: VecDeque<TrailPoint>,
    pub alive: bool,
    pub color: (u8, u8, u8),
}

impl Firework {
    /// Launch from the bottom edge at `x` (random when `None`) toward
    /// `target_y` (somewhere in the upper 10-50% when `None`).
    pub fn new(rng: &mut fastrand::Rng, width: f32, height: f32, x: Option<f32>, target_y: Option<f32>) -> Self {
        let x = x.unwrap_or_else(|| rng.f32() * width);
        let target_y = target_y.unwrap_or_else(|| height * 0.1 + rng.f32() * height * 0.4);
        Self::launch(rng, x, height, target_y)
    }

    /// Launch from an explicit point, e.g. a pointer click, toward the
    /// usual random altitude. A point already above that altitude bursts on
    /// its first frame.
    pub fn at(rng: &mut fastrand::Rng, x: f32, y: f32, height: f32) -> Self {
        let target_y = height * 0.1 + rng.f32() * height * 0.4;
        Self::launch(rng, x, y, target_y)
    }

    fn launch(rng: &mut fastrand::Rng, x: f32, y: f32, target_y: f32) -> Self {
        let speed = 3.5 + rng.f32() * 3.0;
        Self {
            x,
            y,
            target_y,
            vx: (rng.f32() - 0.5) * 1.5,
            vy: -speed,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            alive: true,
            color: palette::random_color(rng),
        }
    }

    /// Advance one frame. Returns `true` on the frame the shell bursts; the
    /// debris is appended to `particles`.
    pub fn update(&mut self, rng: &mut fastrand::Rng, particles: &mut Vec<Particle>) -> bool {
        if !self.alive {
            return false;
        }

        self.trail.push_back(TrailPoint {
            x: self.x,
            y: self.y,
            alpha: 1.0,
        });
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }

        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;

        let burst = self.y <= self.target_y || self.vy >= 0.0;
        if burst {
            self.explode(rng, particles);
            self.alive = false;
        }

        for point in &mut self.trail {
            point.alpha -= TRAIL_FADE;
        }
        burst
    }

    /// Spray 50-99 particles evenly around the circle with a little jitter.
    pub fn explode(&self, rng: &mut fastrand::Rng, particles: &mut Vec<Particle>) -> usize {
        let count = 50 + rng.usize(0..50);
        particles.reserve(count);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + (rng.f32() - 0.5) * 0.4;
            let speed = 1.0 + rng.f32() * 4.5;
            let color = if rng.f32() > 0.3 { self.color } else { palette::random_color(rng) };
            particles.push(Particle::new(rng, self.x, self.y, angle, speed, color));
        }
        tracing::debug!(x = self.x, y = self.y, count, "firework burst");
        count
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let solid = Paint::Solid(Rgba::opaque(self.color));

        for point in &self.trail {
            if point.alpha <= 0.0 {
                continue;
            }
            surface.set_global_alpha(point.alpha * 0.4);
            surface.fill_circle(point.x, point.y, CORE_RADIUS * point.alpha, &solid);
        }
        surface.set_global_alpha(1.0);

        surface.fill_circle(self.x, self.y, CORE_RADIUS, &solid);
        let halo = RadialGradient::new(self.x, self.y, HALO_RADIUS)
            .with_stop(0.0, Rgba::from_rgb(self.color, HALO_ALPHA))
            .with_stop(1.0, Rgba::TRANSPARENT);
        surface.fill_circle(self.x, self.y, HALO_RADIUS, &halo.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{Op, RecordingSurface};

    fn shell(seed: u64) -> (fastrand::Rng, Firework) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let fw = Firework::new(&mut rng, 800.0, 600.0, Some(100.0), Some(200.0));
        (rng, fw)
    }

    #[test]
    fn defaults_fall_in_their_ranges() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..500 {
            let fw = Firework::new(&mut rng, 800.0, 600.0, None, None);
            assert!((0.0..800.0).contains(&fw.x));
            assert_eq!(fw.y, 600.0);
            assert!((60.0..300.0).contains(&fw.target_y));
            assert!((-6.5..=-3.5).contains(&fw.vy));
            assert!((-0.75..0.75).contains(&fw.vx));
            assert!(palette::COLORS.contains(&fw.color));
            assert!(fw.alive);
        }
    }

    #[test]
    fn rises_until_burst_then_bursts_exactly_once() {
        for seed in 0..50 {
            let (mut rng, mut fw) = shell(seed);
            let mut particles = Vec::new();
            let mut bursts = 0;
            let mut last_y = fw.y;

            for _ in 0..2000 {
                let burst = fw.update(&mut rng, &mut particles);
                if burst {
                    bursts += 1;
                    assert!(fw.y <= 200.0 || fw.vy >= 0.0);
                    assert!(!fw.alive);
                    break;
                }
                assert!(fw.y < last_y, "shell must climb every frame before bursting");
                assert!(fw.y > 200.0 && fw.vy < 0.0);
                last_y = fw.y;
            }

            assert_eq!(bursts, 1);
            assert!((50..=99).contains(&particles.len()));
            assert!(!fw.update(&mut rng, &mut particles), "dead shells never burst again");
            assert_eq!(bursts, 1);
        }
    }

    #[test]
    fn apex_triggers_burst_when_target_is_out_of_reach() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut fw = Firework::new(&mut rng, 800.0, 600.0, Some(400.0), Some(-10_000.0));
        let mut particles = Vec::new();
        let mut frames = 0;
        while !fw.update(&mut rng, &mut particles) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(fw.vy >= 0.0);
        assert!(fw.vy - GRAVITY < 0.0, "burst on the first non-negative frame");
    }

    #[test]
    fn target_above_launch_point_may_burst_immediately() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut fw = Firework::new(&mut rng, 800.0, 600.0, Some(10.0), Some(599.0));
        let mut particles = Vec::new();
        assert!(fw.update(&mut rng, &mut particles));
        assert!(!fw.alive);
    }

    #[test]
    fn explosion_count_is_bounded() {
        let mut rng = fastrand::Rng::with_seed(99);
        let fw = Firework::new(&mut rng, 800.0, 600.0, None, None);
        let mut min = usize::MAX;
        let mut max = 0;
        for _ in 0..2000 {
            let mut particles = Vec::new();
            let n = fw.explode(&mut rng, &mut particles);
            assert_eq!(n, particles.len());
            min = min.min(n);
            max = max.max(n);
        }
        assert_eq!(min, 50);
        assert_eq!(max, 99);
    }

    #[test]
    fn most_debris_inherits_shell_color() {
        let mut rng = fastrand::Rng::with_seed(4);
        let fw = Firework::new(&mut rng, 800.0, 600.0, None, None);
        let mut particles = Vec::new();
        for _ in 0..100 {
            fw.explode(&mut rng, &mut particles);
        }
        let inherited = particles.iter().filter(|p| p.color == fw.color).count();
        let share = inherited as f32 / particles.len() as f32;
        // 70% inherit outright; a re-roll hits the same colour 1 time in 11.
        assert!((0.68..0.8).contains(&share), "share {share}");
    }

    #[test]
    fn trail_is_capped_and_fades() {
        let mut rng = fastrand::Rng::with_seed(8);
        let mut fw = Firework::new(&mut rng, 800.0, 6000.0, Some(100.0), Some(-1e9));
        fw.vy = -6.5;
        let mut particles = Vec::new();
        for frame in 0..40 {
            if fw.update(&mut rng, &mut particles) {
                break;
            }
            assert!(fw.trail.len() <= TRAIL_LEN);
            if frame >= TRAIL_LEN {
                assert_eq!(fw.trail.len(), TRAIL_LEN);
            }
            let newest = fw.trail.back().unwrap();
            assert!((newest.alpha - (1.0 - TRAIL_FADE)).abs() < 1e-6);
            for pair in fw.trail.iter().collect::<Vec<_>>().windows(2) {
                assert!(pair[0].alpha < pair[1].alpha);
            }
        }
    }

    #[test]
    fn click_launch_starts_at_the_click() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut fw = Firework::at(&mut rng, 50.0, 50.0, 600.0);
        assert_eq!((fw.x, fw.y), (50.0, 50.0));
        assert!((60.0..300.0).contains(&fw.target_y));

        let mut particles = Vec::new();
        assert!(fw.update(&mut rng, &mut particles), "already above its burst altitude");
    }

    #[test]
    fn draw_resets_global_alpha() {
        let (mut rng, mut fw) = shell(3);
        let mut particles = Vec::new();
        for _ in 0..3 {
            fw.update(&mut rng, &mut particles);
        }
        let mut surface = RecordingSurface::new(800.0, 600.0);
        surface.alpha = 0.25;
        fw.draw(&mut surface);
        assert_eq!(surface.alpha, 1.0);

        let trail_ops = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { alpha, .. } if *alpha < 1.0))
            .count();
        assert_eq!(trail_ops, 3);
        match surface.ops.last() {
            Some(Op::Circle { r, gradient: true, alpha, .. }) => {
                assert_eq!(*r, HALO_RADIUS);
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("expected halo last, got {other:?}"),
        }
    }
}
