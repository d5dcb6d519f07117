use super::firework::Firework;
use super::particle::Particle;
use super::DensityMode;
use super::scheduler::SpawnScheduler;
use crate::surface::{Paint, Rect, Rgba, Surface};

/// Owns the live shells and debris and runs one frame of the display.
pub struct FireworksShow {
    fireworks: Vec<Firework>,
    particles: Vec<Particle>,
    scheduler: SpawnScheduler,
    pending_clicks: Vec<(f32, f32)>,
    control_regions: Vec<Rect>,
    background: (u8, u8, u8),
    rng: fastrand::Rng,
}

impl FireworksShow {
    pub fn new(rng: fastrand::Rng, background: (u8, u8, u8)) -> Self {
        Self {
            fireworks: Vec::with_capacity(16),
            particles: Vec::with_capacity(1024),
            scheduler: SpawnScheduler::new(),
            pending_clicks: Vec::new(),
            control_regions: Vec::new(),
            background,
            rng,
        }
    }

    #[cfg(test)]
    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn mode(&self) -> DensityMode {
        self.scheduler.mode()
    }

    pub fn switch_to_ambient(&mut self) {
        self.scheduler.switch_to_ambient();
    }

    /// Clicks inside any of these regions never launch a shell.
    pub fn set_control_regions(&mut self, regions: Vec<Rect>) {
        self.control_regions = regions;
    }

    /// Queue a launch at a pointer click. The shell appears at the start of
    /// the next tick. Returns `false` when the click hit the control region.
    pub fn click(&mut self, x: f32, y: f32) -> bool {
        if self.control_regions.iter().any(|r| r.contains(x, y)) {
            return false;
        }
        self.pending_clicks.push((x, y));
        true
    }

    /// Run one frame: wash the previous frame, launch, then advance and
    /// draw every live shell and particle, dropping the dead ones.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) {
        let width = surface.width();
        let height = surface.height();

        surface.set_global_alpha(self.scheduler.mode().fade_alpha());
        surface.fill_rect(0.0, 0.0, width, height, &Paint::Solid(Rgba::opaque(self.background)));
        surface.set_global_alpha(1.0);

        self.spawn(now_ms, width, height);
        self.step(surface);
    }

    /// Flush queued clicks and ask the scheduler for new shells.
    pub fn spawn(&mut self, now_ms: f64, width: f32, height: f32) {
        for (x, y) in self.pending_clicks.drain(..) {
            tracing::debug!(x, y, "click launch");
            self.fireworks.push(Firework::at(&mut self.rng, x, y, height));
        }

        let launches = self.scheduler.poll(now_ms, &mut self.rng);
        for _ in 0..launches {
            self.fireworks.push(Firework::new(&mut self.rng, width, height, None, None));
        }
        if launches > 0 {
            tracing::debug!(launches, mode = ?self.scheduler.mode(), "scheduled launch");
        }
    }

    fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let Self {
            fireworks,
            particles,
            rng,
            ..
        } = self;

        fireworks.retain_mut(|fw| {
            fw.update(rng, particles);
            fw.draw(surface);
            fw.alive
        });

        particles.retain_mut(|p| {
            p.update();
            p.draw(surface);
            !p.is_expired()
        });

        tracing::trace!(
            fireworks = self.fireworks.len(),
            particles = self.particles.len(),
            mode = ?self.mode(),
            "frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{Op, RecordingSurface};

    const BG: (u8, u8, u8) = (10, 10, 26);

    fn show(seed: u64) -> FireworksShow {
        FireworksShow::new(fastrand::Rng::with_seed(seed), BG)
    }

    #[test]
    fn first_op_is_the_fade_overlay() {
        let mut show = show(1);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        show.tick(16.0, &mut surface);
        assert_eq!(
            surface.ops[0],
            Op::Rect { x: 0.0, y: 0.0, w: 800.0, h: 600.0, alpha: 0.18 }
        );

        show.switch_to_ambient();
        surface.ops.clear();
        show.tick(32.0, &mut surface);
        assert_eq!(
            surface.ops[0],
            Op::Rect { x: 0.0, y: 0.0, w: 800.0, h: 600.0, alpha: 0.12 }
        );
    }

    #[test]
    fn click_outside_control_region_launches_one_shell_at_the_click() {
        let mut show = show(2);
        show.set_control_regions(vec![Rect::new(700.0, 0.0, 100.0, 40.0)]);
        assert!(show.click(50.0, 50.0));
        assert!(show.fireworks().is_empty(), "launch waits for the next tick");

        // Before the shortest scheduler interval so only the click counts.
        show.spawn(10.0, 800.0, 600.0);
        assert_eq!(show.fireworks().len(), 1);
        let fw = &show.fireworks()[0];
        assert_eq!((fw.x, fw.y), (50.0, 50.0));
        assert!(fw.alive);
    }

    #[test]
    fn click_shell_leaves_its_first_trail_point_at_the_click() {
        let mut show = show(7);
        show.click(120.0, 500.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        show.tick(10.0, &mut surface);

        let trail: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Circle { cx, cy, alpha, gradient: false, .. } if *alpha < 0.5 => Some((*cx, *cy)),
                _ => None,
            })
            .collect();
        assert_eq!(trail, vec![(120.0, 500.0)]);
    }

    #[test]
    fn click_inside_control_region_is_ignored() {
        let mut show = show(3);
        show.set_control_regions(vec![
            Rect::new(700.0, 0.0, 100.0, 40.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        ]);
        assert!(!show.click(50.0, 50.0));
        assert!(!show.click(750.0, 20.0));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        show.tick(10.0, &mut surface);
        assert!(show.fireworks().is_empty());
        assert!(show.particles().is_empty());
    }

    #[test]
    fn scheduled_shells_rise_from_the_bottom() {
        let mut show = show(4);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        show.tick(1000.0, &mut surface);
        assert!((1..=3).contains(&show.fireworks().len()));
        for fw in show.fireworks() {
            assert!(fw.y < 600.0 && fw.y > 590.0);
            assert_eq!(fw.trail.len(), 1);
        }
    }

    #[test]
    fn populations_drain_when_nothing_new_launches() {
        let mut show = show(5);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        show.click(400.0, 300.0);

        // Keep the clock below every launch threshold.
        let mut saw_debris = false;
        for _ in 0..500 {
            surface.ops.clear();
            show.tick(1.0, &mut surface);
            saw_debris |= !show.particles().is_empty();
        }
        assert!(saw_debris);
        assert!(show.particles().is_empty());
        assert!(show.fireworks().is_empty());
        assert_eq!(surface.ops.len(), 1, "only the overlay is drawn");
    }

    #[test]
    fn live_populations_never_hold_dead_entities() {
        let mut show = show(6);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut now = 0.0;
        for frame in 0..2000 {
            now += 16.7;
            if frame == 300 {
                show.switch_to_ambient();
            }
            surface.ops.clear();
            show.tick(now, &mut surface);
            assert!(show.fireworks().iter().all(|fw| fw.alive));
            assert!(show.particles().iter().all(|p| !p.is_expired()));
            assert_eq!(surface.alpha, 1.0);
        }
        assert_eq!(show.mode(), DensityMode::Ambient);
    }
}
