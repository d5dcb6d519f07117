/// Launch density. The card opens in `Intro` and settles into `Ambient`
/// for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DensityMode {
    Intro,
    Ambient,
}

impl DensityMode {
    /// Opacity of the background wash laid over the previous frame.
    pub fn fade_alpha(self) -> f32 {
        match self {
            DensityMode::Intro => 0.18,
            DensityMode::Ambient => 0.12,
        }
    }

    fn roll_interval(self, rng: &mut fastrand::Rng) -> f64 {
        match self {
            DensityMode::Intro => 250.0 + rng.f64() * 350.0,
            DensityMode::Ambient => 1500.0 + rng.f64() * 2500.0,
        }
    }
}

/// Decides how many shells go up on a given frame.
///
/// The threshold is re-rolled on every poll and compared against the time
/// since the last launch, so launches come in irregular clumps rather than
/// on a steady beat.
pub struct SpawnScheduler {
    mode: DensityMode,
    last_launch_ms: f64,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self {
            mode: DensityMode::Intro,
            last_launch_ms: 0.0,
        }
    }

    pub fn mode(&self) -> DensityMode {
        self.mode
    }

    /// One-way switch to the sparse density. Further calls are no-ops.
    pub fn switch_to_ambient(&mut self) {
        if self.mode == DensityMode::Intro {
            self.mode = DensityMode::Ambient;
            tracing::info!("fireworks switched to ambient density");
        }
    }

    /// Number of shells to launch this frame (0-3 in intro, 0-1 in ambient).
    pub fn poll(&mut self, now_ms: f64, rng: &mut fastrand::Rng) -> usize {
        let interval = self.mode.roll_interval(rng);
        if now_ms - self.last_launch_ms <= interval {
            return 0;
        }
        self.last_launch_ms = now_ms;

        let mut count = 1;
        if self.mode == DensityMode::Intro {
            if rng.f64() > 0.2 {
                count += 1;
            }
            if rng.f64() > 0.5 {
                count += 1;
            }
        }
        count
    }
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}
