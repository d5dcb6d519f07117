use std::f32::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const SAMPLE_RATE: u32 = 44_100;

/// C major seventh pad, alternating sine and triangle voices.
const PAD_NOTES: [f32; 4] = [130.81, 164.81, 196.00, 246.94];
const PAD_GAIN: f32 = 0.15;
const VOICE_GAIN: f32 = 0.12;
const VIBRATO_HZ: f32 = 1.5;

const MELODY: [f32; 8] = [261.63, 329.63, 392.00, 493.88, 523.25, 493.88, 392.00, 329.63];
const STEP_S: f32 = 0.6;
const GLIDE_S: f32 = 0.15;
const FIRST_NOTE_GAIN: f32 = 0.2;
const ACCENT_GAIN: f32 = 0.22;
const SETTLE_GAIN: f32 = 0.1;
const SETTLE_S: f32 = 0.5;

const MASTER_GAIN: f32 = 0.5;
const FADE_IN_S: f32 = 2.0;
const FADE_OUT_S: f32 = 0.8;

/// Pad plus arpeggio, generated one mono sample at a time.
///
/// The iterator ends once a released synth has faded to silence.
pub struct Synth {
    sample_rate: f32,
    sample: u64,
    pad_phase: [f32; 4],
    melody_phase: f32,
    released_at: Option<f32>,
}

impl Synth {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            sample: 0,
            pad_phase: [0.0; 4],
            melody_phase: 0.0,
            released_at: None,
        }
    }

    fn elapsed(&self) -> f32 {
        self.sample as f32 / self.sample_rate
    }

    /// Begin the fade-out. The arpeggio stops stepping from here on.
    pub fn release(&mut self) {
        if self.released_at.is_none() {
            self.released_at = Some(self.elapsed());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.released_at
            .is_some_and(|at| self.elapsed() >= at + FADE_OUT_S)
    }

    fn master_gain(&self, t: f32) -> f32 {
        let fade_in = |t: f32| MASTER_GAIN * (t / FADE_IN_S).min(1.0);
        match self.released_at {
            Some(at) if t >= at => fade_in(at) * (1.0 - (t - at) / FADE_OUT_S).max(0.0),
            _ => fade_in(t),
        }
    }

    /// Arpeggio time, frozen at the moment of release.
    fn melody_clock(&self, t: f32) -> f32 {
        self.released_at.map_or(t, |at| t.min(at))
    }

    fn next_sample(&mut self) -> f32 {
        let t = self.elapsed();

        let mut pad = 0.0;
        for (i, (&note, phase)) in PAD_NOTES.iter().zip(&mut self.pad_phase).enumerate() {
            let lfo_hz = 0.15 + i as f32 * 0.05;
            let freq = note + VIBRATO_HZ * (TAU * lfo_hz * t).sin();
            let wave = if i % 2 == 0 { sine(*phase) } else { triangle(*phase) };
            pad += wave * VOICE_GAIN;
            *phase = (*phase + freq / self.sample_rate).fract();
        }

        let clock = self.melody_clock(t);
        let melody = sine(self.melody_phase) * melody_gain(clock);
        self.melody_phase = (self.melody_phase + melody_freq(clock) / self.sample_rate).fract();

        self.sample += 1;
        (pad * PAD_GAIN + melody) * self.master_gain(t)
    }
}

impl Iterator for Synth {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        Some(self.next_sample())
    }
}

/// Index of the arpeggio note sounding `t` seconds in.
pub fn melody_step(t: f32) -> usize {
    (t / STEP_S).floor() as usize % MELODY.len()
}

fn melody_freq(t: f32) -> f32 {
    let step = (t / STEP_S).floor() as usize;
    if step == 0 {
        return MELODY[0];
    }
    let from = MELODY[(step - 1) % MELODY.len()];
    let to = MELODY[melody_step(t)];
    let glide = ((t - step as f32 * STEP_S) / GLIDE_S).min(1.0);
    from + (to - from) * glide
}

fn melody_gain(t: f32) -> f32 {
    let step = (t / STEP_S).floor();
    if step < 1.0 {
        return FIRST_NOTE_GAIN;
    }
    let since = ((t - step * STEP_S) / SETTLE_S).min(1.0);
    ACCENT_GAIN + (SETTLE_GAIN - ACCENT_GAIN) * since
}

fn sine(phase: f32) -> f32 {
    (TAU * phase).sin()
}

fn triangle(phase: f32) -> f32 {
    1.0 - 4.0 * (phase - 0.5).abs()
}

/// A playing synth plus the flag that asks it to fade out.
pub struct Voice {
    synth: Synth,
    release: Arc<AtomicBool>,
}

impl Voice {
    fn new(release: Arc<AtomicBool>) -> Self {
        Self {
            synth: Synth::new(SAMPLE_RATE),
            release,
        }
    }
}

impl Iterator for Voice {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.release.load(Ordering::Relaxed) {
            self.synth.release();
        }
        self.synth.next()
    }
}

#[cfg(feature = "audio")]
mod output {
    use super::{SAMPLE_RATE, Voice};
    use crate::error::{CardError, CardResult};
    use rodio::{OutputStream, OutputStreamHandle, Source};
    use std::time::Duration;

    impl Source for Voice {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            None
        }
    }

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> CardResult<Self> {
            let (stream, handle) = OutputStream::try_default().map_err(|e| CardError::audio(e.to_string()))?;
            Ok(Self { _stream: stream, handle })
        }

        pub fn play(&self, voice: Voice) -> CardResult<()> {
            self.handle
                .play_raw(voice)
                .map_err(|e| CardError::audio(e.to_string()))
        }
    }
}

#[cfg(not(feature = "audio"))]
mod output {
    use super::Voice;
    use crate::error::{CardError, CardResult};

    pub enum Output {}

    impl Output {
        pub fn open() -> CardResult<Self> {
            Err(CardError::audio("built without the `audio` feature"))
        }

        pub fn play(&self, _voice: Voice) -> CardResult<()> {
            match *self {}
        }
    }
}

/// Background music with an on/off toggle.
pub struct Music {
    output: Option<output::Output>,
    playing: Option<Arc<AtomicBool>>,
}

impl Music {
    /// Open the audio device. Without one the card runs silently.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::silent();
        }
        match output::Output::open() {
            Ok(output) => Self {
                output: Some(output),
                playing: None,
            },
            Err(err) => {
                tracing::warn!(%err, "no audio output, continuing without music");
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self {
            output: None,
            playing: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn start(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        if self.playing.is_some() {
            return;
        }
        let release = Arc::new(AtomicBool::new(false));
        match output.play(Voice::new(Arc::clone(&release))) {
            Ok(()) => {
                tracing::info!("music started");
                self.playing = Some(release);
            }
            Err(err) => tracing::warn!(%err, "could not start music"),
        }
    }

    /// Fade the current voice out. It drops itself once silent.
    pub fn stop(&mut self) {
        if let Some(release) = self.playing.take() {
            release.store(true, Ordering::Relaxed);
            tracing::info!("music stopped");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.stop();
        } else if self.output.is_some() {
            self.start();
        } else {
            tracing::debug!("music toggle ignored, no audio output");
        }
    }
}

impl Drop for Music {
    fn drop(&mut self) {
        self.stop();
    }
}
