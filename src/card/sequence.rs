/// Milestones of the card's opening sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    ShowTitle,
    FadeOutIntro,
    EnterAmbient,
    ShowLetter,
    StartLines,
}

const TITLE_DELAY_MS: f64 = 600.0;
const LETTER_DELAY_MS: f64 = 1500.0;
const LINES_DELAY_MS: f64 = 500.0;

/// Emits each [`Cue`] once, in order, the first time the clock reaches it.
pub struct Sequencer {
    timeline: Vec<(f64, Cue)>,
    next: usize,
}

impl Sequencer {
    /// `intro_ms` is how long the title holds before the letter takes over.
    pub fn new(intro_ms: f64) -> Self {
        let letter_at = intro_ms + LETTER_DELAY_MS;
        let timeline = vec![
            (TITLE_DELAY_MS.min(intro_ms), Cue::ShowTitle),
            (intro_ms, Cue::FadeOutIntro),
            (intro_ms, Cue::EnterAmbient),
            (letter_at, Cue::ShowLetter),
            (letter_at + LINES_DELAY_MS, Cue::StartLines),
        ];
        Self { timeline, next: 0 }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.timeline.len()
    }

    /// Cues that came due since the previous poll.
    pub fn poll(&mut self, now_ms: f64) -> Vec<(f64, Cue)> {
        let due = self.timeline[self.next..]
            .iter()
            .take_while(|(at, _)| *at <= now_ms)
            .count();
        let fired = self.timeline[self.next..self.next + due].to_vec();
        self.next += due;
        for (at, cue) in &fired {
            tracing::info!(at_ms = at, ?cue, "sequence cue");
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(fired: Vec<(f64, Cue)>) -> Vec<Cue> {
        fired.into_iter().map(|(_, c)| c).collect()
    }

    #[test]
    fn default_timeline() {
        let mut seq = Sequencer::new(3000.0);
        assert!(seq.poll(599.0).is_empty());
        assert_eq!(cues(seq.poll(600.0)), vec![Cue::ShowTitle]);
        assert!(seq.poll(2999.0).is_empty());
        assert_eq!(cues(seq.poll(3000.0)), vec![Cue::FadeOutIntro, Cue::EnterAmbient]);
        assert_eq!(cues(seq.poll(4500.0)), vec![Cue::ShowLetter]);
        assert!(!seq.is_finished());
        assert_eq!(cues(seq.poll(5000.0)), vec![Cue::StartLines]);
        assert!(seq.is_finished());
    }

    #[test]
    fn late_poll_fires_everything_in_order_once() {
        let mut seq = Sequencer::new(3000.0);
        assert_eq!(
            cues(seq.poll(60_000.0)),
            vec![
                Cue::ShowTitle,
                Cue::FadeOutIntro,
                Cue::EnterAmbient,
                Cue::ShowLetter,
                Cue::StartLines
            ]
        );
        assert!(seq.poll(120_000.0).is_empty());
    }

    #[test]
    fn short_intro_keeps_relative_spacing() {
        let mut seq = Sequencer::new(1000.0);
        assert_eq!(cues(seq.poll(1000.0)), vec![Cue::ShowTitle, Cue::FadeOutIntro, Cue::EnterAmbient]);
        assert_eq!(cues(seq.poll(2500.0)), vec![Cue::ShowLetter]);
        assert_eq!(cues(seq.poll(3000.0)), vec![Cue::StartLines]);
    }
}
