//! Letter Leap round state.
//!
//! One uppercase word at a time; each letter key is scored against the next
//! unmatched character. Word transitions, feedback and praise are driven by
//! named one-shot timers so the whole round advances on ticks and is fully
//! testable without a terminal.

use rand::thread_rng;

use crate::difficulty::{
    clamp_suggestion, next_level, LevelSuggester, SuggestionRequest, PRESSES_PER_ADJUSTMENT,
};
use crate::praise;
use crate::recorder::{summary_id, SessionRecorder, SessionSummary};
use crate::stats;
use crate::timer::{PendingTimers, RoundClock};
use crate::words::WordBank;
use crate::TICK_RATE_MS;

/// How long key feedback stays on screen.
pub const FEEDBACK_CLEAR_MS: u64 = 700;
/// Pause between finishing a word and showing the next one.
pub const NEXT_WORD_DELAY_MS: u64 = 1200;
/// How long praise stays on screen when the next word is slow to arrive.
pub const PRAISE_CLEAR_MS: u64 = 1500;

#[derive(Clone, Debug, Copy, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Result of the most recent scored press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFeedback {
    pub outcome: Outcome,
    /// The character that was expected.
    pub target: char,
}

/// The word being typed and progress through it.
#[derive(Debug, Clone, PartialEq)]
pub struct WordChallenge {
    pub text: String,
    pub matched: usize,
}

impl WordChallenge {
    pub fn new(text: String) -> Self {
        Self { text, matched: 0 }
    }

    pub fn expected_char(&self) -> Option<char> {
        self.text.chars().nth(self.matched)
    }

    pub fn is_complete(&self) -> bool {
        self.matched >= self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypingPhase {
    NotStarted,
    AwaitingInput { word: WordChallenge },
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypingTimer {
    ClearFeedback,
    ClearPraise,
    NextWord,
}

pub struct TypingSession {
    pub phase: TypingPhase,
    pub level: u8,
    pub adaptive: bool,
    /// Bumped on every `start`; late level suggestions carry the round they
    /// were computed for and are dropped when it no longer matches.
    pub round: u64,
    pub total_presses: usize,
    pub correct_presses: usize,
    pub current_streak: usize,
    pub longest_streak: usize,
    pub words_completed: usize,
    /// Fraction in `[0, 1]`.
    pub accuracy: f64,
    pub wpm: f64,
    pub last_feedback: Option<KeyFeedback>,
    pub praise: Option<&'static str>,
    pub last_summary: Option<SessionSummary>,
    pub clock: RoundClock,
    timers: PendingTimers<TypingTimer>,
    bank: WordBank,
    recorder: Box<dyn SessionRecorder>,
    suggester: Option<Box<dyn LevelSuggester>>,
}

impl TypingSession {
    pub fn new(
        bank: WordBank,
        round_secs: u64,
        level: u8,
        adaptive: bool,
        recorder: Box<dyn SessionRecorder>,
    ) -> Self {
        Self {
            phase: TypingPhase::NotStarted,
            level,
            adaptive,
            round: 0,
            total_presses: 0,
            correct_presses: 0,
            current_streak: 0,
            longest_streak: 0,
            words_completed: 0,
            accuracy: 0.0,
            wpm: 0.0,
            last_feedback: None,
            praise: None,
            last_summary: None,
            clock: RoundClock::new(round_secs),
            timers: PendingTimers::new(),
            bank,
            recorder,
            suggester: None,
        }
    }

    pub fn with_suggester(mut self, suggester: Box<dyn LevelSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, TypingPhase::AwaitingInput { .. })
    }

    /// Begin a fresh round. The level carries over from the previous round.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.round += 1;
        self.total_presses = 0;
        self.correct_presses = 0;
        self.current_streak = 0;
        self.longest_streak = 0;
        self.words_completed = 0;
        self.accuracy = 0.0;
        self.wpm = 0.0;
        self.last_feedback = None;
        self.praise = None;
        self.last_summary = None;
        self.timers.cancel_all();
        self.clock.start();
        let word = self.bank.pick(self.level, None, &mut thread_rng());
        self.phase = TypingPhase::AwaitingInput {
            word: WordChallenge::new(word),
        };
        tracing::debug!(round = self.round, level = self.level, "typing round started");
    }

    /// Score one key press. Only letter keys count; anything else, and any
    /// press while no round is running or during the pause after a finished
    /// word, is dropped.
    pub fn press_key(&mut self, key: char) {
        if !key.is_ascii_alphabetic() {
            return;
        }
        let TypingPhase::AwaitingInput { word } = &mut self.phase else {
            return;
        };
        if word.is_complete() {
            return;
        }
        let Some(expected) = word.expected_char() else {
            return;
        };

        self.timers.cancel(TypingTimer::ClearFeedback);
        self.total_presses += 1;
        if key.eq_ignore_ascii_case(&expected) {
            word.matched += 1;
            self.correct_presses += 1;
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
            self.last_feedback = Some(KeyFeedback {
                outcome: Outcome::Correct,
                target: expected,
            });
            self.timers.schedule(TypingTimer::ClearFeedback, FEEDBACK_CLEAR_MS);
            if word.is_complete() {
                self.words_completed += 1;
                self.praise = Some(praise::for_typing(&mut thread_rng()));
                self.timers.schedule(TypingTimer::ClearPraise, PRAISE_CLEAR_MS);
                self.timers.schedule(TypingTimer::NextWord, NEXT_WORD_DELAY_MS);
            }
        } else {
            self.current_streak = 0;
            self.last_feedback = Some(KeyFeedback {
                outcome: Outcome::Incorrect,
                target: expected,
            });
            self.timers.schedule(TypingTimer::ClearFeedback, FEEDBACK_CLEAR_MS);
        }

        self.recalc();
        if self.adaptive && self.total_presses % PRESSES_PER_ADJUSTMENT == 0 {
            self.maybe_adjust_level();
        }
    }

    /// Advance the round by one tick interval.
    pub fn on_tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.clock.on_tick(TICK_RATE_MS);
        for fired in self.timers.advance(TICK_RATE_MS) {
            match fired {
                TypingTimer::ClearFeedback => self.last_feedback = None,
                TypingTimer::ClearPraise => self.praise = None,
                TypingTimer::NextWord => self.advance_word(),
            }
        }
        if self.clock.expired() {
            self.finalize();
        }
    }

    /// End the round early.
    pub fn stop(&mut self) {
        self.finalize();
    }

    /// Apply a level decided for `round`. A stale round number means the
    /// suggestion raced a restart and is dropped; the step and bounds clamps
    /// hold no matter where the value came from.
    pub fn apply_level(&mut self, round: u64, level: u8) {
        if round != self.round || !self.is_running() {
            tracing::debug!(round, level, "stale level suggestion dropped");
            return;
        }
        self.level = clamp_suggestion(self.level, i64::from(level));
    }

    fn maybe_adjust_level(&mut self) {
        let request = SuggestionRequest {
            accuracy: self.accuracy,
            rate: self.wpm,
            current_level: self.level,
            total_attempted: self.total_presses,
        };
        let round = self.round;
        let suggester = self
            .suggester
            .as_deref_mut()
            .map(|s| s as &mut dyn LevelSuggester);
        let level = next_level(&request, suggester);
        self.apply_level(round, level);
    }

    fn advance_word(&mut self) {
        let previous = match &self.phase {
            TypingPhase::AwaitingInput { word } => word.text.clone(),
            _ => return,
        };
        let next = self.bank.pick(self.level, Some(&previous), &mut thread_rng());
        self.phase = TypingPhase::AwaitingInput {
            word: WordChallenge::new(next),
        };
        self.praise = None;
        self.last_feedback = None;
        self.timers.cancel(TypingTimer::ClearPraise);
        self.timers.cancel(TypingTimer::ClearFeedback);
    }

    fn finalize(&mut self) {
        if !self.is_running() {
            return;
        }
        // No timer may fire into a finished round.
        self.timers.cancel_all();
        self.last_feedback = None;
        self.praise = None;
        self.recalc();
        let date = self.clock.end_time();
        let summary = SessionSummary {
            id: summary_id(date),
            date,
            accuracy_percent: stats::round2(self.accuracy * 100.0),
            rate: self.wpm,
            items_completed: self.words_completed,
            longest_streak: self.longest_streak,
            duration_seconds: self.clock.elapsed_secs().round() as u64,
            score: self.correct_presses as u64,
        };
        if let Err(err) = self.recorder.append(summary.clone()) {
            tracing::warn!(%err, "failed to record typing session");
        }
        self.last_summary = Some(summary);
        self.phase = TypingPhase::RoundOver;
        tracing::debug!(
            words = self.words_completed,
            wpm = self.wpm,
            "typing round finished"
        );
    }

    fn recalc(&mut self) {
        self.accuracy = stats::accuracy(self.correct_presses, self.total_presses);
        self.wpm = stats::words_per_minute(self.correct_presses, self.clock.elapsed_secs()).round();
    }
}
