//! Addition Adventure round state.
//!
//! The player builds a sum one unit at a time from two addend piles (or a
//! plain tap) until it matches the target. A correct sum pays out, shows
//! praise, then waits for an explicit confirmation so the finished equation
//! stays on screen. Extra units after the target are rejected with a stop
//! cue and never change the sum.

use rand::thread_rng;

use crate::praise;
use crate::problems::AdditionProblem;
use crate::recorder::{summary_id, SessionRecorder, SessionSummary};
use crate::stats;
use crate::timer::{PendingTimers, RoundClock};
use crate::TICK_RATE_MS;

/// How long the "stop" cue stays on screen after a rejected unit.
pub const STOP_CUE_MS: u64 = 1500;
/// How long praise stays on screen after a solved problem.
pub const PRAISE_CLEAR_MS: u64 = 1500;
/// Delay between the solved equation appearing and the confirm prompt.
pub const CONFIRM_DELAY_MS: u64 = 1800;

pub const POINTS_PER_SOLVE: u64 = 10;

/// Where an added unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    PileA,
    PileB,
    /// Generic increment that does not draw from a pile.
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticPhase {
    NotStarted,
    BuildingSum {
        problem: AdditionProblem,
        /// Units taken from each pile so far, never past the operand.
        taken_a: u32,
        taken_b: u32,
        sum: u32,
    },
    Feedback {
        problem: AdditionProblem,
        correct: bool,
    },
    AwaitingConfirmation {
        problem: AdditionProblem,
    },
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithmeticTimer {
    ClearPraise,
    ClearStopCue,
    ShowConfirm,
}

pub struct ArithmeticSession {
    pub phase: ArithmeticPhase,
    pub score: u64,
    pub attempts: usize,
    pub correct_attempts: usize,
    pub current_streak: usize,
    pub longest_streak: usize,
    /// Fraction in `[0, 1]`.
    pub accuracy: f64,
    /// Problems solved per minute.
    pub rate: f64,
    pub praise: Option<&'static str>,
    /// True while the rejected-unit cue is showing.
    pub stop_cue: bool,
    pub last_summary: Option<SessionSummary>,
    pub clock: RoundClock,
    timers: PendingTimers<ArithmeticTimer>,
    recorder: Box<dyn SessionRecorder>,
}

impl ArithmeticSession {
    pub fn new(round_secs: u64, recorder: Box<dyn SessionRecorder>) -> Self {
        Self {
            phase: ArithmeticPhase::NotStarted,
            score: 0,
            attempts: 0,
            correct_attempts: 0,
            current_streak: 0,
            longest_streak: 0,
            accuracy: 0.0,
            rate: 0.0,
            praise: None,
            stop_cue: false,
            last_summary: None,
            clock: RoundClock::new(round_secs),
            timers: PendingTimers::new(),
            recorder,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            ArithmeticPhase::BuildingSum { .. }
                | ArithmeticPhase::Feedback { .. }
                | ArithmeticPhase::AwaitingConfirmation { .. }
        )
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.score = 0;
        self.attempts = 0;
        self.correct_attempts = 0;
        self.current_streak = 0;
        self.longest_streak = 0;
        self.accuracy = 0.0;
        self.rate = 0.0;
        self.praise = None;
        self.stop_cue = false;
        self.last_summary = None;
        self.timers.cancel_all();
        self.clock.start();
        self.phase = ArithmeticPhase::BuildingSum {
            problem: AdditionProblem::generate(&mut thread_rng()),
            taken_a: 0,
            taken_b: 0,
            sum: 0,
        };
        tracing::debug!("arithmetic round started");
    }

    /// Add one unit to the running sum. An exhausted pile is a silent no-op;
    /// a unit offered once the target is reached is rejected with a stop cue.
    pub fn add_unit(&mut self, source: UnitSource) {
        let mut solved: Option<AdditionProblem> = None;
        match &mut self.phase {
            ArithmeticPhase::BuildingSum {
                problem,
                taken_a,
                taken_b,
                sum,
            } => {
                if *sum >= problem.target() {
                    self.stop_cue = true;
                    self.timers.schedule(ArithmeticTimer::ClearStopCue, STOP_CUE_MS);
                    return;
                }
                match source {
                    UnitSource::PileA => {
                        if *taken_a >= problem.operand_a {
                            return;
                        }
                        *taken_a += 1;
                    }
                    UnitSource::PileB => {
                        if *taken_b >= problem.operand_b {
                            return;
                        }
                        *taken_b += 1;
                    }
                    UnitSource::Tap => {}
                }
                *sum += 1;
                self.stop_cue = false;
                self.timers.cancel(ArithmeticTimer::ClearStopCue);
                if *sum == problem.target() {
                    solved = Some(*problem);
                }
            }
            ArithmeticPhase::Feedback { .. } | ArithmeticPhase::AwaitingConfirmation { .. } => {
                self.stop_cue = true;
                self.timers.schedule(ArithmeticTimer::ClearStopCue, STOP_CUE_MS);
            }
            ArithmeticPhase::NotStarted | ArithmeticPhase::RoundOver => {}
        }
        if let Some(problem) = solved {
            self.solve(problem);
        }
    }

    /// Acknowledge a solved problem and move to the next one. A no-op in
    /// every other phase.
    pub fn confirm(&mut self) {
        if matches!(self.phase, ArithmeticPhase::AwaitingConfirmation { .. }) {
            self.next_problem();
        }
    }

    pub fn on_tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.clock.on_tick(TICK_RATE_MS);
        for fired in self.timers.advance(TICK_RATE_MS) {
            match fired {
                ArithmeticTimer::ClearPraise => self.praise = None,
                ArithmeticTimer::ClearStopCue => self.stop_cue = false,
                ArithmeticTimer::ShowConfirm => {
                    if let ArithmeticPhase::Feedback { problem, .. } = self.phase {
                        self.phase = ArithmeticPhase::AwaitingConfirmation { problem };
                    }
                }
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

    fn solve(&mut self, problem: AdditionProblem) {
        self.score += POINTS_PER_SOLVE;
        self.attempts += 1;
        self.correct_attempts += 1;
        self.current_streak += 1;
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.praise = Some(praise::for_arithmetic(&mut thread_rng()));
        self.timers.schedule(ArithmeticTimer::ClearPraise, PRAISE_CLEAR_MS);
        self.timers.schedule(ArithmeticTimer::ShowConfirm, CONFIRM_DELAY_MS);
        self.phase = ArithmeticPhase::Feedback {
            problem,
            correct: true,
        };
        self.recalc();
    }

    fn next_problem(&mut self) {
        self.timers.cancel_all();
        self.praise = None;
        self.stop_cue = false;
        self.phase = ArithmeticPhase::BuildingSum {
            problem: AdditionProblem::generate(&mut thread_rng()),
            taken_a: 0,
            taken_b: 0,
            sum: 0,
        };
    }

    fn finalize(&mut self) {
        if !self.is_running() {
            return;
        }
        // No timer may fire into a finished round.
        self.timers.cancel_all();
        self.praise = None;
        self.stop_cue = false;
        self.recalc();
        let date = self.clock.end_time();
        let summary = SessionSummary {
            id: summary_id(date),
            date,
            accuracy_percent: stats::round2(self.accuracy * 100.0),
            rate: self.rate,
            items_completed: self.correct_attempts,
            longest_streak: self.longest_streak,
            duration_seconds: self.clock.elapsed_secs().round() as u64,
            score: self.score,
        };
        if let Err(err) = self.recorder.append(summary.clone()) {
            tracing::warn!(%err, "failed to record arithmetic session");
        }
        self.last_summary = Some(summary);
        self.phase = ArithmeticPhase::RoundOver;
        tracing::debug!(
            solved = self.correct_attempts,
            score = self.score,
            "arithmetic round finished"
        );
    }

    fn recalc(&mut self) {
        self.accuracy = stats::accuracy(self.correct_attempts, self.attempts);
        self.rate = stats::round2(stats::problems_per_minute(
            self.correct_attempts,
            self.clock.elapsed_secs(),
        ));
    }
}
