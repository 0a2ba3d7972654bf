use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// One-shot timers keyed by kind, advanced by the event-loop tick.
///
/// Scheduling a kind replaces any pending timer of the same kind, so a
/// superseded delay can never fire late. Round end cancels everything
/// before the summary is finalized.
#[derive(Debug, Clone)]
pub struct PendingTimers<K> {
    pending: Vec<(K, u64)>,
}

impl<K: Copy + Eq> PendingTimers<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedule `kind` to fire after `delay_ms`, replacing a pending one.
    pub fn schedule(&mut self, kind: K, delay_ms: u64) {
        self.pending.retain(|(k, _)| *k != kind);
        self.pending.push((kind, delay_ms));
    }

    pub fn cancel(&mut self, kind: K) {
        self.pending.retain(|(k, _)| *k != kind);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == kind)
    }

    /// Advance all pending timers by `elapsed_ms`, returning the kinds that
    /// fired, in scheduling order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<K> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|(kind, remaining)| {
            if *remaining <= elapsed_ms {
                fired.push(*kind);
                false
            } else {
                *remaining -= elapsed_ms;
                true
            }
        });
        fired
    }
}

impl<K: Copy + Eq> Default for PendingTimers<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown for one round, driven by accumulated tick time.
///
/// Elapsed time for rate metrics comes from the ticks rather than wall-clock
/// re-reads; the wall-clock start is kept only to date the summary.
#[derive(Debug, Clone)]
pub struct RoundClock {
    duration_secs: u64,
    seconds_remaining: f64,
    elapsed_ms: u64,
    started_at: Option<DateTime<Utc>>,
}

impl RoundClock {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            seconds_remaining: duration_secs as f64,
            elapsed_ms: 0,
            started_at: None,
        }
    }

    /// Reset and begin counting down. Reusable across rounds.
    pub fn start(&mut self) {
        self.seconds_remaining = self.duration_secs as f64;
        self.elapsed_ms = 0;
        self.started_at = Some(Utc::now());
    }

    pub fn on_tick(&mut self, tick_ms: u64) {
        self.elapsed_ms += tick_ms;
        self.seconds_remaining -= tick_ms as f64 / 1000_f64;
    }

    pub fn expired(&self) -> bool {
        self.seconds_remaining <= 0.0
    }

    pub fn seconds_remaining(&self) -> f64 {
        self.seconds_remaining.max(0.0)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000_f64
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Wall-clock moment the round ended, derived from the start plus the
    /// ticked elapsed time.
    pub fn end_time(&self) -> DateTime<Utc> {
        match self.started_at {
            Some(t) => t + ChronoDuration::milliseconds(self.elapsed_ms as i64),
            None => Utc::now(),
        }
    }
}
