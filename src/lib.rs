// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod arithmetic;
pub mod config;
pub mod difficulty;
pub mod praise;
pub mod problems;
pub mod recorder;
pub mod runtime;
pub mod stats;
pub mod timer;
pub mod typing;
pub mod ui;
pub mod words;

/// Interval between ticks delivered to the event loop and the sessions.
pub const TICK_RATE_MS: u64 = 100;
