//! Revealer - appends one unit per tick to a growing output buffer.
//!
//! ```text
//!          start()                tick() while cursor < len
//!   Idle ──────────▶ Revealing ─────────────────────────────┐
//!     │                  │  ▲                               │
//!     │ (empty)          │  └───────────────────────────────┘
//!     ▼                  ▼ cursor == len
//!   Done ◀──────────────────
//! ```
//!
//! `tick()` is the synchronous step; `run()` drives it on a fixed cadence
//! with `tokio::time::sleep`, rendering each unit to a `Surface`. The first
//! unit is revealed immediately, each later one `delay` after the previous.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::units::{RevealSequence, RevealUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Revealing,
    /// Terminal: every unit has been appended.
    Done,
}

/// Rendering target receiving each appended unit.
pub trait Surface {
    /// Append one unit of markup.
    fn render(&mut self, unit: &str);

    /// Called by `Revealer::run` for each unit. Override to treat tags and
    /// text differently.
    fn render_unit(&mut self, unit: &RevealUnit<'_>) {
        self.render(unit.as_str());
    }

    /// Called once after the last unit.
    fn finish(&mut self) {}
}

/// In-memory surface: the rendered markup as a string.
#[derive(Debug, Clone, Default)]
pub struct StringSurface {
    buffer: String,
    renders: usize,
    finished: bool,
}

impl StringSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Number of `render` calls so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Surface for StringSurface {
    fn render(&mut self, unit: &str) {
        self.buffer.push_str(unit);
        self.renders += 1;
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

/// How a `run` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every unit revealed.
    Completed { ticks: usize },
    /// Shutdown fired first; `revealed` units were appended.
    Cancelled { revealed: usize },
}

/// Cursor over a reveal sequence plus the output buffer it grows.
#[derive(Debug, Clone)]
pub struct Revealer<'a> {
    sequence: RevealSequence<'a>,
    cursor: usize,
    output: String,
    state: RevealState,
}

impl<'a> Revealer<'a> {
    pub fn new(sequence: RevealSequence<'a>) -> Self {
        let capacity = sequence.iter().map(|u| u.as_str().len()).sum();
        Self {
            sequence,
            cursor: 0,
            output: String::with_capacity(capacity),
            state: RevealState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Index of the next unit to reveal.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ticks taken so far. Each tick reveals exactly one unit.
    #[inline]
    pub fn ticks(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.sequence.len() - self.cursor
    }

    /// The markup revealed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn sequence(&self) -> &RevealSequence<'a> {
        &self.sequence
    }

    /// Leave `Idle`. An empty sequence goes straight to `Done`.
    pub fn start(&mut self) -> RevealState {
        if self.state == RevealState::Idle {
            self.state = if self.sequence.is_empty() {
                RevealState::Done
            } else {
                RevealState::Revealing
            };
        }
        self.state
    }

    /// Append the unit under the cursor and advance. Returns None unless
    /// `Revealing`.
    pub fn tick(&mut self) -> Option<&RevealUnit<'a>> {
        if self.state != RevealState::Revealing {
            return None;
        }
        let unit = self.sequence.get(self.cursor)?;
        self.output.push_str(unit.as_str());
        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            self.state = RevealState::Done;
        }
        debug!(cursor = self.cursor, unit = unit.as_str(), "tick");
        Some(unit)
    }

    /// Reveal everything onto `surface`, one unit per `delay`.
    pub async fn run<S>(&mut self, surface: &mut S, delay: Duration) -> RunOutcome
    where
        S: Surface + ?Sized,
    {
        self.run_until(surface, delay, std::future::pending()).await
    }

    /// Like `run`, but stops rescheduling as soon as `shutdown` completes.
    pub async fn run_until<S, F>(&mut self, surface: &mut S, delay: Duration, shutdown: F) -> RunOutcome
    where
        S: Surface + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.start();
        info!(units = self.sequence.len(), delay_ms = delay.as_millis() as u64, "reveal started");

        while let Some(unit) = self.tick() {
            surface.render_unit(unit);
            if self.state == RevealState::Done {
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!(revealed = self.cursor, remaining = self.remaining(), "reveal cancelled");
                    return RunOutcome::Cancelled { revealed: self.cursor };
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        surface.finish();
        info!(ticks = self.cursor, "reveal done");
        RunOutcome::Completed { ticks: self.cursor }
    }
}
