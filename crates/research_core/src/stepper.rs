use std::time::Duration;

use research_logging::research_debug;

use crate::{Effect, TimerId};

/// Status labels cycled through while a request is outstanding.
///
/// The last entry is a finishing label; ticks alone never reach it.
pub const LOADING_STEPS: [&str; 6] = [
    "🔍 Starting query analysis...",
    "🌐 Searching the web...",
    "🔗 Collecting relevant URLs...",
    "🕸️ Scraping content...",
    "🧠 Analyzing content...",
    "✍️ Synthesizing response...",
];

pub const STEP_INTERVAL: Duration = Duration::from_millis(4000);

// Ticks stop advancing here; the final label is held back for completion.
const SATURATION_STEP: usize = LOADING_STEPS.len() - 2;

/// Result of feeding one timer firing into the stepper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from a timer that is no longer active.
    Ignored,
    /// The step index moved forward and the timer keeps running.
    Advanced,
    /// The step index reached its ceiling; the carried effect cancels the timer.
    Saturated(Effect),
}

/// Simulated progress: a step index driven by a single repeating timer.
///
/// The timer handle is only reachable through `start`, `tick` and `stop`,
/// so at most one timer is ever active per stepper.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressStepper {
    step: usize,
    timer: Option<TimerId>,
}

impl ProgressStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn label(&self) -> &'static str {
        LOADING_STEPS[self.step]
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Resets to the first step and arms `timer_id`, cancelling any timer
    /// that was still active.
    pub fn start(&mut self, timer_id: TimerId, period: Duration) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        effects.extend(self.stop());
        self.timer = Some(timer_id);
        research_debug!("Stepper armed timer_id={} period={:?}", timer_id, period);
        effects.push(Effect::ArmStepTimer { timer_id, period });
        effects
    }

    pub fn tick(&mut self, timer_id: TimerId) -> TickOutcome {
        if self.timer != Some(timer_id) {
            research_debug!(
                "Stepper ignoring tick from timer_id={} (active={:?})",
                timer_id,
                self.timer
            );
            return TickOutcome::Ignored;
        }

        self.step = (self.step + 1).min(SATURATION_STEP);
        if self.step == SATURATION_STEP {
            self.timer = None;
            research_debug!("Stepper saturated at step {}", self.step);
            TickOutcome::Saturated(Effect::CancelStepTimer { timer_id })
        } else {
            TickOutcome::Advanced
        }
    }

    /// Cancels the active timer, if any, and resets to the first step.
    /// Safe to call repeatedly.
    pub fn stop(&mut self) -> Option<Effect> {
        self.step = 0;
        self.timer.take().map(|timer_id| {
            research_debug!("Stepper cancelled timer_id={}", timer_id);
            Effect::CancelStepTimer { timer_id }
        })
    }
}
