use serde::Serialize;
use tracing::{debug, warn};

use crate::device::DeviceStatus;

/// Number of ticks the countdown starts from
pub const COUNTDOWN_TICKS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPhase {
    Idle,
    CountingDown,
    Launched,
}

/// Launch state machine: `Idle → CountingDown → Launched`, never backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchState {
    pub phase: LaunchPhase,
    /// Only meaningful while counting down
    pub ticks_remaining: u32,
}

/// What a timer tick did to the launch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; carries the remaining ticks
    Counting(u32),
    /// The countdown just reached zero; navigate now
    Launch,
    /// Not counting down; the tick had no effect
    Ignored,
}

impl TickOutcome {
    pub fn is_done(self) -> bool {
        !matches!(self, TickOutcome::Counting(_))
    }
}

#[derive(Debug, Clone)]
pub struct LaunchSequencer {
    state: LaunchState,
}

impl Default for LaunchSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchSequencer {
    pub fn new() -> Self {
        Self {
            state: LaunchState {
                phase: LaunchPhase::Idle,
                ticks_remaining: 0,
            },
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn phase(&self) -> LaunchPhase {
        self.state.phase
    }

    /// Remaining ticks, only while counting down
    pub fn countdown(&self) -> Option<u32> {
        match self.state.phase {
            LaunchPhase::CountingDown => Some(self.state.ticks_remaining),
            _ => None,
        }
    }

    pub fn can_start(&self, microphone: DeviceStatus) -> bool {
        microphone == DeviceStatus::Granted && self.state.phase == LaunchPhase::Idle
    }

    /// Enter the countdown. A no-op returning false when `can_start` is false.
    pub fn start(&mut self, microphone: DeviceStatus) -> bool {
        if !self.can_start(microphone) {
            warn!(
                "Ignoring start request (microphone={:?}, phase={:?})",
                microphone, self.state.phase
            );
            return false;
        }

        self.state = LaunchState {
            phase: LaunchPhase::CountingDown,
            ticks_remaining: COUNTDOWN_TICKS,
        };
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != LaunchPhase::CountingDown {
            return TickOutcome::Ignored;
        }

        self.state.ticks_remaining = self.state.ticks_remaining.saturating_sub(1);
        debug!("Countdown tick, {} remaining", self.state.ticks_remaining);

        if self.state.ticks_remaining == 0 {
            self.state.phase = LaunchPhase::Launched;
            TickOutcome::Launch
        } else {
            TickOutcome::Counting(self.state.ticks_remaining)
        }
    }
}
