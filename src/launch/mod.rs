//! Countdown-then-navigate transition into the first interview round

pub mod countdown;
pub mod navigator;
pub mod sequencer;

pub use countdown::CountdownTimer;
pub use navigator::{round_path, HistoryNavigator, NavigationEntry, Navigator};
pub use sequencer::{LaunchPhase, LaunchSequencer, LaunchState, TickOutcome, COUNTDOWN_TICKS};
