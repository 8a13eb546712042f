use serde::Serialize;
use std::ops::RangeInclusive;

use super::descriptor::RoundKind;

/// Static reference data for a round, shown in the summary panel
#[derive(Debug, Clone, Serialize)]
pub struct RoundInfo {
    pub kind: RoundKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Estimated duration in minutes
    pub minutes: RangeInclusive<u32>,
    /// Estimated number of questions
    pub questions: RangeInclusive<u32>,
    pub accent: &'static str,
}

static CATALOG: [RoundInfo; 5] = [
    RoundInfo {
        kind: RoundKind::FormalQa,
        name: "Formal Q&A",
        description: "Introductions, background and motivation",
        minutes: 10..=15,
        questions: 8..=12,
        accent: "blue",
    },
    RoundInfo {
        kind: RoundKind::Technical,
        name: "Technical",
        description: "Core concepts for the role",
        minutes: 20..=30,
        questions: 5..=8,
        accent: "purple",
    },
    RoundInfo {
        kind: RoundKind::Coding,
        name: "Coding",
        description: "Live problem solving in the editor",
        minutes: 30..=45,
        questions: 2..=3,
        accent: "green",
    },
    RoundInfo {
        kind: RoundKind::SystemDesign,
        name: "System Design",
        description: "Architecture and trade-off discussion",
        minutes: 30..=40,
        questions: 1..=2,
        accent: "orange",
    },
    RoundInfo {
        kind: RoundKind::Hr,
        name: "HR",
        description: "Culture fit, expectations and logistics",
        minutes: 10..=15,
        questions: 5..=8,
        accent: "pink",
    },
];

impl RoundKind {
    pub fn info(self) -> &'static RoundInfo {
        // CATALOG is ordered like RoundKind::ALL
        &CATALOG[self as usize]
    }

    pub fn display_name(self) -> &'static str {
        self.info().name
    }
}

/// Sum of the estimated minute ranges for a set of rounds
pub fn estimated_minutes(rounds: &[RoundKind]) -> RangeInclusive<u32> {
    let (low, high) = rounds.iter().fold((0, 0), |(low, high), round| {
        let minutes = &round.info().minutes;
        (low + minutes.start(), high + minutes.end())
    });
    low..=high
}
