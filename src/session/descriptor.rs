use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// One named segment of an interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    FormalQa,
    Technical,
    Coding,
    SystemDesign,
    Hr,
}

impl RoundKind {
    /// All rounds in the order a full interview runs them
    pub const ALL: [RoundKind; 5] = [
        RoundKind::FormalQa,
        RoundKind::Technical,
        RoundKind::Coding,
        RoundKind::SystemDesign,
        RoundKind::Hr,
    ];

    /// Round used when no valid specific round is selected
    pub const DEFAULT: RoundKind = RoundKind::FormalQa;

    /// Path segment used in round URLs
    pub fn slug(self) -> &'static str {
        match self {
            RoundKind::FormalQa => "formal_qa",
            RoundKind::Technical => "technical",
            RoundKind::Coding => "coding",
            RoundKind::SystemDesign => "system_design",
            RoundKind::Hr => "hr",
        }
    }
}

impl fmt::Display for RoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interview round: {0}")]
pub struct UnknownRound(pub String);

impl FromStr for RoundKind {
    type Err = UnknownRound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoundKind::ALL
            .into_iter()
            .find(|round| round.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRound(s.to_string()))
    }
}

/// Whether the candidate runs every round or a single chosen one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    Full,
    Specific,
}

/// Persisted description of one interview attempt, written by the setup step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub candidate_name: String,

    pub position: String,

    pub interview_mode: InterviewMode,

    /// Only meaningful in `Specific` mode. Unknown values are dropped on load.
    #[serde(default, deserialize_with = "lenient_round")]
    pub specific_round: Option<RoundKind>,

    /// When the setup step stored this descriptor, if it recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionDescriptor {
    /// Round the interview opens with
    pub fn first_round(&self) -> RoundKind {
        match (self.interview_mode, self.specific_round) {
            (InterviewMode::Specific, Some(round)) => round,
            _ => RoundKind::DEFAULT,
        }
    }

    /// Rounds shown in the summary panel
    pub fn planned_rounds(&self) -> Vec<RoundKind> {
        match (self.interview_mode, self.specific_round) {
            (InterviewMode::Specific, Some(round)) => vec![round],
            _ => RoundKind::ALL.to_vec(),
        }
    }
}

fn lenient_round<'de, D>(deserializer: D) -> Result<Option<RoundKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse::<RoundKind>() {
        Ok(round) => Some(round),
        Err(e) => {
            warn!("Ignoring stored round selection: {}", e);
            None
        }
    }))
}
