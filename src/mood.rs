//! Mood labels, classification and support resources

mod classifier;
mod resources;

pub use classifier::{classify, score};
pub use resources::{resources_for, top_n, ResourceEntry, ResourceView};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emotional tone assigned to a single user message.
///
/// Declaration order is significant: it is the tie-break priority used by
/// [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sad,
    Anxious,
    Stressed,
    Happy,
    Angry,
    Tired,
    Calm,
    Hopeful,
    #[default]
    Neutral,
}

impl Mood {
    /// Every mood, in declaration order
    pub const ALL: [Mood; 9] = [
        Mood::Sad,
        Mood::Anxious,
        Mood::Stressed,
        Mood::Happy,
        Mood::Angry,
        Mood::Tired,
        Mood::Calm,
        Mood::Hopeful,
        Mood::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
            Mood::Stressed => "stressed",
            Mood::Happy => "happy",
            Mood::Angry => "angry",
            Mood::Tired => "tired",
            Mood::Calm => "calm",
            Mood::Hopeful => "hopeful",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// One detected mood, recorded per submitted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEvent {
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

impl MoodEvent {
    pub fn new(mood: Mood, timestamp: DateTime<Utc>) -> Self {
        Self { mood, timestamp }
    }
}
