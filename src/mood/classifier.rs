//! Keyword-prefix mood classifier
//!
//! A token counts toward a mood when it starts with one of that mood's
//! stems. The matching is intentionally loose ("hopeless" matches `hope`);
//! the stem tables define the behavior.

use super::Mood;

/// Stem table, in tie-break priority order. `Neutral` has no stems.
const STEMS: &[(Mood, &[&str])] = &[
    (
        Mood::Sad,
        &["sad", "sadness", "depressed", "down", "unhappy", "cry"],
    ),
    (
        Mood::Anxious,
        &[
            "anxious", "anxiety", "nervous", "worried", "worry", "panic", "scared", "afraid",
        ],
    ),
    (
        Mood::Stressed,
        &["stress", "stressed", "overwhelmed", "pressure", "burnout", "tense"],
    ),
    (
        Mood::Happy,
        &["happy", "joy", "glad", "great", "excited", "cheerful"],
    ),
    (
        Mood::Angry,
        &[
            "angry",
            "anger",
            "mad",
            "furious",
            "annoyed",
            "frustrated",
            "irritated",
        ],
    ),
    (
        Mood::Tired,
        &["tired", "exhausted", "sleepy", "fatigue", "drained", "weary"],
    ),
    (
        Mood::Calm,
        &["calm", "relaxed", "peaceful", "content", "serene"],
    ),
    (
        Mood::Hopeful,
        &["hope", "hopeful", "optimistic", "better", "motivated"],
    ),
];

/// Per-mood match counts for one piece of text, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodScores(Vec<(Mood, usize)>);

impl MoodScores {
    #[allow(dead_code)] // Used in tests
    pub fn get(&self, mood: Mood) -> usize {
        self.0
            .iter()
            .find_map(|(m, s)| (*m == mood).then_some(*s))
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mood, usize)> + '_ {
        self.0.iter().copied()
    }

    /// Highest score wins; the earliest declared mood wins a tie.
    pub fn winner(&self) -> Mood {
        let mut ranked = self.0.clone();
        // Stable sort keeps declaration order among equal scores
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        match ranked.first() {
            Some((mood, score)) if *score > 0 => *mood,
            _ => Mood::Neutral,
        }
    }
}

/// Lowercase, split on whitespace, keep only alphabetic characters.
/// Tokens that end up empty are dropped.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|raw| raw.chars().filter(|c| c.is_alphabetic()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Count matching tokens for every mood that has stems
pub fn score(text: &str) -> MoodScores {
    let tokens = tokenize(text);

    let scores = STEMS
        .iter()
        .map(|(mood, stems)| {
            let count = tokens
                .iter()
                .filter(|token| stems.iter().any(|stem| token.starts_with(stem)))
                .count();
            (*mood, count)
        })
        .collect();

    MoodScores(scores)
}

/// Classify the emotional tone of `text`
pub fn classify(text: &str) -> Mood {
    score(text).winner()
}
