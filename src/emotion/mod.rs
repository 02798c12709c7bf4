mod classifier;
mod reasons;

pub use classifier::{classify, map_genre_to_emotion};
pub use reasons::reason_for;

use serde::{Deserialize, Serialize};

/// The closed set of mood categories used for recommendation framing.
///
/// The declaration order below is the canonical iteration order: ties
/// between equal nonzero keyword counts resolve to the earlier label, so
/// classification stays deterministic across calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Happy,
    Calm,
    Sad,
    Angry,
    Excited,
    Relaxed,
    Anxious,
}

pub const CANONICAL_ORDER: [EmotionLabel; 7] = [
    EmotionLabel::Happy,
    EmotionLabel::Calm,
    EmotionLabel::Sad,
    EmotionLabel::Angry,
    EmotionLabel::Excited,
    EmotionLabel::Relaxed,
    EmotionLabel::Anxious,
];

impl EmotionLabel {
    /// Display name used in chat replies and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "高兴",
            EmotionLabel::Calm => "平静",
            EmotionLabel::Sad => "悲伤",
            EmotionLabel::Angry => "愤怒",
            EmotionLabel::Excited => "兴奋",
            EmotionLabel::Relaxed => "放松",
            EmotionLabel::Anxious => "焦虑",
        }
    }

    /// Fixed (valence, energy) coordinates for the label. Static table,
    /// never derived or mutated.
    pub fn affect(&self) -> (f32, f32) {
        match self {
            EmotionLabel::Happy => (0.8, 0.7),
            EmotionLabel::Calm => (0.6, 0.3),
            EmotionLabel::Sad => (0.2, 0.3),
            EmotionLabel::Angry => (0.3, 0.8),
            EmotionLabel::Excited => (0.7, 0.9),
            EmotionLabel::Relaxed => (0.6, 0.2),
            EmotionLabel::Anxious => (0.4, 0.7),
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EmotionResult {
    pub label: EmotionLabel,
    pub valence: f32,
    pub energy: f32,
}

impl EmotionResult {
    pub fn from_label(label: EmotionLabel) -> Self {
        let (valence, energy) = label.affect();
        EmotionResult {
            label,
            valence,
            energy,
        }
    }

    /// The no-match sentinel. Deliberately distinct from Calm's own table
    /// entry (0.6, 0.3): a text with no keyword hits is neutral, not calm.
    pub fn neutral() -> Self {
        EmotionResult {
            label: EmotionLabel::Calm,
            valence: 0.5,
            energy: 0.5,
        }
    }
}
