use super::{EmotionLabel, EmotionResult, CANONICAL_ORDER};

/// Keyword lists per label, in canonical label order. Matching is plain
/// substring containment; a keyword scores one point whether it appears
/// once or ten times.
fn keywords(label: EmotionLabel) -> &'static [&'static str] {
    match label {
        EmotionLabel::Happy => &["开心", "快乐", "欢乐", "高兴", "愉快", "喜悦", "好心情"],
        EmotionLabel::Calm => &["平静", "安宁", "祥和", "舒适", "安心", "平和"],
        EmotionLabel::Sad => &[
            "难过", "伤心", "悲伤", "痛苦", "低落", "郁闷", "失落", "沮丧",
        ],
        EmotionLabel::Angry => &["生气", "愤怒", "气愤", "恼火", "烦躁", "暴躁", "发怒"],
        EmotionLabel::Excited => &["兴奋", "激动", "振奋", "热血", "活力", "精神"],
        EmotionLabel::Relaxed => &["放松", "惬意", "休闲", "慵懒", "轻松", "自在"],
        EmotionLabel::Anxious => &["焦虑", "紧张", "担心", "忧虑", "不安", "恐惧"],
    }
}

/// Classify free text into an emotion label plus affect coordinates.
///
/// Pure and total: any string input yields a result. Zero matches (or
/// empty/whitespace input) yield the neutral sentinel. The strictly
/// highest keyword count wins; ties go to the earlier label in
/// [`CANONICAL_ORDER`].
pub fn classify(text: &str) -> EmotionResult {
    if text.trim().is_empty() {
        return EmotionResult::neutral();
    }

    let mut best: Option<(EmotionLabel, usize)> = None;
    for &label in &CANONICAL_ORDER {
        let count = keywords(label)
            .iter()
            .filter(|kw| text.contains(**kw))
            .count();
        if count > 0 && best.map_or(true, |(_, max)| count > max) {
            best = Some((label, count));
        }
    }

    match best {
        Some((label, _)) => EmotionResult::from_label(label),
        None => EmotionResult::neutral(),
    }
}

/// Guess an emotion from a music genre. Fixed 8-entry table; unknown
/// genres fall back to the neutral sentinel.
pub fn map_genre_to_emotion(genre: &str) -> EmotionResult {
    let (label, valence, energy) = match genre {
        "流行" => (EmotionLabel::Happy, 0.7, 0.6),
        "摇滚" => (EmotionLabel::Angry, 0.4, 0.8),
        "电子" => (EmotionLabel::Excited, 0.6, 0.9),
        "嘻哈" => (EmotionLabel::Excited, 0.6, 0.7),
        "古典" => (EmotionLabel::Calm, 0.7, 0.3),
        "爵士" => (EmotionLabel::Relaxed, 0.6, 0.4),
        "蓝调" => (EmotionLabel::Sad, 0.3, 0.4),
        "民谣" => (EmotionLabel::Calm, 0.5, 0.3),
        _ => return EmotionResult::neutral(),
    };
    EmotionResult {
        label,
        valence,
        energy,
    }
}
