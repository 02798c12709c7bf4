use super::EmotionLabel;
use rand::Rng;

/// Template sentences per label, three apiece. The caller supplies the RNG
/// so tests can seed it.
fn templates(label: EmotionLabel) -> &'static [&'static str; 3] {
    match label {
        EmotionLabel::Happy => &[
            "这首欢快的歌曲能够延续你愉悦的心情",
            "听听这首活力满满的曲子，让快乐加倍",
            "这首歌的旋律轻快，正适合你现在的好心情",
        ],
        EmotionLabel::Calm => &[
            "这首平和的曲子能让你保持内心的宁静",
            "这种舒缓的节奏很适合你当前平静的状态",
            "让这首歌帮你维持这份安宁",
        ],
        EmotionLabel::Sad => &[
            "这首歌能够理解你的悲伤，给你一些共鸣",
            "有时候，听听能懂你的歌曲也是一种安慰",
            "这首略带忧伤的曲子，或许能陪你度过这段情绪",
        ],
        EmotionLabel::Angry => &[
            "这首有力的歌曲可以帮你宣泄情绪",
            "强劲的节奏能够配合你当前的激烈心情",
            "这首歌的能量或许能帮你释放一些压力",
        ],
        EmotionLabel::Excited => &[
            "这首节奏强劲的歌曲很配你现在兴奋的状态",
            "保持这份热情吧，这首歌会让你更加振奋",
            "这种充满活力的曲子正适合你的兴奋情绪",
        ],
        EmotionLabel::Relaxed => &[
            "这首轻柔的歌曲会帮你更好地放松心情",
            "慵懒时刻，配上这样的曲子再合适不过",
            "让这首歌的旋律带你进入更舒适的状态",
        ],
        EmotionLabel::Anxious => &[
            "这首平缓的歌曲可以帮你缓解紧张情绪",
            "听听这首曲子，它能帮你找回一些平静",
            "这种舒缓的旋律设计用来安抚焦躁的心情",
        ],
    }
}

/// Pick one of the label's three recommendation-reason templates uniformly
/// at random.
pub fn reason_for<R: Rng + ?Sized>(label: EmotionLabel, rng: &mut R) -> String {
    let bank = templates(label);
    bank[rng.gen_range(0..bank.len())].to_string()
}
