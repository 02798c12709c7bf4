use crate::emotion::EmotionLabel;
use rand::Rng;

/// Keywords that mark a message as asking for music recommendations.
pub const RECOMMEND_KEYWORDS: [&str; 6] = ["推荐", "音乐", "歌曲", "听什么", "想听", "歌"];

/// Keywords that mark a message as seeking emotional support.
pub const SUPPORT_KEYWORDS: [&str; 10] = [
    "难过", "伤心", "焦虑", "压力", "不开心", "痛苦", "烦恼", "困扰", "失眠", "抑郁",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRoute {
    Recommend,
    Support,
    Generic,
}

/// Route a message to one of the assistant branches. Recommendation
/// keywords take precedence over support keywords when both match.
pub fn route(text: &str) -> ChatRoute {
    if RECOMMEND_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        ChatRoute::Recommend
    } else if SUPPORT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        ChatRoute::Support
    } else {
        ChatRoute::Generic
    }
}

pub const CHAT_WELCOME: &str =
    "你好！我是AI音乐助手，可以帮你找到你喜欢的音乐。试着告诉我你喜欢什么类型的音乐或者你喜欢的歌手吧！";

pub const THERAPEUTIC_FOLLOWUP: &str = "音乐疗法经常被用于帮助人们处理情绪。如果你愿意，我可以为你推荐一些适合当前心情的音乐。你只需说\"推荐音乐\"，我就会为你找些能够共鸣或抚慰你情感的歌曲。";

pub fn recommend_ack(label: EmotionLabel) -> String {
    format!(
        "我感觉到你现在的情绪是\"{}\"。让我为你推荐一些适合这种心情的音乐...",
        label
    )
}

fn therapist_bank(label: EmotionLabel) -> &'static [&'static str] {
    match label {
        EmotionLabel::Happy => &[
            "很高兴看到你今天心情不错！这种积极的状态是很珍贵的。你能分享一下是什么让你感到如此开心吗？",
            "你的好心情透过文字都能感受到。珍惜这样的时刻，也许有些音乐可以帮你延续这种愉悦感？",
        ],
        EmotionLabel::Calm => &[
            "你看起来很平静，这是思考和感受音乐的好时刻。需要一些能够伴随这种宁静的曲子吗？",
            "平静的时刻很适合聆听音乐，让声音和情感一起流动。有什么特定类型的音乐你现在想听吗？",
            "在这平静的时刻，适合的音乐可以是一个很好的伴侣。需要我为你推荐一些吗？",
        ],
        EmotionLabel::Sad => &[
            "我能感受到你的情绪有些低落。音乐有时能够理解和表达我们无法用言语形容的感受。要不要听些能共鸣你心情的歌曲？",
            "当感到悲伤时，合适的音乐可以成为一种情感出口。有时听一些能够理解我们情绪的歌曲，反而会让人感到被理解和安慰。需要我推荐一些吗？",
            "悲伤是我们情感体验的重要部分。适当的音乐陪伴可能会给你一些安慰。我可以推荐一些能够陪伴你此刻心情的音乐，如果你想听的话。",
        ],
        EmotionLabel::Angry => &[
            "看起来你现在可能有些烦躁。音乐有时可以帮助我们释放和转化这些强烈的情绪。要听一些有力量的音乐来宣泄情绪吗？",
            "感到愤怒或烦躁是很自然的情绪反应。有些音乐可以帮助表达和释放这些感受，或者转移注意力。需要我推荐一些吗？",
            "你似乎有些不悦。音乐是一种强大的情绪调节工具，无论是想要释放还是平复情绪，都有适合的曲目。需要一些建议吗？",
        ],
        EmotionLabel::Excited => &[
            "你的兴奋之情溢于言表！这种充满活力的状态正适合一些节奏强劲、令人振奋的音乐。要来点推荐吗？",
            "感受到你的热情和兴奋！这种状态下聆听音乐会特别有感染力。要听一些能够配合和延续这份活力的音乐吗？",
            "你的兴奋情绪真让人感染！想要一些能够匹配这种活力四溢状态的音乐推荐吗？",
        ],
        EmotionLabel::Relaxed => &[
            "享受这份放松的时刻！适合的背景音乐可以让这种舒适感更加完美。需要一些轻柔、舒缓的音乐推荐吗？",
            "放松时光配上恰到好处的音乐，是生活中的小确幸。要听一些能够帮你维持这种惬意状态的曲子吗？",
            "放松的时刻真是珍贵。如果你想要一些能够伴随这种平和状态的音乐，我很乐意推荐一些。",
        ],
        EmotionLabel::Anxious => &[
            "我注意到你可能有些紧张或焦虑。音乐有时能够帮助我们找回平静和安全感。需要一些能够帮助放松的音乐建议吗？",
            "焦虑的感觉可能令人不适，但这是很常见的情绪反应。一些特定的音乐可以帮助减轻这种感受。要试试看吗？",
            "感到焦虑时，正念音乐可能会有所帮助。缓慢的节奏和和谐的旋律能够帮助我们重新找回平静。需要我推荐一些吗？",
        ],
    }
}

/// Counselor-style reply for the emotional-support branch.
pub fn therapist_reply<R: Rng + ?Sized>(label: EmotionLabel, rng: &mut R) -> String {
    let bank = therapist_bank(label);
    bank[rng.gen_range(0..bank.len())].to_string()
}

/// Small-talk reply bank. Only Happy has a dedicated entry set; every
/// other label shares the Calm bank.
pub fn generic_reply<R: Rng + ?Sized>(label: EmotionLabel, rng: &mut R) -> String {
    let bank: &[&str] = match label {
        EmotionLabel::Happy => &[
            "看起来你心情不错！有什么我能帮你的吗？或许你想听些和你心情同样愉快的音乐？",
            "你的好心情感染了我！需要一些音乐推荐来延续这份愉悦吗？",
            "真高兴看到你这么开心！音乐是分享和延续快乐的好方式，需要我推荐一些吗？",
        ],
        _ => &[
            "你看起来很平静，这是思考和感受音乐的好时刻。需要一些能够伴随这种宁静的曲子吗？",
            "平静的时刻很适合聆听音乐，让声音和情感一起流动。有什么特定类型的音乐你现在想听吗？",
            "在这平静的时刻，适合的音乐可以是一个很好的伴侣。需要我为你推荐一些吗？",
        ],
    };
    bank[rng.gen_range(0..bank.len())].to_string()
}
