use std::time::Duration;

/// How long the boot/countdown screen stays up before the first wave.
pub const COUNTDOWN_DURATION_MS: u64 = 3_000;
/// Time budget for clearing a single wave before the servers overheat.
pub const MAX_GAME_DURATION_MS: u64 = 90_000;
/// Upper bound on simultaneously typeable codes.
pub const MAX_ACTIVE_WORDS: usize = 3;
/// How long the victory/failure banner stays up without an acknowledge.
pub const POST_GAME_MESSAGE_DURATION_MS: u64 = 10_000;

/// One difficulty tier: a pool of candidate reboot codes and how many
/// servers (codes) this stage contributes to its wave.
#[derive(Debug, Clone)]
pub struct Stage {
    pub target_count: usize,
    pub word_pool: Vec<String>,
}

impl Stage {
    pub fn new<S: Into<String>>(target_count: usize, pool: Vec<S>) -> Self {
        Self {
            target_count,
            word_pool: pool.into_iter().map(Into::into).collect(),
        }
    }
}

/// Timing and scheduling knobs for a game session. Defaults match the
/// classic arcade values; config/CLI may override any of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    pub countdown: Duration,
    pub max_game_duration: Duration,
    pub post_game_message_duration: Duration,
    pub max_active_words: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            countdown: Duration::from_millis(COUNTDOWN_DURATION_MS),
            max_game_duration: Duration::from_millis(MAX_GAME_DURATION_MS),
            post_game_message_duration: Duration::from_millis(POST_GAME_MESSAGE_DURATION_MS),
            max_active_words: MAX_ACTIVE_WORDS,
        }
    }
}

/// The built-in campaign: five tiers from four-letter words up to the
/// single final-boss code.
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new(
            4,
            vec![
                "bark", "bead", "bell", "book", "brick", "bush", "clay", "club", "coin", "crab",
                "crow", "disk", "fire", "flag", "flame", "fog", "fork", "glass", "glow", "grip",
                "hand", "hose", "jazz", "knot", "lace", "lamp", "leaf", "lime", "pearl", "pool",
                "rain", "rice", "river", "road", "rock", "roof", "room", "sand", "ship", "shoe",
                "silk", "sled", "star", "tool", "vine", "wave", "wind", "wolf",
            ],
        ),
        Stage::new(
            2,
            vec![
                "assembly", "colorful", "delicate", "disclose", "generous", "governor",
                "guidance", "highland", "mortgage", "leverage", "overseas", "persuade",
                "profound", "reliance", "renowned", "receiver", "scrutiny", "suburban",
                "surgical", "syndrome", "tangible", "turnover", "whatever", "warranty",
            ],
        ),
        Stage::new(
            3,
            vec![
                "aggregate", "darters", "deterred", "dreader", "greaser", "greatest", "homonym",
                "hymnbook", "monopoly", "olympion", "phylum", "pinky", "pumpkin", "polonium",
                "polygon", "regards", "restart", "retreat", "serrated", "stagger", "starter",
                "stressed", "tetrad",
            ],
        ),
        Stage::new(
            4,
            vec![
                "accumulation", "administration", "appreciation", "celebration",
                "characteristic", "circumference", "circumnavigate", "collaboration",
                "communication", "concentration", "configuration", "conglomeration",
                "consideration", "constellation", "consternation", "constitution",
                "contradiction", "counterbalance", "decaffeinated", "determination",
                "discombobulate", "discrimination", "disproportion", "documentation",
                "enlightenment", "entertainment", "experimentation", "illumination",
                "infrastructure", "interconnection", "interjection", "investigation",
                "misapprehension", "procrastinator", "recommendation", "reconstruction",
                "refrigerator", "rehabilitation", "representation", "reverberation",
                "revolutionary", "simultaneity", "specification", "superannuation",
                "superintendent", "transformation", "troubleshooter", "understanding",
            ],
        ),
        Stage::new(1, vec!["pneumonoultramicroscopicsilicovolcanoconiosis"]),
    ]
}

/// A short two-stage campaign for quick rounds and demos.
pub fn short_stages() -> Vec<Stage> {
    let full = default_stages();
    vec![full[0].clone(), full[1].clone()]
}
