use std::env;

pub const MIN_SEATS: usize = 5;
pub const MAX_SEATS: usize = 20;

/// 調整可能なルール値。公式ルールの既定値を持ち、環境変数で上書きできる
#[derive(Debug, Clone)]
pub struct RuleConfig {
    // 猩紅の女がデーモンを継承できる最低生存人数。
    // 公式ルールでは「5人以上生存」だが脚本により調整の余地がある
    pub scarlet_woman_min_alive: usize,
    // 生存者がこの人数以下になると邪悪陣営の勝利
    pub evil_win_alive_threshold: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            scarlet_woman_min_alive: 5,
            evil_win_alive_threshold: 2,
        }
    }
}

impl RuleConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            scarlet_woman_min_alive: env::var("RULE_SCARLET_WOMAN_MIN_ALIVE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.scarlet_woman_min_alive),
            evil_win_alive_threshold: env::var("RULE_EVIL_WIN_ALIVE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.evil_win_alive_threshold),
        }
    }
}
