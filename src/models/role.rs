use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    Traveler,
    Fabled,
}

impl Team {
    pub fn is_evil(&self) -> bool {
        matches!(self, Team::Minion | Team::Demon)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Townsfolk => write!(f, "Townsfolk"),
            Team::Outsider => write!(f, "Outsider"),
            Team::Minion => write!(f, "Minion"),
            Team::Demon => write!(f, "Demon"),
            Team::Traveler => write!(f, "Traveler"),
            Team::Fabled => write!(f, "Fabled"),
        }
    }
}

// 夜アクションの形。プレイヤーが提出するペイロードはこの形に従う
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NightActionDef {
    ChoosePlayer { prompt: String },
    ChooseTwoPlayers { prompt: String },
    Confirm { prompt: String },
    Binary { prompt: String, options: [String; 2] },
}

impl NightActionDef {
    pub fn prompt(&self) -> &str {
        match self {
            NightActionDef::ChoosePlayer { prompt }
            | NightActionDef::ChooseTwoPlayers { prompt }
            | NightActionDef::Confirm { prompt }
            | NightActionDef::Binary { prompt, .. } => prompt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDef {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub ability: String,
    #[serde(default)]
    pub first_night: bool,
    #[serde(default)]
    pub other_night: bool,
    #[serde(default)]
    pub reminders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_action: Option<NightActionDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptDef {
    pub id: String,
    pub name: String,
    pub roles: Vec<String>,
}
