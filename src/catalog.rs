use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::role::{NightActionDef, RoleDef, ScriptDef, Team};

/// 読み取り専用の役職カタログ。エンジン構築時に注入される
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: HashMap<String, RoleDef>,
    scripts: HashMap<String, ScriptDef>,
    // 夜に行動する役職の順番（初夜とそれ以降で異なる）
    first_night_order: Vec<String>,
    other_night_order: Vec<String>,
}

impl RoleCatalog {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn role(&self, role_id: &str) -> Option<&RoleDef> {
        self.roles.get(role_id)
    }

    pub fn script(&self, script_id: &str) -> Option<&ScriptDef> {
        self.scripts.get(script_id)
    }

    pub fn night_order(&self, first_night: bool) -> &[String] {
        if first_night {
            &self.first_night_order
        } else {
            &self.other_night_order
        }
    }

    /// スクリプト定義順で TOWNSFOLK の役職IDを返す（酒鬼の偽身分選択に使う）
    pub fn townsfolk_in_script(&self, script_id: &str) -> Vec<&str> {
        let Some(script) = self.script(script_id) else {
            return Vec::new();
        };
        script
            .roles
            .iter()
            .filter(|id| {
                self.role(id)
                    .map(|r| r.team == Team::Townsfolk)
                    .unwrap_or(false)
            })
            .map(String::as_str)
            .collect()
    }

    /// スクリプト定義順で最初の DEMON 役職ID（狂人の偽身分選択に使う）
    pub fn first_demon_in_script(&self, script_id: &str) -> Option<&str> {
        self.script(script_id)?.roles.iter().find_map(|id| {
            let role = self.role(id)?;
            (role.team == Team::Demon).then_some(role.id.as_str())
        })
    }
}

fn role(id: &str, name: &str, team: Team, ability: &str) -> RoleDef {
    RoleDef {
        id: id.to_string(),
        name: name.to_string(),
        team,
        ability: ability.to_string(),
        first_night: false,
        other_night: false,
        reminders: Vec::new(),
        night_action: None,
    }
}

fn choose_player(prompt: &str) -> Option<NightActionDef> {
    Some(NightActionDef::ChoosePlayer {
        prompt: prompt.to_string(),
    })
}

fn choose_two_players(prompt: &str) -> Option<NightActionDef> {
    Some(NightActionDef::ChooseTwoPlayers {
        prompt: prompt.to_string(),
    })
}

static BUILTIN: Lazy<RoleCatalog> = Lazy::new(|| {
    let mut defs = Vec::new();

    // --- Trouble Brewing: TOWNSFOLK ---
    let mut r = role("washerwoman", "Washerwoman", Team::Townsfolk, "You start knowing that 1 of 2 players is a particular Townsfolk.");
    r.first_night = true;
    defs.push(r);

    let mut r = role("librarian", "Librarian", Team::Townsfolk, "You start knowing that 1 of 2 players is a particular Outsider.");
    r.first_night = true;
    defs.push(r);

    let mut r = role("investigator", "Investigator", Team::Townsfolk, "You start knowing that 1 of 2 players is a particular Minion.");
    r.first_night = true;
    defs.push(r);

    let mut r = role("chef", "Chef", Team::Townsfolk, "You start knowing how many pairs of evil players there are.");
    r.first_night = true;
    defs.push(r);

    let mut r = role("empath", "Empath", Team::Townsfolk, "Each night, you learn how many of your 2 alive neighbours are evil.");
    r.first_night = true;
    r.other_night = true;
    defs.push(r);

    let mut r = role("fortune_teller", "Fortune Teller", Team::Townsfolk, "Each night, choose 2 players: you learn if either is a Demon.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_two_players("Choose 2 players to read");
    r.reminders = vec!["Red Herring".to_string()];
    defs.push(r);

    let mut r = role("undertaker", "Undertaker", Team::Townsfolk, "Each night (except the first), you learn which character died by execution today.");
    r.other_night = true;
    defs.push(r);

    let mut r = role("monk", "Monk", Team::Townsfolk, "Each night (except the first), choose a player: they are safe from the Demon tonight.");
    r.other_night = true;
    r.night_action = choose_player("Choose a player to protect");
    r.reminders = vec!["Protected".to_string()];
    defs.push(r);

    let mut r = role("ravenkeeper", "Ravenkeeper", Team::Townsfolk, "If you die at night, you are woken to choose a player: you learn their character.");
    r.other_night = true;
    r.night_action = choose_player("Choose a player to learn (night death only)");
    defs.push(r);

    defs.push(role("virgin", "Virgin", Team::Townsfolk, "The first time you are nominated, if the nominator is a Townsfolk, they are executed immediately."));
    defs.push(role("slayer", "Slayer", Team::Townsfolk, "Once per game, during the day, publicly choose a player: if they are the Demon, they die."));
    defs.push(role("soldier", "Soldier", Team::Townsfolk, "You are safe from the Demon."));
    defs.push(role("mayor", "Mayor", Team::Townsfolk, "If only 3 players live and no execution occurs, your team wins."));

    // --- Trouble Brewing: OUTSIDERS ---
    let mut r = role("butler", "Butler", Team::Outsider, "Each night, choose a player (not yourself): tomorrow, you may only vote if they are voting too.");
    r.first_night = true;
    r.other_night = true;
    defs.push(r);

    // 酒鬼は偽装役職。seen_role_id にはスクリプト内の未使用 TOWNSFOLK が入る
    defs.push(role("drunk", "Drunk", Team::Outsider, "You do not know you are the Drunk. You think you are a Townsfolk character, but you are not."));
    defs.push(role("recluse", "Recluse", Team::Outsider, "You might register as evil and as a Minion or Demon, even if dead."));
    defs.push(role("saint", "Saint", Team::Outsider, "If you die by execution, your team loses."));

    // --- Trouble Brewing: MINIONS ---
    let mut r = role("poisoner", "Poisoner", Team::Minion, "Each night, choose a player: they are poisoned tonight and tomorrow day.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_player("Choose a player to poison");
    r.reminders = vec!["Poisoned".to_string()];
    defs.push(r);

    let mut r = role("spy", "Spy", Team::Minion, "Each night, you see the Grimoire. You might register as good and as a Townsfolk or Outsider.");
    r.first_night = true;
    r.other_night = true;
    defs.push(r);

    let mut r = role("scarlet_woman", "Scarlet Woman", Team::Minion, "If there are 5 or more players alive and the Demon dies, you become the Demon.");
    r.other_night = true;
    defs.push(r);

    let mut r = role("baron", "Baron", Team::Minion, "There are extra Outsiders in play. [+2 Outsiders]");
    r.first_night = true;
    defs.push(r);

    // --- Trouble Brewing: DEMON ---
    let mut r = role("imp", "Imp", Team::Demon, "Each night (except the first), choose a player: they die. If you kill yourself this way, a Minion becomes the Imp.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_player("Choose a player to kill");
    defs.push(r);

    // --- Bad Moon Rising (抜粋): 連鎖・偽装ルールの検証対象 ---
    let mut r = role("grandmother", "Grandmother", Team::Townsfolk, "You start knowing a good player and their character. If the Demon kills them, you die too.");
    r.first_night = true;
    r.reminders = vec!["Grandchild".to_string()];
    defs.push(r);

    let mut r = role("sailor", "Sailor", Team::Townsfolk, "Each night, choose an alive player: either you or they are drunk until dusk. You can't die.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_player("Choose an alive player");
    defs.push(r);

    defs.push(role("tea_lady", "Tea Lady", Team::Townsfolk, "If both your alive neighbours are good, they can't die."));

    let mut r = role("moonchild", "Moonchild", Team::Outsider, "When you learn that you died, publicly choose 1 alive player. Tonight, if it was a good player, they die.");
    r.reminders = vec!["Chosen".to_string()];
    defs.push(r);

    // 狂人も偽装役職。seen_role_id にはスクリプトのデーモンが入る
    let mut r = role("lunatic", "Lunatic", Team::Outsider, "You think you are the Demon, but you are not. The Demon knows who you are and who you choose at night.");
    r.first_night = true;
    defs.push(r);

    let mut r = role("godfather", "Godfather", Team::Minion, "You start knowing which Outsiders are in play. If one died today, choose a player tonight: they die.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_player("Choose a player to kill");
    defs.push(r);

    let mut r = role("zombuul", "Zombuul", Team::Demon, "Each night, if no-one died today, choose a player: they die. The 1st time you die, you live but register as dead.");
    r.first_night = true;
    r.other_night = true;
    r.night_action = choose_player("Choose a player to kill");
    defs.push(r);

    let roles: HashMap<String, RoleDef> = defs.into_iter().map(|r| (r.id.clone(), r)).collect();

    let mut scripts = HashMap::new();
    scripts.insert(
        "tb".to_string(),
        ScriptDef {
            id: "tb".to_string(),
            name: "Trouble Brewing".to_string(),
            roles: [
                "washerwoman", "librarian", "investigator", "chef", "empath",
                "fortune_teller", "undertaker", "monk", "ravenkeeper", "virgin",
                "slayer", "soldier", "mayor",
                "butler", "drunk", "recluse", "saint",
                "poisoner", "spy", "scarlet_woman", "baron",
                "imp",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
    );
    scripts.insert(
        "bmr".to_string(),
        ScriptDef {
            id: "bmr".to_string(),
            name: "Bad Moon Rising (partial)".to_string(),
            roles: [
                "grandmother", "sailor", "tea_lady",
                "moonchild", "lunatic",
                "godfather",
                "zombuul",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
    );

    // 夜の行動順。カタログに存在する役職のみ
    let first_night_order = [
        "poisoner", "godfather", "lunatic", "sailor", "grandmother",
        "imp", "zombuul",
        "washerwoman", "librarian", "investigator", "chef", "empath",
        "fortune_teller", "butler", "spy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let other_night_order = [
        "poisoner", "monk", "sailor", "godfather",
        "imp", "zombuul",
        "scarlet_woman", "ravenkeeper", "undertaker", "empath",
        "fortune_teller", "butler", "spy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    RoleCatalog {
        roles,
        scripts,
        first_night_order,
        other_night_order,
    }
});
