pub mod assignment;
pub mod chain;
pub mod chat;
pub mod game_over;
pub mod night;
pub mod notes;
pub mod phase;
pub mod roster;
pub mod swap;
pub mod view;
pub mod voting;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::RoleCatalog;
use crate::models::chat::InfoCard;
use crate::models::config::RuleConfig;
use crate::models::game::{ChainReactionEvent, GamePhase, GameState, Winner};
use crate::models::night::NightActionPayload;
use crate::models::seat::SeatStatus;

/// コマンドの発行者。認証は外部の責務で、ここでは自己申告を信頼する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub is_storyteller: bool,
}

impl Actor {
    pub fn storyteller(name: impl Into<String>) -> Self {
        let name = name.into();
        Actor {
            user_id: format!("st-{}", name.to_lowercase()),
            user_name: name,
            is_storyteller: true,
        }
    }

    pub fn player(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Actor {
            user_id: user_id.into(),
            user_name: name.into(),
            is_storyteller: false,
        }
    }
}

/// ゲーム状態へのすべての変更はこのコマンド経由で行う
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    // 座席
    JoinSeat { seat_id: usize },
    LeaveSeat,
    ForceLeaveSeat { seat_id: usize },
    AddSeat,
    RemoveSeat,
    AddVirtualPlayer,
    RemoveVirtualPlayer { seat_id: usize },
    ToggleReady { seat_id: usize },
    // 役職
    AssignRole { seat_id: usize, role_id: Option<String> },
    DistributeRoles,
    SetScript { script_id: String },
    // フェーズと夜の進行
    SetPhase { phase: GamePhase },
    NightNext,
    NightPrev,
    SubmitNightAction { role_id: String, payload: NightActionPayload },
    ResolveNightAction { request_id: String, result: String },
    // 投票
    StartVote { nominator_seat_id: Option<usize>, nominee_seat_id: usize },
    ToggleHand { seat_id: usize },
    NextClockHand,
    CloseVote,
    // 生死と連鎖
    ToggleDead { seat_id: usize },
    ConfirmChainEvent { event_id: String },
    SkipChainEvent { event_id: String },
    // 説書人の記録
    ToggleAbilityUsed { seat_id: usize },
    ToggleStatus { seat_id: usize, status: SeatStatus },
    AddReminder { seat_id: usize, text: String },
    RemoveReminder { reminder_id: String },
    AddStorytellerNote { content: String },
    UpdateStorytellerNote { note_id: String, content: String },
    DeleteStorytellerNote { note_id: String },
    // チャット
    SendMessage {
        content: String,
        recipient_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        card: Option<InfoCard>,
    },
    ToggleWhispers,
    // 座席交換
    RequestSeatSwap { to_seat_id: usize },
    RespondToSwapRequest { request_id: String, accept: bool },
    SwapSeats { seat_a: usize, seat_b: usize },
    // 終了
    EndGame { winner: Winner, reason: String },
}

/// 構造的に不正な入力のみエラーになる。通常プレイ中の誤操作は no-op
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("unknown role id: {0}")]
    UnknownRole(String),
    #[error("unknown script id: {0}")]
    UnknownScript(String),
    #[error("payload does not match the night action of role {0}")]
    PayloadMismatch(String),
}

pub struct Engine {
    catalog: RoleCatalog,
    rules: RuleConfig,
}

impl Engine {
    pub fn new(catalog: RoleCatalog, rules: RuleConfig) -> Self {
        Engine { catalog, rules }
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn create_game(&self, room_id: impl Into<String>, seat_count: usize) -> GameState {
        GameState::new(room_id, seat_count)
    }

    /// コマンドを一つ適用する。状態の変更は常に丸ごと適用され、
    /// 戻り値は新たに積まれた連鎖イベント
    pub fn apply(
        &self,
        state: &mut GameState,
        actor: &Actor,
        command: Command,
    ) -> Result<Vec<ChainReactionEvent>, EngineError> {
        let st = actor.is_storyteller;
        match command {
            Command::JoinSeat { seat_id } => roster::join_seat(state, actor, seat_id),
            Command::LeaveSeat => roster::leave_seat(state, actor),
            Command::ForceLeaveSeat { seat_id } if st => roster::force_leave_seat(state, seat_id),
            Command::AddSeat if st => roster::add_seat(state),
            Command::RemoveSeat if st => roster::remove_seat(state),
            Command::AddVirtualPlayer if st => roster::add_virtual_player(state),
            Command::RemoveVirtualPlayer { seat_id } if st => {
                roster::remove_virtual_player(state, seat_id)
            }
            Command::ToggleReady { seat_id } => roster::toggle_ready(state, actor, seat_id),

            Command::AssignRole { seat_id, role_id } if st => {
                assignment::assign_role(self, state, seat_id, role_id.as_deref())?
            }
            Command::DistributeRoles if st => assignment::distribute_roles(self, state),
            Command::SetScript { script_id } if st => phase::set_script(self, state, &script_id)?,

            Command::SetPhase { phase } if st => phase::set_phase(self, state, phase),
            Command::NightNext if st => night::night_next(state),
            Command::NightPrev if st => night::night_prev(state),
            Command::SubmitNightAction { role_id, payload } => {
                night::submit_night_action(self, state, actor, &role_id, payload)?
            }
            Command::ResolveNightAction { request_id, result } if st => {
                night::resolve_night_action(state, &request_id, result)
            }

            Command::StartVote { nominator_seat_id, nominee_seat_id } if st => {
                voting::start_vote(state, nominator_seat_id, nominee_seat_id)
            }
            Command::ToggleHand { seat_id } => voting::toggle_hand(state, actor, seat_id),
            Command::NextClockHand if st => voting::next_clock_hand(state),
            Command::CloseVote if st => {
                voting::close_vote(self, state);
            }

            Command::ToggleDead { seat_id } if st => {
                return Ok(chain::toggle_dead(self, state, seat_id));
            }
            Command::ConfirmChainEvent { event_id } if st => {
                return Ok(chain::confirm_chain_event(self, state, &event_id));
            }
            Command::SkipChainEvent { event_id } if st => chain::skip_chain_event(state, &event_id),

            Command::ToggleAbilityUsed { seat_id } if st => {
                if let Some(seat) = state.seat_mut(seat_id) {
                    seat.has_used_ability = !seat.has_used_ability;
                }
            }
            Command::ToggleStatus { seat_id, status } if st => {
                if let Some(seat) = state.seat_mut(seat_id) {
                    match seat.statuses.iter().position(|s| *s == status) {
                        Some(idx) => {
                            seat.statuses.remove(idx);
                        }
                        None => seat.statuses.push(status),
                    }
                }
            }
            Command::AddReminder { seat_id, text } if st => {
                let reminder = crate::models::seat::Reminder::new(
                    seat_id,
                    text,
                    crate::models::seat::PUBLIC_REMINDER_SOURCE,
                );
                if let Some(seat) = state.seat_mut(seat_id) {
                    seat.reminders.push(reminder);
                }
            }
            Command::RemoveReminder { reminder_id } if st => {
                for seat in &mut state.seats {
                    seat.reminders.retain(|r| r.id != reminder_id);
                }
            }
            Command::AddStorytellerNote { content } if st => notes::add_note(state, content),
            Command::UpdateStorytellerNote { note_id, content } if st => {
                notes::update_note(state, &note_id, content)
            }
            Command::DeleteStorytellerNote { note_id } if st => notes::delete_note(state, &note_id),

            Command::SendMessage { content, recipient_id, card } => {
                chat::send_message(state, actor, content, recipient_id, card)
            }
            Command::ToggleWhispers if st => chat::toggle_whispers(state),

            Command::RequestSeatSwap { to_seat_id } => {
                swap::request_seat_swap(state, actor, to_seat_id)
            }
            Command::RespondToSwapRequest { request_id, accept } => {
                swap::respond_to_swap_request(state, actor, &request_id, accept)
            }
            Command::SwapSeats { seat_a, seat_b } if st => swap::swap_seats(state, seat_a, seat_b),

            Command::EndGame { winner, reason } if st => {
                game_over::end_game(state, winner, reason)
            }

            // 権限のない操作は黙って無視する（信頼された説書人モデル）
            _ => {}
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::RuleConfig;

    fn engine() -> Engine {
        Engine::new(RoleCatalog::builtin(), RuleConfig::default())
    }

    #[test]
    fn non_storyteller_commands_are_ignored() {
        let engine = engine();
        let mut state = engine.create_game("1234", 7);
        let player = Actor::player("u1", "Alice");

        let events = engine
            .apply(&mut state, &player, Command::AddSeat)
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(state.seats.len(), 7);

        engine
            .apply(&mut state, &player, Command::SetPhase { phase: GamePhase::Night })
            .unwrap();
        assert_eq!(state.phase, GamePhase::Setup);
    }

    #[test]
    fn storyteller_can_drive_the_game() {
        let engine = engine();
        let mut state = engine.create_game("1234", 7);
        let st = Actor::storyteller("Host");

        engine.apply(&mut state, &st, Command::AddSeat).unwrap();
        assert_eq!(state.seats.len(), 8);

        engine
            .apply(&mut state, &st, Command::SetPhase { phase: GamePhase::Night })
            .unwrap();
        assert_eq!(state.phase, GamePhase::Night);
        assert_eq!(state.round_info.night_count, 1);
    }

    #[test]
    fn unknown_role_surfaces_an_error() {
        let engine = engine();
        let mut state = engine.create_game("1234", 7);
        let st = Actor::storyteller("Host");

        let err = engine
            .apply(
                &mut state,
                &st,
                Command::AssignRole { seat_id: 0, role_id: Some("dragon".to_string()) },
            )
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownRole("dragon".to_string()));
    }
}
