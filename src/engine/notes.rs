//! 説書人の自由記述メモ

use chrono::Utc;

use crate::models::game::{GameState, StorytellerNote};

pub fn add_note(state: &mut GameState, content: String) {
    if content.trim().is_empty() {
        return;
    }
    state.storyteller_notes.push(StorytellerNote {
        id: uuid::Uuid::new_v4().to_string(),
        content,
        timestamp: Utc::now(),
    });
}

pub fn update_note(state: &mut GameState, note_id: &str, content: String) {
    if let Some(note) = state.storyteller_notes.iter_mut().find(|n| n.id == note_id) {
        note.content = content;
        note.timestamp = Utc::now();
    }
}

pub fn delete_note(state: &mut GameState, note_id: &str) {
    state.storyteller_notes.retain(|n| n.id != note_id);
}
