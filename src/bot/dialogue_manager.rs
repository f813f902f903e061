//! Dialogue Manager module for handling add-item state transitions

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, error, info};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import dialogue types
use crate::dialogue::{parse_start_date, validate_item_name, ConsumableDialogueState};

// Import database functions
use crate::db::insert_item;

/// Reply text plus the state the dialogue moves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueReply {
    pub text: String,
    pub next_state: ConsumableDialogueState,
}

/// Start (or restart) the add dialogue by asking for a name
pub fn begin_add_dialogue(language_code: Option<&str>) -> DialogueReply {
    DialogueReply {
        text: t_lang("add-name-prompt", language_code),
        next_state: ConsumableDialogueState::AwaitingName,
    }
}

/// Handle item name input during dialogue
pub fn handle_name_input(name_input: &str, language_code: Option<&str>) -> DialogueReply {
    match validate_item_name(name_input) {
        Ok(pending_name) => DialogueReply {
            text: t_lang("add-date-prompt", language_code),
            next_state: ConsumableDialogueState::AwaitingDate { pending_name },
        },
        Err(rejection) => {
            debug!(rejection = ?rejection, "Item name rejected");
            // Keep dialogue active, user can try again
            DialogueReply {
                text: t_lang(rejection.message_key(), language_code),
                next_state: ConsumableDialogueState::AwaitingName,
            }
        }
    }
}

/// Handle start date input during dialogue, committing the item when valid
pub async fn handle_date_input(
    pool: &SqlitePool,
    owner_id: i64,
    pending_name: String,
    date_input: &str,
    today: NaiveDate,
    language_code: Option<&str>,
) -> DialogueReply {
    let start_date = match parse_start_date(date_input, today) {
        Ok(date) => date,
        Err(rejection) => {
            debug!(user_id = owner_id, rejection = ?rejection, "Start date rejected");
            return DialogueReply {
                text: t_lang(rejection.message_key(), language_code),
                next_state: ConsumableDialogueState::AwaitingDate { pending_name },
            };
        }
    };

    let text = match insert_item(pool, owner_id, &pending_name, start_date).await {
        Ok(item_id) => {
            info!(user_id = owner_id, item_id, "Add dialogue completed");
            t_args_lang(
                "add-success",
                &[("name", pending_name.as_str()), ("date", date_input.trim())],
                language_code,
            )
        }
        Err(e) => {
            error!(user_id = owner_id, error = %e, "Failed to save item");
            t_lang("add-save-failed", language_code)
        }
    };

    // The dialogue ends whether or not the commit succeeded
    DialogueReply {
        text,
        next_state: ConsumableDialogueState::Idle,
    }
}

/// Feed one message into the add dialogue.
///
/// Returns `None` when no dialogue is active.
pub async fn process_dialogue_input(
    pool: &SqlitePool,
    owner_id: i64,
    state: ConsumableDialogueState,
    input: &str,
    today: NaiveDate,
    language_code: Option<&str>,
) -> Option<DialogueReply> {
    match state {
        ConsumableDialogueState::Idle => None,
        ConsumableDialogueState::AwaitingName => Some(handle_name_input(input, language_code)),
        ConsumableDialogueState::AwaitingDate { pending_name } => Some(
            handle_date_input(pool, owner_id, pending_name, input, today, language_code).await,
        ),
    }
}
