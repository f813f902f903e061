//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use chrono::{Local, NaiveDate};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import database functions
use crate::db::{delete_items_by_owner_and_name, list_items_by_owner};

// Import dialogue types
use crate::dialogue::{ConsumableDialogue, ConsumableDialogueState};

// Import routing and dialogue manager functions
use super::commands::{route_message, Route};
use super::dialogue_manager::{begin_add_dialogue, process_dialogue_input};

// Import UI builder functions
use super::ui_builder::{format_items_list, format_welcome_message};

/// Outcome of handling one text message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotResponse {
    /// Reply to send back, if any
    pub reply: Option<String>,
    /// New dialogue state; `None` leaves the state untouched
    pub next_state: Option<ConsumableDialogueState>,
}

impl BotResponse {
    fn reply(text: String) -> Self {
        Self {
            reply: Some(text),
            next_state: None,
        }
    }
}

/// Render the owner's items
pub async fn list_items_reply(
    pool: &SqlitePool,
    owner_id: i64,
    language_code: Option<&str>,
) -> Result<String> {
    let items = list_items_by_owner(pool, owner_id).await?;
    Ok(format_items_list(&items, language_code))
}

/// Remove the owner's items named `name` and describe the result
pub async fn remove_item_reply(
    pool: &SqlitePool,
    owner_id: i64,
    name: &str,
    language_code: Option<&str>,
) -> Result<String> {
    if name.is_empty() {
        return Ok(t_lang("remove-usage", language_code));
    }

    let deleted = delete_items_by_owner_and_name(pool, owner_id, name).await?;
    let key = if deleted > 0 {
        "remove-success"
    } else {
        "remove-not-found"
    };

    Ok(t_args_lang(key, &[("name", name)], language_code))
}

/// Handle one text message from `owner_id` whose dialogue is in `state`.
///
/// Storage failures are logged and turned into a generic reply; they never
/// escape as errors.
pub async fn handle_text(
    pool: &SqlitePool,
    owner_id: i64,
    text: &str,
    state: ConsumableDialogueState,
    today: NaiveDate,
    language_code: Option<&str>,
) -> BotResponse {
    let route = route_message(text, &state);
    debug!(user_id = owner_id, route = ?route, "Routed text message");

    let one_shot = match route {
        Route::Start => return BotResponse::reply(format_welcome_message(language_code)),
        Route::Add => {
            if state.is_active() {
                info!(user_id = owner_id, "Restarting add dialogue");
            }
            let reply = begin_add_dialogue(language_code);
            return BotResponse {
                reply: Some(reply.text),
                next_state: Some(reply.next_state),
            };
        }
        Route::DialogueInput(input) => {
            return match process_dialogue_input(pool, owner_id, state, &input, today, language_code)
                .await
            {
                Some(reply) => BotResponse {
                    reply: Some(reply.text),
                    next_state: Some(reply.next_state),
                },
                None => BotResponse::default(),
            };
        }
        Route::Ignore => return BotResponse::default(),
        Route::List => list_items_reply(pool, owner_id, language_code).await,
        Route::Remove { name } => remove_item_reply(pool, owner_id, &name, language_code).await,
    };

    match one_shot {
        Ok(text) => BotResponse::reply(text),
        Err(e) => {
            error!(user_id = owner_id, error = %e, "Storage operation failed");
            BotResponse::reply(t_lang("error-storage", language_code))
        }
    }
}

/// Load the owner's dialogue state, handle `text`, and store the new state.
///
/// Returns the reply to send, if any.
pub async fn handle_dialogue_message(
    pool: &SqlitePool,
    dialogue: &ConsumableDialogue,
    owner_id: i64,
    text: &str,
    today: NaiveDate,
    language_code: Option<&str>,
) -> Result<Option<String>> {
    let state = dialogue.get().await?.unwrap_or_default();

    let response = handle_text(pool, owner_id, text, state, today, language_code).await;

    match response.next_state {
        Some(ConsumableDialogueState::Idle) => dialogue.exit().await?,
        Some(next_state) => dialogue.update(next_state).await?,
        None => {}
    }

    Ok(response.reply)
}

/// Owner key for a message: the sender's id, or the chat id for anonymous senders
pub fn owner_key(sender: Option<UserId>, chat_id: ChatId) -> i64 {
    let Some(user_id) = sender else {
        return chat_id.0;
    };

    // Telegram user ids fit in 52 bits
    match i64::try_from(user_id.0) {
        Ok(owner_id) => owner_id,
        Err(_) => {
            warn!(user_id = user_id.0, %chat_id, "User id out of range, keying by chat");
            chat_id.0
        }
    }
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    pool: SqlitePool,
    storage: Arc<InMemStorage<ConsumableDialogueState>>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let owner_id = owner_key(msg.from.as_ref().map(|user| user.id), msg.chat.id);

    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    // Dialogues belong to the sender, not the chat they write in
    let dialogue = ConsumableDialogue::new(storage, ChatId(owner_id));
    let today = Local::now().date_naive();

    let reply =
        handle_dialogue_message(&pool, &dialogue, owner_id, text, today, language_code).await?;

    if let Some(reply) = reply {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}
