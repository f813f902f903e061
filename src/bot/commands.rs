//! Command routing for incoming text messages

use crate::dialogue::ConsumableDialogueState;

/// Where an incoming text message should be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    Add,
    List,
    /// `/remove` with its trimmed argument, possibly empty
    Remove { name: String },
    /// Free text that continues an active add dialogue
    DialogueInput(String),
    Ignore,
}

/// Split `/cmd@botname rest` into (`cmd`, `rest`)
fn split_command(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('/')?;

    let (token, rest) = match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };
    let command = token.split('@').next().unwrap_or(token);

    Some((command, rest))
}

/// Pick a handler for `text` given the sender's dialogue state.
///
/// `/start` and `/add` always win; every other message is dialogue input
/// while a dialogue is active.
pub fn route_message(text: &str, state: &ConsumableDialogueState) -> Route {
    let command = split_command(text);

    match command {
        Some(("start", _)) => return Route::Start,
        Some(("add", _)) => return Route::Add,
        _ => {}
    }

    if state.is_active() {
        return Route::DialogueInput(text.to_string());
    }

    match command {
        Some(("list", _)) => Route::List,
        Some(("remove", rest)) => Route::Remove {
            name: rest.trim().to_string(),
        },
        _ => Route::Ignore,
    }
}
