//! Add-item dialogue state and input validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Maximum item name length, in characters, after trimming
pub const MAX_ITEM_NAME_CHARS: usize = 100;

/// Wire format of the start date
pub const DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

/// Represents the conversation state for the add-item dialogue
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableDialogueState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingDate {
        pending_name: String,
    },
}

impl ConsumableDialogueState {
    /// Whether an add dialogue is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, ConsumableDialogueState::Idle)
    }
}

/// Type alias for our consumable dialogue
pub type ConsumableDialogue =
    Dialogue<ConsumableDialogueState, InMemStorage<ConsumableDialogueState>>;

/// Why a submitted item name was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRejection {
    Empty,
    TooLong,
}

impl NameRejection {
    pub fn message_key(self) -> &'static str {
        match self {
            NameRejection::Empty => "add-name-empty",
            NameRejection::TooLong => "add-name-too-long",
        }
    }
}

/// Why a submitted start date was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRejection {
    Malformed,
    InFuture,
}

impl DateRejection {
    pub fn message_key(self) -> &'static str {
        match self {
            DateRejection::Malformed => "add-date-malformed",
            DateRejection::InFuture => "add-date-in-future",
        }
    }
}

/// Validates an item name input, returning the trimmed name
pub fn validate_item_name(name: &str) -> Result<String, NameRejection> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(NameRejection::Empty);
    }

    if trimmed.chars().count() > MAX_ITEM_NAME_CHARS {
        return Err(NameRejection::TooLong);
    }

    Ok(trimmed.to_string())
}

/// Parses a `DD.MM.YYYY` start date that must not be later than `today`
pub fn parse_start_date(input: &str, today: NaiveDate) -> Result<NaiveDate, DateRejection> {
    let trimmed = input.trim();

    // chrono accepts unpadded fields, so enforce the exact shape first
    let bytes = trimmed.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(DateRejection::Malformed);
    }

    let date = NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT)
        .map_err(|_| DateRejection::Malformed)?;

    if date > today {
        return Err(DateRejection::InFuture);
    }

    Ok(date)
}
