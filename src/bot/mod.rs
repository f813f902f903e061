//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: Routes incoming text to a handler
//! - `message_handler`: Handles incoming text messages and one-shot commands
//! - `dialogue_manager`: Drives the add-item dialogue state transitions
//! - `ui_builder`: Formats reply messages

pub mod commands;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler function for use in main.rs
pub use message_handler::message_handler;

pub use commands::{route_message, Route};
pub use dialogue_manager::{begin_add_dialogue, process_dialogue_input, DialogueReply};
pub use message_handler::{handle_dialogue_message, handle_text, BotResponse};
