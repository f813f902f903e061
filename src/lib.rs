//! # Consumables Telegram Bot
//!
//! A Telegram bot that keeps track of household consumables and the date
//! each one started being used. Items are added through a short two-step
//! dialogue and stored in SQLite.

pub mod bot;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod localization;
