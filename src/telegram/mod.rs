//! Telegram front end

pub mod bot;
pub mod keyboards;

pub use bot::{BotContext, Command};
