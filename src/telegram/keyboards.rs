//! Inline keyboard builders

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::types::OutputFormat;

/// Callback data of the start button
pub const START_CALLBACK: &str = "start_analysis";

/// Create a callback button
fn btn(text: &str, callback_data: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), callback_data.to_string())
}

/// Keyboard shown with the welcome message
pub fn start_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn("START", START_CALLBACK)]])
}

/// Output format selection shown after a wallet list is received
pub fn format_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        btn("Text", "format:text"),
        btn("CSV", "format:csv"),
        btn("Text + CSV", "format:all"),
    ]])
}

/// Parse a `format:*` callback into an output format
pub fn parse_format_callback(data: &str) -> Option<OutputFormat> {
    data.strip_prefix("format:")
        .and_then(|format| format.parse().ok())
}
