// Fixed page strings plus defaults that can be overridden from the environment.

use std::env;
use std::ops::Range;

pub const PAGE_TITLE: &str = "chatbot";
pub const INPUT_PLACEHOLDER: &str = "Hi! How can I assist you today?";

/// Sentences per reply, upper bound exclusive.
pub const SENTENCES_PER_REPLY: Range<usize> = 10..30;
/// Words per generated sentence, upper bound exclusive.
pub const WORDS_PER_SENTENCE: Range<usize> = 3..10;

pub const STYLE_CSS: &str = "style.css";
pub const ALIGNMENT_CSS: &str = "alignment.css";
pub const SCROLL_JS: &str = "scroll.js";
pub const CHAT_TEMPLATE: &str = "chat.html";

lazy_static::lazy_static! {
    pub static ref DEFAULT_HOST: String = env::var("ECHOBOT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    pub static ref DEFAULT_ASSETS_DIR: String = env::var("ECHOBOT_ASSETS_DIR").unwrap_or_else(|_| "assets".to_string());
    pub static ref DEFAULT_TEMPLATES_DIR: String = env::var("ECHOBOT_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    // A session untouched for this long has ended and is discarded.
    pub static ref DEFAULT_SESSION_IDLE_SECS: u64 = env::var("ECHOBOT_SESSION_IDLE_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .unwrap_or(3600);
}

pub const DEFAULT_PORT: u16 = 8501;
