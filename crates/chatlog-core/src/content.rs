//! Display text rendering
//!
//! The ledger stores two versions of every message body: the raw source and a
//! display rendering with mentions and custom emoji replaced by readable text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::value_objects::Snowflake;

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>").expect("valid user mention pattern"));
static CHANNEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#(\d+)>").expect("valid channel mention pattern"));
static CUSTOM_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:(\w+?):\d+>").expect("valid emoji pattern"));

/// Names used to resolve mentions while rendering
#[derive(Debug, Clone, Default)]
pub struct MentionNames {
    users: HashMap<Snowflake, String>,
    channels: HashMap<Snowflake, String>,
}

impl MentionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user mentioned by the message
    pub fn user(&mut self, id: Snowflake, name: impl Into<String>) -> &mut Self {
        self.users.insert(id, name.into());
        self
    }

    /// Register a channel the message may mention
    pub fn channel(&mut self, id: Snowflake, name: impl Into<String>) -> &mut Self {
        self.channels.insert(id, name.into());
        self
    }
}

fn lookup<'a>(names: &'a HashMap<Snowflake, String>, caps: &Captures<'_>) -> Option<&'a str> {
    Snowflake::parse(&caps[1])
        .ok()
        .and_then(|id| names.get(&id))
        .map(String::as_str)
}

/// Render display text from raw text.
///
/// `<@id>`/`<@!id>` become `@name` and `<#id>` becomes `#name` when the name
/// is known; unknown mentions are left as written. Custom emoji `<:name:id>`
/// and `<a:name:id>` always become `:name:`.
pub fn render_display_text(raw: &str, names: &MentionNames) -> String {
    let text = USER_MENTION.replace_all(raw, |caps: &Captures<'_>| {
        lookup(&names.users, caps).map_or_else(|| caps[0].to_string(), |name| format!("@{name}"))
    });
    let text = CHANNEL_MENTION.replace_all(&text, |caps: &Captures<'_>| {
        lookup(&names.channels, caps)
            .map_or_else(|| caps[0].to_string(), |name| format!("#{name}"))
    });
    CUSTOM_EMOJI.replace_all(&text, ":$1:").into_owned()
}

/// Escape backticks so text can sit inside a code block
pub fn escape_code_block(text: &str) -> String {
    text.replace('`', "\\`")
}
