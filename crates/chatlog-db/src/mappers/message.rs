//! Message ledger entity <-> model mappers

use chatlog_core::entities::{Message, MessageEdit};
use chatlog_core::value_objects::Snowflake;

use crate::models::{MessageEditModel, MessageModel};

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.msgid),
            display_text: model.displaytext,
            raw_text: model.rawtext,
            community_id: Snowflake::new(model.community_id),
            channel_id: Snowflake::new(model.channel_id),
            thread_id: model.thread_id.map(Snowflake::new),
            author_id: Snowflake::new(model.author_id),
            kind: model.kind,
            attachments: model.attachments,
            machine: model.machine,
            created_at: model.timestamp,
        }
    }
}

/// Convert MessageEditModel to MessageEdit entity
impl From<MessageEditModel> for MessageEdit {
    fn from(model: MessageEditModel) -> Self {
        MessageEdit {
            message_id: Snowflake::new(model.msgid),
            display_text: model.displaytext,
            raw_text: model.rawtext,
            attachments: model.attachments,
            machine: model.machine,
            edited_at: model.timestamp,
        }
    }
}

/// Message values for database insertion
pub struct MessageInsert<'a> {
    pub msgid: i64,
    pub displaytext: &'a str,
    pub rawtext: Option<&'a str>,
    pub community_id: i64,
    pub channel_id: i64,
    pub thread_id: Option<i64>,
    pub author_id: i64,
    pub kind: i32,
    pub attachments: Option<&'a str>,
    pub machine: &'a str,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            msgid: message.id.into_inner(),
            displaytext: &message.display_text,
            rawtext: message.raw_text.as_deref(),
            community_id: message.community_id.into_inner(),
            channel_id: message.channel_id.into_inner(),
            thread_id: message.thread_id.map(Snowflake::into_inner),
            author_id: message.author_id.into_inner(),
            kind: message.kind,
            attachments: message.attachments.as_deref(),
            machine: &message.machine,
        }
    }
}
