//! Deletion notice text

use chatlog_core::content::escape_code_block;
use chatlog_core::entities::{Channel, Community, Message, Thread, User};
use chrono::FixedOffset;

/// Everything a deletion notice mentions, resolved from the store
#[derive(Debug, Clone)]
pub struct NoticeSubject {
    pub message: Message,
    pub author: User,
    pub community: Community,
    pub channel: Channel,
    pub thread: Option<Thread>,
}

/// Render the notice posted when a recorded message is deleted.
///
/// The raw text goes in a code block with backticks escaped, followed by the
/// attachment count when there are any, then one line naming when the message
/// was posted, by whom and where.
pub fn render_deletion_notice(subject: &NoticeSubject, offset: FixedOffset) -> String {
    let raw = subject.message.raw_text.as_deref().unwrap_or(&subject.message.display_text);

    let attachments = match subject.message.attachment_count() {
        0 => String::new(),
        n => format!("\n({n} files)"),
    };

    let location = match &subject.thread {
        Some(thread) => format!(
            "<#{}> (`{}` of `{}` in `{}`)",
            thread.id, thread.name, subject.channel.name, subject.community.name
        ),
        None => format!(
            "<#{}> (`{}` in `{}`)",
            subject.channel.id, subject.channel.name, subject.community.name
        ),
    };

    let at = subject
        .message
        .created_at
        .with_timezone(&offset)
        .format("%Y/%m/%d %H:%M:%S");

    format!(
        "```{}```{}\n-- at {} by {} - {}",
        escape_code_block(raw),
        attachments,
        at,
        subject.author.tag(),
        location
    )
}
