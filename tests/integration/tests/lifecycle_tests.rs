//! Message lifecycle tests
//!
//! Creation, edits and deletions run through the real lifecycle service
//! against the in-memory store and the scripted platform.
//!
//! Run with: cargo test -p integration-tests --test lifecycle_tests

use chatlog_core::entities::{Community, EntityKind};
use chatlog_core::Snowflake;
use chatlog_service::{CreateOutcome, DeleteOutcome, EditOutcome};
use integration_tests::{edited, test_settings, unique_id, TestLedger, World, NOTICE_CHANNEL};

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_records_entities_and_message() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("hi");

    let outcome = ledger.lifecycle().on_create(&message, false).await.unwrap();
    assert_eq!(outcome, CreateOutcome::Inserted);

    assert!(ledger.row(EntityKind::Community, world.community.id).is_some());
    assert!(ledger.row(EntityKind::Channel, world.channel.id).is_some());
    assert!(ledger.row(EntityKind::User, world.author.id).is_some());

    let row = ledger.store.message(message.id).unwrap();
    assert_eq!(row.raw_text.as_deref(), Some("hi"));
    assert_eq!(row.community_id, world.community.id);
    assert_eq!(row.author_id, world.author.id);
    assert_eq!(row.machine, "test-host");
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("hi");

    let first = ledger.lifecycle().on_create(&message, false).await.unwrap();
    let second = ledger.lifecycle().on_create(&message, true).await.unwrap();

    assert_eq!(first, CreateOutcome::Inserted);
    assert_eq!(second, CreateOutcome::Duplicate);
    assert_eq!(ledger.store.message_count(), 1);
    assert_eq!(ledger.store.entity_count(), 3);
    assert!(ledger.store.name_changes().is_empty());
}

#[tokio::test]
async fn test_thread_message_records_thread() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let thread = world.thread("design");
    let mut message = world.message("in a thread");
    message.thread = Some(thread.clone());

    ledger.lifecycle().on_create(&message, false).await.unwrap();

    assert!(ledger.row(EntityKind::Thread, thread.id).is_some());
    let row = ledger.store.message(message.id).unwrap();
    assert_eq!(row.channel_id, world.channel.id);
    assert_eq!(row.thread_id, Some(thread.id));
}

#[tokio::test]
async fn test_thread_under_other_channel_is_rejected() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let stray = world.other_channel("elsewhere");
    let mut message = world.message("lost");
    message.thread = Some(world.thread("side"));
    message.channel = Some(stray);

    let err = ledger.lifecycle().on_create(&message, false).await.unwrap_err();
    assert_eq!(err.error_code(), "THREAD_PARENT_MISMATCH");
    assert_eq!(ledger.store.entity_count(), 0);
    assert_eq!(ledger.store.message_count(), 0);
}

#[tokio::test]
async fn test_missing_author_fails_only_that_message() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let mut broken = world.message("who wrote this");
    broken.author = None;

    let err = ledger.lifecycle().on_create(&broken, false).await.unwrap_err();
    assert!(err.is_missing_entity());
    assert!(ledger.store.message(broken.id).is_none());

    let fine = world.message("me");
    let outcome = ledger.lifecycle().on_create(&fine, false).await.unwrap();
    assert_eq!(outcome, CreateOutcome::Inserted);
}

// ============================================================================
// Attachments
// ============================================================================

#[tokio::test]
async fn test_live_message_attachments_are_stored() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let thread = world.thread("pics");
    let mut message = world.message("look");
    message.thread = Some(thread.clone());
    message.attachments = vec![
        "https://cdn.example.com/a.png".to_string(),
        "https://cdn.example.com/b.png".to_string(),
    ];

    ledger.lifecycle().on_create(&message, false).await.unwrap();
    ledger.settle().await;

    let stored = ledger.platform.stored_attachments();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|t| t.channel_id == thread.id));
    assert!(stored.iter().all(|t| t.community_id == world.community.id));
    assert!(stored.iter().all(|t| t.message_id == message.id));
    let mut positions: Vec<usize> = stored.iter().map(|t| t.position).collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn test_historical_and_duplicate_messages_skip_attachments() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let mut message = world.message("look");
    message.attachments = vec!["https://cdn.example.com/a.png".to_string()];

    ledger.lifecycle().on_create(&message, true).await.unwrap();
    ledger.lifecycle().on_create(&message, false).await.unwrap();
    ledger.settle().await;

    assert!(ledger.platform.stored_attachments().is_empty());
}

// ============================================================================
// Disabled origins
// ============================================================================

#[tokio::test]
async fn test_disabled_channel_suppresses_content() {
    let ledger = TestLedger::new();
    let world = World::unique();
    ledger
        .lifecycle()
        .on_create(&world.message("before"), false)
        .await
        .unwrap();
    ledger
        .store
        .set_disabled(EntityKind::Channel, world.channel.id, true);

    let mut renamed = world.clone();
    renamed.channel.name = "quiet".to_string();
    let message = renamed.message("after");
    let outcome = ledger.lifecycle().on_create(&message, false).await.unwrap();

    assert_eq!(outcome, CreateOutcome::Disabled);
    assert!(ledger.store.message(message.id).is_none());
    assert_eq!(ledger.store.message_count(), 1);

    // Entity bookkeeping still happens
    let changes = ledger.store.name_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_value.as_deref(), Some("quiet"));
}

#[tokio::test]
async fn test_disabled_author_suppresses_edits() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("hi");
    ledger.lifecycle().on_create(&message, false).await.unwrap();
    ledger
        .store
        .set_disabled(EntityKind::User, world.author.id, true);

    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "changed", 1))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Disabled);
    assert!(ledger.store.edits_of(message.id).is_empty());

    // Nor is an unknown message created implicitly
    let unseen = world.message("unseen");
    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&unseen, "unseen!", 1))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Disabled);
    assert!(ledger.store.message(unseen.id).is_none());
}

#[tokio::test]
async fn test_observation_never_clears_disabled_flag() {
    let ledger = TestLedger::new();
    let world = World::unique();
    ledger
        .lifecycle()
        .on_create(&world.message("one"), false)
        .await
        .unwrap();
    ledger
        .store
        .set_disabled(EntityKind::Community, world.community.id, true);

    let mut renamed = world.clone();
    renamed.community = Community::observed(world.community.id, "Renamed");
    ledger
        .lifecycle()
        .on_create(&renamed.message("two"), false)
        .await
        .unwrap();

    let row = ledger
        .row(EntityKind::Community, world.community.id)
        .unwrap();
    assert!(row.is_disabled());
    assert_eq!(row.display_name(), "Renamed");
}

// ============================================================================
// Edits
// ============================================================================

#[tokio::test]
async fn test_edit_implies_existence() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = edited(&world.message("original"), "changed", 5);

    let outcome = ledger.lifecycle().on_edit(&message).await.unwrap();
    assert_eq!(outcome, EditOutcome::Recorded);

    assert_eq!(ledger.store.message_count(), 1);
    let edits = ledger.store.edits_of(message.id);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].raw_text, "changed");
    assert_eq!(edits[0].edited_at, message.edited_at.unwrap());
}

#[tokio::test]
async fn test_update_without_edit_time_is_not_an_edit() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("link unfurled");

    let outcome = ledger.lifecycle().on_edit(&message).await.unwrap();
    assert_eq!(outcome, EditOutcome::NotEdited);
    assert!(ledger.store.message(message.id).is_some());
    assert!(ledger.store.edits_of(message.id).is_empty());
}

#[tokio::test]
async fn test_edits_accumulate() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("v1");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    for (minutes, text) in [(1, "v2"), (2, "v3"), (3, "v4")] {
        let outcome = ledger
            .lifecycle()
            .on_edit(&edited(&message, text, minutes))
            .await
            .unwrap();
        assert_eq!(outcome, EditOutcome::Recorded);
    }

    assert_eq!(ledger.store.edits_of(message.id).len(), 3);
    // The base row keeps the text as first posted
    let row = ledger.store.message(message.id).unwrap();
    assert_eq!(row.raw_text.as_deref(), Some("v1"));
}

#[tokio::test]
async fn test_edit_dedup_skips_known_content() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("hi");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    // Same content as the base row
    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "hi", 1))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Unchanged);

    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "hello", 2))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Recorded);

    // Same content as the latest edit, later edit time
    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "hello", 3))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Unchanged);

    // Back to an earlier text is a real change
    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "hi", 4))
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::Recorded);
    assert_eq!(ledger.store.edits_of(message.id).len(), 2);
}

#[tokio::test]
async fn test_edit_dedup_off_keys_on_edit_time() {
    let mut settings = test_settings();
    settings.edit_dedup = false;
    let ledger = TestLedger::with_settings(settings);
    let world = World::unique();
    let message = world.message("hi");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    let first = edited(&message, "hello", 1);
    assert_eq!(
        ledger.lifecycle().on_edit(&first).await.unwrap(),
        EditOutcome::Recorded
    );
    assert_eq!(
        ledger.lifecycle().on_edit(&first).await.unwrap(),
        EditOutcome::Duplicate
    );
    assert_eq!(
        ledger
            .lifecycle()
            .on_edit(&edited(&message, "hello", 2))
            .await
            .unwrap(),
        EditOutcome::Recorded
    );
    assert_eq!(ledger.store.edits_of(message.id).len(), 2);
}

#[tokio::test]
async fn test_attachment_change_is_an_edit() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let mut message = world.message("pics");
    message.attachments = vec!["https://cdn.example.com/a.png".to_string()];
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    let mut update = edited(&message, "pics", 1);
    update.attachments.clear();
    let outcome = ledger.lifecycle().on_edit(&update).await.unwrap();

    assert_eq!(outcome, EditOutcome::Recorded);
    assert_eq!(ledger.store.edits_of(message.id)[0].attachments, None);
}

// ============================================================================
// Deletions
// ============================================================================

#[tokio::test]
async fn test_deletion_is_terminal_safe() {
    let world = World::unique();
    let ledger = TestLedger::with_notices(world.community.id);
    let message = world.message("bye");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    let first = ledger
        .lifecycle()
        .on_delete(Some(world.community.id), world.channel.id, message.id)
        .await
        .unwrap();
    let second = ledger
        .lifecycle()
        .on_delete(Some(world.community.id), world.channel.id, message.id)
        .await
        .unwrap();
    ledger.settle().await;

    assert_eq!(first, DeleteOutcome::Recorded);
    assert_eq!(second, DeleteOutcome::Duplicate);
    assert_eq!(ledger.store.deletion_count(), 1);
    assert_eq!(ledger.platform.notices().len(), 1);
    // The creation row is kept
    assert!(ledger.store.message(message.id).is_some());
}

#[tokio::test]
async fn test_deletion_notice_content() {
    let world = World::unique();
    let ledger = TestLedger::with_notices(world.community.id);
    let message = world.message("see `this`");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    ledger
        .lifecycle()
        .on_delete(Some(world.community.id), world.channel.id, message.id)
        .await
        .unwrap();
    ledger.settle().await;

    let notices = ledger.platform.notices();
    assert_eq!(notices.len(), 1);
    let (channel_id, text) = &notices[0];
    assert_eq!(*channel_id, NOTICE_CHANNEL);
    assert_eq!(
        *text,
        format!(
            "```see \\`this\\````\n-- at 2024/03/01 09:30:00 by {} - <#{}> (`general` in `{}`)",
            world.author.username, world.channel.id, world.community.name
        )
    );
}

#[tokio::test]
async fn test_deletion_notice_gating() {
    let world = World::unique();
    let ledger = TestLedger::with_notices(world.community.id);

    // A bot's message
    let mut bot_world = world.clone();
    bot_world.author = world.author.clone().with_bot(true);
    bot_world.author.id = unique_id();
    let bot_message = bot_world.message("beep");
    ledger.lifecycle().on_create(&bot_message, false).await.unwrap();

    // A message in another community
    let elsewhere = World::unique();
    let foreign = elsewhere.message("hello");
    ledger.lifecycle().on_create(&foreign, false).await.unwrap();

    // A message never recorded
    let unknown = unique_id();

    for (community, channel, id) in [
        (world.community.id, world.channel.id, bot_message.id),
        (elsewhere.community.id, elsewhere.channel.id, foreign.id),
        (world.community.id, world.channel.id, unknown),
    ] {
        let outcome = ledger
            .lifecycle()
            .on_delete(Some(community), channel, id)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Recorded);
    }
    ledger.settle().await;

    assert_eq!(ledger.store.deletion_count(), 3);
    assert!(ledger.platform.notices().is_empty());
}

#[tokio::test]
async fn test_no_notice_when_unconfigured() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("bye");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    ledger
        .lifecycle()
        .on_delete(Some(world.community.id), world.channel.id, message.id)
        .await
        .unwrap();
    ledger.settle().await;

    assert_eq!(ledger.store.deletion_count(), 1);
    assert!(ledger.platform.notices().is_empty());
}

#[tokio::test]
async fn test_edit_after_delete_is_accepted() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("gone");

    ledger
        .lifecycle()
        .on_delete(Some(world.community.id), world.channel.id, message.id)
        .await
        .unwrap();
    let outcome = ledger
        .lifecycle()
        .on_edit(&edited(&message, "late edit", 1))
        .await
        .unwrap();

    assert_eq!(outcome, EditOutcome::Recorded);
    assert!(ledger.store.message(message.id).is_some());
    assert_eq!(ledger.store.edits_of(message.id).len(), 1);
}

#[tokio::test]
async fn test_direct_message_deletion_is_recorded() {
    let ledger = TestLedger::new();
    let outcome = ledger
        .lifecycle()
        .on_delete(None, Snowflake::new(77), unique_id())
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Recorded);
}
