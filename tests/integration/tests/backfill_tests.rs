//! Backfill and content fix tests
//!
//! Run with: cargo test -p integration-tests --test backfill_tests

use std::time::Duration;

use chatlog_core::entities::EntityKind;
use chatlog_service::{BackfillReport, CreateOutcome, RepairReport};
use integration_tests::{edited, test_settings, TestLedger, World};

fn paged(page_size: u8) -> TestLedger {
    let mut settings = test_settings();
    settings.backfill.page_size = page_size;
    TestLedger::with_settings(settings)
}

// ============================================================================
// Backfill
// ============================================================================

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    for (count, page_size, requests) in [(7, 3, 4), (6, 3, 3), (0, 3, 1), (1, 100, 2)] {
        let ledger = paged(page_size);
        let world = World::unique();
        let history = world.history(&world.channel, count);
        ledger.platform.add_channel(world.channel.clone(), history);

        let inserted = ledger
            .backfill()
            .backfill_channel(&world.channel)
            .await
            .unwrap();

        assert_eq!(inserted, count, "{count} messages, page size {page_size}");
        assert_eq!(ledger.platform.page_requests(world.channel.id), requests);
        assert_eq!(ledger.store.message_count(), count);
    }
}

#[tokio::test(start_paused = true)]
async fn test_pages_are_spaced_by_page_delay() {
    let delay = Duration::from_secs(2);
    let mut settings = test_settings();
    settings.backfill.page_size = 3;
    settings.backfill.page_delay = delay;
    let ledger = TestLedger::with_settings(settings);
    let world = World::unique();
    ledger
        .platform
        .add_channel(world.channel.clone(), world.history(&world.channel, 7));

    let started = tokio::time::Instant::now();
    let inserted = ledger
        .backfill()
        .backfill_channel(&world.channel)
        .await
        .unwrap();

    assert_eq!(inserted, 7);
    let times = ledger.platform.page_request_times(world.channel.id);
    assert_eq!(times.len(), 4);
    assert_eq!(times[0], started);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], delay);
    }
    // Three full pages, each followed by the delay
    assert_eq!(started.elapsed(), delay * 3);
}

#[tokio::test]
async fn test_backfill_inserts_only_missing_messages() {
    let ledger = paged(4);
    let world = World::unique();
    let history = world.history(&world.channel, 10);
    for message in history.iter().step_by(3) {
        ledger.lifecycle().on_create(message, false).await.unwrap();
    }
    ledger.platform.add_channel(world.channel.clone(), history.clone());

    let inserted = ledger
        .backfill()
        .backfill_channel(&world.channel)
        .await
        .unwrap();

    assert_eq!(inserted, 6);
    assert_eq!(ledger.store.message_count(), 10);
    for message in &history {
        assert!(ledger.store.message(message.id).is_some());
    }
}

#[tokio::test]
async fn test_live_after_backfill_is_duplicate() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let history = world.history(&world.channel, 3);
    ledger.platform.add_channel(world.channel.clone(), history.clone());

    ledger.backfill().backfill_all().await.unwrap();
    let outcome = ledger
        .lifecycle()
        .on_create(&history[2], false)
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Duplicate);
    assert_eq!(ledger.store.message_count(), 3);
}

#[tokio::test]
async fn test_backfilled_messages_skip_attachments() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let mut history = world.history(&world.channel, 2);
    history[0].attachments = vec!["https://cdn.example.com/old.png".to_string()];
    ledger.platform.add_channel(world.channel.clone(), history);

    ledger.backfill().backfill_all().await.unwrap();
    ledger.settle().await;

    assert_eq!(ledger.store.message_count(), 2);
    assert!(ledger.platform.stored_attachments().is_empty());
}

#[tokio::test]
async fn test_channels_run_independently() {
    let ledger = paged(2);
    let world = World::unique();
    let second = world.other_channel("random");
    let hidden = world.other_channel("staff");
    let broken = world.other_channel("broken");

    ledger
        .platform
        .add_channel(world.channel.clone(), world.history(&world.channel, 5));
    ledger
        .platform
        .add_channel(second.clone(), world.history(&second, 3));
    ledger
        .platform
        .add_channel(hidden.clone(), world.history(&hidden, 4));
    ledger
        .platform
        .add_channel(broken.clone(), world.history(&broken, 4));
    ledger.platform.forbid(hidden.id);
    ledger.platform.break_history(broken.id);

    let report = ledger.backfill().backfill_all().await.unwrap();

    assert_eq!(
        report,
        BackfillReport {
            channels: 4,
            inserted: 8,
            failed_channels: 1,
        }
    );
    assert_eq!(ledger.platform.page_requests(hidden.id), 1);
    // Community, author and the two readable channels
    assert_eq!(ledger.store.entity_count(), 4);
    assert!(ledger.row(EntityKind::Channel, hidden.id).is_none());
}

#[tokio::test]
async fn test_message_missing_author_is_skipped() {
    let ledger = paged(2);
    let world = World::unique();
    let mut history = world.history(&world.channel, 5);
    history[1].author = None;
    let orphan = history[1].id;
    ledger.platform.add_channel(world.channel.clone(), history);

    let report = ledger.backfill().backfill_all().await.unwrap();

    assert_eq!(report.inserted, 4);
    assert_eq!(report.failed_channels, 0);
    assert!(ledger.store.message(orphan).is_none());
}

#[tokio::test]
async fn test_backfill_reconciles_renamed_channel() {
    let ledger = TestLedger::new();
    let world = World::unique();
    ledger
        .lifecycle()
        .on_create(&world.message("before the rename"), false)
        .await
        .unwrap();

    let mut renamed = world.channel.clone();
    renamed.name = "general-archive".to_string();
    ledger
        .platform
        .add_channel(renamed.clone(), world.history(&renamed, 2));

    ledger.backfill().backfill_all().await.unwrap();

    let changes = ledger.store.name_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_value.as_deref(), Some("general-archive"));
}

#[tokio::test]
async fn test_one_unit_of_work_per_page() {
    let ledger = paged(3);
    let world = World::unique();
    ledger
        .platform
        .add_channel(world.channel.clone(), world.history(&world.channel, 7));

    ledger
        .backfill()
        .backfill_channel(&world.channel)
        .await
        .unwrap();

    // The known-id read plus three non-empty pages
    assert_eq!(ledger.store.begun(), 4);
    assert_eq!(ledger.store.committed(), 4);
}

// ============================================================================
// Content fix
// ============================================================================

/// Record `text` as a row from before raw text was captured
fn legacy_row(ledger: &TestLedger, world: &World, text: &str) -> chatlog_core::ObservedMessage {
    let observed = world.message(text);
    let mut row = observed.to_message("old-host").unwrap();
    row.raw_text = None;
    row.display_text = format!("{text} (rendered)");
    ledger.store.seed_message(row);
    observed
}

#[tokio::test]
async fn test_repair_fills_missing_raw_text() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let mut live = legacy_row(&ledger, &world, "hello <@42>");
    live.display_text = "hello @bob".to_string();
    ledger.platform.add_channel(world.channel.clone(), vec![live.clone()]);

    let report = ledger.repair().repair_all().await.unwrap();

    assert_eq!(
        report,
        RepairReport {
            filled: 1,
            skipped: 0,
            missing: 0,
        }
    );
    let row = ledger.store.message(live.id).unwrap();
    assert_eq!(row.raw_text.as_deref(), Some("hello <@42>"));
    assert_eq!(row.display_text, "hello @bob");

    // Nothing left to fix
    let report = ledger.repair().repair_channel(world.channel.id).await.unwrap();
    assert_eq!(report, RepairReport::default());
}

#[tokio::test]
async fn test_repair_skips_content_already_recorded_as_edit() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let original = legacy_row(&ledger, &world, "typo");
    let live = edited(&original, "fixed", 2);
    ledger.lifecycle().on_edit(&live).await.unwrap();
    ledger.platform.set_live(live.clone());

    let report = ledger.repair().repair_channel(world.channel.id).await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.filled, 0);
    assert_eq!(ledger.store.message(live.id).unwrap().raw_text, None);
}

#[tokio::test]
async fn test_repair_counts_missing_messages() {
    let ledger = TestLedger::new();
    let world = World::unique();
    legacy_row(&ledger, &world, "deleted since");

    let hidden = world.other_channel("hidden");
    let private = World {
        channel: hidden.clone(),
        ..world.clone()
    };
    let secret = legacy_row(&ledger, &private, "secret");
    ledger.platform.set_live(secret);
    ledger.platform.forbid(hidden.id);

    let mut report = ledger.repair().repair_channel(world.channel.id).await.unwrap();
    report += ledger.repair().repair_channel(hidden.id).await.unwrap();

    assert_eq!(report.missing, 2);
    assert_eq!(report.filled, 0);
}

#[tokio::test]
async fn test_repair_ignores_rows_with_raw_text() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let message = world.message("captured");
    ledger.lifecycle().on_create(&message, false).await.unwrap();
    ledger.platform.set_live(edited(&message, "changed", 1));

    let report = ledger.repair().repair_channel(world.channel.id).await.unwrap();

    assert_eq!(report, RepairReport::default());
    let row = ledger.store.message(message.id).unwrap();
    assert_eq!(row.raw_text.as_deref(), Some("captured"));
}
