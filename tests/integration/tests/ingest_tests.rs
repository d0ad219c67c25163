//! Dispatch ingest tests
//!
//! Feed newline-delimited frames through the gateway handler into the
//! in-memory ledger.
//!
//! Run with: cargo test -p integration-tests --test ingest_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatlog_core::error::PlatformError;
use chatlog_core::traits::PlatformResult;
use chatlog_core::{ObservedMessage, Snowflake};
use chatlog_gateway::platform::models::MessagePayload;
use chatlog_gateway::platform::{observe, MessageOrigin, MessageResolver};
use chatlog_gateway::{run_ingest, EventHandler, IngestReport, MAX_IN_FLIGHT_EVENTS};
use integration_tests::{edited, posted_at, unique_id, TestLedger, World};
use serde_json::{json, Value};

/// Resolves every message in the world's channel
struct WorldResolver {
    origin: MessageOrigin,
}

#[async_trait]
impl MessageResolver for WorldResolver {
    async fn resolve(&self, payload: &MessagePayload) -> PlatformResult<ObservedMessage> {
        if payload.channel_id != self.origin.channel.id {
            return Err(PlatformError::Status {
                status: 403,
                route: "/channels/{channel.id}".to_string(),
            });
        }
        Ok(observe(payload, &self.origin))
    }
}

/// Resolves slowly and remembers the most resolutions seen at once
struct SlowResolver {
    inner: WorldResolver,
    running: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl MessageResolver for SlowResolver {
    async fn resolve(&self, payload: &MessagePayload) -> PlatformResult<ObservedMessage> {
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.inner.resolve(payload).await
    }
}

fn world_origin(world: &World) -> MessageOrigin {
    MessageOrigin {
        community: world.community.clone(),
        channel: world.channel.clone(),
        thread: None,
        channel_names: vec![(world.channel.id, world.channel.name.clone())],
    }
}

fn handler(ledger: &TestLedger, world: &World) -> EventHandler {
    let origin = world_origin(world);
    EventHandler::new(Arc::new(ledger.ctx.clone()), Arc::new(WorldResolver { origin }))
}

fn frame(event: &str, data: Value) -> String {
    json!({"op": 0, "t": event, "s": 1, "d": data}).to_string()
}

fn create_frame(world: &World, channel_id: Snowflake, id: Snowflake, content: &str) -> String {
    frame(
        "MESSAGE_CREATE",
        json!({
            "id": id.to_string(),
            "channel_id": channel_id.to_string(),
            "guild_id": world.community.id.to_string(),
            "author": {
                "id": world.author.id.to_string(),
                "username": world.author.username,
                "discriminator": "0",
            },
            "content": content,
            "timestamp": posted_at().to_rfc3339(),
            "type": 0,
        }),
    )
}

fn id_frame(event: &str, world: &World, id: Snowflake) -> String {
    frame(
        event,
        json!({
            "id": id.to_string(),
            "channel_id": world.channel.id.to_string(),
            "guild_id": world.community.id.to_string(),
        }),
    )
}

async fn ingest(handler: &EventHandler, lines: &[String]) -> IngestReport {
    let input = lines.join("\n");
    run_ingest(handler, input.as_bytes()).await.unwrap()
}

#[tokio::test]
async fn test_ingest_records_created_messages() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let handler = handler(&ledger, &world);
    let id = unique_id();
    let content = format!("see <#{}> <:blob:42>", world.channel.id);

    let report = ingest(
        &handler,
        &[
            create_frame(&world, world.channel.id, id, &content),
            String::new(),
            r#"{"op":0,"t":"TYPING_START","d":{}}"#.to_string(),
            "{ not json".to_string(),
        ],
    )
    .await;

    assert_eq!(
        report,
        IngestReport {
            handled: 2,
            failed: 0,
            malformed: 1,
        }
    );
    let row = ledger.store.message(id).unwrap();
    assert_eq!(row.raw_text.as_deref(), Some(content.as_str()));
    assert_eq!(row.display_text, "see #general :blob:");
    assert_eq!(row.machine, "test-host");
}

#[tokio::test]
async fn test_failed_event_does_not_stop_the_stream() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let handler = handler(&ledger, &world);
    let (good, hidden) = (unique_id(), unique_id());

    let report = ingest(
        &handler,
        &[
            create_frame(&world, unique_id(), hidden, "elsewhere"),
            create_frame(&world, world.channel.id, good, "here"),
        ],
    )
    .await;

    assert_eq!(report.handled, 1);
    assert_eq!(report.failed, 1);
    assert!(ledger.store.message(good).is_some());
    assert!(ledger.store.message(hidden).is_none());
}

#[tokio::test]
async fn test_update_rereads_the_message() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let handler = handler(&ledger, &world);
    let message = world.message("first");
    ledger.lifecycle().on_create(&message, false).await.unwrap();
    ledger.platform.set_live(edited(&message, "second", 3));

    let report = ingest(&handler, &[id_frame("MESSAGE_UPDATE", &world, message.id)]).await;

    assert_eq!(report.handled, 1);
    let edits = ledger.store.edits_of(message.id);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].raw_text, "second");
}

#[tokio::test]
async fn test_update_of_vanished_message_is_quiet() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let handler = handler(&ledger, &world);
    let message = world.message("short lived");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    let report = ingest(&handler, &[id_frame("MESSAGE_UPDATE", &world, message.id)]).await;

    assert_eq!(report.failed, 0);
    assert!(ledger.store.edits_of(message.id).is_empty());
}

#[tokio::test]
async fn test_repeated_delete_notifies_once() {
    let world = World::unique();
    let ledger = TestLedger::with_notices(world.community.id);
    let handler = handler(&ledger, &world);
    let message = world.message("regrettable");
    ledger.lifecycle().on_create(&message, false).await.unwrap();

    let delete = id_frame("MESSAGE_DELETE", &world, message.id);
    let report = ingest(&handler, &[delete.clone(), delete]).await;

    assert_eq!(report.handled, 2);
    assert_eq!(ledger.store.deletion_count(), 1);
    let notices = ledger.platform.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].1.contains("regrettable"));
}

#[tokio::test]
async fn test_direct_message_frames() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let handler = handler(&ledger, &world);
    let id = unique_id();

    let dm_create = frame(
        "MESSAGE_CREATE",
        json!({
            "id": id.to_string(),
            "channel_id": "77",
            "author": {"id": "50", "username": "friend"},
            "content": "psst",
            "timestamp": posted_at().to_rfc3339(),
        }),
    );
    let dm_delete = frame("MESSAGE_DELETE", json!({"id": id.to_string(), "channel_id": "77"}));

    let report = ingest(&handler, &[dm_create, dm_delete]).await;

    assert_eq!(report.handled, 2);
    assert!(ledger.store.message(id).is_none());
    assert_eq!(ledger.store.deletion_count(), 1);
}

#[tokio::test]
async fn test_in_flight_events_are_capped() {
    let ledger = TestLedger::new();
    let world = World::unique();
    let resolver = Arc::new(SlowResolver {
        inner: WorldResolver {
            origin: world_origin(&world),
        },
        running: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let handler = EventHandler::new(Arc::new(ledger.ctx.clone()), resolver.clone());
    let count = MAX_IN_FLIGHT_EVENTS * 3;
    let frames: Vec<String> = (0..count)
        .map(|i| create_frame(&world, world.channel.id, unique_id(), &format!("burst {i}")))
        .collect();

    let report = ingest(&handler, &frames).await;

    assert_eq!(report.handled, count);
    assert_eq!(ledger.store.message_count(), count);
    let peak = resolver.peak.load(Ordering::SeqCst);
    assert!(peak > 1, "events should overlap, peak was {peak}");
    assert!(peak <= MAX_IN_FLIGHT_EVENTS, "peak {peak} over the limit");
}
