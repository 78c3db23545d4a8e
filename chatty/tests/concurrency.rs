use chatty::{
    Chat, DispatchMode, EarlyOutcome, EventExecutor, FinalizeOutcome, PlayerId, Sender, Target,
    config::{Correlation, Settings},
    testing::{RecordingAudience, StaticPermissions},
};
use std::{collections::HashSet, sync::Arc};

mod common;
use common::{Harness, TWO_CHATS};

fn sender(index: u128) -> Arc<Sender> {
    Arc::new(Sender::new(PlayerId(100 + index), format!("player{index}")))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_early_callbacks_pair_with_their_sender() {
    let harness = Harness::from_toml(TWO_CHATS);
    let senders: Vec<_> = (0..32).map(sender).collect();

    let mut tasks = Vec::new();
    for sender in &senders {
        let executor = Arc::clone(&harness.executor);
        let sender = Arc::clone(sender);
        tasks.push(tokio::spawn(async move {
            let message = format!("hello from {}", sender.name);
            let mut event = chatty::ChatEvent::new(sender, message, HashSet::new());
            let outcome = executor.on_chat(&mut event).await;
            (outcome, event)
        }));
    }

    let mut events = Vec::new();
    for task in tasks {
        let (outcome, event) = task.await.unwrap();
        assert_eq!(outcome, EarlyOutcome::Pending);
        events.push(event);
    }
    assert_eq!(harness.executor.pending().len(), senders.len());

    // Finalize in reverse order; every event must still get its own context.
    for mut event in events.into_iter().rev() {
        let expected = format!("{}: hello from {}", event.sender.name, event.sender.name);
        assert!(matches!(
            harness.executor.on_finalize(&mut event).await,
            FinalizeOutcome::Dispatched(_)
        ));
        assert_eq!(
            harness.audience.texts_for(Target::Console).last(),
            Some(&expected)
        );
    }
    assert!(harness.executor.pending().is_empty());
}

#[test]
fn fifo_correlation_pairs_in_arrival_order() {
    let audience = RecordingAudience::new();
    let executor = EventExecutor::builder(
        Arc::new(audience.clone()),
        Arc::new(StaticPermissions::new()),
    )
    .chats([Arc::new(Chat::new("local", "{player}: {message}"))])
    .settings(Settings {
        correlation: Correlation::Fifo,
        ..Settings::default()
    })
    .build()
    .unwrap();

    let mut first = chatty::ChatEvent::new(sender(1), "one", HashSet::new());
    let mut second = chatty::ChatEvent::new(sender(2), "two", HashSet::new());
    executor.on_chat_blocking(&mut first);
    executor.on_chat_blocking(&mut second);

    executor.on_finalize_blocking(&mut first);
    executor.on_finalize_blocking(&mut second);

    assert_eq!(
        audience.texts_for(Target::Console),
        vec!["player1: one", "player2: two"]
    );
}

#[test]
fn capacity_bounds_pending_contexts() {
    let executor = EventExecutor::builder(
        Arc::new(RecordingAudience::new()),
        Arc::new(StaticPermissions::new()),
    )
    .chats([Arc::new(Chat::new("local", "{player}: {message}"))])
    .settings(Settings {
        pending_capacity: Some(2),
        ..Settings::default()
    })
    .build()
    .unwrap();

    for index in 0..5 {
        let mut event = chatty::ChatEvent::new(sender(index), "hi", HashSet::new());
        executor.on_chat_blocking(&mut event);
    }

    assert_eq!(executor.pending().len(), 2);
    let mut oldest = chatty::ChatEvent::new(sender(0), "hi", HashSet::new());
    oldest.queued = true;
    assert_eq!(
        executor.on_finalize_blocking(&mut oldest),
        FinalizeOutcome::NoPending
    );
}

#[test]
fn fifo_finalize_of_unqueued_event_leaves_next_context() {
    let audience = RecordingAudience::new();
    let permissions = StaticPermissions::new();
    permissions.grant(PlayerId(102), Chat::new("staff", "{message}").permission());
    let executor = EventExecutor::builder(Arc::new(audience.clone()), Arc::new(permissions))
            .chats([Arc::new(
            Chat::new("staff", "{player}: {message}").with_permission_required(true),
        )])
        .settings(Settings {
            correlation: Correlation::Fifo,
            ..Settings::default()
        })
        .build()
        .unwrap();

    let mut rejected = chatty::ChatEvent::new(sender(1), "hello", HashSet::new());
    let mut accepted = chatty::ChatEvent::new(sender(2), "hello", HashSet::new());
    assert_eq!(
        executor.on_chat_blocking(&mut rejected),
        EarlyOutcome::ChatNotFound
    );
    assert_eq!(executor.on_chat_blocking(&mut accepted), EarlyOutcome::Pending);

    assert_eq!(
        executor.on_finalize_blocking(&mut rejected),
        FinalizeOutcome::NoPending
    );
    assert_eq!(executor.pending().len(), 1);

    assert_eq!(
        executor.on_finalize_blocking(&mut accepted),
        FinalizeOutcome::Dispatched(DispatchMode::Direct)
    );
    assert!(accepted.is_cancelled());
    assert_eq!(
        audience.texts_for(Target::Console),
        vec!["player2: hello"]
    );
}

#[test]
fn fifo_head_of_another_sender_is_not_consumed() {
    let audience = RecordingAudience::new();
    let executor = EventExecutor::builder(
        Arc::new(audience.clone()),
        Arc::new(StaticPermissions::new()),
    )
    .chats([Arc::new(Chat::new("local", "{player}: {message}"))])
    .settings(Settings {
        correlation: Correlation::Fifo,
        ..Settings::default()
    })
    .build()
    .unwrap();

    let mut first = chatty::ChatEvent::new(sender(1), "one", HashSet::new());
    let mut second = chatty::ChatEvent::new(sender(2), "two", HashSet::new());
    executor.on_chat_blocking(&mut first);
    executor.on_chat_blocking(&mut second);

    // Out-of-order finalize: the head belongs to player1.
    assert_eq!(
        executor.on_finalize_blocking(&mut second),
        FinalizeOutcome::NoPending
    );
    assert_eq!(executor.pending().len(), 2);
    assert_eq!(
        executor.on_finalize_blocking(&mut first),
        FinalizeOutcome::Dispatched(DispatchMode::Direct)
    );
    assert_eq!(audience.texts_for(Target::Console), vec!["player1: one"]);
}

#[test]
fn early_cancel_does_not_take_same_senders_next_context() {
    let harness = Harness::from_toml(
        r#"
        [moderation.caps]
        block = true
        "#,
    );
    let steve = sender(1);

    let mut shouted =
        chatty::ChatEvent::new(Arc::clone(&steve), "STOP SHOUTING", HashSet::new());
    let mut calm = chatty::ChatEvent::new(steve, "calm down", HashSet::new());
    assert_eq!(
        harness.executor.on_chat_blocking(&mut shouted),
        EarlyOutcome::Cancelled
    );
    assert_eq!(harness.executor.on_chat_blocking(&mut calm), EarlyOutcome::Pending);

    assert_eq!(
        harness.executor.on_finalize_blocking(&mut shouted),
        FinalizeOutcome::NoPending
    );
    assert_eq!(
        harness.executor.on_finalize_blocking(&mut calm),
        FinalizeOutcome::Dispatched(DispatchMode::Direct)
    );
    assert_eq!(
        harness.audience.texts_for(Target::Console),
        vec!["player1: calm down"]
    );
}
