//! Performance benchmarks for the chat core.

use confab::{
    ChatService, ChatStore, ContentType, ConversationId, CreateConversationInput, MemoryStore,
    Message, MessageId, RegistryConfig, SendMessageInput, SubscriptionRegistry, User, UserId,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn seed_user(store: &MemoryStore, id: &str) -> UserId {
    let user = User {
        id: UserId::from(id),
        email: format!("{id}@example.com"),
        password: "secret".to_string(),
        username: id.to_string(),
        display_name: id.to_uppercase(),
        profile_picture: None,
    };
    store.create_user(&user).unwrap();
    user.id
}

fn sample_message(conversation: &ConversationId) -> Message {
    Message {
        id: MessageId::from("m-0"),
        sender_id: UserId::from("bench"),
        conversation_id: conversation.clone(),
        content: "benchmark payload".to_string(),
        content_type: ContentType::Text,
    }
}

/// Benchmark fan-out with varying subscriber counts
fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");

    for subscribers in [1, 8, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &count| {
                let registry =
                    SubscriptionRegistry::with_config(RegistryConfig { buffer_size: 4 });
                let conversation = ConversationId::from("bench");

                let subscriptions: Vec<_> = (0..count)
                    .map(|_| registry.subscribe(&conversation))
                    .collect();

                let message = sample_message(&conversation);

                // Publish then drain every queue so buffers stay empty
                // across iterations.
                b.iter(|| {
                    registry.publish(&conversation, black_box(&message));
                    for (stream, _cancel) in &subscriptions {
                        black_box(stream.try_recv().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark subscribe/cancel churn
fn bench_subscribe_cancel(c: &mut Criterion) {
    let registry = SubscriptionRegistry::new();
    let conversation = ConversationId::from("churn");

    c.bench_function("subscribe_cancel", |b| {
        b.iter(|| {
            let (stream, cancel) = registry.subscribe(&conversation);
            cancel.cancel();
            black_box(stream);
        });
    });
}

/// Benchmark the persist path of send_message without live subscribers
fn bench_send_message(c: &mut Criterion) {
    let store = Arc::new(MemoryStore::new());
    let chat = ChatService::new(store.clone());
    let sender = seed_user(&store, "bench");
    let room = chat
        .create_conversation(
            &sender,
            CreateConversationInput {
                title: "Bench".to_string(),
                member_ids: vec![],
            },
        )
        .unwrap()
        .id;

    c.bench_function("send_message_persist", |b| {
        b.iter(|| {
            black_box(
                chat.send_message(SendMessageInput::text(
                    sender.clone(),
                    room.clone(),
                    "benchmark payload",
                ))
                .unwrap(),
            );
        });
    });
}

/// Benchmark conversation fetch with varying history sizes
fn bench_history_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_fetch");

    for history in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("messages", history),
            &history,
            |b, &size| {
                let store = Arc::new(MemoryStore::new());
                let chat = ChatService::new(store.clone());
                let sender = seed_user(&store, "bench");
                let room = chat
                    .create_conversation(
                        &sender,
                        CreateConversationInput {
                            title: "History".to_string(),
                            member_ids: vec![],
                        },
                    )
                    .unwrap()
                    .id;

                for i in 0..size {
                    chat.send_message(SendMessageInput::text(
                        sender.clone(),
                        room.clone(),
                        format!("msg {i}"),
                    ))
                    .unwrap();
                }

                b.iter(|| {
                    black_box(chat.get_conversation(&room).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fanout,
    bench_subscribe_cancel,
    bench_send_message,
    bench_history_fetch,
);

criterion_main!(benches);
