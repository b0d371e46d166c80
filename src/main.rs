use chrono::{Local, Utc};
use clap::Parser;
use futures_util::stream;
use hola_rust::api::dto::{ChatListResponseDto, MessageListResponseDto, ProfileDto};
use hola_rust::api::{ChatListPage, MessagePage};
use hola_rust::store::FileStore;
use hola_rust::test_utils::{MockChatApi, MockProfileApi};
use hola_rust::types::{MessageKind, Presence, SwipeCandidate, UserProfile};
use hola_rust::{Client, ClientConfig};
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;

// Drives the client core through a full session against scripted
// backends: chat-list sync, opening a chat, an optimistic send, a burst
// of realtime frames, read receipts, swiping, and a cache snapshot.
//
// Usage:
//   cargo run
//   cargo run -- --data-dir /tmp/hola
//   cargo run -- --rollback-failed-sends --strict-last-message-ordering

#[derive(Parser)]
#[command(name = "hola-demo")]
#[command(about = "Hola client core demo against scripted backends")]
struct Cli {
    /// Directory for cache snapshots
    #[arg(short, long, default_value = "./hola_data")]
    data_dir: String,

    /// Chats and messages fetched per page
    #[arg(long, default_value_t = 20)]
    page_size: u32,

    /// Remove failed optimistic sends instead of leaving them in place
    #[arg(long)]
    rollback_failed_sends: bool,

    /// Drop chat-list patches older than the stored snapshot
    #[arg(long)]
    strict_last_message_ordering: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    rt.block_on(async {
        if let Err(e) = run(cli).await {
            error!(target: "Demo", "Demo run failed: {e}");
        }
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig {
        page_size: cli.page_size,
        rollback_failed_sends: cli.rollback_failed_sends,
        strict_last_message_ordering: cli.strict_last_message_ordering,
        ..Default::default()
    };

    let chat_api = Arc::new(MockChatApi::default());
    let profile_api = Arc::new(MockProfileApi::default());
    script_backends(&chat_api, &profile_api).await?;

    let client = Client::new("demo-user", chat_api.clone(), profile_api.clone(), config);

    // Tail the event bus so every cache mutation shows up in the log.
    let mut store_changes = client.event_bus.store_changed.subscribe();
    tokio::spawn(async move {
        while let Ok(change) = store_changes.recv().await {
            info!(target: "Demo", "Store changed: {:?}", change.store);
        }
    });
    let mut send_failures = client.event_bus.send_failed.subscribe();
    tokio::spawn(async move {
        while let Ok(failure) = send_failures.recv().await {
            warn!(
                target: "Demo",
                "Send {} in chat {} failed (rolled back: {})",
                failure.message_id, failure.chat_id, failure.rolled_back
            );
        }
    });

    client.load_my_profile().await?;
    client.set_presence(Presence::Available).await?;

    client.sync_chat_list().await?;
    for chat in client.chat_list.read().await.sorted_chats() {
        info!(
            target: "Demo",
            "Chat '{}': {} ({} unread)",
            chat.name, chat.last_message_content, chat.unreaded_count
        );
    }

    client.open_chat("chat-1", "Ana", "", true).await?;
    let temp_id = client
        .send_message("chat-1", Some("hola, que tal?".to_string()), MessageKind::Text)
        .await?;
    info!(target: "Demo", "Optimistic send stored as {temp_id}");

    // A realtime burst: the counterpart answers, types, and one frame of
    // an unrecognized kind gets discarded on arrival.
    let frames = vec![
        (
            "newMessage".to_string(),
            json!({
                "id": "srv-10",
                "chatId": "chat-1",
                "senderId": "user-2",
                "content": "todo bien!",
                "type": "text",
                "createdAt": Utc::now(),
            }),
        ),
        (
            "typing".to_string(),
            json!({
                "chatId": "chat-1",
                "userId": "user-2",
                "isTyping": false,
                "updatedAt": Utc::now(),
            }),
        ),
        ("matchFound".to_string(), json!({ "userId": "user-9" })),
    ];
    client.drive_events(stream::iter(frames)).await;

    client.mark_all_messages_read().await?;
    client.close_chat().await;

    // Deck of two, one accepted swipe, then a rejected one that restores
    // the consumed candidate to the head.
    let loaded = client.load_swipeable_profiles(25.0).await?;
    info!(target: "Demo", "Swipe deck loaded with {loaded} candidates");
    let head = client.swipe_queue.read().await.current().cloned();
    if let Some(head) = head {
        client.swipe(&head.profile.user_id, true, None).await?;
    }
    profile_api.reject_swipes.store(true, Ordering::SeqCst);
    let head = client.swipe_queue.read().await.current().cloned();
    if let Some(head) = head {
        if let Err(e) = client.swipe(&head.profile.user_id, false, None).await {
            info!(target: "Demo", "Swipe rejected as scripted: {e}");
        }
    }
    info!(
        target: "Demo",
        "Deck length after restore: {}",
        client.swipe_queue.read().await.len()
    );

    let file_store = FileStore::new(&cli.data_dir).await?;
    client.save_snapshot(&file_store).await?;
    info!(target: "Demo", "Snapshot written to {}", cli.data_dir);

    Ok(())
}

// The fixtures are written as the wire JSON a real transport would
// receive and go through the dto parse layer on their way into the
// mocks, quirks included: a snake_case chat id, an unread counter
// arriving as a string.
async fn script_backends(
    chat_api: &MockChatApi,
    profile_api: &MockProfileApi,
) -> anyhow::Result<()> {
    let chat_list: ChatListResponseDto = serde_json::from_value(json!({
        "chats": [
            {
                "id": "chat-1",
                "name": "Ana",
                "type": "private",
                "lastMessageId": "m-2",
                "lastMessageContent": "nos vemos?",
                "lastMessageStatus": "sent",
                "lastMessageCreatedAt": "2026-08-20T18:30:00Z",
                "unreadedCount": "2",
                "participants": ["demo-user", "user-2"]
            },
            {
                "id": "chat-2",
                "name": "Luis",
                "type": "private",
                "lastMessageId": "m-9",
                "lastMessageContent": "jajaja",
                "lastMessageStatus": "read",
                "lastMessageCreatedAt": "2026-08-19T09:12:00Z",
                "unreadedCount": 0,
                "participants": ["demo-user", "user-3"]
            }
        ],
        "page": 1, "perPage": 20, "total": 2, "hasMore": false
    }))?;
    chat_api
        .queue_chat_page(ChatListPage::try_from(chat_list)?)
        .await;

    let messages: MessageListResponseDto = serde_json::from_value(json!({
        "messages": [
            {
                "id": "m-1",
                "chatId": "chat-1",
                "senderId": "user-2",
                "content": "hola!",
                "type": "text",
                "createdAt": "2026-08-20T18:29:00Z"
            },
            {
                "id": "m-2",
                "chat_id": "chat-1",
                "senderId": "demo-user",
                "content": "nos vemos?",
                "type": "text",
                "createdAt": "2026-08-20T18:30:00Z"
            }
        ],
        "page": 1, "perPage": 20, "total": 2, "hasMore": false,
        "otherUserProfile": {"id": "user-2", "alias": "ana", "name": "Ana", "age": 27}
    }))?;
    chat_api
        .queue_message_page(MessagePage::try_from(messages)?)
        .await;

    let me: ProfileDto = serde_json::from_value(json!({
        "id": "demo-user", "alias": "demo", "name": "Demo User", "age": 29
    }))?;
    profile_api.put_profile(UserProfile::try_from(me)?).await;

    let deck: Vec<ProfileDto> = serde_json::from_value(json!([
        {"id": "user-7", "alias": "sol", "name": "Sol", "age": 26, "distance": 3.2},
        {"id": "user-8", "alias": "mar", "name": "Mar", "age": 31, "distance": 7.8}
    ]))?;
    let deck = deck
        .into_iter()
        .map(SwipeCandidate::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    profile_api.queue_candidates(deck).await;

    Ok(())
}
