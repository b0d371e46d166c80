use hola_rust::api::dto::ChatListResponseDto;
use hola_rust::api::{ChatListPage, MessagePage, NewChatRequest};
use hola_rust::client::ClientError;
use hola_rust::test_utils::{
    candidate, chat_page, chat_summary, message, message_page, test_client_with_mocks,
};
use hola_rust::types::{ChatKind, MessageStatus, PageCursor};
use serde_json::json;
use std::time::Duration;

fn cursor(page: u32, total: u32, has_more: bool) -> PageCursor {
    PageCursor {
        page,
        per_page: 20,
        total,
        has_more,
    }
}

#[tokio::test]
async fn test_open_chat_loads_first_page() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(MessagePage {
            messages: vec![
                message("m-2", "chat-1", "user-2", 20),
                message("m-1", "chat-1", "user-2", 10),
            ],
            cursor: cursor(1, 2, false),
            other_user_profile: Some(candidate("user-2").profile),
        })
        .await;

    client.open_chat("chat-1", "Ana", "ana.png", true).await.unwrap();

    let store = client.chat_messages.read().await;
    assert_eq!(store.chat_id, "chat-1");
    assert_eq!(store.chat_name, "Ana");
    assert!(!store.loading);
    assert_eq!(store.ordered_ids(), ["m-1", "m-2"]);
    assert_eq!(store.other_profile.as_ref().unwrap().user_id, "user-2");
    drop(store);

    // The counterpart's profile went into the lookup cache on the way,
    // so this resolves without a scripted fetch.
    let profile = client.user_profile("user-2").await.unwrap();
    assert_eq!(profile.user_id, "user-2");
}

#[tokio::test]
async fn test_open_chat_failure_leaves_header_and_clears_loading() {
    let (client, _, _) = test_client_with_mocks("user-1");

    // Nothing scripted: the fetch fails while the identity fields were
    // already written synchronously.
    let err = client.open_chat("chat-1", "Ana", "", true).await.unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));

    let store = client.chat_messages.read().await;
    assert_eq!(store.chat_id, "chat-1");
    assert_eq!(store.chat_name, "Ana");
    assert!(!store.loading);
    assert_eq!(store.message_count(), 0);
}

#[tokio::test]
async fn test_close_chat_empties_cache() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(message_page(
            vec![message("m-1", "chat-1", "user-2", 10)],
            cursor(1, 1, false),
        ))
        .await;
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();
    client.close_chat().await;

    let store = client.chat_messages.read().await;
    assert!(store.chat_id.is_empty());
    assert_eq!(store.message_count(), 0);
}

#[tokio::test]
async fn test_stale_fetch_is_discarded_after_navigation() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    let gate = chat_api.gate_message_fetches().await;
    chat_api
        .queue_message_page(message_page(
            vec![message("m-a", "chat-1", "user-2", 10)],
            cursor(1, 1, false),
        ))
        .await;
    chat_api
        .queue_message_page(message_page(
            vec![message("m-b", "chat-2", "user-3", 10)],
            cursor(1, 1, false),
        ))
        .await;

    let first_open = tokio::spawn({
        let client = client.clone();
        async move { client.open_chat("chat-1", "Ana", "", true).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Navigate away while the first fetch is parked at the gate.
    client.close_chat().await;
    gate.notify_one();
    first_open.await.unwrap().unwrap();

    // Its page must not have been applied to the now-cleared cache.
    assert_eq!(client.chat_messages.read().await.message_count(), 0);

    gate.notify_one();
    client.open_chat("chat-2", "Luis", "", true).await.unwrap();
    let store = client.chat_messages.read().await;
    assert_eq!(store.chat_id, "chat-2");
    assert!(store.contains("m-b"));
    assert!(!store.contains("m-a"));
}

#[tokio::test]
async fn test_load_older_merges_previous_page() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(message_page(
            vec![
                message("m-3", "chat-1", "user-2", 30),
                message("m-4", "chat-1", "user-2", 40),
            ],
            cursor(1, 4, true),
        ))
        .await;
    chat_api
        .queue_message_page(message_page(
            vec![
                message("m-1", "chat-1", "user-2", 10),
                message("m-2", "chat-1", "user-2", 20),
            ],
            cursor(2, 4, false),
        ))
        .await;
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    let loaded = client.load_older_messages().await.unwrap();
    assert!(loaded);

    let store = client.chat_messages.read().await;
    assert_eq!(store.ordered_ids(), ["m-1", "m-2", "m-3", "m-4"]);
    assert_eq!(store.cursor.page, 2);
    assert!(!store.cursor.has_more);
}

#[tokio::test]
async fn test_history_page_after_navigation_is_discarded() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(message_page(
            vec![message("m-2", "chat-1", "user-2", 20)],
            cursor(1, 2, true),
        ))
        .await;
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    let gate = chat_api.gate_message_fetches().await;
    chat_api
        .queue_message_page(message_page(
            vec![message("m-1", "chat-1", "user-2", 10)],
            cursor(2, 2, false),
        ))
        .await;

    let pagination = tokio::spawn({
        let client = client.clone();
        async move { client.load_older_messages().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Navigate away while the history fetch is parked at the gate. The
    // page it comes back with belongs to a chat that is no longer open.
    client.close_chat().await;
    gate.notify_one();
    let loaded = pagination.await.unwrap().unwrap();
    assert!(!loaded);

    let store = client.chat_messages.read().await;
    assert!(store.chat_id.is_empty());
    assert_eq!(store.message_count(), 0);
    assert!(store.unread_ids().is_empty());
}

#[tokio::test]
async fn test_load_older_stops_at_last_page() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(message_page(
            vec![message("m-1", "chat-1", "user-2", 10)],
            cursor(1, 1, false),
        ))
        .await;
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    // has_more is false, so no further fetch happens and nothing errors.
    let loaded = client.load_older_messages().await.unwrap();
    assert!(!loaded);
}

#[tokio::test]
async fn test_concurrent_sync_is_rejected() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    let gate = chat_api.gate_chat_list_fetches().await;
    chat_api
        .queue_chat_page(chat_page(vec![chat_summary("chat-1", 100)], cursor(1, 1, false)))
        .await;

    let first = tokio::spawn({
        let client = client.clone();
        async move { client.sync_chat_list().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = client.sync_chat_list().await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadySyncing));

    gate.notify_one();
    first.await.unwrap().unwrap();
    assert_eq!(client.chat_list.read().await.len(), 1);

    // The guard is released once the first sync finished.
    chat_api
        .queue_chat_page(chat_page(vec![chat_summary("chat-1", 100)], cursor(1, 1, false)))
        .await;
    gate.notify_one();
    client.sync_chat_list().await.unwrap();
}

#[tokio::test]
async fn test_sync_accepts_wire_shaped_chat_page() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");

    // The page enters as the backend's loose JSON and crosses the dto
    // parse layer before the mock serves it, the way a real transport
    // implementation would feed the client.
    let response: ChatListResponseDto = serde_json::from_value(json!({
        "chats": [{
            "id": "chat-1",
            "name": "Ana",
            "type": "private",
            "lastMessageId": "m-5",
            "lastMessageContent": "hola",
            "lastMessageStatus": "sent",
            "lastMessageCreatedAt": "2026-08-20T18:30:00Z",
            "unreadedCount": "3",
            "participants": ["user-1", "user-2"]
        }],
        "page": 1, "perPage": 20, "total": 1, "hasMore": false
    }))
    .unwrap();
    chat_api
        .queue_chat_page(ChatListPage::try_from(response).unwrap())
        .await;

    client.sync_chat_list().await.unwrap();

    let list = client.chat_list.read().await;
    let chat = list.get("chat-1").unwrap();
    assert_eq!(chat.kind, ChatKind::Private);
    assert_eq!(chat.unreaded_count, 3);
    assert_eq!(chat.last_message_status, MessageStatus::Sent);
    assert_eq!(chat.participants, ["user-1", "user-2"]);
}

#[tokio::test]
async fn test_load_more_chats_appends_next_page() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_chat_page(chat_page(
            vec![chat_summary("chat-1", 100)],
            cursor(1, 2, true),
        ))
        .await;
    chat_api
        .queue_chat_page(chat_page(
            vec![chat_summary("chat-2", 50)],
            cursor(2, 2, false),
        ))
        .await;
    client.sync_chat_list().await.unwrap();

    let loaded = client.load_more_chats().await.unwrap();
    assert!(loaded);

    let list = client.chat_list.read().await;
    assert_eq!(list.len(), 2);
    assert!(list.contains("chat-1"));
    assert!(list.contains("chat-2"));
    assert!(!list.cursor.has_more);
    drop(list);

    let loaded = client.load_more_chats().await.unwrap();
    assert!(!loaded);
}

#[tokio::test]
async fn test_create_chat_inserts_server_summary() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api.queue_created_chat(chat_summary("chat-7", 70)).await;

    let chat = client
        .create_chat(NewChatRequest {
            kind: ChatKind::Private,
            name: None,
            description: None,
            image: None,
            participants: vec!["user-1".to_string(), "user-7".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(chat.chat_id, "chat-7");
    assert!(client.chat_list.read().await.contains("chat-7"));
}
