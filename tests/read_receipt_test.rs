use hola_rust::client::ClientError;
use hola_rust::test_utils::{
    chat_page, chat_summary, message, message_page, test_client_with_mocks,
};
use hola_rust::types::PageCursor;
use std::sync::atomic::Ordering;

fn page_1(total: u32) -> PageCursor {
    PageCursor {
        page: 1,
        per_page: 20,
        total,
        has_more: false,
    }
}

#[tokio::test]
async fn test_mark_read_clears_both_caches() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    let mut chat = chat_summary("chat-1", 100);
    chat.unreaded_count = 2;
    chat_api.queue_chat_page(chat_page(vec![chat], page_1(1))).await;
    chat_api
        .queue_message_page(message_page(
            vec![
                message("m-1", "chat-1", "user-2", 10),
                message("m-2", "chat-1", "user-2", 20),
            ],
            page_1(2),
        ))
        .await;
    client.sync_chat_list().await.unwrap();
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    client.mark_all_messages_read().await.unwrap();

    let messages = client.chat_messages.read().await;
    assert!(messages.unread_ids().is_empty());
    assert!(messages.ordered_messages().iter().all(|m| m.readed));
    drop(messages);
    assert_eq!(client.chat_list.read().await.get("chat-1").unwrap().unreaded_count, 0);
    assert_eq!(chat_api.marked_read.lock().await.as_slice(), ["chat-1"]);
}

#[tokio::test]
async fn test_failed_mark_read_restores_both_caches() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    let mut chat = chat_summary("chat-1", 100);
    chat.unreaded_count = 5;
    chat_api.queue_chat_page(chat_page(vec![chat], page_1(1))).await;
    chat_api
        .queue_message_page(message_page(
            (1..=5)
                .map(|i| message(&format!("m-{i}"), "chat-1", "user-2", i * 10))
                .collect(),
            page_1(5),
        ))
        .await;
    client.sync_chat_list().await.unwrap();
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    let mut reverts = client.event_bus.read_receipts_reverted.subscribe();
    chat_api.reject_mark_read.store(true, Ordering::SeqCst);

    let err = client.mark_all_messages_read().await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected("mark-read")));

    let revert = reverts.recv().await.unwrap();
    assert_eq!(revert.chat_id, "chat-1");
    assert_eq!(revert.reverted, 5);

    // Both caches back at their pre-call state.
    let messages = client.chat_messages.read().await;
    assert_eq!(messages.unread_ids().len(), 5);
    assert!(messages.ordered_messages().iter().all(|m| !m.readed));
    drop(messages);
    assert_eq!(client.chat_list.read().await.get("chat-1").unwrap().unreaded_count, 5);
}

#[tokio::test]
async fn test_mark_read_requires_open_chat() {
    let (client, _, _) = test_client_with_mocks("user-1");
    let err = client.mark_all_messages_read().await.unwrap_err();
    assert!(matches!(err, ClientError::NoChatOpen));
}

#[tokio::test]
async fn test_mark_read_with_nothing_unread_skips_network() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    chat_api
        .queue_message_page(message_page(vec![], page_1(0)))
        .await;
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    client.mark_all_messages_read().await.unwrap();
    assert!(chat_api.marked_read.lock().await.is_empty());
}

#[tokio::test]
async fn test_mark_read_round_trip_is_identity() {
    let (client, chat_api, _) = test_client_with_mocks("user-1");
    let mut chat = chat_summary("chat-1", 100);
    chat.unreaded_count = 3;
    chat_api.queue_chat_page(chat_page(vec![chat], page_1(1))).await;
    chat_api
        .queue_message_page(message_page(
            vec![
                message("m-1", "chat-1", "user-2", 10),
                message("m-2", "chat-1", "user-2", 20),
                message("m-3", "chat-1", "user-2", 30),
            ],
            page_1(3),
        ))
        .await;
    client.sync_chat_list().await.unwrap();
    client.open_chat("chat-1", "Ana", "", true).await.unwrap();

    let before: Vec<String> = client
        .chat_messages
        .read()
        .await
        .unread_ids()
        .to_vec();

    chat_api.reject_mark_read.store(true, Ordering::SeqCst);
    let _ = client.mark_all_messages_read().await;

    let after: Vec<String> = client
        .chat_messages
        .read()
        .await
        .unread_ids()
        .to_vec();
    let mut before_sorted = before;
    let mut after_sorted = after;
    before_sorted.sort();
    after_sorted.sort();
    assert_eq!(before_sorted, after_sorted);
}
