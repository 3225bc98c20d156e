mod common;

use common::{Recorder, settle, tab_with_id, unique_name};

use tc_channel::{
    BroadcastHub, BroadcastMessage, Channel, ChannelError, EmitterOptions, ListenerOptions,
    MemberId, MemorySessionStore, SessionStore, TAB_ID_BYTES, TAB_ID_STORAGE_KEY, TabContext,
};

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

fn failing_listener(_: &u32) {
    panic!("listener failure");
}

#[test]
fn given_no_runtime_when_open_then_no_runtime_error() {
    let context = TabContext::new(BroadcastHub::default());

    let result = Channel::<u32>::open(&context, "x");

    assert!(matches!(result, Err(ChannelError::NoRuntime { .. })));
    assert_eq!(context.hub().channel_count(), 0);
}

#[tokio::test]
async fn given_fresh_context_when_open_then_tab_id_not_yet_created() {
    let store = MemorySessionStore::new();
    let context = TabContext::with_store(BroadcastHub::default(), Arc::new(store.clone()));

    let _channel = Channel::<u32>::open(&context, "lazy").unwrap();

    assert_eq!(store.get(TAB_ID_STORAGE_KEY), None);
}

#[tokio::test]
async fn given_one_context_when_many_channels_then_same_persisted_tab_id() {
    let store = MemorySessionStore::new();
    let context = TabContext::with_store(BroadcastHub::default(), Arc::new(store.clone()));
    let first = Channel::<u32>::open(&context, "a").unwrap();
    let second = Channel::<u32>::open(&context, "b").unwrap();

    let id = first.tab_id();

    assert_eq!(second.tab_id(), id);
    assert_eq!(first.tab_id(), id);
    assert_eq!(store.get(TAB_ID_STORAGE_KEY), Some(id.to_string()));
    assert_eq!(id.as_str().len(), TAB_ID_BYTES);
}

#[tokio::test]
async fn given_separate_contexts_when_tab_ids_resolved_then_each_uses_own_store() {
    let hub = BroadcastHub::default();
    let a = tab_with_id(&hub, "t1");
    let b = tab_with_id(&hub, "t2");

    assert_eq!(a.tab_id().as_str(), "t1");
    assert_eq!(b.tab_id().as_str(), "t2");
}

#[tokio::test]
async fn given_posting_when_first_post_then_tab_id_persisted() {
    let store = MemorySessionStore::new();
    let context = TabContext::with_store(BroadcastHub::default(), Arc::new(store.clone()));
    let channel = Channel::<u32>::open(&context, "x").unwrap();

    channel.post_data(1, EmitterOptions::default()).unwrap();

    assert!(store.get(TAB_ID_STORAGE_KEY).is_some());
}

#[tokio::test]
async fn given_two_channels_of_one_tab_when_opened_then_distinct_members_sharing_context() {
    let hub = BroadcastHub::default();
    let context = tab_with_id(&hub, "t1");
    let first = Channel::<u32>::open(&context, "x").unwrap();
    let second = Channel::<u32>::open(&context, "x").unwrap();

    assert_ne!(first.member_id(), second.member_id());
    assert_eq!(first.context().tab_id(), second.context().tab_id());
    assert_eq!(first.context().hub().subscriber_count(first.name()), 2);

    first.close();

    assert_eq!(second.context().hub().subscriber_count("x"), 1);
}

#[tokio::test]
async fn given_open_channels_when_closed_then_hub_membership_released() {
    let hub = BroadcastHub::default();
    let a = Channel::<u32>::open(&tab_with_id(&hub, "t1"), "x").unwrap();
    let b = Channel::<u32>::open(&tab_with_id(&hub, "t2"), "x").unwrap();
    assert_eq!(hub.subscriber_count("x"), 2);

    a.close();
    a.close();
    assert!(a.is_closed());
    assert_eq!(hub.subscriber_count("x"), 1);

    drop(b);
    assert_eq!(hub.channel_count(), 0);
}

#[tokio::test]
async fn given_closed_receiver_when_peer_posts_then_nothing_delivered() {
    let hub = BroadcastHub::default();
    let sender = Channel::<u32>::open(&tab_with_id(&hub, "t1"), "x").unwrap();
    let receiver = Channel::<u32>::open(&tab_with_id(&hub, "t2"), "x").unwrap();
    let received = Recorder::new();
    receiver.on_data(received.listener(), ListenerOptions::default());

    receiver.close();
    sender.post_data(1, EmitterOptions::default()).unwrap();
    settle().await;

    assert_eq!(received.count(), 0);
}

#[tokio::test]
async fn given_closed_sender_when_post_with_self_then_only_local_delivery() {
    let hub = BroadcastHub::default();
    let sender = Channel::<u32>::open(&tab_with_id(&hub, "t1"), "x").unwrap();
    let peer = Channel::<u32>::open(&tab_with_id(&hub, "t2"), "x").unwrap();
    let local = Recorder::new();
    let remote = Recorder::new();
    sender.on_data(local.listener(), ListenerOptions::default());
    peer.on_data(remote.listener(), ListenerOptions::default());

    sender.close();
    sender.post_data(5, EmitterOptions::include_self()).unwrap();
    settle().await;

    assert_eq!(local.received(), vec![5]);
    assert_eq!(remote.count(), 0);
}

#[tokio::test]
async fn given_malformed_message_when_received_then_dropped_and_receiving_continues() {
    let hub = BroadcastHub::default();
    let name = unique_name();
    let sender = Channel::<u32>::open(&tab_with_id(&hub, "t1"), name.as_str()).unwrap();
    let receiver = Channel::<u32>::open(&tab_with_id(&hub, "t2"), name.as_str()).unwrap();
    let received = Recorder::new();
    receiver.on_data(received.listener(), ListenerOptions::default());

    hub.broadcast(
        &name,
        BroadcastMessage::new(MemberId::new(), Bytes::from_static(b"not json")),
    );
    hub.broadcast(
        &name,
        BroadcastMessage::new(
            MemberId::new(),
            Bytes::from_static(br#"{"tabId":"t9","self":false,"data":"wrong type"}"#),
        ),
    );
    sender.post_data(3, EmitterOptions::default()).unwrap();
    settle().await;

    assert_eq!(received.received(), vec![3]);
}

#[tokio::test]
async fn given_panicking_listener_when_messages_arrive_then_other_listeners_keep_receiving() {
    let hub = BroadcastHub::default();
    let sender = Channel::<u32>::open(&tab_with_id(&hub, "t1"), "x").unwrap();
    let receiver = Channel::<u32>::open(&tab_with_id(&hub, "t2"), "x").unwrap();
    let received = Recorder::new();
    receiver.on_data(failing_listener, ListenerOptions::default());
    receiver.on_data(received.listener(), ListenerOptions::default());

    sender.post_data(1, EmitterOptions::default()).unwrap();
    sender.post_data(2, EmitterOptions::default()).unwrap();
    settle().await;

    assert_eq!(received.received(), vec![1, 2]);
}

#[tokio::test]
async fn given_unencodable_payload_when_posted_then_error_and_no_delivery() {
    let hub = BroadcastHub::default();
    let sender = Channel::<HashMap<Vec<u8>, u8>>::open(&tab_with_id(&hub, "t1"), "x").unwrap();
    let local = Recorder::new();
    sender.on_data(local.listener(), ListenerOptions::default());
    let mut data = HashMap::new();
    data.insert(vec![1u8], 1u8);

    let result = sender.post_data(data, EmitterOptions::include_self());

    assert!(matches!(result, Err(ChannelError::Encode { .. })));
    assert_eq!(local.count(), 0);
}

#[tokio::test]
async fn given_listener_that_posts_when_dispatched_then_no_deadlock() {
    let hub = BroadcastHub::default();
    let context = tab_with_id(&hub, "t1");
    let channel = Arc::new(Channel::<u32>::open(&context, "x").unwrap());
    let received = Recorder::new();
    channel.on_data(received.listener(), ListenerOptions::default());

    let weak = Arc::downgrade(&channel);
    channel.on_data(
        move |value: &u32| {
            if *value < 3
                && let Some(channel) = weak.upgrade()
            {
                channel
                    .post_data(value + 1, EmitterOptions::include_self())
                    .unwrap();
            }
        },
        ListenerOptions::default(),
    );

    channel
        .post_data(1, EmitterOptions::include_self())
        .unwrap();

    assert_eq!(received.received(), vec![1, 2, 3]);
}
