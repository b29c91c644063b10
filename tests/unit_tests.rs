// Unit tests for Buddy Dispatch

use std::collections::HashSet;

use buddy_dispatch::core::matcher;
use buddy_dispatch::models::{AvailableBuddy, HelpRequest};
use buddy_dispatch::services::expo::{is_expo_push_token, ExpoClient, PUSH_CHUNK_LIMIT};
use buddy_dispatch::services::PushProvider;
use buddy_dispatch::PushMessage;
use chrono::Utc;

fn make_buddy(buddy_id: i32, requester_id: i32, token: &str) -> AvailableBuddy {
    AvailableBuddy {
        buddy_id,
        requester_id,
        push_token: token.to_string(),
    }
}

fn make_request(request_id: i32, requester_id: i32) -> HelpRequest {
    HelpRequest {
        request_id,
        requester_id,
        meeting_point: "Clock tower".to_string(),
        destination: "Dormitory B".to_string(),
        urgent: true,
        created_at: Utc::now(),
    }
}

#[test]
fn test_waiting_set_excludes_notified_requests() {
    let buddies = vec![make_buddy(1, 10, "ExponentPushToken[a]")];
    let requests = vec![make_request(1, 20), make_request(2, 20), make_request(3, 20)];
    let notified: HashSet<i32> = [1, 3].into_iter().collect();

    let report = matcher::evaluate(&requests, &buddies, &notified, is_expo_push_token);

    assert_eq!(report.evaluated, vec![2]);
    assert_eq!(report.messages.len(), 1);
    assert_eq!(report.messages[0].request_id(), 2);
}

#[test]
fn test_every_eligible_buddy_gets_one_message() {
    let buddies = vec![
        make_buddy(1, 10, "ExponentPushToken[a]"),
        make_buddy(2, 11, "ExponentPushToken[b]"),
        make_buddy(3, 20, "ExponentPushToken[c]"), // the requester themself
        make_buddy(4, 12, "garbage"),              // invalid token
    ];
    let requests = vec![make_request(50, 20)];

    let report = matcher::evaluate(&requests, &buddies, &HashSet::new(), is_expo_push_token);

    let recipients: Vec<&str> = report.messages.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(
        recipients,
        vec!["ExponentPushToken[a]", "ExponentPushToken[b]"]
    );
}

#[test]
fn test_message_carries_the_request_payload() {
    let buddies = vec![make_buddy(1, 10, "ExponentPushToken[a]")];
    let requests = vec![make_request(77, 20)];

    let report = matcher::evaluate(&requests, &buddies, &HashSet::new(), is_expo_push_token);

    assert_eq!(report.messages[0].data.request, requests[0]);
    assert_eq!(report.messages[0].title, "Someone could use a Buddy");
    assert_eq!(report.messages[0].sound, "default");
}

#[test]
fn test_token_validation_rejects_foreign_formats() {
    assert!(is_expo_push_token("ExponentPushToken[device-a]"));
    assert!(is_expo_push_token("ExpoPushToken[device-b]"));

    assert!(!is_expo_push_token("apns-raw-token"));
    assert!(!is_expo_push_token("FCMToken[device-c]"));
    assert!(!is_expo_push_token("ExponentPushToken"));
    assert!(!is_expo_push_token("ExponentPushToken[]"));
}

#[test]
fn test_chunk_bounds_and_round_trip() {
    let client = ExpoClient::default();
    let messages: Vec<PushMessage> = (0..251)
        .map(|i| {
            PushMessage::for_request(format!("ExponentPushToken[{}]", i), make_request(i, 1))
        })
        .collect();

    let chunks = client.chunk(messages.clone());

    assert_eq!(
        chunks.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![PUSH_CHUNK_LIMIT, PUSH_CHUNK_LIMIT, 51]
    );

    let flattened: Vec<PushMessage> = chunks.into_iter().flatten().collect();
    assert_eq!(flattened, messages);
}
