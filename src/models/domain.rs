use serde::{Deserialize, Serialize};

/// A buddy currently able to receive push notifications.
///
/// Produced by the buddy snapshot refresh: one row per buddy whose device
/// has registered a non-null Expo push token. The token is opaque and may
/// be syntactically invalid; it is validated at match time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableBuddy {
    pub buddy_id: i32,
    /// The buddy's own requester row, used to exclude self-matches.
    pub requester_id: i32,
    pub push_token: String,
}

/// An unfulfilled assistance request.
///
/// Created and resolved by the CRUD backend; the dispatcher only ever sees
/// requests that are still unfulfilled and observes fulfillment or
/// cancellation as disappearance from the next snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelpRequest {
    pub request_id: i32,
    pub requester_id: i32,
    pub meeting_point: String,
    pub destination: String,
    pub urgent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single outbound push notification in the Expo wire format.
///
/// Ephemeral: produced by one matcher tick and consumed by the dispatcher
/// in the same cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PushMessage {
    pub to: String,
    pub sound: String,
    pub title: String,
    pub data: MessageData,
}

/// Notification payload; the full request rides along so the app can render
/// it without a round trip.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessageData {
    pub request: HelpRequest,
}

impl PushMessage {
    /// Build the "request waiting to be fulfilled" notification for one
    /// recipient token.
    pub fn for_request(recipient: impl Into<String>, request: HelpRequest) -> Self {
        Self {
            to: recipient.into(),
            sound: "default".to_string(),
            title: "Someone could use a Buddy".to_string(),
            data: MessageData { request },
        }
    }

    pub fn request_id(&self) -> i32 {
        self.data.request.request_id
    }
}

/// Delivery ticket returned by the push gateway, one per submitted message.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PushTicket {
    #[serde(default)]
    pub id: Option<String>,
    pub status: TicketStatus,
    /// Provider error description, present on error tickets.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Ok,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_request() -> HelpRequest {
        HelpRequest {
            request_id: 7,
            requester_id: 3,
            meeting_point: "Main library".to_string(),
            destination: "Chemistry building".to_string(),
            urgent: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_message_wire_shape() {
        let message = PushMessage::for_request("ExponentPushToken[abc]", sample_request());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["to"], "ExponentPushToken[abc]");
        assert_eq!(json["sound"], "default");
        assert_eq!(json["title"], "Someone could use a Buddy");
        assert_eq!(json["data"]["request"]["request_id"], 7);
    }

    #[test]
    fn test_ticket_parsing() {
        let ok: PushTicket =
            serde_json::from_str(r#"{"status":"ok","id":"0f8f-41aa"}"#).unwrap();
        assert_eq!(ok.status, TicketStatus::Ok);
        assert_eq!(ok.id.as_deref(), Some("0f8f-41aa"));

        let err: PushTicket =
            serde_json::from_str(r#"{"status":"error","message":"DeviceNotRegistered"}"#).unwrap();
        assert_eq!(err.status, TicketStatus::Error);
        assert!(err.id.is_none());
        assert_eq!(err.message.as_deref(), Some("DeviceNotRegistered"));
    }
}
