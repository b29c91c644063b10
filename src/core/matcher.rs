use std::collections::HashSet;

use crate::models::{AvailableBuddy, HelpRequest, PushMessage};

/// Output of one matcher tick.
#[derive(Debug)]
pub struct TickReport {
    /// One message per eligible (request, buddy) pair, unordered.
    pub messages: Vec<PushMessage>,
    /// Ids of every request evaluated this tick, whether or not any buddy
    /// was eligible for it. The caller records these in the notified set.
    pub evaluated: Vec<i32>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.evaluated.is_empty()
    }
}

/// Compute the eligible (request, buddy) pairs for one tick.
///
/// A request is waiting if it has not been evaluated by a previous tick.
/// For each waiting request, every buddy gets one message unless the buddy
/// filed the request themselves or their push token fails validation.
///
/// The result is a pure function of the inputs: identical snapshots and
/// notified set produce the identical message set. A request with zero
/// eligible buddies is still reported as evaluated: it gets exactly one
/// notification round, matched or not.
pub fn evaluate(
    requests: &[HelpRequest],
    buddies: &[AvailableBuddy],
    notified: &HashSet<i32>,
    token_is_valid: impl Fn(&str) -> bool,
) -> TickReport {
    let waiting: Vec<&HelpRequest> = requests
        .iter()
        .filter(|request| !notified.contains(&request.request_id))
        .collect();

    let mut messages = Vec::new();
    let mut evaluated = Vec::with_capacity(waiting.len());

    for request in waiting {
        for buddy in buddies {
            // Skip the buddy who filed the request
            if buddy.requester_id == request.requester_id {
                continue;
            }

            if !token_is_valid(&buddy.push_token) {
                tracing::error!(
                    "Push token {} is not a valid Expo push token",
                    buddy.push_token
                );
                continue;
            }

            tracing::debug!(
                "Queueing push notification for {} on request {}",
                buddy.push_token,
                request.request_id
            );

            messages.push(PushMessage::for_request(
                buddy.push_token.clone(),
                request.clone(),
            ));
        }

        evaluated.push(request.request_id);
    }

    TickReport {
        messages,
        evaluated,
    }
}
