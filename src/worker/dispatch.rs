use tracing::{error, info};

use crate::models::{PushMessage, TicketStatus};
use crate::services::PushProvider;

/// Submit one matcher tick's messages to the push gateway.
///
/// Messages are partitioned into provider-sized chunks and the chunks are
/// submitted strictly sequentially: the next chunk is not sent until the
/// previous chunk's tickets have come back. Tickets are logged and dropped;
/// no retry, no requeue, nothing awaits the outcome. Returns the number
/// of tickets received.
pub async fn dispatch_messages<P>(provider: &P, messages: Vec<PushMessage>) -> usize
where
    P: PushProvider + ?Sized,
{
    if messages.is_empty() {
        return 0;
    }

    let chunks = provider.chunk(messages);
    let mut received = 0;

    for chunk in chunks {
        match provider.send(&chunk).await {
            Ok(tickets) => {
                for ticket in &tickets {
                    match ticket.status {
                        TicketStatus::Ok => {
                            if let Some(id) = &ticket.id {
                                info!("Got ticket ID: {} with status ok", id);
                            }
                        }
                        TicketStatus::Error => error!(
                            "Push ticket error: {}",
                            ticket.message.as_deref().unwrap_or("unknown")
                        ),
                    }
                }
                received += tickets.len();
            }
            // A failed chunk is logged and abandoned; later chunks still go out.
            Err(e) => error!("Push batch submission failed: {}", e),
        }
    }

    received
}
