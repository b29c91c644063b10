// Model exports
pub mod domain;

pub use domain::{AvailableBuddy, HelpRequest, MessageData, PushMessage, PushTicket, TicketStatus};
