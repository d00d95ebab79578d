//! Message Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Message UUID
pub type MessageUuid = TypedUuid<Message>;

/// Customer contact message, triaged by the back office.
#[derive(Debug, Clone)]
pub struct Message {
    pub uuid: MessageUuid,
    pub sender_name: String,
    pub sender_email: String,
    pub body: String,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// New Message Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub uuid: MessageUuid,
    pub sender_name: String,
    pub sender_email: String,
    pub body: String,
}
