//! Messages service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::messages::{
        errors::MessagesServiceError,
        models::{Message, MessageUuid, NewMessage},
        repository::PgMessagesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgMessagesService {
    db: Db,
    repository: PgMessagesRepository,
}

impl PgMessagesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgMessagesRepository::new(),
        }
    }
}

#[async_trait]
impl MessagesService for PgMessagesService {
    async fn create_message(&self, message: NewMessage) -> Result<Message, MessagesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_message(&mut tx, message).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, MessagesServiceError> {
        let mut tx = self.db.begin().await?;

        let messages = self.repository.list_messages(&mut tx).await?;

        tx.commit().await?;

        Ok(messages)
    }

    async fn list_unread(&self) -> Result<Vec<Message>, MessagesServiceError> {
        let mut tx = self.db.begin().await?;

        let messages = self.repository.list_unread(&mut tx).await?;

        tx.commit().await?;

        Ok(messages)
    }

    async fn mark_read(&self, message: MessageUuid) -> Result<(), MessagesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.mark_read(&mut tx, message).await?;

        if rows_affected == 0 {
            return Err(MessagesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait MessagesService: Send + Sync {
    /// Records a customer contact message.
    async fn create_message(&self, message: NewMessage) -> Result<Message, MessagesServiceError>;

    /// Lists every message, newest first.
    async fn list_messages(&self) -> Result<Vec<Message>, MessagesServiceError>;

    /// Lists messages that have not been read yet.
    async fn list_unread(&self) -> Result<Vec<Message>, MessagesServiceError>;

    /// Marks a message as read; reading twice is `NotFound`.
    async fn mark_read(&self, message: MessageUuid) -> Result<(), MessagesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn unread_listing_shrinks_as_messages_are_read() -> TestResult {
        let ctx = TestContext::new().await;

        let message = ctx
            .messages
            .create_message(NewMessage {
                uuid: MessageUuid::new(),
                sender_name: "Ada".to_string(),
                sender_email: "ada@example.com".to_string(),
                body: "Where is my order?".to_string(),
            })
            .await?;

        assert_eq!(ctx.messages.list_unread().await?.len(), 1);

        ctx.messages.mark_read(message.uuid).await?;

        assert_eq!(ctx.messages.list_unread().await?.len(), 0);
        assert_eq!(ctx.messages.list_messages().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn marking_a_read_message_again_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let message = ctx
            .messages
            .create_message(NewMessage {
                uuid: MessageUuid::new(),
                sender_name: "Ada".to_string(),
                sender_email: "ada@example.com".to_string(),
                body: "Hello".to_string(),
            })
            .await?;

        ctx.messages.mark_read(message.uuid).await?;

        let result = ctx.messages.mark_read(message.uuid).await;

        assert!(
            matches!(result, Err(MessagesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
