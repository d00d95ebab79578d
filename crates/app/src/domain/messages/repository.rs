//! Messages Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::messages::models::{Message, MessageUuid, NewMessage};

const LIST_MESSAGES_SQL: &str = include_str!("sql/list_messages.sql");
const LIST_UNREAD_SQL: &str = include_str!("sql/list_unread.sql");
const CREATE_MESSAGE_SQL: &str = include_str!("sql/create_message.sql");
const MARK_READ_SQL: &str = include_str!("sql/mark_read.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMessagesRepository;

impl PgMessagesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_messages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Message>, sqlx::Error> {
        query_as::<Postgres, Message>(LIST_MESSAGES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_unread(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Message>, sqlx::Error> {
        query_as::<Postgres, Message>(LIST_UNREAD_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_message(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        message: NewMessage,
    ) -> Result<Message, sqlx::Error> {
        query_as::<Postgres, Message>(CREATE_MESSAGE_SQL)
            .bind(message.uuid.into_uuid())
            .bind(&message.sender_name)
            .bind(&message.sender_email)
            .bind(&message.body)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        message: MessageUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_READ_SQL)
            .bind(message.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Message {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MessageUuid::from_uuid(row.try_get("uuid")?),
            sender_name: row.try_get("sender_name")?,
            sender_email: row.try_get("sender_email")?,
            body: row.try_get("body")?,
            read_at: row
                .try_get::<Option<SqlxTimestamp>, _>("read_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
