use crate::error::{AppError, Result};
use crate::models::{Message, NewMessage};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str =
    "id, recipient_name, message, contact_method, contact_value, created_at, fulfilled";

/// Operations the submission form and the admin panel need from persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(&self, input: &NewMessage) -> Result<Message>;

    /// Every message, newest first.
    async fn list_messages(&self) -> Result<Vec<Message>>;

    /// Sets the fulfillment flag and returns the row as stored afterwards.
    async fn set_fulfilled(&self, id: &str, fulfilled: bool) -> Result<Message>;
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    initialized: Arc<AtomicBool>,
    op_timeout: Duration,
}

impl Database {
    /// Connections are opened on first use, so an unreachable store shows up as
    /// a failed operation rather than a failed start.
    pub fn new(database_url: &str, max_connections: u32, op_timeout: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(op_timeout)
            .connect_lazy_with(options);
        Ok(Self::from_pool(pool, op_timeout))
    }

    pub fn from_pool(pool: SqlitePool, op_timeout: Duration) -> Self {
        Self {
            pool,
            initialized: Arc::new(AtomicBool::new(false)),
            op_timeout,
        }
    }

    /// Creates the messages table the first time any handle sharing this flag
    /// touches the store. Concurrent first calls may both run the DDL, which is
    /// harmless because it is `IF NOT EXISTS`.
    pub async fn ensure_initialized(&self) -> Result<()> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        let schema = include_str!("../schema.sql");
        self.timed(sqlx::query(schema).execute(&self.pool)).await?;
        self.initialized.store(true, Ordering::Release);
        debug!("messages table ready");
        Ok(())
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(res) => res.map_err(|e| {
                warn!("store call failed: {}", e);
                AppError::from(e)
            }),
            Err(_) => {
                warn!("store call timed out after {:?}", self.op_timeout);
                Err(AppError::StoreUnavailable("timed out".to_string()))
            }
        }
    }
}

#[async_trait]
impl MessageStore for Database {
    async fn create_message(&self, input: &NewMessage) -> Result<Message> {
        let input = input.validated()?;
        self.ensure_initialized().await?;

        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO messages (id, recipient_name, message, contact_method, contact_value, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message = self
            .timed(
                sqlx::query_as::<_, Message>(&sql)
                    .bind(&id)
                    .bind(&input.recipient_name)
                    .bind(&input.message)
                    .bind(input.contact_method)
                    .bind(&input.contact_value)
                    .bind(Utc::now())
                    .fetch_one(&self.pool),
            )
            .await?;

        debug!("created message {} via {}", message.id, message.contact_method);
        Ok(message)
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        self.ensure_initialized().await?;

        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at DESC, rowid DESC");
        let messages = self
            .timed(sqlx::query_as::<_, Message>(&sql).fetch_all(&self.pool))
            .await?;

        debug!("listed {} messages", messages.len());
        Ok(messages)
    }

    async fn set_fulfilled(&self, id: &str, fulfilled: bool) -> Result<Message> {
        self.ensure_initialized().await?;

        let sql = format!("UPDATE messages SET fulfilled = ? WHERE id = ? RETURNING {MESSAGE_COLUMNS}");
        let row = self
            .timed(
                sqlx::query_as::<_, Message>(&sql)
                    .bind(fulfilled)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(message) => {
                debug!("message {} fulfilled={}", id, message.fulfilled);
                Ok(message)
            }
            None => Err(AppError::NotFound(id.to_string())),
        }
    }
}
