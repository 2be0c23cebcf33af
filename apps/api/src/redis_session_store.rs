use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tower_sessions::SessionStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{Error, Result};

/// Keeps portal sessions in Redis as JSON under `{prefix}:{id}`, expiring
/// together with the session cookie.
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, session_id: &Id) -> String {
        format!("{}:{session_id}", self.key_prefix)
    }

    async fn connect(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)
    }
}

/// Seconds the record has left, or `None` once it is already past expiry.
fn remaining_ttl(record: &Record, now_unix: i64) -> Option<u64> {
    u64::try_from(record.expiry_date.unix_timestamp() - now_unix)
        .ok()
        .filter(|seconds| *seconds > 0)
}

fn backend(error: redis::RedisError) -> Error {
    Error::Backend(format!("redis session store: {error}"))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, record: &Record) -> Result<()> {
        let key = self.key_for(&record.id);
        let mut connection = self.connect().await?;

        let Some(ttl) = remaining_ttl(record, Utc::now().timestamp()) else {
            return connection.del::<_, ()>(key).await.map_err(backend);
        };

        let json = serde_json::to_vec(record).map_err(|error| Error::Encode(error.to_string()))?;
        connection
            .set_ex::<_, _, ()>(key, json, ttl)
            .await
            .map_err(backend)
    }

    async fn load(&self, session_id: &Id) -> Result<Option<Record>> {
        let mut connection = self.connect().await?;
        let stored: Option<Vec<u8>> = connection
            .get(self.key_for(session_id))
            .await
            .map_err(backend)?;

        stored
            .map(|json| {
                serde_json::from_slice(&json).map_err(|error| Error::Decode(error.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> Result<()> {
        let mut connection = self.connect().await?;
        connection
            .del::<_, ()>(self.key_for(session_id))
            .await
            .map_err(backend)
    }
}
