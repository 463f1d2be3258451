//! Redis façade with a supervised keep-alive
//!
//! One multiplexed connection serves all commands. A background task pings
//! the server every two minutes so idle connections are not dropped by
//! managed Redis offerings; `close` cancels it through a watch token and
//! joins with a bounded timeout.

use crate::error::{Result, StorageError};
use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(120);
const RESUBSCRIBE_INTERVAL: Duration = Duration::from_secs(5);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A value read from or written to Redis.
///
/// Reads decode with a ladder: integer parse first, then JSON, then the raw
/// string.
#[derive(Debug, Clone, PartialEq)]
pub enum RedisValue {
    Integer(i64),
    Json(serde_json::Value),
    String(String),
}

impl RedisValue {
    /// Decodes a raw wire string.
    pub fn decode(raw: String) -> RedisValue {
        if let Ok(number) = raw.parse::<i64>() {
            return RedisValue::Integer(number);
        }

        if let Ok(value) = serde_json::from_str(&raw) {
            return RedisValue::Json(value);
        }

        RedisValue::String(raw)
    }

    /// Encodes the value for the wire.
    pub fn encode(&self) -> String {
        match self {
            RedisValue::Integer(number) => number.to_string(),
            RedisValue::Json(value) => value.to_string(),
            RedisValue::String(text) => text.clone(),
        }
    }
}

impl From<i64> for RedisValue {
    fn from(value: i64) -> Self {
        RedisValue::Integer(value)
    }
}

impl From<&str> for RedisValue {
    fn from(value: &str) -> Self {
        RedisValue::String(value.to_string())
    }
}

impl From<serde_json::Value> for RedisValue {
    fn from(value: serde_json::Value) -> Self {
        RedisValue::Json(value)
    }
}

/// A connected Redis client.
pub struct Redis {
    client: redis::Client,
    connection: MultiplexedConnection,
    shutdown: watch::Sender<bool>,
    keep_alive: JoinHandle<()>,
}

impl Redis {
    /// Connects to the server at `connection_string`.
    ///
    /// The string must use the `redis://` scheme. Connection refusal and
    /// authentication failure map to their own error variants so callers
    /// can report them distinctly.
    #[instrument(skip_all)]
    pub async fn connect(connection_string: &str) -> Result<Redis> {
        if !connection_string.starts_with("redis://") {
            return Err(StorageError::InvalidConnectionString);
        }

        info!("Connecting to Redis");

        let client = redis::Client::open(connection_string).map_err(classify_redis_error)?;

        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(classify_redis_error)?;

        let version = check_server_version(&mut connection).await?;

        info!(version = %version, "Connected to Redis");

        let (shutdown, shutdown_rx) = watch::channel(false);
        let keep_alive = spawn_keep_alive(connection.clone(), shutdown_rx);

        Ok(Redis {
            client,
            connection,
            shutdown,
            keep_alive,
        })
    }

    pub async fn get(&self, key: &str) -> Result<Option<RedisValue>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(key).await?;

        Ok(raw.map(RedisValue::decode))
    }

    /// Sets `key` to `value`, expiring after `expiry` seconds when given.
    pub async fn set(&self, key: &str, value: &RedisValue, expiry: Option<u64>) -> Result<()> {
        let mut connection = self.connection.clone();

        match expiry {
            Some(seconds) => {
                let _: () = connection.set_ex(key, value.encode(), seconds).await?;
            }
            None => {
                let _: () = connection.set(key, value.encode()).await?;
            }
        }

        Ok(())
    }

    /// Deletes `key`, returning the number of keys removed.
    pub async fn delete(&self, key: &str) -> Result<u64> {
        let mut connection = self.connection.clone();
        let removed: u64 = connection.del(key).await?;

        Ok(removed)
    }

    /// The remaining time to live of `key` in seconds.
    ///
    /// Follows the server convention: `-2` when the key does not exist and
    /// `-1` when it has no expiry.
    pub async fn ttl(&self, key: &str) -> Result<i64> {
        let mut connection = self.connection.clone();
        let ttl: i64 = connection.ttl(key).await?;

        Ok(ttl)
    }

    pub async fn llen(&self, key: &str) -> Result<u64> {
        let mut connection = self.connection.clone();
        let length: u64 = connection.llen(key).await?;

        Ok(length)
    }

    pub async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<RedisValue>> {
        let mut connection = self.connection.clone();
        let raw: Vec<String> = connection.lrange(key, start, stop).await?;

        Ok(raw.into_iter().map(RedisValue::decode).collect())
    }

    pub async fn lpop(&self, key: &str) -> Result<Option<RedisValue>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.lpop(key, None).await?;

        Ok(raw.map(RedisValue::decode))
    }

    /// Removes `count` occurrences of `element` from the list at `key`.
    pub async fn lrem(&self, key: &str, count: isize, element: &RedisValue) -> Result<u64> {
        let mut connection = self.connection.clone();
        let removed: u64 = connection.lrem(key, count, element.encode()).await?;

        Ok(removed)
    }

    /// Appends `values` to the list at `key`, returning the new length.
    pub async fn rpush(&self, key: &str, values: &[RedisValue]) -> Result<u64> {
        let mut connection = self.connection.clone();

        let encoded: Vec<String> = values.iter().map(RedisValue::encode).collect();
        let length: u64 = connection.rpush(key, encoded).await?;

        Ok(length)
    }

    /// Publishes `message` on `channel`, returning the receiver count.
    pub async fn publish(&self, channel: &str, message: &RedisValue) -> Result<u64> {
        let mut connection = self.connection.clone();
        let receivers: u64 = connection.publish(channel, message.encode()).await?;

        Ok(receivers)
    }

    /// Subscribes to `channel` on a dedicated pub/sub connection.
    pub async fn subscribe(&self, channel: &str) -> Result<Subscription> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(classify_redis_error)?;

        pubsub.subscribe(channel).await.map_err(classify_redis_error)?;

        Ok(Subscription { pubsub })
    }

    /// Subscribes to `channel`, retrying every five seconds while the
    /// server is unreachable.
    pub async fn resubscribe(&self, channel: &str) -> Result<Subscription> {
        loop {
            match self.subscribe(channel).await {
                Ok(subscription) => return Ok(subscription),
                Err(StorageError::ConnectionRefused) => {}
                Err(StorageError::Redis(error)) if error.is_io_error() || error.is_timeout() => {}
                Err(error) => return Err(error),
            }

            tokio::time::sleep(RESUBSCRIBE_INTERVAL).await;
        }
    }

    /// Drops every key in the selected database. Test support.
    pub async fn flushdb(&self) -> Result<()> {
        let mut connection = self.connection.clone();

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut connection)
            .await?;

        Ok(())
    }

    /// Stops the keep-alive task and releases the connection.
    pub async fn close(mut self) -> Result<()> {
        info!("Disconnecting from Redis");

        let _ = self.shutdown.send(true);

        if tokio::time::timeout(CLOSE_TIMEOUT, &mut self.keep_alive)
            .await
            .is_err()
        {
            self.keep_alive.abort();
        }

        Ok(())
    }
}

/// A pub/sub channel subscription.
///
/// Messages are pulled lazily; dropping the subscription abandons the
/// stream.
pub struct Subscription {
    pubsub: redis::aio::PubSub,
}

impl Subscription {
    /// Waits for the next message, decoded with the usual ladder.
    ///
    /// Returns `None` when the connection is gone.
    pub async fn next_message(&mut self) -> Result<Option<RedisValue>> {
        let message = match self.pubsub.on_message().next().await {
            Some(message) => message,
            None => return Ok(None),
        };

        let payload: String = message.get_payload()?;

        Ok(Some(RedisValue::decode(payload)))
    }
}

fn spawn_keep_alive(
    mut connection: MultiplexedConnection,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(KEEP_ALIVE_INTERVAL) => {
                    let ping: std::result::Result<String, redis::RedisError> =
                        redis::cmd("PING").query_async(&mut connection).await;

                    if let Err(error) = ping {
                        warn!(%error, "Redis keep-alive ping failed");
                    }
                }
                _ = shutdown.changed() => return,
            }
        }
    })
}

async fn check_server_version(connection: &mut MultiplexedConnection) -> Result<String> {
    let info: String = redis::cmd("INFO")
        .query_async(connection)
        .await
        .map_err(classify_redis_error)?;

    let version = info
        .lines()
        .find_map(|line| line.strip_prefix("redis_version:"))
        .unwrap_or("unknown")
        .trim()
        .to_string();

    Ok(version)
}

fn classify_redis_error(error: redis::RedisError) -> StorageError {
    if error.is_connection_refusal() {
        return StorageError::ConnectionRefused;
    }

    if error.kind() == redis::ErrorKind::AuthenticationFailed {
        return StorageError::AuthenticationFailed;
    }

    StorageError::Redis(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_integer() {
        assert_eq!(RedisValue::decode("21".to_string()), RedisValue::Integer(21));
        assert_eq!(RedisValue::decode("-3".to_string()), RedisValue::Integer(-3));
    }

    #[test]
    fn test_decode_json() {
        assert_eq!(
            RedisValue::decode(r#"{"id": "foo"}"#.to_string()),
            RedisValue::Json(json!({ "id": "foo" }))
        );

        assert_eq!(
            RedisValue::decode("true".to_string()),
            RedisValue::Json(json!(true))
        );
    }

    #[test]
    fn test_decode_string_fallback() {
        assert_eq!(
            RedisValue::decode("job_delete".to_string()),
            RedisValue::String("job_delete".to_string())
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for value in [
            RedisValue::Integer(9),
            RedisValue::Json(json!({ "deleted": ["foo", "bar"] })),
            RedisValue::String("not json".to_string()),
        ] {
            assert_eq!(RedisValue::decode(value.encode()), value);
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_scheme() {
        let result = Redis::connect("http://localhost:6379").await;

        assert!(matches!(result, Err(StorageError::InvalidConnectionString)));
    }
}
