//! Redis-backed `CacheBackend`.
//!
//! The connection is established lazily, so an unreachable server surfaces as
//! `CacheError::Unavailable` rather than a startup abort. Only one connect is in flight at a
//! time and the lock is never held across it; other callers fail fast while it runs and for a
//! short cooldown after it fails. Commands are bounded by a short timeout; a slow cache is
//! treated as a down one.

use std::future::Future;
use std::time::Duration;

use ::redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::cache::CacheBackend;
use crate::error::CacheError;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
const COMMAND_TIMEOUT: Duration = Duration::from_millis(250);
/// How long callers fail fast after a failed connect before another attempt is made.
const RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Link {
    conn: Option<ConnectionManager>,
    /// No connect may start before this instant. Set to the connect deadline while one is in
    /// flight, so a cancelled attempt frees the slot on its own.
    retry_at: Option<Instant>,
}

pub struct RedisCache {
    client: Client,
    link: Mutex<Link>,
}

impl RedisCache {
    /// Parses `url` without connecting.
    pub fn open(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)
            .map_err(|e| CacheError::Unavailable(format!("invalid redis url: {e}")))?;
        Ok(Self {
            client,
            link: Mutex::new(Link::default()),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        {
            let mut link = self.link.lock().await;
            if let Some(conn) = link.conn.as_ref() {
                return Ok(conn.clone());
            }
            let now = Instant::now();
            if link.retry_at.is_some_and(|at| now < at) {
                return Err(CacheError::Unavailable(
                    "redis not connected, retrying later".into(),
                ));
            }
            link.retry_at = Some(now + CONNECT_TIMEOUT);
        }

        let attempt = timeout(CONNECT_TIMEOUT, ConnectionManager::new(self.client.clone())).await;

        let mut link = self.link.lock().await;
        match attempt {
            Ok(Ok(conn)) => {
                info!("connected to redis");
                link.conn = Some(conn.clone());
                link.retry_at = None;
                Ok(conn)
            }
            Ok(Err(e)) => {
                link.retry_at = Some(Instant::now() + RECONNECT_COOLDOWN);
                warn!(error = %e, "redis connect failed");
                Err(CacheError::Unavailable(format!("redis connect: {e}")))
            }
            Err(_) => {
                link.retry_at = Some(Instant::now() + RECONNECT_COOLDOWN);
                warn!("redis connect timed out");
                Err(CacheError::Unavailable("redis connect timed out".into()))
            }
        }
    }

    /// Runs one command under the command timeout, dropping the connection on transport errors.
    async fn run<T, Fut>(&self, op: &str, command: Fut) -> Result<T, CacheError>
    where
        Fut: Future<Output = Result<T, RedisError>>,
    {
        match timeout(COMMAND_TIMEOUT, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal()
                {
                    self.reset().await;
                }
                Err(CacheError::Unavailable(format!("redis {op}: {err}")))
            }
            Err(_) => {
                self.reset().await;
                Err(CacheError::Unavailable(format!("redis {op} timed out")))
            }
        }
    }

    async fn reset(&self) {
        debug!("dropping redis connection after error");
        self.link.lock().await.conn = None;
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        self.run("GET", conn.get::<_, Option<String>>(key)).await
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.run("SETEX", conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()))
            .await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.run("DEL", conn.del::<_, i64>(key)).await.map(|_| ())
    }
}
