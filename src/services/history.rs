// src/services/history.rs
use crate::errors::PaintError;
use crate::models::HistoryItem;
use async_trait::async_trait;
use log::{info, warn};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Fixed key the serialized history list lives under.
pub const STORAGE_KEY: &str = "paint-image-history";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<epoch-ms>-<7 random base36 chars>`.
fn new_history_id(now_ms: i64) -> String {
    format!("{}-{}", now_ms, id_suffix(&Uuid::new_v4()))
}

/// Bytes 9..16 of a v4 UUID are fully random; bytes 6 and 8 carry the
/// version and variant bits.
fn id_suffix(uuid: &Uuid) -> String {
    uuid.as_bytes()[9..]
        .iter()
        .map(|b| ID_ALPHABET[*b as usize % ID_ALPHABET.len()] as char)
        .collect()
}

/// Where the serialized history list is stored.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    async fn load(&self) -> Result<Option<String>, PaintError>;
    async fn save(&self, json: &str) -> Result<(), PaintError>;
}

/// Redis-backed storage over a shared, auto-reconnecting connection.
pub struct RedisHistoryBackend {
    conn: ConnectionManager,
}

impl RedisHistoryBackend {
    pub async fn new(redis_url: &str) -> Result<Self, PaintError> {
        let client = Client::open(redis_url).map_err(|e| PaintError::History(e.to_string()))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| PaintError::History(e.to_string()))?;

        // Test connection
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| PaintError::History(e.to_string()))?;

        info!("Connected to Redis history store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl HistoryBackend for RedisHistoryBackend {
    async fn load(&self) -> Result<Option<String>, PaintError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(STORAGE_KEY)
            .await
            .map_err(|e| PaintError::History(e.to_string()))
    }

    async fn save(&self, json: &str) -> Result<(), PaintError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(STORAGE_KEY, json)
            .await
            .map_err(|e| PaintError::History(e.to_string()))
    }
}

/// Process-local backend, used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryHistoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryHistoryBackend {
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(json.into())),
        }
    }
}

#[async_trait]
impl HistoryBackend for MemoryHistoryBackend {
    async fn load(&self) -> Result<Option<String>, PaintError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, json: &str) -> Result<(), PaintError> {
        *self.slot.lock().await = Some(json.to_string());
        Ok(())
    }
}

/// Newest-first list of generated images, capped at `limit` entries.
///
/// The backend is read once at construction and rewritten in full after
/// every mutation. The lock is held across mutate-and-save, so concurrent
/// requests never interleave writes. A failed save leaves the list unchanged.
pub struct HistoryService {
    backend: Arc<dyn HistoryBackend>,
    items: Mutex<Vec<HistoryItem>>,
    limit: usize,
}

impl HistoryService {
    pub async fn load(backend: Arc<dyn HistoryBackend>, limit: usize) -> Result<Self, PaintError> {
        let items = match backend.load().await? {
            Some(json) => serde_json::from_str::<Vec<HistoryItem>>(&json).unwrap_or_else(|e| {
                warn!("Failed to load image history, starting empty: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        info!("Loaded {} history item(s)", items.len());

        Ok(Self {
            backend,
            items: Mutex::new(items),
            limit,
        })
    }

    async fn persist(&self, items: &[HistoryItem]) -> Result<(), PaintError> {
        let json =
            serde_json::to_string(items).map_err(|e| PaintError::Serialization(e.to_string()))?;
        self.backend.save(&json).await
    }

    pub async fn list(&self) -> Vec<HistoryItem> {
        self.items.lock().await.clone()
    }

    /// Records a new image (a data URI) at the front of the list.
    pub async fn add(&self, image: String) -> Result<HistoryItem, PaintError> {
        let now = chrono::Utc::now().timestamp_millis();
        let item = HistoryItem {
            id: new_history_id(now),
            image,
            created_at: now,
        };

        let mut items = self.items.lock().await;
        let mut updated = Vec::with_capacity(items.len() + 1);
        updated.push(item.clone());
        updated.extend(items.iter().cloned());
        updated.truncate(self.limit);

        self.persist(&updated).await?;
        *items = updated;
        Ok(item)
    }

    pub async fn remove(&self, id: &str) -> Result<bool, PaintError> {
        let mut items = self.items.lock().await;
        let updated: Vec<HistoryItem> = items.iter().filter(|i| i.id != id).cloned().collect();
        if updated.len() == items.len() {
            return Ok(false);
        }

        self.persist(&updated).await?;
        *items = updated;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<(), PaintError> {
        let mut items = self.items.lock().await;
        self.persist(&[]).await?;
        items.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FailingBackend;

    #[async_trait]
    impl HistoryBackend for FailingBackend {
        async fn load(&self) -> Result<Option<String>, PaintError> {
            Ok(None)
        }

        async fn save(&self, _json: &str) -> Result<(), PaintError> {
            Err(PaintError::History("disk full".to_string()))
        }
    }

    #[test]
    fn ids_have_timestamp_and_suffix() {
        let id = new_history_id(1_700_000_000_000);
        let (stamp, suffix) = id.split_once('-').unwrap();
        assert_eq!(stamp, "1700000000000");
        assert_eq!(suffix.len(), 7);
        assert!(suffix.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn id_suffix_skips_version_and_variant_bytes() {
        let mut bytes = [0u8; 16];
        bytes[6] = 0x4f;
        bytes[8] = 0xbf;
        bytes[9..].copy_from_slice(&[1, 2, 3, 10, 11, 12, 35]);
        assert_eq!(id_suffix(&Uuid::from_bytes(bytes)), "123abcz");

        let last_chars: HashSet<char> = (0..2000)
            .map(|_| new_history_id(0).chars().last().unwrap())
            .collect();
        assert!(last_chars.len() > 16);
    }

    #[tokio::test]
    async fn add_prepends_and_caps() {
        let backend = Arc::new(MemoryHistoryBackend::default());
        let history = HistoryService::load(backend.clone(), 3).await.unwrap();

        for n in 0..5 {
            history.add(format!("data:image/png;base64,{n}")).await.unwrap();
        }

        let items = history.list().await;
        let images: Vec<&str> = items.iter().map(|i| i.image.as_str()).collect();
        assert_eq!(
            images,
            [
                "data:image/png;base64,4",
                "data:image/png;base64,3",
                "data:image/png;base64,2"
            ]
        );

        let stored = backend.load().await.unwrap().unwrap();
        let persisted: Vec<HistoryItem> = serde_json::from_str(&stored).unwrap();
        assert_eq!(persisted, items);
    }

    #[tokio::test]
    async fn remove_and_clear_persist() {
        let backend = Arc::new(MemoryHistoryBackend::default());
        let history = HistoryService::load(backend.clone(), 50).await.unwrap();
        let first = history.add("data:a".to_string()).await.unwrap();
        history.add("data:b".to_string()).await.unwrap();

        assert!(history.remove(&first.id).await.unwrap());
        assert!(!history.remove(&first.id).await.unwrap());
        assert_eq!(history.list().await.len(), 1);

        history.clear().await.unwrap();
        assert!(history.list().await.is_empty());
        assert_eq!(backend.load().await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn reloads_existing_and_tolerates_corruption() {
        let stored = r#"[{"id":"1-abcdefg","image":"data:x","createdAt":1}]"#;
        let backend = Arc::new(MemoryHistoryBackend::with_contents(stored));
        let history = HistoryService::load(backend, 50).await.unwrap();
        assert_eq!(history.list().await[0].id, "1-abcdefg");

        let corrupt = HistoryService::load(
            Arc::new(MemoryHistoryBackend::with_contents("{oops")),
            50,
        )
        .await
        .unwrap();
        assert!(corrupt.list().await.is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_list() {
        let history = HistoryService::load(Arc::new(FailingBackend), 50).await.unwrap();
        assert!(history.add("data:a".to_string()).await.is_err());
        assert!(history.list().await.is_empty());
    }
}
