use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{Prize, WonGift};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::ApiError;

/// Per-user attempt bookkeeping, as persisted in the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Spins used so far.
    #[serde(default)]
    pub attempts: u32,
    /// Extra spins granted by an admin on top of the configured maximum.
    #[serde(default)]
    pub bonus_attempts: u32,
    #[serde(default)]
    pub gifts: Vec<WonGift>,
}

impl UserRecord {
    pub fn attempts_left(&self, max_attempts: u32) -> u32 {
        max_attempts
            .saturating_add(self.bonus_attempts)
            .saturating_sub(self.attempts)
    }
}

/// JSON-file backed user store. Every mutation rewrites the file while the
/// lock is held, so writes never interleave.
pub struct UserStore {
    path: PathBuf,
    users: Mutex<HashMap<String, UserRecord>>,
}

impl UserStore {
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, UserRecord>>(&bytes) {
                Ok(users) => {
                    info!("loaded {} users from {}", users.len(), path.display());
                    users
                }
                Err(e) => {
                    warn!("could not parse {}, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("could not read {}, starting empty: {}", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path,
            users: Mutex::new(users),
        }
    }

    pub async fn announce(&self, user_id: i64) -> Result<(), ApiError> {
        let mut users = self.users.lock().await;
        let key = user_id.to_string();
        if users.contains_key(&key) {
            return Ok(());
        }
        users.insert(key.clone(), UserRecord::default());
        if let Err(e) = self.persist(&users).await {
            users.remove(&key);
            return Err(e);
        }
        info!("new user {} registered", user_id);
        Ok(())
    }

    /// Unknown users read as a fresh record without being created.
    pub async fn record(&self, user_id: i64) -> UserRecord {
        let users = self.users.lock().await;
        users.get(&user_id.to_string()).cloned().unwrap_or_default()
    }

    /// Uses one attempt and stores the drawn prize if it is a win. `draw`
    /// only runs when the user still has an attempt.
    pub async fn spin<F>(
        &self,
        user_id: i64,
        max_attempts: u32,
        draw: F,
    ) -> Result<(Prize, u32), ApiError>
    where
        F: FnOnce() -> Prize,
    {
        let mut users = self.users.lock().await;
        let key = user_id.to_string();
        let previous = users.get(&key).cloned();
        let mut record = previous.clone().unwrap_or_default();

        if record.attempts_left(max_attempts) == 0 {
            return Err(ApiError::NoAttemptsLeft);
        }

        let prize = draw();
        record.attempts += 1;
        if prize.is_win() {
            record.gifts.push(WonGift::today(prize.clone()));
        }
        let attempts_left = record.attempts_left(max_attempts);
        users.insert(key.clone(), record);

        if let Err(e) = self.persist(&users).await {
            match previous {
                Some(previous) => users.insert(key, previous),
                None => users.remove(&key),
            };
            return Err(e);
        }
        Ok((prize, attempts_left))
    }

    pub async fn add_attempt(&self, user_id: i64, max_attempts: u32) -> Result<u32, ApiError> {
        let mut users = self.users.lock().await;
        let key = user_id.to_string();
        let previous = users.get(&key).cloned();
        let mut record = previous.clone().unwrap_or_default();
        record.bonus_attempts = record.bonus_attempts.saturating_add(1);
        let attempts_left = record.attempts_left(max_attempts);
        users.insert(key.clone(), record);

        if let Err(e) = self.persist(&users).await {
            match previous {
                Some(previous) => users.insert(key, previous),
                None => users.remove(&key),
            };
            return Err(e);
        }
        Ok(attempts_left)
    }

    pub async fn snapshot(&self) -> HashMap<String, UserRecord> {
        self.users.lock().await.clone()
    }

    async fn persist(&self, users: &HashMap<String, UserRecord>) -> Result<(), ApiError> {
        let bytes =
            serde_json::to_vec_pretty(users).map_err(|e| ApiError::Storage(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("reel-store-{}.json", uuid::Uuid::new_v4()))
    }

    fn helmet() -> Prize {
        Prize::new("Neko Helmet", Some("images/neko_helmet.png"), 14_000)
    }

    #[tokio::test]
    async fn test_spin_until_exhausted() {
        let path = temp_path();
        let store = UserStore::open(&path).await;
        store.announce(5).await.unwrap();

        assert_eq!(store.spin(5, 2, helmet).await.unwrap().1, 1);
        assert_eq!(store.spin(5, 2, || Prize::new("Empty", None, 0)).await.unwrap().1, 0);
        assert!(matches!(
            store.spin(5, 2, helmet).await,
            Err(ApiError::NoAttemptsLeft)
        ));

        let record = store.record(5).await;
        assert_eq!(record.attempts, 2);
        assert_eq!(record.gifts.len(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_reopen_reads_file() {
        let path = temp_path();
        {
            let store = UserStore::open(&path).await;
            store.spin(9, 2, helmet).await.unwrap();
            assert_eq!(store.add_attempt(9, 2).await.unwrap(), 2);
        }
        let store = UserStore::open(&path).await;
        let record = store.record(9).await;
        assert_eq!(record.attempts, 1);
        assert_eq!(record.bonus_attempts, 1);
        assert_eq!(record.gifts[0].prize, helmet());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_attempts_left_saturates() {
        let record = UserRecord {
            attempts: 3,
            bonus_attempts: u32::MAX,
            gifts: vec![],
        };
        assert_eq!(record.attempts_left(10), u32::MAX - 3);
        assert_eq!(record.attempts_left(u32::MAX), u32::MAX - 3);

        let spent = UserRecord {
            attempts: 9,
            ..UserRecord::default()
        };
        assert_eq!(spent.attempts_left(2), 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let path = temp_path();
        std::fs::write(&path, b"{not json").unwrap();
        let store = UserStore::open(&path).await;
        assert!(store.snapshot().await.is_empty());
        assert_eq!(store.record(1).await, UserRecord::default());
        let _ = std::fs::remove_file(path);
    }
}
