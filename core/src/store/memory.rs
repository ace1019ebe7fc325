//! An in-process [`Store`] double for tests, backed by a
//! `Mutex<HashMap<..>>`. TTLs are tracked lazily against [`Instant`]
//! rather than via a background sweep — a read that finds an expired
//! entry evicts it on the spot.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{ScoredMember, Store, StoreError};

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn fresh(value: V) -> Self {
        Self { value, expires_at: None }
    }

    fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(t) if t <= Instant::now())
    }
}

#[derive(Default)]
struct Inner {
    scalars: HashMap<String, Entry<i64>>,
    zsets: HashMap<String, Entry<Vec<(Vec<u8>, i64)>>>,
}

/// In-memory stand-in for Redis, used by engine tests so the property and
/// scenario tests in the test suite run without a live server.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scalar_get(inner: &mut Inner, key: &str) -> Option<i64> {
        if let Some(entry) = inner.scalars.get(key) {
            if entry.is_expired() {
                inner.scalars.remove(key);
                return None;
            }
            return Some(entry.value);
        }
        None
    }

    fn scalar_ttl(inner: &mut Inner, key: &str) -> i64 {
        match inner.scalars.get(key) {
            Some(entry) if entry.is_expired() => {
                inner.scalars.remove(key);
                0
            }
            Some(Entry { expires_at: Some(t), .. }) => {
                (*t - Instant::now()).as_secs() as i64 + 1
            }
            Some(Entry { expires_at: None, .. }) => 0,
            None => 0,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let current = Self::scalar_get(&mut inner, key).unwrap_or(0);
        let next = current + 1;
        let ttl = inner.scalars.get(key).and_then(|e| e.expires_at);
        inner.scalars.insert(key.to_string(), Entry { value: next, expires_at: ttl });
        Ok(next)
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let current = Self::scalar_get(&mut inner, key).unwrap_or(0);
        let next = current - 1;
        let ttl = inner.scalars.get(key).and_then(|e| e.expires_at);
        inner.scalars.insert(key.to_string(), Entry { value: next, expires_at: ttl });
        Ok(next)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(Self::scalar_get(&mut inner, key))
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let ttl = inner.scalars.get(key).and_then(|e| e.expires_at);
        inner.scalars.insert(key.to_string(), Entry { value, expires_at: ttl });
        Ok(())
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let deadline = Instant::now() + Duration::from_secs(seconds.max(0) as u64);
        if let Some(entry) = inner.scalars.get_mut(key) {
            entry.expires_at = Some(deadline);
        } else if let Some(entry) = inner.zsets.get_mut(key) {
            entry.expires_at = Some(deadline);
        }
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.scalars.contains_key(key) {
            return Ok(Self::scalar_ttl(&mut inner, key));
        }
        match inner.zsets.get(key) {
            Some(entry) if entry.is_expired() => {
                inner.zsets.remove(key);
                Ok(0)
            }
            Some(Entry { expires_at: Some(t), .. }) => Ok((*t - Instant::now()).as_secs() as i64 + 1),
            _ => Ok(0),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(Self::scalar_get(&mut inner, key).is_some())
    }

    async fn zcard(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.zsets.get(key) {
            if entry.is_expired() {
                inner.zsets.remove(key);
                return Ok(0);
            }
            return Ok(entry.value.len() as i64);
        }
        Ok(0)
    }

    async fn zincrby(&self, key: &str, member: &[u8], delta: i64) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.zsets.get(key) {
            if entry.is_expired() {
                inner.zsets.remove(key);
            }
        }
        let entry = inner
            .zsets
            .entry(key.to_string())
            .or_insert_with(|| Entry::fresh(Vec::new()));
        let score = match entry.value.iter_mut().find(|(m, _)| m.as_slice() == member) {
            Some((_, score)) => {
                *score += delta;
                *score
            }
            None => {
                entry.value.push((member.to_vec(), delta));
                delta
            }
        };
        Ok(score)
    }

    async fn zrange_with_scores(&self, key: &str) -> Result<Vec<ScoredMember>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.zsets.get(key) {
            if entry.is_expired() {
                inner.zsets.remove(key);
                return Ok(Vec::new());
            }
            let mut members: Vec<ScoredMember> = entry
                .value
                .iter()
                .map(|(member, score)| ScoredMember { member: member.clone(), score: *score })
                .collect();
            members.sort_by_key(|m| m.score);
            return Ok(members);
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn incr_creates_and_increments() {
        let store = MemoryStore::new();
        assert_eq!(store.incr("k").await.unwrap(), 1);
        assert_eq!(store.incr("k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn ttl_is_zero_until_expire_called() {
        let store = MemoryStore::new();
        store.incr("k").await.unwrap();
        assert_eq!(store.ttl("k").await.unwrap(), 0);
        store.expire("k", 60).await.unwrap();
        let ttl = store.ttl("k").await.unwrap();
        assert!(ttl > 0 && ttl <= 60);
    }

    #[tokio::test]
    async fn zincrby_tracks_distinct_members() {
        let store = MemoryStore::new();
        store.zincrby("z", b"\x01\x02\x03\x04", 1).await.unwrap();
        store.zincrby("z", b"\x05\x06\x07\x08", 1).await.unwrap();
        store.zincrby("z", b"\x01\x02\x03\x04", 1).await.unwrap();
        assert_eq!(store.zcard("z").await.unwrap(), 2);
        let scores = store.zrange_with_scores("z").await.unwrap();
        let total: i64 = scores.iter().map(|m| m.score).sum();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn set_preserves_existing_ttl() {
        let store = MemoryStore::new();
        store.incr("k").await.unwrap();
        store.expire("k", 60).await.unwrap();
        store.set("k", 5).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(5));
        assert!(store.ttl("k").await.unwrap() > 0);
    }
}
