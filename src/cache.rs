//! In-process caching of repository name listings
//!
//! Listing an organization's repositories is an expensive remote call, and
//! many independent wizard sessions may ask for the same listing at once.
//! [`RepositoryCache`] memoizes listings per [`CacheKey`] with a
//! single-flight guarantee: among concurrent callers for one key, exactly
//! one runs the fetch while the rest block on that key's slot and observe
//! the same outcome. Keys include the caller identity, so listings are
//! scoped per account and never leak across tenants.
//!
//! Failures are never cached: the failed slot is dropped so a later call
//! retries the fetch. Ready entries live for the process lifetime unless
//! [`RepositoryCache::invalidate`] drops them explicitly; no TTL is applied.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use crate::error::{Error, Result};

/// Cache key combining caller identity and organization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identity: String,
    pub organization: String,
}

impl CacheKey {
    pub fn new(identity: &str, organization: &str) -> Self {
        Self {
            identity: identity.to_string(),
            organization: organization.to_string(),
        }
    }
}

/// Fetch state of a single cache slot.
#[derive(Debug)]
enum SlotState {
    /// The fetch is in flight; waiters block on the slot's condvar.
    Pending,
    /// The listing is resolved and immutable until invalidated.
    Ready(Vec<String>),
    /// The fetch failed; carries the rendered failure for waiters. The slot
    /// has already been dropped from the map, so new callers retry.
    Failed(String),
}

#[derive(Debug)]
struct Slot {
    state: Mutex<SlotState>,
    cond: Condvar,
}

impl Slot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending),
            cond: Condvar::new(),
        }
    }
}

/// Process-wide, thread-safe cache of repository name listings.
///
/// Cloning is cheap and shares the underlying map, matching how one cache
/// instance is handed to every wizard session.
#[derive(Debug, Clone, Default)]
pub struct RepositoryCache {
    slots: Arc<Mutex<HashMap<CacheKey, Arc<Slot>>>>,
}

impl RepositoryCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached listing for `key`, or fetch and cache it.
    ///
    /// If an entry is ready it is returned immediately. Otherwise exactly
    /// one concurrent caller for `key` executes `fetch`; the others block
    /// until it completes and observe the same outcome. The map lock is
    /// only held while locating the slot, so distinct keys make independent
    /// progress and a slow fetch never stalls unrelated callers.
    ///
    /// There is no cancellation: once a fetch starts it runs to completion
    /// and populates the cache even if the initiating session has moved on.
    pub fn get_or_fetch<F>(&self, key: CacheKey, fetch: F) -> Result<Vec<String>>
    where
        F: FnOnce() -> Result<Vec<String>>,
    {
        let (slot, leader) = {
            let mut slots = self
                .slots
                .lock()
                .map_err(|_| Error::LockPoisoned {
                    context: "repository cache map".to_string(),
                })?;
            match slots.get(&key) {
                Some(slot) => (Arc::clone(slot), false),
                None => {
                    let slot = Arc::new(Slot::new());
                    slots.insert(key.clone(), Arc::clone(&slot));
                    (slot, true)
                }
            }
        };

        if leader {
            self.lead_fetch(&key, &slot, fetch)
        } else {
            Self::await_slot(&key, &slot)
        }
    }

    /// Run the fetch as the single in-flight caller for `key`.
    fn lead_fetch<F>(&self, key: &CacheKey, slot: &Arc<Slot>, fetch: F) -> Result<Vec<String>>
    where
        F: FnOnce() -> Result<Vec<String>>,
    {
        log::debug!(
            "fetching repository listing for {}/{}",
            key.identity,
            key.organization
        );
        // The fetch runs without holding any lock.
        match fetch() {
            Ok(names) => {
                let mut state = slot.state.lock().map_err(|_| Error::LockPoisoned {
                    context: "repository cache slot".to_string(),
                })?;
                *state = SlotState::Ready(names.clone());
                drop(state);
                slot.cond.notify_all();
                log::debug!(
                    "cached {} repositories for {}/{}",
                    names.len(),
                    key.identity,
                    key.organization
                );
                Ok(names)
            }
            Err(err) => {
                log::warn!(
                    "repository listing failed for {}/{}: {}",
                    key.identity,
                    key.organization,
                    err
                );
                // Drop the slot first so no new caller joins a dead entry;
                // a subsequent call with this key starts a fresh fetch.
                self.remove_slot(key, slot)?;
                let mut state = slot.state.lock().map_err(|_| Error::LockPoisoned {
                    context: "repository cache slot".to_string(),
                })?;
                *state = SlotState::Failed(err.to_string());
                drop(state);
                slot.cond.notify_all();
                Err(err)
            }
        }
    }

    /// Block until the slot's fetch resolves, then share its outcome.
    fn await_slot(key: &CacheKey, slot: &Arc<Slot>) -> Result<Vec<String>> {
        let mut state = slot.state.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache slot".to_string(),
        })?;
        while matches!(*state, SlotState::Pending) {
            state = slot.cond.wait(state).map_err(|_| Error::LockPoisoned {
                context: "repository cache slot".to_string(),
            })?;
        }
        match &*state {
            SlotState::Ready(names) => Ok(names.clone()),
            SlotState::Failed(message) => Err(Error::Listing {
                organization: key.organization.clone(),
                message: message.clone(),
            }),
            SlotState::Pending => unreachable!("loop exits only on resolved state"),
        }
    }

    /// Remove `slot` from the map if it is still the entry for `key`.
    fn remove_slot(&self, key: &CacheKey, slot: &Arc<Slot>) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache map".to_string(),
        })?;
        if let Some(current) = slots.get(key) {
            if Arc::ptr_eq(current, slot) {
                slots.remove(key);
            }
        }
        Ok(())
    }

    /// Get a ready listing without fetching. Pending entries report `None`.
    pub fn get(&self, key: &CacheKey) -> Result<Option<Vec<String>>> {
        let slots = self.slots.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache map".to_string(),
        })?;
        let Some(slot) = slots.get(key) else {
            return Ok(None);
        };
        let state = slot.state.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache slot".to_string(),
        })?;
        match &*state {
            SlotState::Ready(names) => Ok(Some(names.clone())),
            _ => Ok(None),
        }
    }

    /// Drop the entry for `key`; the next `get_or_fetch` refetches.
    ///
    /// Invalidating a pending entry detaches it: the in-flight fetch still
    /// completes for its current waiters, but later callers start fresh.
    pub fn invalidate(&self, key: &CacheKey) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache map".to_string(),
        })?;
        slots.remove(key);
        Ok(())
    }

    /// Get the number of cached entries (ready or pending)
    pub fn len(&self) -> Result<usize> {
        let slots = self.slots.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache map".to_string(),
        })?;
        Ok(slots.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cache_key_scopes_by_identity_and_organization() {
        let key1 = CacheKey::new("alice", "acme");
        let key2 = CacheKey::new("alice", "acme");
        let key3 = CacheKey::new("alice", "globex");
        let key4 = CacheKey::new("bob", "acme");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
    }

    #[test]
    fn test_get_or_fetch_memoizes() {
        let cache = RepositoryCache::new();
        let key = CacheKey::new("alice", "acme");
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch(key.clone(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(names(&["web", "api"]))
            })
            .unwrap();
        assert_eq!(first, names(&["web", "api"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = cache
            .get_or_fetch(key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(names(&["other"]))
            })
            .unwrap();
        assert_eq!(second, names(&["web", "api"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_callers_share_a_single_fetch() {
        const CALLERS: usize = 16;

        let cache = RepositoryCache::new();
        let key = CacheKey::new("alice", "acme");
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let cache = cache.clone();
                let key = key.clone();
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_fetch(key, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Keep the fetch in flight long enough for every
                        // other thread to join as a waiter.
                        thread::sleep(Duration::from_millis(100));
                        Ok(names(&["web", "api", "infra"]))
                    })
                })
            })
            .collect();

        for handle in handles {
            let outcome = handle.join().unwrap().unwrap();
            assert_eq!(outcome, names(&["web", "api", "infra"]));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failures_propagate_to_waiters_and_are_not_cached() {
        const WAITERS: usize = 4;

        let cache = RepositoryCache::new();
        let key = CacheKey::new("alice", "acme");
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(WAITERS));

        let handles: Vec<_> = (0..WAITERS)
            .map(|_| {
                let cache = cache.clone();
                let key = key.clone();
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_fetch(key, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(100));
                        Err(Error::Listing {
                            organization: "acme".to_string(),
                            message: "401 Unauthorized".to_string(),
                        })
                    })
                })
            })
            .collect();

        for handle in handles {
            let outcome = handle.join().unwrap();
            let display = format!("{}", outcome.unwrap_err());
            assert!(display.contains("401 Unauthorized"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // the failure was not cached; a later call retries and succeeds
        let recovered = cache
            .get_or_fetch(key.clone(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(names(&["web"]))
            })
            .unwrap();
        assert_eq!(recovered, names(&["web"]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&key).unwrap(), Some(names(&["web"])));
    }

    #[test]
    fn test_distinct_keys_fetch_independently() {
        let cache = RepositoryCache::new();
        let calls = AtomicUsize::new(0);

        for org in ["acme", "globex"] {
            let listing = cache
                .get_or_fetch(CacheKey::new("alice", org), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(names(&[org]))
                })
                .unwrap();
            assert_eq!(listing, names(&[org]));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().unwrap(), 2);
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let cache = RepositoryCache::new();
        let key = CacheKey::new("alice", "acme");
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_fetch(key.clone(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(names(&["web"]))
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate(&key).unwrap();
        assert_eq!(cache.get(&key).unwrap(), None);

        cache
            .get_or_fetch(key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(names(&["web", "api"]))
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_default_is_empty() {
        let cache = RepositoryCache::default();
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.len().unwrap(), 0);
    }
}
