//! In-memory context store with per-session serialization and idle eviction.

use super::model::{CommandContext, Session};
use crate::config::PipelineConfig;
use crate::error::Result;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// A checked-out session entry.
///
/// Locking the inner mutex is the per-session mutual-exclusion scope: the
/// orchestrator holds it for the duration of one `process_command` call, and
/// the eviction sweep takes it before removing the session.
pub type SessionEntry = Arc<Mutex<Session>>;

/// Owns every live [`Session`], keyed uniquely by session id.
///
/// `SessionStore` is the only component that creates or removes sessions.
/// Calls for different sessions proceed concurrently; calls for the same
/// session serialize on the entry mutex returned by [`checkout`](Self::checkout).
pub struct SessionStore {
    /// Live sessions, keyed by session id
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    /// Idle window and retention policy
    config: PipelineConfig,
}

impl SessionStore {
    /// Creates an empty store with the given policy.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// The policy this store was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the session for `ctx.session_id`, creating it on first sight.
    ///
    /// The returned entry must be locked by the caller before reading or
    /// mutating the session; the lock scope is the per-session serialization
    /// scope described in the concurrency model.
    ///
    /// # Errors
    ///
    /// Returns `SessionUnavailable` if the store backend cannot be reached.
    /// The in-memory backend never fails, but callers must propagate the
    /// error rather than swallow it.
    pub async fn checkout(&self, ctx: &CommandContext) -> Result<SessionEntry> {
        {
            let sessions = self.sessions.read().await;
            if let Some(entry) = sessions.get(&ctx.session_id) {
                return Ok(entry.clone());
            }
        }

        let mut sessions = self.sessions.write().await;
        // Double-check: another call may have created the session between locks.
        let entry = sessions
            .entry(ctx.session_id.clone())
            .or_insert_with(|| {
                tracing::debug!(session_id = %ctx.session_id, "creating session");
                Arc::new(Mutex::new(Session::new(ctx)))
            })
            .clone();
        Ok(entry)
    }

    /// Returns the entry for an existing session without creating one.
    pub async fn get(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Removes every session idle past the eviction window.
    ///
    /// Each candidate's entry mutex is acquired before removal so the sweep
    /// never races an in-flight command; a session that turns out to be
    /// active once the lock is held is left in place.
    ///
    /// Returns the number of sessions evicted.
    pub async fn evict_idle(&self) -> usize {
        let cutoff = Utc::now() - Duration::seconds(self.config.idle_eviction_secs as i64);

        let candidates: Vec<(String, SessionEntry)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, entry)| (id.clone(), entry.clone()))
                .collect()
        };

        let mut evicted = 0;
        for (session_id, entry) in candidates {
            let guard = entry.lock().await;
            if !guard.idle_since(cutoff) {
                continue;
            }
            drop(guard);

            let mut sessions = self.sessions.write().await;
            if let Some(current) = sessions.get(&session_id) {
                // Re-check under the map lock; a command may have revived the
                // session between our lock release and here.
                let still_idle = match current.try_lock() {
                    Ok(session) => session.idle_since(cutoff),
                    Err(_) => false,
                };
                if still_idle {
                    sessions.remove(&session_id);
                    evicted += 1;
                    tracing::info!(session_id = %session_id, "evicted idle session");
                }
            }
        }
        evicted
    }

    /// Starts the periodic eviction sweep.
    ///
    /// The task runs until aborted; the handle is returned so the process can
    /// shut it down.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let period = std::time::Duration::from_secs(store.config.sweep_interval_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    tracing::debug!(evicted, "eviction sweep complete");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::{Turn, TurnOutcome};

    fn ctx(session_id: &str) -> CommandContext {
        CommandContext {
            user_id: 1,
            session_id: session_id.to_string(),
            context_id: "global".to_string(),
            device_info: serde_json::Value::Null,
        }
    }

    fn store_with_window(idle_eviction_secs: u64) -> SessionStore {
        SessionStore::new(PipelineConfig {
            idle_eviction_secs,
            ..PipelineConfig::default()
        })
    }

    #[tokio::test]
    async fn test_checkout_creates_then_reuses() {
        let store = store_with_window(1800);

        let first = store.checkout(&ctx("s-1")).await.unwrap();
        let second = store.checkout(&ctx("s-1")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_evict_idle_removes_stale_sessions() {
        let store = store_with_window(0);

        let entry = store.checkout(&ctx("stale")).await.unwrap();
        drop(entry);
        // With a zero-second window every session is immediately idle.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let evicted = store.evict_idle().await;
        assert_eq!(evicted, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_active_sessions() {
        let store = store_with_window(1800);

        let entry = store.checkout(&ctx("busy")).await.unwrap();
        entry
            .lock()
            .await
            .record_turn(Turn::new("search for permits", None, TurnOutcome::Success), 50);

        let evicted = store.evict_idle().await;
        assert_eq!(evicted, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_spawned_sweeper_evicts_on_first_tick() {
        let store = Arc::new(store_with_window(0));
        store.checkout(&ctx("stale")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        // The interval's first tick fires immediately.
        let handle = store.spawn_sweeper();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(store.is_empty().await);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_waits_for_inflight_command_and_spares_revived_session() {
        let store = Arc::new(store_with_window(0));

        let entry = store.checkout(&ctx("inflight")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut guard = entry.lock().await;

        // The sweep must block on the entry mutex held by the in-flight
        // command instead of yanking the session out from under it.
        let sweep = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.evict_idle().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        guard.record_turn(Turn::new("undo", None, TurnOutcome::Success), 50);
        drop(guard);

        let evicted = sweep.await.unwrap();
        assert_eq!(evicted, 0);
        assert!(store.get("inflight").await.is_some());
    }
}
