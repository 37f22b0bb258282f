use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use twilight_model::id::{
    Id,
    marker::{GuildMarker, UserMarker},
};

use ghost_utils::time::now_unix_secs;

/// Warnings are scoped per guild member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub guild_id: Id<GuildMarker>,
    pub user_id: Id<UserMarker>,
}

#[derive(Clone, Debug)]
pub struct WarningEntry {
    pub warned_at: u64,
    pub moderator_id: Id<UserMarker>,
    pub reason: String,
}

#[derive(Clone, Copy, Debug)]
pub struct WarningRecord {
    pub warn_number: usize,
}

/// Append-only warning log.
#[async_trait]
pub trait WarningStore: Send + Sync {
    /// Append a warning and return its 1-based number for that member.
    async fn record(
        &self,
        member: MemberKey,
        moderator_id: Id<UserMarker>,
        reason: &str,
    ) -> WarningRecord;

    /// All warnings for a member in the order they were issued.
    async fn list(&self, member: MemberKey) -> Vec<WarningEntry>;
}

/// In-memory warning log, lost on restart.
#[derive(Default)]
pub struct MemoryWarningStore {
    logs: RwLock<HashMap<MemberKey, Vec<WarningEntry>>>,
}

impl MemoryWarningStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WarningStore for MemoryWarningStore {
    async fn record(
        &self,
        member: MemberKey,
        moderator_id: Id<UserMarker>,
        reason: &str,
    ) -> WarningRecord {
        let entry = WarningEntry {
            warned_at: now_unix_secs(),
            moderator_id,
            reason: reason.to_owned(),
        };

        // Push and count under one write guard so numbers stay gapless.
        let mut logs = self.logs.write().await;
        let entries = logs.entry(member).or_default();
        entries.push(entry);

        WarningRecord {
            warn_number: entries.len(),
        }
    }

    async fn list(&self, member: MemberKey) -> Vec<WarningEntry> {
        let logs = self.logs.read().await;
        logs.get(&member).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn member(guild: u64, user: u64) -> MemberKey {
        MemberKey {
            guild_id: Id::new(guild),
            user_id: Id::new(user),
        }
    }

    #[tokio::test]
    async fn warnings_are_listed_in_order_and_numbered_from_one() {
        let store = MemoryWarningStore::new();
        let target = member(1, 10);
        let moderator = Id::new(99);

        let first = store.record(target, moderator, "spam").await;
        let second = store.record(target, moderator, "flood").await;

        assert_eq!(first.warn_number, 1);
        assert_eq!(second.warn_number, 2);

        let reasons: Vec<String> = store
            .list(target)
            .await
            .into_iter()
            .map(|entry| entry.reason)
            .collect();
        assert_eq!(reasons, vec!["spam", "flood"]);
    }

    #[tokio::test]
    async fn members_are_scoped_per_guild() {
        let store = MemoryWarningStore::new();
        store.record(member(1, 10), Id::new(99), "spam").await;

        assert!(store.list(member(2, 10)).await.is_empty());
        assert!(store.list(member(1, 11)).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_warnings_get_distinct_numbers() {
        let store = Arc::new(MemoryWarningStore::new());
        let target = member(1, 10);

        let handles: Vec<_> = (0..20)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .record(target, Id::new(99), &format!("reason {n}"))
                        .await
                        .warn_number
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.expect("task"));
        }
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
        assert_eq!(store.list(target).await.len(), 20);
    }
}
