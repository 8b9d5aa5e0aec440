use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared::domain::{ClassName, UserId};

/// Per-user class selection.
///
/// A user has an entry once they have picked a class. Entries are only ever
/// overwritten by a later selection; there is no removal.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records `class` as the user's current selection, replacing any earlier one.
    async fn set(&self, user_id: UserId, class: ClassName);

    async fn get(&self, user_id: UserId) -> Option<ClassName>;

    /// Number of users with an active selection.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-lifetime session store. Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    selections: Arc<RwLock<HashMap<UserId, ClassName>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, user_id: UserId, class: ClassName) {
        self.selections.write().await.insert(user_id, class);
    }

    async fn get(&self, user_id: UserId) -> Option<ClassName> {
        self.selections.read().await.get(&user_id).cloned()
    }

    async fn len(&self) -> usize {
        self.selections.read().await.len()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
