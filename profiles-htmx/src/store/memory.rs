//! In-memory store for tests and demos

use super::traits::{ProfileStore, UserStore};
use super::types::{ProfileDraft, ProfileRecord, RelationValues, User};
use crate::error::{ProfilesError, ProfilesResult};
use crate::model::FieldValue;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    profiles: HashMap<i64, ProfileRecord>,
    next_user_id: i64,
    next_profile_id: i64,
}

/// Users and profiles held in process memory
///
/// Cloning shares the underlying data.
///
/// # Examples
///
/// ```rust
/// use profiles_htmx::store::{MemoryStore, UserStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = MemoryStore::new();
/// let alice = store.add_user("alice");
///
/// let found = store.find_user_by_username("alice").await?;
/// assert_eq!(found, Some(alice));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user account, returning the existing one if the username is taken
    pub fn add_user(&self, username: impl Into<String>) -> User {
        let username = username.into();
        let mut inner = self.inner.write();
        if let Some(existing) = inner.users.iter().find(|u| u.username == username) {
            return existing.clone();
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username,
        };
        inner.users.push(user.clone());
        user
    }

    /// Number of stored profiles
    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.inner.read().profiles.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i64) -> ProfilesResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> ProfilesResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile_for_user(&self, user_id: i64) -> ProfilesResult<Option<ProfileRecord>> {
        Ok(self
            .inner
            .read()
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert_profile(
        &self,
        model: &str,
        draft: ProfileDraft,
    ) -> ProfilesResult<ProfileRecord> {
        let user_id = draft
            .owner()
            .ok_or_else(|| ProfilesError::Form("profile has no owner".into()))?;

        let mut inner = self.inner.write();
        if inner.profiles.values().any(|p| p.user_id == user_id) {
            return Err(ProfilesError::Conflict(format!(
                "user {user_id} already has a profile"
            )));
        }

        inner.next_profile_id += 1;
        let now = Utc::now();
        let mut record = ProfileRecord {
            id: inner.next_profile_id,
            user_id,
            model: model.to_string(),
            values: draft.values,
            created_at: now,
            updated_at: now,
        };
        apply_relations(&mut record, draft.relations);
        inner.profiles.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_profile(&self, id: i64, draft: ProfileDraft) -> ProfilesResult<ProfileRecord> {
        let mut inner = self.inner.write();
        let record = inner
            .profiles
            .get_mut(&id)
            .ok_or_else(|| ProfilesError::NotFound(format!("profile {id}")))?;

        // many-to-many values live alongside and survive a scalar update
        record.values.retain(|_, v| matches!(v, FieldValue::Many(_)));
        record.values.extend(draft.values);
        apply_relations(record, draft.relations);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

fn apply_relations(record: &mut ProfileRecord, relations: RelationValues) {
    for (field, values) in relations {
        record.values.insert(field, FieldValue::Many(values));
    }
}
