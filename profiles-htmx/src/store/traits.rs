//! Storage traits for users and profiles

use super::types::{ProfileDraft, ProfileRecord, User};
use crate::error::ProfilesResult;
use async_trait::async_trait;

/// Read access to user accounts
///
/// Accounts are owned by the surrounding application; profiles only look
/// them up.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by primary key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn find_user(&self, id: i64) -> ProfilesResult<Option<User>>;

    /// Find a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn find_user_by_username(&self, username: &str) -> ProfilesResult<Option<User>>;
}

/// Persistence for profile records
///
/// A user owns at most one profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The profile owned by `user_id`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn find_profile_for_user(&self, user_id: i64) -> ProfilesResult<Option<ProfileRecord>>;

    /// Insert a new profile saved as `model`, with the draft's relations
    ///
    /// The record and its relations are written together or not at all.
    ///
    /// # Errors
    ///
    /// - [`crate::error::ProfilesError::Form`] if the draft has no owner
    /// - [`crate::error::ProfilesError::Conflict`] if the owner already has a profile
    /// - backend failures
    async fn insert_profile(&self, model: &str, draft: ProfileDraft)
        -> ProfilesResult<ProfileRecord>;

    /// Overwrite the scalar values of profile `id` and replace the
    /// many-to-many fields listed in the draft's relations
    ///
    /// Both are written together or not at all.
    ///
    /// # Errors
    ///
    /// - [`crate::error::ProfilesError::NotFound`] if no such profile exists
    /// - backend failures
    async fn update_profile(&self, id: i64, draft: ProfileDraft) -> ProfilesResult<ProfileRecord>;
}
