//! Records exchanged with profile stores

use crate::model::{FieldValue, FieldValues, OWNER_FIELD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An account that may own a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique username, used in detail URLs
    pub username: String,
}

/// A stored profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// `app_label.ModelName` of the model the record was saved as
    pub model: String,
    /// Field values, many-to-many values included
    pub values: FieldValues,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last saved
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Value of a field, if stored
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Initial data for binding a form to this record
    ///
    /// Every stored value plus the owner reference.
    #[must_use]
    pub fn initial_data(&self) -> FieldValues {
        let mut initial = self.values.clone();
        initial.insert(OWNER_FIELD.to_string(), FieldValue::Integer(self.user_id));
        initial
    }
}

/// A profile produced by a validated form but not yet written
///
/// Scalar values come from the form's uncommitted save. Many-to-many values
/// come from [`crate::forms::DeferredRelations`] and are written in the same
/// store operation, after the record row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    owner: Option<i64>,
    /// Scalar field values
    pub values: FieldValues,
    /// Many-to-many values to replace; fields not listed are left untouched
    pub relations: RelationValues,
}

impl ProfileDraft {
    /// Create a draft without an owner
    #[must_use]
    pub const fn new(values: FieldValues) -> Self {
        Self {
            owner: None,
            values,
            relations: RelationValues::new(),
        }
    }

    /// Replace the many-to-many values of the listed fields on save
    #[must_use]
    pub fn with_relations(mut self, relations: RelationValues) -> Self {
        self.relations = relations;
        self
    }

    /// Attach the draft to its owning user
    pub fn set_owner(&mut self, user_id: i64) {
        self.owner = Some(user_id);
    }

    /// Owning user, once set
    #[must_use]
    pub const fn owner(&self) -> Option<i64> {
        self.owner
    }
}

/// Many-to-many values keyed by field name
pub type RelationValues = BTreeMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_data_includes_owner() {
        let now = Utc::now();
        let mut values = FieldValues::new();
        values.insert("bio".into(), FieldValue::Text("hello".into()));
        values.insert("interests".into(), FieldValue::Many(vec!["rust".into()]));
        let record = ProfileRecord {
            id: 1,
            user_id: 7,
            model: "accounts.UserProfile".into(),
            values,
            created_at: now,
            updated_at: now,
        };

        let initial = record.initial_data();
        assert_eq!(initial.get("user"), Some(&FieldValue::Integer(7)));
        assert_eq!(initial.get("bio"), Some(&FieldValue::Text("hello".into())));
        assert_eq!(initial["interests"].as_many(), ["rust".to_string()]);
    }

    #[test]
    fn test_draft_owner() {
        let mut draft = ProfileDraft::new(FieldValues::new());
        assert_eq!(draft.owner(), None);
        draft.set_owner(3);
        assert_eq!(draft.owner(), Some(3));
    }
}
