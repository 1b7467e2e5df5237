//! Profile model registry and resolution
//!
//! Models are registered explicitly at start-up and the configured
//! `app_label.ModelName` is resolved once, when application state is built.
//! A missing setting and a setting that names no registered model are the
//! same failure: [`ProfilesError::ProfileNotAvailable`].

use super::{FieldType, ModelSchema, OWNER_FIELD};
use crate::error::{ProfilesError, ProfilesResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Registry of known profile models
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<Arc<ModelSchema>>,
}

impl ModelRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model
    ///
    /// # Errors
    ///
    /// Returns [`ProfilesError::Config`] if:
    /// - a model with the same label is already registered
    /// - two fields share a name
    /// - the owner reference field is missing or redefined
    pub fn register(&mut self, schema: ModelSchema) -> ProfilesResult<Arc<ModelSchema>> {
        let label = schema.label();

        if self.lookup(schema.app_label(), schema.model_name()).is_some() {
            return Err(ProfilesError::Config(format!(
                "model {label} is already registered"
            )));
        }

        let mut seen = HashSet::new();
        for field in schema.fields() {
            if !seen.insert(field.name.as_str()) {
                return Err(ProfilesError::Config(format!(
                    "model {label} declares field '{}' twice",
                    field.name
                )));
            }
        }

        match schema.field_named(OWNER_FIELD) {
            Some(owner) if owner.field_type == FieldType::OwnerReference => {}
            _ => {
                return Err(ProfilesError::Config(format!(
                    "model {label} must relate to its user through '{OWNER_FIELD}'"
                )));
            }
        }

        tracing::debug!(model = %label, fields = schema.fields().len(), "registered profile model");
        let schema = Arc::new(schema);
        self.models.push(Arc::clone(&schema));
        Ok(schema)
    }

    /// Register a model, builder style
    ///
    /// # Errors
    ///
    /// Same as [`ModelRegistry::register`].
    pub fn with_model(mut self, schema: ModelSchema) -> ProfilesResult<Self> {
        self.register(schema)?;
        Ok(self)
    }

    /// Find a model by `app_label.ModelName`
    ///
    /// The app label must match exactly; the model name is matched
    /// case-insensitively.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Arc<ModelSchema>> {
        let (app_label, model_name) = split_label(label)?;
        self.lookup(app_label, model_name)
    }

    /// Number of registered models
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn lookup(&self, app_label: &str, model_name: &str) -> Option<Arc<ModelSchema>> {
        self.models
            .iter()
            .find(|m| {
                m.app_label() == app_label && m.model_name().eq_ignore_ascii_case(model_name)
            })
            .cloned()
    }
}

fn split_label(label: &str) -> Option<(&str, &str)> {
    let (app_label, model_name) = label.split_once('.')?;
    if app_label.is_empty() || model_name.is_empty() || model_name.contains('.') {
        return None;
    }
    Some((app_label, model_name))
}

/// Resolve the configured profile model
///
/// # Errors
///
/// Returns [`ProfilesError::ProfileNotAvailable`] if the setting is unset or
/// blank, is not of the form `app_label.ModelName`, or names a model that
/// is not registered.
///
/// # Example
///
/// ```rust
/// use profiles_htmx::model::{resolve_profile_model, ModelRegistry, ModelSchema};
///
/// # fn example() -> Result<(), profiles_htmx::error::ProfilesError> {
/// let registry = ModelRegistry::new().with_model(ModelSchema::new("accounts", "UserProfile"))?;
///
/// let model = resolve_profile_model(&registry, Some("accounts.UserProfile"))?;
/// assert_eq!(model.model_name(), "UserProfile");
///
/// assert!(resolve_profile_model(&registry, None).is_err());
/// # Ok(())
/// # }
/// ```
pub fn resolve_profile_model(
    registry: &ModelRegistry,
    setting: Option<&str>,
) -> ProfilesResult<Arc<ModelSchema>> {
    let label = setting
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ProfilesError::ProfileNotAvailable("profile model setting is not configured".into())
        })?;

    registry.get(label).ok_or_else(|| {
        ProfilesError::ProfileNotAvailable(format!(
            "'{label}' does not name a registered profile model"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDescriptor;

    fn registry() -> ModelRegistry {
        ModelRegistry::new()
            .with_model(
                ModelSchema::new("accounts", "UserProfile")
                    .field(FieldDescriptor::char("display_name", 40)),
            )
            .unwrap()
    }

    #[test]
    fn test_resolve_registered_model() {
        let model = resolve_profile_model(&registry(), Some("accounts.UserProfile")).unwrap();
        assert_eq!(model.label(), "accounts.UserProfile");
    }

    #[test]
    fn test_resolve_is_case_insensitive_on_model_name() {
        let model = resolve_profile_model(&registry(), Some("accounts.userprofile")).unwrap();
        assert_eq!(model.model_name(), "UserProfile");
        assert!(resolve_profile_model(&registry(), Some("Accounts.UserProfile")).is_err());
    }

    #[test]
    fn test_resolve_twice_yields_same_model() {
        let registry = registry();
        let first = resolve_profile_model(&registry, Some("accounts.UserProfile")).unwrap();
        let second = resolve_profile_model(&registry, Some("accounts.UserProfile")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_and_unknown_collapse_to_one_kind() {
        let registry = registry();
        for setting in [None, Some(""), Some("accounts"), Some("a.b.c"), Some("shop.Customer")] {
            let err = resolve_profile_model(&registry, setting).unwrap_err();
            assert!(
                matches!(err, ProfilesError::ProfileNotAvailable(_)),
                "unexpected error for {setting:?}: {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry
            .register(ModelSchema::new("accounts", "userprofile"))
            .unwrap_err();
        assert!(matches!(err, ProfilesError::Config(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_owner_field_cannot_be_redefined() {
        let schema = ModelSchema::new("accounts", "Broken").field(FieldDescriptor::text("user"));
        let err = ModelRegistry::new().register(schema).unwrap_err();
        assert!(matches!(err, ProfilesError::Config(_)));
    }
}
