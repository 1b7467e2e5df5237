//! Application state shared by the profile views
//!
//! The profile model is resolved while the state is built, so a missing or
//! unknown model setting stops start-up instead of failing the first
//! request.

use crate::config::{ProfileSettings, ProfilesConfig};
use crate::error::{ProfilesError, ProfilesResult};
use crate::model::{resolve_profile_model, ModelRegistry, ModelSchema};
use crate::store::{ProfileStore, UserStore};
use crate::template::ProfileTemplates;
use crate::urls::ProfileUrls;
use std::fmt;
use std::sync::Arc;

struct StateInner {
    model: Arc<ModelSchema>,
    profiles: Arc<dyn ProfileStore>,
    users: Arc<dyn UserStore>,
    templates: ProfileTemplates,
    urls: ProfileUrls,
    settings: ProfileSettings,
    remote_user_header: Option<String>,
}

/// Shared state for the profile routes
///
/// Immutable after construction; cloning is cheap.
///
/// # Example
///
/// ```rust
/// use profiles_htmx::config::ProfileSettings;
/// use profiles_htmx::model::{FieldDescriptor, ModelRegistry, ModelSchema};
/// use profiles_htmx::state::ProfilesState;
/// use profiles_htmx::store::MemoryStore;
///
/// # fn example() -> Result<(), profiles_htmx::error::ProfilesError> {
/// let registry = ModelRegistry::new().with_model(
///     ModelSchema::new("accounts", "UserProfile").field(FieldDescriptor::text("bio")),
/// )?;
/// let settings = ProfileSettings {
///     model: Some("accounts.UserProfile".into()),
///     ..ProfileSettings::default()
/// };
///
/// let state = ProfilesState::builder(registry)
///     .settings(settings)
///     .store(MemoryStore::new())
///     .build()?;
/// assert_eq!(state.model().model_name(), "UserProfile");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProfilesState {
    inner: Arc<StateInner>,
}

impl ProfilesState {
    /// Start building state over `registry`
    #[must_use]
    pub fn builder(registry: ModelRegistry) -> ProfilesStateBuilder {
        ProfilesStateBuilder::new(registry)
    }

    /// Build state from loaded configuration
    ///
    /// # Errors
    ///
    /// Same as [`ProfilesStateBuilder::build`], plus template directory
    /// loading failures
    pub fn from_config<S>(
        config: &ProfilesConfig,
        registry: ModelRegistry,
        store: S,
    ) -> ProfilesResult<Self>
    where
        S: ProfileStore + UserStore + 'static,
    {
        let templates = match config.templates.template_dir {
            Some(ref dir) => ProfileTemplates::with_dir(dir)?,
            None => ProfileTemplates::new()?,
        };

        let mut builder = Self::builder(registry)
            .settings(config.profiles.clone())
            .templates(templates)
            .store(store);
        if let Some(ref header) = config.auth.remote_user_header {
            builder = builder.remote_user_header(header);
        }
        builder.build()
    }

    /// The resolved profile model
    #[must_use]
    pub fn model(&self) -> &Arc<ModelSchema> {
        &self.inner.model
    }

    /// Profile persistence
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.inner.profiles.as_ref()
    }

    /// User lookups
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Template environment
    #[must_use]
    pub fn templates(&self) -> &ProfileTemplates {
        &self.inner.templates
    }

    /// Route URLs
    #[must_use]
    pub fn urls(&self) -> &ProfileUrls {
        &self.inner.urls
    }

    /// View settings
    #[must_use]
    pub fn settings(&self) -> &ProfileSettings {
        &self.inner.settings
    }

    /// Trusted header naming the authenticated user, if enabled
    #[must_use]
    pub fn remote_user_header(&self) -> Option<&str> {
        self.inner.remote_user_header.as_deref()
    }
}

impl fmt::Debug for ProfilesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfilesState")
            .field("model", &self.inner.model.label())
            .field("urls", &self.inner.urls)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProfilesState`]
pub struct ProfilesStateBuilder {
    registry: ModelRegistry,
    settings: ProfileSettings,
    templates: Option<ProfileTemplates>,
    profiles: Option<Arc<dyn ProfileStore>>,
    users: Option<Arc<dyn UserStore>>,
    remote_user_header: Option<String>,
}

impl ProfilesStateBuilder {
    fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            settings: ProfileSettings::default(),
            templates: None,
            profiles: None,
            users: None,
            remote_user_header: None,
        }
    }

    /// View settings, including the profile model setting
    #[must_use]
    pub fn settings(mut self, settings: ProfileSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Template environment (defaults to the embedded templates)
    #[must_use]
    pub fn templates(mut self, templates: ProfileTemplates) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Use one backend for both users and profiles
    #[must_use]
    pub fn store<S>(self, store: S) -> Self
    where
        S: ProfileStore + UserStore + 'static,
    {
        let store = Arc::new(store);
        self.profile_store(Arc::clone(&store) as Arc<dyn ProfileStore>)
            .user_store(store)
    }

    /// Profile backend
    #[must_use]
    pub fn profile_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    /// User backend
    #[must_use]
    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.users = Some(store);
        self
    }

    /// Trust `header` to carry the authenticated username
    #[must_use]
    pub fn remote_user_header(mut self, header: impl Into<String>) -> Self {
        self.remote_user_header = Some(header.into());
        self
    }

    /// Resolve the profile model and assemble the state
    ///
    /// # Errors
    ///
    /// - [`ProfilesError::ProfileNotAvailable`] if the model setting is
    ///   missing or names no registered model
    /// - [`ProfilesError::Config`] if a store is missing
    /// - template errors when the embedded templates fail to load
    pub fn build(self) -> ProfilesResult<ProfilesState> {
        let model = resolve_profile_model(&self.registry, self.settings.model.as_deref())?;

        let profiles = self
            .profiles
            .ok_or_else(|| ProfilesError::Config("no profile store configured".into()))?;
        let users = self
            .users
            .ok_or_else(|| ProfilesError::Config("no user store configured".into()))?;
        let templates = match self.templates {
            Some(templates) => templates,
            None => ProfileTemplates::new()?,
        };

        let urls = ProfileUrls::new(&self.settings.url_prefix);
        templates.register_urls(urls.clone());

        tracing::info!(
            model = %model.label(),
            prefix = %self.settings.url_prefix,
            "profile views configured"
        );

        Ok(ProfilesState {
            inner: Arc::new(StateInner {
                model,
                profiles,
                users,
                templates,
                urls,
                settings: self.settings,
                remote_user_header: self.remote_user_header,
            }),
        })
    }
}
