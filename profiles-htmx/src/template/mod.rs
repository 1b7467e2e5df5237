//! Runtime-named templates with embedded defaults
//!
//! Views pick their template by name at request time, so templates live in
//! a minijinja [`Environment`] rather than compiled template structs. The
//! defaults ship inside the binary; a configured template directory
//! overrides any of them and may add new ones.

use crate::error::ProfilesResult;
use crate::urls::ProfileUrls;
use minijinja::{path_loader, Environment, Error, ErrorKind, Value};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default create view template
pub const CREATE_TEMPLATE: &str = "profiles/create_profile.html";
/// Default edit view template
pub const EDIT_TEMPLATE: &str = "profiles/edit_profile.html";
/// Default detail view template
pub const DETAIL_TEMPLATE: &str = "profiles/profile_detail.html";

static EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "profiles/base.html",
        include_str!("../../templates/profiles/base.html"),
    ),
    (
        CREATE_TEMPLATE,
        include_str!("../../templates/profiles/create_profile.html"),
    ),
    (
        EDIT_TEMPLATE,
        include_str!("../../templates/profiles/edit_profile.html"),
    ),
    (
        DETAIL_TEMPLATE,
        include_str!("../../templates/profiles/profile_detail.html"),
    ),
];

/// Thread-safe template environment
///
/// Cloning shares the environment.
#[derive(Debug, Clone)]
pub struct ProfileTemplates {
    env: Arc<RwLock<Environment<'static>>>,
}

impl ProfileTemplates {
    /// Environment holding only the embedded defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to parse
    pub fn new() -> ProfilesResult<Self> {
        Self::build(None)
    }

    /// Environment where files under `dir` override the embedded defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse or cannot be read
    pub fn with_dir(dir: impl Into<PathBuf>) -> ProfilesResult<Self> {
        Self::build(Some(dir.into()))
    }

    fn build(template_dir: Option<PathBuf>) -> ProfilesResult<Self> {
        let env = Self::create_environment(template_dir.as_deref())?;
        Ok(Self {
            env: Arc::new(RwLock::new(env)),
        })
    }

    fn create_environment(dir: Option<&Path>) -> ProfilesResult<Environment<'static>> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        for (name, embedded) in EMBEDDED_TEMPLATES {
            let content = match dir.map(|d| d.join(name)).filter(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!(template = name, path = %path.display(), "using template override");
                    std::fs::read_to_string(&path).map_err(|e| {
                        minijinja::Error::new(
                            minijinja::ErrorKind::TemplateNotFound,
                            format!("failed to read {}: {e}", path.display()),
                        )
                    })?
                }
                None => (*embedded).to_string(),
            };
            env.add_template_owned((*name).to_string(), content)?;
        }

        // anything else is looked up in the directory on demand
        if let Some(dir) = dir {
            env.set_loader(path_loader(dir));
        }

        Ok(env)
    }

    /// Render template `name` with `ctx`
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist or rendering fails
    pub fn render(&self, name: &str, ctx: Value) -> ProfilesResult<String> {
        let env = self.env.read();
        let html = env.get_template(name)?.render(ctx)?;
        Ok(html)
    }

    /// Make the named profile routes available to templates as `url`
    ///
    /// `url(name)` or `url(name, username)`; an unknown name, or the detail
    /// route without a username, fails the render. Usernames are
    /// percent-encoded, so the result is inserted unescaped.
    pub fn register_urls(&self, urls: ProfileUrls) {
        self.env.write().add_function(
            "url",
            move |name: &str, username: Option<&str>| -> Result<Value, Error> {
                urls.reverse(name, username)
                    .map(Value::from_safe_string)
                    .ok_or_else(|| {
                        Error::new(ErrorKind::InvalidOperation, format!("cannot resolve profile route {name}"))
                    })
            },
        );
    }
}
