//! Profile create, edit, and detail views
//!
//! The views are plain async functions over [`ProfilesState`], returning a
//! [`ViewOutcome`]: either a redirect or a rendered page. [`crate::routes`]
//! adapts them to axum handlers; applications mounting the views on their
//! own routes call them directly with their own [`ProfileViewOptions`].
//!
//! | view | no profile | profile exists |
//! |---|---|---|
//! | [`create_profile`] | form; valid POST saves and redirects | redirect to edit |
//! | [`edit_profile`] | redirect to create | form; valid POST saves and redirects |
//! | [`profile_detail`] | 404 | rendered profile |

mod create;
mod detail;
mod edit;

pub use create::create_profile;
pub use detail::profile_detail;
pub use edit::edit_profile;

use crate::forms::{FormData, ProfileForm, ProfileFormClass, ValidationErrors};
use crate::store::RelationValues;
use crate::state::ProfilesState;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use std::sync::Arc;

/// What the client sent
#[derive(Debug, Clone)]
pub enum Submission {
    /// Display the form
    Get,
    /// Submitted form data
    Post(FormData),
}

/// Options for the create and edit views
#[derive(Debug, Clone, Default)]
pub struct ProfileViewOptions {
    /// Form class to use instead of the one synthesized from the model
    pub form_class: Option<Arc<dyn ProfileFormClass>>,
    /// Where to go after a successful save (defaults to the detail route)
    pub success_url: Option<String>,
    /// Template to render instead of the configured one
    pub template_name: Option<String>,
}

impl ProfileViewOptions {
    /// Use `form_class` instead of the synthesized form
    #[must_use]
    pub fn form_class(mut self, form_class: Arc<dyn ProfileFormClass>) -> Self {
        self.form_class = Some(form_class);
        self
    }

    /// Redirect to `url` after a successful save
    #[must_use]
    pub fn success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    /// Render `name` instead of the configured template
    #[must_use]
    pub fn template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }
}

/// Options for the detail view
#[derive(Debug, Clone, Default)]
pub struct DetailOptions {
    /// Template to render instead of the configured one
    pub template_name: Option<String>,
}

/// A rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Template that produced the page
    pub template: String,
    /// Page HTML
    pub html: String,
    /// Errors of the form on the page, if it has one
    pub form_errors: Option<ValidationErrors>,
}

/// Result of running a view
#[derive(Debug, Clone)]
pub enum ViewOutcome {
    /// Send the client to another URL
    Redirect(String),
    /// Respond with a page (status 200)
    Render(RenderedPage),
}

impl ViewOutcome {
    /// Redirect target, if this is a redirect
    #[must_use]
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Self::Redirect(url) => Some(url),
            Self::Render(_) => None,
        }
    }

    /// Rendered page, if this is a render
    #[must_use]
    pub const fn page(&self) -> Option<&RenderedPage> {
        match self {
            Self::Redirect(_) => None,
            Self::Render(page) => Some(page),
        }
    }

    /// Convert into a response
    ///
    /// HTMX requests are redirected with `HX-Redirect` so the browser performs
    /// a full navigation; other requests get a 303.
    #[must_use]
    pub fn into_response_for(self, is_htmx: bool) -> Response {
        match self {
            Self::Redirect(url) if is_htmx => {
                (StatusCode::OK, HxRedirect::from(url.as_str()), ()).into_response()
            }
            Self::Redirect(url) => Redirect::to(&url).into_response(),
            Self::Render(page) => Html(page.html).into_response(),
        }
    }
}

impl IntoResponse for ViewOutcome {
    fn into_response(self) -> Response {
        self.into_response_for(false)
    }
}

fn resolve_success_url(state: &ProfilesState, options: &ProfileViewOptions, username: &str) -> String {
    options
        .success_url
        .clone()
        .unwrap_or_else(|| state.urls().detail(username))
}

fn template_name<'a>(options: &'a ProfileViewOptions, configured: &'a str) -> &'a str {
    options.template_name.as_deref().unwrap_or(configured)
}

/// Many-to-many values of a valid form; forms without a deferred save have none
fn deferred_relations(form: &dyn ProfileForm) -> RelationValues {
    form.deferred_relations()
        .map(|deferred| deferred.many_to_many())
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_response() {
        let response = ViewOutcome::Redirect("/profiles/edit/".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/profiles/edit/");
    }

    #[test]
    fn test_htmx_redirect_response() {
        let response = ViewOutcome::Redirect("/profiles/edit/".into()).into_response_for(true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-redirect").unwrap(), "/profiles/edit/");
    }

    #[test]
    fn test_render_response() {
        let outcome = ViewOutcome::Render(RenderedPage {
            template: "t.html".into(),
            html: "<p>hi</p>".into(),
            form_errors: None,
        });
        assert!(outcome.redirect_location().is_none());
        assert_eq!(outcome.page().unwrap().template, "t.html");
        assert_eq!(outcome.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_options_builder() {
        let options = ProfileViewOptions::default()
            .success_url("/thanks/")
            .template_name("custom.html");
        assert_eq!(options.success_url.as_deref(), Some("/thanks/"));
        assert_eq!(template_name(&options, "default.html"), "custom.html");
        assert_eq!(
            template_name(&ProfileViewOptions::default(), "default.html"),
            "default.html"
        );
    }
}
