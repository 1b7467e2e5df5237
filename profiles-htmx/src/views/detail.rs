use super::{DetailOptions, RenderedPage, ViewOutcome};
use crate::error::{ProfilesError, ProfilesResult};
use crate::state::ProfilesState;
use minijinja::context;

/// Show the profile of the user named `username`
///
/// Context: `profile`, `profile_user`.
///
/// # Errors
///
/// [`ProfilesError::NotFound`] when no user has that username or the user has
/// no profile. Store and template failures are returned as they occur.
#[tracing::instrument(skip(state, options))]
pub async fn profile_detail(
    state: &ProfilesState,
    username: &str,
    options: &DetailOptions,
) -> ProfilesResult<ViewOutcome> {
    let user = state
        .users()
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| ProfilesError::NotFound(format!("user {username}")))?;

    let profile = state
        .profiles()
        .find_profile_for_user(user.id)
        .await?
        .ok_or_else(|| ProfilesError::NotFound(format!("profile for {username}")))?;

    let template = options
        .template_name
        .as_deref()
        .unwrap_or(&state.settings().detail_template);
    let html = state.templates().render(
        template,
        context! {
            profile => &profile,
            profile_user => &user,
        },
    )?;

    Ok(ViewOutcome::Render(RenderedPage {
        template: template.to_string(),
        html,
        form_errors: None,
    }))
}
