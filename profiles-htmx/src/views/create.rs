use super::{
    deferred_relations, resolve_success_url, template_name, ProfileViewOptions, RenderedPage,
    Submission, ViewOutcome,
};
use crate::error::{ProfilesError, ProfilesResult};
use crate::forms::{form_for_model, ProfileFormClass};
use crate::state::ProfilesState;
use crate::store::User;
use minijinja::{context, Value};
use std::sync::Arc;

/// Create a profile for `user`, unless one already exists
///
/// - An existing profile redirects to the edit route without saving anything.
/// - GET renders an empty form.
/// - An invalid POST re-renders the form with its errors.
/// - A valid POST saves the profile owned by `user` together with its
///   many-to-many values when the form has any, and redirects to the success URL (the
///   user's detail route unless configured).
///
/// Context: `form`, `user`.
///
/// # Errors
///
/// Returns store and template failures.
#[tracing::instrument(skip_all, fields(user_id = user.id))]
pub async fn create_profile(
    state: &ProfilesState,
    user: &User,
    submission: Submission,
    options: &ProfileViewOptions,
) -> ProfilesResult<ViewOutcome> {
    if state.profiles().find_profile_for_user(user.id).await?.is_some() {
        tracing::debug!("profile exists, redirecting to edit");
        return Ok(ViewOutcome::Redirect(state.urls().edit()));
    }

    let success_url = resolve_success_url(state, options, &user.username);
    let form_class: Arc<dyn ProfileFormClass> = options
        .form_class
        .clone()
        .unwrap_or_else(|| Arc::new(form_for_model(state.model())));

    let form = match submission {
        Submission::Get => form_class.unbound(None),
        Submission::Post(data) => {
            let form = form_class.bind(data, None);
            if form.is_valid() {
                let mut draft = form
                    .save_uncommitted()?
                    .with_relations(deferred_relations(form.as_ref()));
                draft.set_owner(user.id);

                let model = state.model().label();
                let record = match state.profiles().insert_profile(&model, draft).await {
                    Ok(record) => record,
                    Err(ProfilesError::Conflict(reason)) => {
                        tracing::debug!(%reason, "profile created concurrently, redirecting to edit");
                        return Ok(ViewOutcome::Redirect(state.urls().edit()));
                    }
                    Err(err) => return Err(err),
                };
                tracing::info!(profile_id = record.id, %model, "profile created");
                return Ok(ViewOutcome::Redirect(success_url));
            }
            tracing::debug!(errors = form.errors().count(), "profile form invalid");
            form
        }
    };

    let template = template_name(options, &state.settings().create_template);
    let form_html = form.render(&state.urls().create(), "Create profile");
    let html = state.templates().render(
        template,
        context! {
            form => Value::from_safe_string(form_html),
            user => user,
        },
    )?;

    Ok(ViewOutcome::Render(RenderedPage {
        template: template.to_string(),
        html,
        form_errors: Some(form.errors().clone()),
    }))
}
