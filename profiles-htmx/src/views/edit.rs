use super::{
    deferred_relations, resolve_success_url, template_name, ProfileViewOptions, RenderedPage,
    Submission, ViewOutcome,
};
use crate::error::ProfilesResult;
use crate::forms::{form_for_instance, ProfileFormClass};
use crate::state::ProfilesState;
use crate::store::User;
use minijinja::{context, Value};
use std::sync::Arc;

/// Edit the profile of `user`
///
/// Without a profile the user is sent to the create route. Otherwise the form
/// starts from the profile's current values (including the owner), a valid
/// POST updates the same record and its many-to-many values, and an invalid
/// POST re-renders with errors.
///
/// Context: `form`, `profile`, `user`.
///
/// # Errors
///
/// Returns store and template failures.
#[tracing::instrument(skip_all, fields(user_id = user.id))]
pub async fn edit_profile(
    state: &ProfilesState,
    user: &User,
    submission: Submission,
    options: &ProfileViewOptions,
) -> ProfilesResult<ViewOutcome> {
    let Some(profile) = state.profiles().find_profile_for_user(user.id).await? else {
        tracing::debug!("no profile yet, redirecting to create");
        return Ok(ViewOutcome::Redirect(state.urls().create()));
    };

    let initial = profile.initial_data();
    let form_class: Arc<dyn ProfileFormClass> = options
        .form_class
        .clone()
        .unwrap_or_else(|| Arc::new(form_for_instance(state.model(), &profile)));

    let form = match submission {
        Submission::Get => form_class.unbound(Some(&initial)),
        Submission::Post(data) => {
            let form = form_class.bind(data, Some(&initial));
            if form.is_valid() {
                let mut draft = form
                    .save_uncommitted()?
                    .with_relations(deferred_relations(form.as_ref()));
                draft.set_owner(user.id);

                let record = state.profiles().update_profile(profile.id, draft).await?;

                tracing::info!(
                    profile_id = record.id,
                    changed = ?form.changed_fields(),
                    "profile updated"
                );
                return Ok(ViewOutcome::Redirect(resolve_success_url(
                    state,
                    options,
                    &user.username,
                )));
            }
            tracing::debug!(errors = form.errors().count(), "profile form invalid");
            form
        }
    };

    let template = template_name(options, &state.settings().edit_template);
    let form_html = form.render(&state.urls().edit(), "Save profile");
    let html = state.templates().render(
        template,
        context! {
            form => Value::from_safe_string(form_html),
            profile => &profile,
            user => user,
        },
    )?;

    Ok(ViewOutcome::Render(RenderedPage {
        template: template.to_string(),
        html,
        form_errors: Some(form.errors().clone()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormData;
    use crate::model::{FieldValue, FieldValues};
    use crate::store::{ProfileDraft, ProfileRecord, ProfileStore, RelationValues};
    use crate::views::test_support;

    async fn seed(store: &impl ProfileStore, user_id: i64) -> ProfileRecord {
        let mut values = FieldValues::new();
        values.insert("display_name".into(), FieldValue::Text("Old Name".into()));
        values.insert("bio".into(), FieldValue::Text("old bio".into()));
        let mut draft = ProfileDraft::new(values);
        draft.set_owner(user_id);
        let mut relations = RelationValues::new();
        relations.insert("interests".into(), vec!["htmx".into()]);
        store
            .insert_profile("accounts.UserProfile", draft.with_relations(relations))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_without_profile_redirects_to_create() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");

        let outcome = edit_profile(&state, &alice, Submission::Get, &ProfileViewOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.redirect_location(), Some("/profiles/create/"));
    }

    #[tokio::test]
    async fn test_get_prefills_current_values() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");
        seed(&store, alice.id).await;

        let outcome = edit_profile(&state, &alice, Submission::Get, &ProfileViewOptions::default())
            .await
            .unwrap();

        let page = outcome.page().unwrap();
        assert_eq!(page.template, "profiles/edit_profile.html");
        assert!(page.html.contains(r#"value="Old Name""#));
        assert!(page.html.contains("old bio"));
        assert!(page.html.contains(r#"value="htmx" selected"#));
        assert!(page.html.contains(r#"action="/profiles/edit/""#));
        assert!(page.html.contains(r#"<a href="/profiles/alice/">View profile</a>"#));
    }

    #[tokio::test]
    async fn test_valid_post_updates_same_record() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");
        let seeded = seed(&store, alice.id).await;

        let data = FormData::new()
            .with("display_name", "New Name")
            .with("bio", "new bio")
            .with("interests", "rust");
        let outcome = edit_profile(&state, &alice, Submission::Post(data), &ProfileViewOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.redirect_location(), Some("/profiles/alice/"));

        assert_eq!(store.profile_count(), 1);
        let record = store.find_profile_for_user(alice.id).await.unwrap().unwrap();
        assert_eq!(record.id, seeded.id);
        assert_eq!(record.user_id, alice.id);
        assert_eq!(record.value("display_name"), Some(&FieldValue::Text("New Name".into())));
        assert_eq!(record.value("interests").unwrap().as_many(), ["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_post_leaves_profile_unchanged() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");
        seed(&store, alice.id).await;

        let data = FormData::new().with("display_name", "x".repeat(31));
        let outcome = edit_profile(&state, &alice, Submission::Post(data), &ProfileViewOptions::default())
            .await
            .unwrap();

        let page = outcome.page().unwrap();
        assert!(page.form_errors.as_ref().unwrap().has_field_error("display_name"));
        assert!(page.html.contains("at most 30 characters"));

        let record = store.find_profile_for_user(alice.id).await.unwrap().unwrap();
        assert_eq!(record.value("display_name"), Some(&FieldValue::Text("Old Name".into())));
    }

    #[tokio::test]
    async fn test_clearing_relations() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");
        seed(&store, alice.id).await;

        let data = FormData::new().with("display_name", "Old Name");
        edit_profile(&state, &alice, Submission::Post(data), &ProfileViewOptions::default())
            .await
            .unwrap();

        let record = store.find_profile_for_user(alice.id).await.unwrap().unwrap();
        assert!(record.value("interests").unwrap().as_many().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_options() {
        let (state, store) = test_support::state();
        let alice = store.add_user("alice");
        let seeded = seed(&store, alice.id).await;
        let options = ProfileViewOptions::default()
            .form_class(Arc::new(test_support::NicknameFormClass))
            .success_url("/done/")
            .template_name("profiles/create_profile.html");

        let outcome = edit_profile(&state, &alice, Submission::Get, &options).await.unwrap();
        let page = outcome.page().unwrap();
        assert_eq!(page.template, "profiles/create_profile.html");
        assert!(page.html.contains(r#"<input name="nickname" value="">"#));
        assert!(!page.html.contains(r#"name="display_name""#));

        let data = FormData::new().with("nickname", "ace");
        let outcome = edit_profile(&state, &alice, Submission::Post(data), &options)
            .await
            .unwrap();
        assert_eq!(outcome.redirect_location(), Some("/done/"));

        let record = store.find_profile_for_user(alice.id).await.unwrap().unwrap();
        assert_eq!(record.id, seeded.id);
        assert_eq!(record.value("nickname"), Some(&FieldValue::Text("ace".into())));
        assert_eq!(record.value("display_name"), Some(&FieldValue::Text("Old Name".into())));
        assert_eq!(record.value("interests").unwrap().as_many(), ["htmx".to_string()]);
    }
}
