//! Profile forms synthesized from a model schema
//!
//! [`form_for_model`] and [`form_for_instance`] build a [`SchemaFormClass`]
//! exposing every editable field of the model except the owner reference.
//! Applications with hand-written forms implement [`ProfileFormClass`] and
//! [`ProfileForm`] themselves and hand the class to the views instead.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use profiles_htmx::forms::{form_for_model, FormData, ProfileFormClass};
//! use profiles_htmx::model::{FieldDescriptor, ModelSchema};
//!
//! let model = Arc::new(
//!     ModelSchema::new("accounts", "UserProfile")
//!         .field(FieldDescriptor::char("display_name", 20))
//!         .field(FieldDescriptor::integer("age").optional()),
//! );
//! let class = form_for_model(&model);
//! assert_eq!(class.field_names(), vec!["display_name", "age"]);
//!
//! let form = class.bind(FormData::new().with("age", "old"), None);
//! assert!(!form.is_valid());
//! assert!(form.errors().has_field_error("display_name"));
//! assert!(form.errors().has_field_error("age"));
//! ```

use super::data::FormData;
use super::error::ValidationErrors;
use super::render::FormMarkup;
use super::widget::{BoundField, InputType, SelectOption, Widget, WidgetValue};
use crate::error::{ProfilesError, ProfilesResult};
use crate::model::{Choice, FieldDescriptor, FieldType, FieldValue, FieldValues, ModelSchema, OWNER_FIELD};
use crate::store::{ProfileDraft, ProfileRecord, RelationValues};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use validator::{ValidateEmail, ValidateUrl};

const REQUIRED: &str = "This field is required.";
const TEXTAREA_ROWS: u32 = 10;

/// A request-scoped profile form
///
/// Created fresh from a [`ProfileFormClass`] for every request.
pub trait ProfileForm: Send + Sync {
    /// Whether the form is bound and every field validated
    fn is_valid(&self) -> bool;

    /// Validation errors, empty for unbound forms
    fn errors(&self) -> &ValidationErrors;

    /// Render the form as HTML posting to `action`
    fn render(&self, action: &str, submit_label: &str) -> String;

    /// Build the record the form describes without writing it
    ///
    /// # Errors
    ///
    /// Returns [`ProfilesError::Form`] if the form did not validate
    fn save_uncommitted(&self) -> ProfilesResult<ProfileDraft>;

    /// Many-to-many values saved together with the record
    ///
    /// Forms without multi-valued fields keep the default.
    fn deferred_relations(&self) -> Option<&dyn DeferredRelations> {
        None
    }

    /// Names of fields whose submitted value differs from the initial data
    fn changed_fields(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Multi-valued fields saved alongside the record
pub trait DeferredRelations: Send + Sync {
    /// Cleaned many-to-many values keyed by field name
    fn many_to_many(&self) -> RelationValues;
}

/// Factory for profile forms
pub trait ProfileFormClass: Send + Sync + fmt::Debug {
    /// An unbound form showing `initial` (or the class's own initial data)
    fn unbound(&self, initial: Option<&FieldValues>) -> Box<dyn ProfileForm>;

    /// A form bound to submitted data
    fn bind(&self, data: FormData, initial: Option<&FieldValues>) -> Box<dyn ProfileForm>;
}

/// Form class synthesized from a model schema
#[derive(Debug, Clone)]
pub struct SchemaFormClass {
    fields: Arc<[FieldDescriptor]>,
    initial: FieldValues,
}

impl SchemaFormClass {
    /// Form field names in display order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn form(&self, data: Option<FormData>, initial: Option<&FieldValues>) -> SchemaForm {
        let initial = initial.unwrap_or(&self.initial).clone();
        let mut form = SchemaForm {
            fields: Arc::clone(&self.fields),
            initial,
            data,
            cleaned: FieldValues::new(),
            errors: ValidationErrors::new(),
        };
        form.full_clean();
        form
    }
}

impl ProfileFormClass for SchemaFormClass {
    fn unbound(&self, initial: Option<&FieldValues>) -> Box<dyn ProfileForm> {
        Box::new(self.form(None, initial))
    }

    fn bind(&self, data: FormData, initial: Option<&FieldValues>) -> Box<dyn ProfileForm> {
        Box::new(self.form(Some(data), initial))
    }
}

/// Build a form class for `model`
///
/// Every editable field except the owner reference, in schema order.
#[must_use]
pub fn form_for_model(model: &Arc<ModelSchema>) -> SchemaFormClass {
    let fields: Vec<FieldDescriptor> = model
        .fields()
        .iter()
        .filter(|f| f.editable && !f.is_owner() && f.field_type != FieldType::OwnerReference)
        .cloned()
        .collect();

    SchemaFormClass {
        fields: fields.into(),
        initial: FieldValues::new(),
    }
}

/// Build a form class for `model` carrying the current values of `instance`
#[must_use]
pub fn form_for_instance(model: &Arc<ModelSchema>, instance: &ProfileRecord) -> SchemaFormClass {
    SchemaFormClass {
        initial: instance.initial_data(),
        ..form_for_model(model)
    }
}

/// A form instance produced by [`SchemaFormClass`]
#[derive(Debug)]
pub struct SchemaForm {
    fields: Arc<[FieldDescriptor]>,
    initial: FieldValues,
    data: Option<FormData>,
    cleaned: FieldValues,
    errors: ValidationErrors,
}

impl SchemaForm {
    /// Whether the form was bound to submitted data
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    fn full_clean(&mut self) {
        let Some(ref data) = self.data else {
            return;
        };

        for field in self.fields.iter() {
            match clean_field(field, data) {
                Ok(value) => {
                    self.cleaned.insert(field.name.clone(), value);
                }
                Err((message, code)) => self.errors.add(&field.name, message, code),
            }
        }
    }

    fn bound_field(&self, descriptor: &FieldDescriptor) -> BoundField {
        let name = descriptor.name.as_str();
        let initial = self.initial.get(name);
        let submitted = self.data.as_ref().map(|data| data.get(name));

        let widget = match &descriptor.field_type {
            FieldType::Char { .. } => Widget::Input(InputType::Text),
            FieldType::Text => Widget::Textarea {
                rows: TEXTAREA_ROWS,
            },
            FieldType::Integer => Widget::Input(InputType::Number),
            FieldType::Date => Widget::Input(InputType::Date),
            FieldType::Email => Widget::Input(InputType::Email),
            FieldType::Url => Widget::Input(InputType::Url),
            FieldType::Boolean => Widget::Checkbox,
            FieldType::Choice { choices } => Widget::Select {
                options: std::iter::once(SelectOption::new("", "---------"))
                    .chain(select_options(choices))
                    .collect(),
                multiple: false,
            },
            FieldType::ManyToMany { choices } => Widget::Select {
                options: select_options(choices).collect(),
                multiple: true,
            },
            FieldType::OwnerReference => Widget::Input(InputType::Hidden),
        };

        // a bound form shows what was submitted, an unbound one its initial data
        let value = match descriptor.field_type {
            FieldType::Boolean => WidgetValue::Checked(submitted.map_or_else(
                || initial.is_some_and(FieldValue::is_true),
                |raw| raw.is_some_and(is_checked),
            )),
            FieldType::ManyToMany { .. } => WidgetValue::Selected(match self.data {
                Some(ref data) => data.get_all(name).into_iter().map(str::to_string).collect(),
                None => initial.map(|v| v.as_many().to_vec()).unwrap_or_default(),
            }),
            _ => submitted
                .map_or_else(|| initial.and_then(FieldValue::as_form_value), |raw| raw.map(str::to_string))
                .map_or(WidgetValue::Empty, WidgetValue::Text),
        };

        let mut field = BoundField::new(name, widget, descriptor.verbose_label());
        if let FieldType::Char { max_length } = descriptor.field_type {
            field.max_length = Some(max_length);
        }
        field.help_text.clone_from(&descriptor.help_text);
        field.required = descriptor.required;
        field.value = value;
        field
    }
}

impl ProfileForm for SchemaForm {
    fn is_valid(&self) -> bool {
        self.is_bound() && !self.errors.has_errors()
    }

    fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn render(&self, action: &str, submit_label: &str) -> String {
        FormMarkup {
            action,
            id: "profile-form",
            submit_label,
            fields: self.fields.iter().map(|f| self.bound_field(f)).collect(),
            errors: &self.errors,
        }
        .to_string()
    }

    fn save_uncommitted(&self) -> ProfilesResult<ProfileDraft> {
        if !self.is_valid() {
            return Err(ProfilesError::Form(
                "cannot save a profile form that did not validate".into(),
            ));
        }

        // values the form does not expose are carried over from the instance
        let mut values: FieldValues = self
            .initial
            .iter()
            .filter(|(name, value)| *name != OWNER_FIELD && !matches!(value, FieldValue::Many(_)))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        for field in self.fields.iter().filter(|f| !f.field_type.is_multi_valued()) {
            if let Some(value) = self.cleaned.get(&field.name) {
                values.insert(field.name.clone(), value.clone());
            }
        }

        Ok(ProfileDraft::new(values))
    }

    fn deferred_relations(&self) -> Option<&dyn DeferredRelations> {
        if self.fields.iter().any(|f| f.field_type.is_multi_valued()) {
            Some(self)
        } else {
            None
        }
    }

    fn changed_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| {
                let cleaned = self.cleaned.get(&f.name);
                let initial = self.initial.get(&f.name);
                cleaned.is_some() && cleaned != initial
            })
            .map(|f| f.name.clone())
            .collect()
    }
}

impl DeferredRelations for SchemaForm {
    fn many_to_many(&self) -> RelationValues {
        self.fields
            .iter()
            .filter(|f| f.field_type.is_multi_valued())
            .filter_map(|f| {
                self.cleaned
                    .get(&f.name)
                    .map(|v| (f.name.clone(), v.as_many().to_vec()))
            })
            .collect()
    }
}

fn select_options(choices: &[Choice]) -> impl Iterator<Item = SelectOption> + '_ {
    choices
        .iter()
        .map(|c| SelectOption::new(c.value.as_str(), c.label.as_str()))
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1")
}

fn invalid_choice(value: &str) -> (String, &'static str) {
    (
        format!("Select a valid choice. {value} is not one of the available choices."),
        "invalid_choice",
    )
}

fn has_web_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://", "ftp://", "ftps://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

type CleanResult = Result<FieldValue, (String, &'static str)>;

fn clean_field(field: &FieldDescriptor, data: &FormData) -> CleanResult {
    let name = field.name.as_str();

    match &field.field_type {
        FieldType::Boolean => {
            let checked = data.get(name).is_some_and(is_checked);
            if field.required && !checked {
                return Err((REQUIRED.into(), "required"));
            }
            Ok(FieldValue::Boolean(checked))
        }
        FieldType::ManyToMany { choices } => {
            // a selection is a set; repeats keep their first position
            let mut values: Vec<String> = Vec::new();
            for value in data.get_all(name) {
                if !value.is_empty() && !values.iter().any(|seen| seen == value) {
                    values.push(value.to_string());
                }
            }
            if values.is_empty() && field.required {
                return Err((REQUIRED.into(), "required"));
            }
            if let Some(bad) = values.iter().find(|v| !choices.iter().any(|c| &c.value == *v)) {
                return Err(invalid_choice(bad));
            }
            Ok(FieldValue::Many(values))
        }
        field_type => {
            let raw = data.get(name).map_or("", str::trim);
            if raw.is_empty() {
                if field.required {
                    return Err((REQUIRED.into(), "required"));
                }
                return Ok(match field_type {
                    FieldType::Char { .. } | FieldType::Text | FieldType::Choice { .. } => {
                        FieldValue::Text(String::new())
                    }
                    _ => FieldValue::Null,
                });
            }
            clean_scalar(field_type, raw.to_string())
        }
    }
}

fn clean_scalar(field_type: &FieldType, value: String) -> CleanResult {
    match field_type {
        FieldType::Char { max_length } => {
            let length = value.chars().count();
            if length > *max_length {
                return Err((
                    format!(
                        "Ensure this value has at most {max_length} characters (it has {length})."
                    ),
                    "max_length",
                ));
            }
            Ok(FieldValue::Text(value))
        }
        FieldType::Integer => value
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| ("Enter a whole number.".into(), "invalid")),
        FieldType::Date => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(|d| FieldValue::Text(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| ("Enter a valid date.".into(), "invalid")),
        FieldType::Email => {
            if value.validate_email() {
                Ok(FieldValue::Text(value))
            } else {
                Err(("Enter a valid email address.".into(), "invalid"))
            }
        }
        FieldType::Url => {
            if has_web_scheme(&value) && value.validate_url() {
                Ok(FieldValue::Text(value))
            } else {
                Err(("Enter a valid URL.".into(), "invalid"))
            }
        }
        FieldType::Choice { choices } => {
            if choices.iter().any(|c| c.value == value) {
                Ok(FieldValue::Text(value))
            } else {
                Err(invalid_choice(&value))
            }
        }
        FieldType::Text | FieldType::Boolean | FieldType::ManyToMany { .. } | FieldType::OwnerReference => {
            Ok(FieldValue::Text(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::new("accounts", "UserProfile")
                .field(FieldDescriptor::char("display_name", 10))
                .field(FieldDescriptor::text("bio").optional())
                .field(FieldDescriptor::integer("age").optional())
                .field(FieldDescriptor::boolean("newsletter"))
                .field(FieldDescriptor::date("birthday").optional())
                .field(FieldDescriptor::email("email").optional())
                .field(FieldDescriptor::url("website").optional())
                .field(FieldDescriptor::choice(
                    "country",
                    vec![Choice::new("is", "Iceland"), Choice::new("no", "Norway")],
                ).optional())
                .field(FieldDescriptor::many_to_many(
                    "interests",
                    vec![Choice::new("rust", "Rust"), Choice::new("htmx", "HTMX")],
                ).optional())
                .field(FieldDescriptor::char("internal_note", 50).not_editable().optional()),
        )
    }

    fn record(values: FieldValues) -> ProfileRecord {
        let now = Utc::now();
        ProfileRecord {
            id: 1,
            user_id: 9,
            model: "accounts.UserProfile".into(),
            values,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_and_non_editable_fields_are_excluded() {
        let class = form_for_model(&model());
        let names = class.field_names();
        assert!(!names.contains(&"user"));
        assert!(!names.contains(&"internal_note"));
        assert_eq!(names[0], "display_name");
        assert_eq!(names.last(), Some(&"interests"));
    }

    #[test]
    fn test_unbound_form_is_not_valid() {
        let form = form_for_model(&model()).unbound(None);
        assert!(!form.is_valid());
        assert!(!form.errors().has_errors());
        assert!(form.save_uncommitted().is_err());
    }

    #[test]
    fn test_valid_submission() {
        let data = FormData::new()
            .with("display_name", " Alice ")
            .with("age", "31")
            .with("newsletter", "on")
            .with("birthday", "1990-02-03")
            .with("email", "alice@example.com")
            .with("website", "https://example.com")
            .with("country", "is")
            .with("interests", "rust")
            .with("interests", "htmx");
        let form = form_for_model(&model()).bind(data, None);

        assert!(form.is_valid(), "{:?}", form.errors());
        let draft = form.save_uncommitted().unwrap();
        assert_eq!(draft.values["display_name"], FieldValue::Text("Alice".into()));
        assert_eq!(draft.values["age"], FieldValue::Integer(31));
        assert_eq!(draft.values["newsletter"], FieldValue::Boolean(true));
        assert!(!draft.values.contains_key("interests"));
        assert_eq!(draft.owner(), None);

        let relations = form.deferred_relations().unwrap().many_to_many();
        assert_eq!(relations["interests"], vec!["rust".to_string(), "htmx".to_string()]);
    }

    #[test]
    fn test_repeated_selections_collapse() {
        let data = FormData::new()
            .with("display_name", "Alice")
            .with("interests", "htmx")
            .with("interests", "rust")
            .with("interests", "htmx");
        let form = form_for_model(&model()).bind(data, None);

        assert!(form.is_valid(), "{:?}", form.errors());
        let relations = form.deferred_relations().unwrap().many_to_many();
        assert_eq!(relations["interests"], vec!["htmx".to_string(), "rust".to_string()]);
    }

    #[test]
    fn test_field_error_messages() {
        let data = FormData::new()
            .with("display_name", "far too long a name")
            .with("age", "thirty")
            .with("birthday", "03/02/1990")
            .with("email", "not-an-email")
            .with("website", "example")
            .with("country", "se")
            .with("interests", "cobol");
        let form = form_for_model(&model()).bind(data, None);
        let errors = form.errors();

        assert!(!form.is_valid());
        assert_eq!(
            errors.for_field("display_name")[0].message,
            "Ensure this value has at most 10 characters (it has 19)."
        );
        assert_eq!(errors.for_field("age")[0].message, "Enter a whole number.");
        assert_eq!(errors.for_field("birthday")[0].message, "Enter a valid date.");
        assert_eq!(errors.for_field("email")[0].message, "Enter a valid email address.");
        assert_eq!(errors.for_field("website")[0].message, "Enter a valid URL.");
        assert_eq!(
            errors.for_field("country")[0].message,
            "Select a valid choice. se is not one of the available choices."
        );
        assert_eq!(errors.for_field("interests")[0].code, "invalid_choice");
    }

    #[test]
    fn test_required_fields() {
        let model = Arc::new(
            ModelSchema::new("accounts", "Strict")
                .field(FieldDescriptor::char("nickname", 20))
                .field(FieldDescriptor::boolean("terms").label("Accept terms"))
                .field(FieldDescriptor {
                    required: true,
                    ..FieldDescriptor::boolean("agree")
                }),
        );
        let form = form_for_model(&model).bind(FormData::new(), None);

        assert_eq!(form.errors().for_field("nickname")[0].message, REQUIRED);
        assert!(!form.errors().has_field_error("terms"));
        assert_eq!(form.errors().for_field("agree")[0].code, "required");
    }

    #[test]
    fn test_render_unbound_instance_form_shows_current_values() {
        let mut values = FieldValues::new();
        values.insert("display_name".into(), FieldValue::Text("Alice".into()));
        values.insert("newsletter".into(), FieldValue::Boolean(true));
        values.insert("interests".into(), FieldValue::Many(vec!["htmx".into()]));

        let model = model();
        let class = form_for_instance(&model, &record(values));
        assert_eq!(class.initial.get("user"), Some(&FieldValue::Integer(9)));

        let html = class.unbound(None).render("/profiles/edit/", "Save");
        assert!(html.contains(r#"<input type="text" name="display_name" id="id_display_name" value="Alice""#));
        assert!(html.contains(" checked"));
        assert!(html.contains(r#"<option value="htmx" selected>HTMX</option>"#));
        assert!(!html.contains(r#"name="user""#));
        assert!(html.contains(">Save</button>"));
    }

    #[test]
    fn test_render_bound_form_keeps_submitted_values_and_errors() {
        let form = form_for_model(&model()).bind(FormData::new().with("age", "old"), None);
        let html = form.render("/profiles/create/", "Create");
        assert!(html.contains(r#"value="old""#));
        assert!(html.contains("This field is required."));
        assert!(html.contains("Enter a whole number."));
    }

    #[test]
    fn test_save_keeps_values_not_on_the_form() {
        let mut values = FieldValues::new();
        values.insert("display_name".into(), FieldValue::Text("Alice".into()));
        values.insert("internal_note".into(), FieldValue::Text("vip".into()));
        let model = model();
        let class = form_for_instance(&model, &record(values));

        let form = class.bind(FormData::new().with("display_name", "Alicia"), Some(&class.initial));
        let draft = form.save_uncommitted().unwrap();
        assert_eq!(draft.values["internal_note"], FieldValue::Text("vip".into()));
        assert_eq!(draft.values["display_name"], FieldValue::Text("Alicia".into()));
        assert!(!draft.values.contains_key("user"));
        assert!(form.changed_fields().contains(&"display_name".to_string()));
    }

    #[test]
    fn test_form_without_relations_has_no_deferred_save() {
        let model = Arc::new(
            ModelSchema::new("accounts", "Plain").field(FieldDescriptor::char("nickname", 20)),
        );
        let form = form_for_model(&model).bind(FormData::new().with("nickname", "al"), None);
        assert!(form.is_valid());
        assert!(form.deferred_relations().is_none());
    }
}
