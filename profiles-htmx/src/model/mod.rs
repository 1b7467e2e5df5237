//! Profile model descriptors
//!
//! A profile model is described by an explicit [`ModelSchema`]: an ordered
//! list of field descriptors attached to an `app_label.ModelName` label.
//! Forms are synthesized from the schema, so the schema is the single source
//! of truth for which fields a profile has and how they validate.
//!
//! Every schema carries the owner reference field [`OWNER_FIELD`], which ties
//! a profile to exactly one user and is never exposed on a form.
//!
//! # Example
//!
//! ```rust
//! use profiles_htmx::model::{Choice, FieldDescriptor, ModelSchema};
//!
//! let schema = ModelSchema::new("accounts", "UserProfile")
//!     .field(FieldDescriptor::char("display_name", 60))
//!     .field(FieldDescriptor::text("bio").optional())
//!     .field(FieldDescriptor::many_to_many(
//!         "interests",
//!         vec![Choice::new("rust", "Rust"), Choice::new("htmx", "HTMX")],
//!     ).optional());
//!
//! assert_eq!(schema.label(), "accounts.UserProfile");
//! assert!(schema.field_named("user").is_some());
//! ```

pub mod registry;

pub use registry::{resolve_profile_model, ModelRegistry};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the field relating a profile to its owning user
pub const OWNER_FIELD: &str = "user";

/// A selectable value for choice and many-to-many fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Stored value
    pub value: String,
    /// Human readable label
    pub label: String,
}

impl Choice {
    /// Create a new choice
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Field types a profile model may declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Single line text with a maximum length
    Char {
        /// Maximum number of characters
        max_length: usize,
    },
    /// Multi-line text
    Text,
    /// Whole number
    Integer,
    /// True/false flag
    Boolean,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// Email address
    Email,
    /// Absolute URL
    Url,
    /// One value out of a fixed set
    Choice {
        /// Allowed values
        choices: Vec<Choice>,
    },
    /// Any number of values out of a fixed set, saved after the record itself
    ManyToMany {
        /// Allowed values
        choices: Vec<Choice>,
    },
    /// Reference to the owning user
    OwnerReference,
}

impl FieldType {
    /// Whether values of this type are stored as a list
    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        matches!(self, Self::ManyToMany { .. })
    }
}

/// Description of a single model field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name (form input name and storage key)
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Whether a value must be supplied
    pub required: bool,
    /// Whether the field appears on synthesized forms
    pub editable: bool,
    /// Label override
    pub label: Option<String>,
    /// Help text shown below the input
    pub help_text: Option<String>,
}

impl FieldDescriptor {
    /// Create a required, editable field of the given type
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            editable: true,
            label: None,
            help_text: None,
        }
    }

    /// Single line text field
    #[must_use]
    pub fn char(name: impl Into<String>, max_length: usize) -> Self {
        Self::new(name, FieldType::Char { max_length })
    }

    /// Multi-line text field
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Whole number field
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Boolean field; optional by default since an unchecked box is a value
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean).optional()
    }

    /// Date field
    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Email field
    #[must_use]
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email)
    }

    /// URL field
    #[must_use]
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Url)
    }

    /// Single choice field
    #[must_use]
    pub fn choice(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(name, FieldType::Choice { choices })
    }

    /// Multi-valued choice field
    #[must_use]
    pub fn many_to_many(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(name, FieldType::ManyToMany { choices })
    }

    /// Allow the field to be left blank
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Keep the field off synthesized forms
    #[must_use]
    pub const fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Set the label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set help text
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Label to display: the override, or the name with underscores as
    /// spaces and the first letter capitalized
    #[must_use]
    pub fn verbose_label(&self) -> String {
        if let Some(ref label) = self.label {
            return label.clone();
        }
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Whether this is the owner reference field
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.name == OWNER_FIELD
    }
}

/// Schema of a profile model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    app_label: String,
    model_name: String,
    fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
    /// Create a schema holding only the owner reference field
    #[must_use]
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            model_name: model_name.into(),
            fields: vec![FieldDescriptor::new(OWNER_FIELD, FieldType::OwnerReference)
                .not_editable()],
        }
    }

    /// Append a field descriptor
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// App label half of the model label
    #[must_use]
    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    /// Model name half of the model label
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// `app_label.ModelName`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    /// All fields in declaration order, owner reference included
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields stored alongside the record
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !f.is_owner() && !f.field_type.is_multi_valued())
    }

    /// Fields stored as relations after the record is saved
    pub fn many_to_many_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.field_type.is_multi_valued())
    }
}

/// A stored or submitted field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// Text (also dates, emails, URLs and single choices)
    Text(String),
    /// Multiple values
    Many(Vec<String>),
}

impl FieldValue {
    /// Value as it appears in a single-valued form input
    #[must_use]
    pub fn as_form_value(&self) -> Option<String> {
        match self {
            Self::Null | Self::Many(_) => None,
            Self::Boolean(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Values of a multi-valued field (empty for anything else)
    #[must_use]
    pub fn as_many(&self) -> &[String] {
        match self {
            Self::Many(values) => values,
            _ => &[],
        }
    }

    /// Whether the value is checked / true
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }
}

/// Field name to value mapping
pub type FieldValues = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_schema_has_owner_field() {
        let schema = ModelSchema::new("accounts", "UserProfile");
        let owner = schema.field_named(OWNER_FIELD).unwrap();
        assert_eq!(owner.field_type, FieldType::OwnerReference);
        assert!(!owner.editable);
        assert_eq!(schema.label(), "accounts.UserProfile");
    }

    #[test]
    fn test_scalar_and_many_to_many_split() {
        let schema = ModelSchema::new("accounts", "UserProfile")
            .field(FieldDescriptor::char("nickname", 20))
            .field(FieldDescriptor::many_to_many("tags", vec![Choice::new("a", "A")]));

        let scalar: Vec<_> = schema.scalar_fields().map(|f| f.name.as_str()).collect();
        let many: Vec<_> = schema.many_to_many_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(scalar, vec!["nickname"]);
        assert_eq!(many, vec!["tags"]);
    }

    #[test]
    fn test_verbose_label() {
        assert_eq!(FieldDescriptor::text("home_page").verbose_label(), "Home page");
        assert_eq!(
            FieldDescriptor::text("bio").label("About you").verbose_label(),
            "About you"
        );
    }

    #[test]
    fn test_boolean_defaults_to_optional() {
        assert!(!FieldDescriptor::boolean("newsletter").required);
    }

    #[test]
    fn test_field_value_json_shape() {
        let mut values = FieldValues::new();
        values.insert("age".into(), FieldValue::Integer(31));
        values.insert("bio".into(), FieldValue::Text("hi".into()));
        values.insert("tags".into(), FieldValue::Many(vec!["a".into()]));
        values.insert("site".into(), FieldValue::Null);

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"age": 31, "bio": "hi", "site": null, "tags": ["a"]})
        );

        let back: FieldValues = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }
}
