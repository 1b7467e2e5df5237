//! Profile forms: synthesis, validation, and rendering
//!
//! - [`form_for_model`] and [`form_for_instance`] synthesize a form class from
//!   a [`crate::model::ModelSchema`]
//! - [`ProfileFormClass`] / [`ProfileForm`] is the seam for hand-written forms
//! - [`FormData`] carries submitted pairs, repeated names included
//! - [`FormMarkup`] draws [`BoundField`]s with their [`ValidationErrors`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use profiles_htmx::forms::{form_for_model, FormData, ProfileFormClass};
//! use profiles_htmx::model::{FieldDescriptor, ModelSchema};
//!
//! let model = Arc::new(
//!     ModelSchema::new("accounts", "UserProfile").field(FieldDescriptor::email("email")),
//! );
//! let form = form_for_model(&model).bind(FormData::new().with("email", "nope"), None);
//!
//! assert!(!form.is_valid());
//! assert!(form.render("/profiles/create/", "Create").contains("Enter a valid email address."));
//! ```

mod data;
mod error;
mod render;
mod synth;
mod widget;

pub use data::FormData;
pub use error::{FieldError, ValidationErrors};
pub use render::FormMarkup;
pub use synth::{
    form_for_instance, form_for_model, DeferredRelations, ProfileForm, ProfileFormClass,
    SchemaForm, SchemaFormClass,
};
pub use widget::{BoundField, InputType, SelectOption, Widget, WidgetValue};
