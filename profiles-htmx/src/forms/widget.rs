//! Widgets for profile form fields
//!
//! A [`BoundField`] is one model field ready to draw: its widget, label, and
//! the value to show (submitted data on a bound form, initial data otherwise).

/// `type` attribute of an `<input>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// `text`
    Text,
    /// `number`
    Number,
    /// `date`
    Date,
    /// `email`
    Email,
    /// `url`
    Url,
    /// `hidden`
    Hidden,
}

impl InputType {
    /// Attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
            Self::Hidden => "hidden",
        }
    }
}

/// An `<option>` of a select widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Option submitting `value`, shown as `label`
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How a field is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Single-line `<input>`
    Input(InputType),
    /// `<textarea>` with a row count
    Textarea {
        /// Visible rows
        rows: u32,
    },
    /// `<select>`, multi-valued when `multiple`
    Select {
        /// Choices in display order
        options: Vec<SelectOption>,
        /// Whether several options may be selected
        multiple: bool,
    },
    /// Checkbox submitting `on`
    Checkbox,
}

/// What a widget currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetValue {
    /// Nothing entered
    #[default]
    Empty,
    /// A single text value
    Text(String),
    /// Selected options of a multiple select
    Selected(Vec<String>),
    /// Checkbox state
    Checked(bool),
}

/// A form field ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    /// Submitted name
    pub name: String,
    /// Widget used to draw the field
    pub widget: Widget,
    /// Label text
    pub label: String,
    /// Help text shown after the widget
    pub help_text: Option<String>,
    /// Whether the field must be filled in
    pub required: bool,
    /// `maxlength` of text inputs
    pub max_length: Option<usize>,
    /// Current value
    pub value: WidgetValue,
}

impl BoundField {
    /// Field `name` drawn with `widget`, labelled `label`
    #[must_use]
    pub fn new(name: impl Into<String>, widget: Widget, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widget,
            label: label.into(),
            help_text: None,
            required: false,
            max_length: None,
            value: WidgetValue::Empty,
        }
    }

    /// Element id, `id_<name>`
    #[must_use]
    pub fn html_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Whether the option submitting `value` is selected
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        match self.value {
            WidgetValue::Text(ref current) => current == value,
            WidgetValue::Selected(ref current) => current.iter().any(|v| v == value),
            WidgetValue::Empty | WidgetValue::Checked(_) => false,
        }
    }

    /// Whether a checkbox is ticked
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        matches!(self.value, WidgetValue::Checked(true))
    }

    /// Text shown in an input or textarea
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self.value {
            WidgetValue::Text(ref text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interests() -> Widget {
        Widget::Select {
            options: vec![SelectOption::new("rust", "Rust"), SelectOption::new("go", "Go")],
            multiple: true,
        }
    }

    #[test]
    fn test_html_id() {
        let field = BoundField::new("website", Widget::Input(InputType::Url), "Website");
        assert_eq!(field.html_id(), "id_website");
    }

    #[test]
    fn test_multiple_selection() {
        let mut field = BoundField::new("interests", interests(), "Interests");
        field.value = WidgetValue::Selected(vec!["rust".into()]);
        assert!(field.is_selected("rust"));
        assert!(!field.is_selected("go"));
        assert_eq!(field.text(), None);
    }

    #[test]
    fn test_single_selection_uses_text() {
        let mut field = BoundField::new("country", interests(), "Country");
        field.value = WidgetValue::Text("go".into());
        assert!(field.is_selected("go"));
        assert!(!field.is_checked());
    }
}
