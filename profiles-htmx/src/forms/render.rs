//! HTML for profile forms
//!
//! Each field renders as a `<p class="field">` holding its label, an error
//! list when the field failed validation, the widget, and help text. All
//! values are escaped.

use super::error::ValidationErrors;
use super::widget::{BoundField, InputType, Widget};
use std::borrow::Cow;
use std::fmt::{self, Write};

/// A complete `<form>` posting to `action`
///
/// # Examples
///
/// ```rust
/// use profiles_htmx::forms::{BoundField, FormMarkup, InputType, ValidationErrors, Widget};
///
/// let mut errors = ValidationErrors::new();
/// errors.add("location", "This field is required.", "required");
///
/// let html = FormMarkup {
///     action: "/profiles/edit/",
///     id: "profile-form",
///     submit_label: "Save",
///     fields: vec![BoundField::new("location", Widget::Input(InputType::Text), "Location")],
///     errors: &errors,
/// }
/// .to_string();
///
/// assert!(html.contains(r#"<ul class="errorlist"><li>This field is required.</li></ul>"#));
/// ```
#[derive(Debug)]
pub struct FormMarkup<'a> {
    /// Target URL
    pub action: &'a str,
    /// Element id of the form
    pub id: &'a str,
    /// Text of the submit button
    pub submit_label: &'a str,
    /// Fields in display order
    pub fields: Vec<BoundField>,
    /// Errors shown next to their fields
    pub errors: &'a ValidationErrors,
}

impl fmt::Display for FormMarkup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<form action="{}" method="POST" id="{}" novalidate>"#,
            escape(self.action),
            escape(self.id)
        )?;
        for field in &self.fields {
            write_field(f, field, self.errors)?;
        }
        writeln!(f, r#"  <button type="submit">{}</button>"#, escape(self.submit_label))?;
        f.write_str("</form>")
    }
}

fn write_field(out: &mut impl Write, field: &BoundField, errors: &ValidationErrors) -> fmt::Result {
    let id = field.html_id();

    if field.widget == Widget::Input(InputType::Hidden) {
        out.write_str("  ")?;
        write_input(out, field, InputType::Hidden, &id)?;
        return out.write_char('\n');
    }

    let field_errors = errors.for_field(&field.name);
    let class = if field_errors.is_empty() { "field" } else { "field has-error" };
    writeln!(out, r#"  <p class="{class}">"#)?;

    if !field_errors.is_empty() {
        out.write_str(r#"    <ul class="errorlist">"#)?;
        for error in field_errors {
            write!(out, "<li>{}</li>", escape(&error.message))?;
        }
        out.write_str("</ul>\n")?;
    }

    out.write_str("    ")?;
    match field.widget {
        Widget::Checkbox => {
            write!(out, r#"<input type="checkbox" name="{}" id="{id}""#, escape(&field.name))?;
            if field.is_checked() {
                out.write_str(" checked")?;
            }
            write_required(out, field)?;
            write!(out, r#"> <label for="{id}">{}</label>"#, escape(&field.label))?;
        }
        ref widget => {
            writeln!(out, r#"<label for="{id}">{}:</label>"#, escape(&field.label))?;
            out.write_str("    ")?;
            match widget {
                Widget::Input(input_type) => write_input(out, field, *input_type, &id)?,
                Widget::Textarea { rows } => {
                    write!(
                        out,
                        r#"<textarea name="{}" id="{id}" rows="{rows}""#,
                        escape(&field.name)
                    )?;
                    write_required(out, field)?;
                    write!(out, ">{}</textarea>", escape(field.text().unwrap_or_default()))?;
                }
                Widget::Select { options, multiple } => {
                    write!(out, r#"<select name="{}" id="{id}""#, escape(&field.name))?;
                    if *multiple {
                        out.write_str(" multiple")?;
                    }
                    write_required(out, field)?;
                    out.write_char('>')?;
                    for option in options {
                        write!(out, r#"<option value="{}""#, escape(&option.value))?;
                        if field.is_selected(&option.value) {
                            out.write_str(" selected")?;
                        }
                        write!(out, ">{}</option>", escape(&option.label))?;
                    }
                    out.write_str("</select>")?;
                }
                Widget::Checkbox => {}
            }
        }
    }
    out.write_char('\n')?;

    if let Some(ref help) = field.help_text {
        writeln!(out, r#"    <span class="helptext">{}</span>"#, escape(help))?;
    }
    out.write_str("  </p>\n")
}

fn write_input(out: &mut impl Write, field: &BoundField, input_type: InputType, id: &str) -> fmt::Result {
    write!(
        out,
        r#"<input type="{}" name="{}" id="{id}""#,
        input_type.as_str(),
        escape(&field.name)
    )?;
    if let Some(text) = field.text() {
        write!(out, r#" value="{}""#, escape(text))?;
    }
    if let Some(max_length) = field.max_length {
        write!(out, r#" maxlength="{max_length}""#)?;
    }
    write_required(out, field)?;
    out.write_char('>')
}

fn write_required(out: &mut impl Write, field: &BoundField) -> fmt::Result {
    if field.required {
        out.write_str(" required")?;
    }
    Ok(())
}

/// Escape text for element content and double-quoted attributes
fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
