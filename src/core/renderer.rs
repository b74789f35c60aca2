// src/core/renderer.rs

//! # Argument Renderer
//!
//! A state-free projection of an options value onto argv tokens (the executable
//! itself excluded). Token order:
//!
//! 1. The tool's implicit arguments, as one token.
//! 2. The command binding's implicit arguments, as one token.
//! 3. One block per rendered property: positive positions ascending, then
//!    unpositioned properties in store order (order of last set), then negative
//!    positions ascending.
//!
//! Only properties that are declared with an [`ArgumentRule`] and present in the
//! store produce tokens.

use crate::constants::PROCESS_KEYS;
use crate::core::options::{Options, shape_name};
use crate::core::template::{
    FormatTemplate, TemplateError, split_body, substitute_entry, substitute_value,
};
use crate::core::tool_options::ToolOptions;
use crate::models::{ArgumentRule, EscapeHook, OptionsSchema, PropertyDef, Shape, ValueKind};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures while rendering arguments.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The options type has no command binding.
    #[error("Options type '{0}' is not bound to any tool.")]
    MissingMetadata(&'static str),
    /// The stored value does not have the declared shape.
    #[error("Property '{key}' is declared as a {expected} but holds a {found}.")]
    UnsupportedShape {
        /// Store key of the property.
        key: String,
        /// Declared shape.
        expected: &'static str,
        /// Shape actually stored.
        found: &'static str,
    },
    /// The argument format of a property is malformed.
    #[error("Invalid format for property '{key}': {source}")]
    InvalidFormat {
        /// Store key of the property.
        key: String,
        /// Underlying error.
        #[source]
        source: TemplateError,
    },
}

/// Renders `options` into argument tokens using its type's registration table.
pub fn render_arguments<T: ToolOptions>(options: &T) -> Result<Vec<String>, RenderError> {
    render_with_schema(options.options(), T::schema())
}

/// Sort key: positive positions first, then zero, then negative; ascending within a group.
fn ordering_key(position: i32) -> (u8, i32) {
    match position.signum() {
        1 => (0, position),
        0 => (1, 0),
        _ => (2, position),
    }
}

/// Renders a raw options bag against an explicit schema.
pub fn render_with_schema(
    options: &Options,
    schema: &OptionsSchema,
) -> Result<Vec<String>, RenderError> {
    let binding = schema
        .binding
        .ok_or(RenderError::MissingMetadata(schema.type_name))?;

    // --- Implicit arguments: tool first, then command ---
    let mut tokens = Vec::new();
    for implicit in [binding.tool.implicit_arguments, binding.implicit_arguments]
        .into_iter()
        .flatten()
    {
        if !implicit.trim().is_empty() {
            tokens.push(implicit.to_string());
        }
    }

    // --- Collect declared, rendered properties in store order ---
    let mut blocks: Vec<(&PropertyDef, &ArgumentRule, &Value)> = options
        .store()
        .iter()
        .filter(|(key, _)| !PROCESS_KEYS.contains(key))
        .filter_map(|(key, value)| {
            let property = schema.find(key)?;
            let rule = property.rule.as_ref()?;
            Some((property, rule, value))
        })
        .collect();
    // Stable: unpositioned properties keep store order.
    blocks.sort_by_key(|(_, rule, _)| ordering_key(rule.position));

    // --- Expand each block ---
    for (property, rule, value) in blocks {
        let block = PropertyRenderer {
            property,
            rule,
            escape: binding.tool.escape,
        };
        block.render(value, &mut tokens)?;
    }

    log::debug!(
        "Rendered {} argument tokens for '{}'",
        tokens.len(),
        schema.type_name
    );
    Ok(tokens)
}

struct PropertyRenderer<'a> {
    property: &'a PropertyDef,
    rule: &'a ArgumentRule,
    escape: Option<EscapeHook>,
}

impl PropertyRenderer<'_> {
    fn render(&self, value: &Value, tokens: &mut Vec<String>) -> Result<(), RenderError> {
        if value.is_null() {
            return Ok(());
        }
        match self.property.shape {
            Shape::Scalar => self.render_scalar(value, tokens),
            Shape::Sequence => self.render_sequence(value, tokens),
            Shape::Map => self.render_map(value, tokens),
            Shape::MultiMap => self.render_multi_map(value, tokens),
        }
    }

    fn unsupported(&self, found: &Value) -> RenderError {
        RenderError::UnsupportedShape {
            key: self.property.key.to_string(),
            expected: self.property.shape.name(),
            found: shape_name(found),
        }
    }

    fn template(&self, allow_key: bool) -> Result<FormatTemplate<'static>, RenderError> {
        FormatTemplate::parse(self.rule.format, allow_key).map_err(|source| {
            RenderError::InvalidFormat {
                key: self.property.key.to_string(),
                source,
            }
        })
    }

    fn require_body(&self, template: &FormatTemplate<'static>) -> Result<&'static str, RenderError> {
        template
            .require_body()
            .map_err(|source| RenderError::InvalidFormat {
                key: self.property.key.to_string(),
                source,
            })
    }

    fn escape(&self, text: String) -> String {
        match self.escape {
            Some(hook) => hook(&text),
            None => text,
        }
    }

    /// Converts one stored value into its substituted text.
    fn render_value(&self, value: &Value) -> Result<String, RenderError> {
        if let Some(formatter) = self.rule.formatter {
            return Ok(formatter(value, self.property));
        }
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => return Err(self.unsupported(value)),
        };
        Ok(self.escape(text))
    }

    fn render_scalar(&self, value: &Value, tokens: &mut Vec<String>) -> Result<(), RenderError> {
        if value.is_array() || value.is_object() {
            return Err(self.unsupported(value));
        }
        let template = self.template(false)?;

        if self.property.kind == ValueKind::Bool && !template.has_value() {
            if value.as_bool() == Some(true) {
                tokens.extend(template.segments().iter().map(|s| s.to_string()));
            }
            return Ok(());
        }

        let rendered = self.render_value(value)?;
        for segment in template.segments() {
            let token = substitute_value(segment, &rendered);
            if !token.is_empty() {
                tokens.push(token);
            }
        }
        Ok(())
    }

    fn render_sequence(&self, value: &Value, tokens: &mut Vec<String>) -> Result<(), RenderError> {
        let items = value.as_array().ok_or_else(|| self.unsupported(value))?;
        if items.is_empty() {
            return Ok(());
        }
        let template = self.template(false)?;
        let body = self.require_body(&template)?;

        let rendered = items
            .iter()
            .map(|item| self.render_value(item))
            .collect::<Result<Vec<_>, _>>()?;

        tokens.extend(template.prefix().iter().map(|s| s.to_string()));
        match self.rule.list_separator {
            Some(separator) => tokens.push(substitute_value(body, &rendered.join(separator))),
            None => tokens.extend(rendered.iter().map(|r| substitute_value(body, r))),
        }
        tokens.extend(template.suffix().iter().map(|s| s.to_string()));
        Ok(())
    }

    fn render_map(&self, value: &Value, tokens: &mut Vec<String>) -> Result<(), RenderError> {
        let entries = value.as_object().ok_or_else(|| self.unsupported(value))?;
        if entries.is_empty() {
            return Ok(());
        }
        let template = self.template(true)?;
        let (lead, body) = self.entry_body(&template)?;

        let mut rendered = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let key = self.escape(key.clone());
            rendered.push(substitute_entry(body, &key, &self.render_value(entry)?));
        }
        self.emit_entries(&template, lead, rendered, tokens);
        Ok(())
    }

    fn render_multi_map(&self, value: &Value, tokens: &mut Vec<String>) -> Result<(), RenderError> {
        let entries: &Map<String, Value> =
            value.as_object().ok_or_else(|| self.unsupported(value))?;
        let template = self.template(true)?;
        let (lead, body) = self.entry_body(&template)?;

        let mut rendered = Vec::new();
        for (key, values) in entries {
            let values = values.as_array().ok_or_else(|| self.unsupported(values))?;
            let key = self.escape(key.clone());
            let texts = values
                .iter()
                .map(|v| self.render_value(v))
                .collect::<Result<Vec<_>, _>>()?;
            match self.rule.list_separator {
                Some(separator) if !texts.is_empty() => {
                    rendered.push(substitute_entry(body, &key, &texts.join(separator)));
                }
                Some(_) => {}
                None => rendered.extend(texts.iter().map(|t| substitute_entry(body, &key, t))),
            }
        }
        if rendered.is_empty() {
            return Ok(());
        }
        self.emit_entries(&template, lead, rendered, tokens);
        Ok(())
    }

    /// The per-entry template. With an item separator, the literal lead of the body
    /// is written once in front of the joined entries.
    fn entry_body(
        &self,
        template: &FormatTemplate<'static>,
    ) -> Result<(&'static str, &'static str), RenderError> {
        let body = self.require_body(template)?;
        Ok(match self.rule.item_separator {
            Some(_) => split_body(body),
            None => ("", body),
        })
    }

    fn emit_entries(
        &self,
        template: &FormatTemplate<'static>,
        lead: &str,
        rendered: Vec<String>,
        tokens: &mut Vec<String>,
    ) {
        tokens.extend(template.prefix().iter().map(|s| s.to_string()));
        match self.rule.item_separator {
            Some(separator) => tokens.push(format!("{}{}", lead, rendered.join(separator))),
            None => tokens.extend(rendered),
        }
        tokens.extend(template.suffix().iter().map(|s| s.to_string()));
    }
}
