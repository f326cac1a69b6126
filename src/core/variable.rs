//! Variable specifications declared by prompt templates

use serde_yml::{Mapping, Value};

/// Describes one named variable a template accepts
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    /// Variable name as referenced in the template body
    pub name: String,

    /// Whether callers must supply a value
    pub required: bool,

    /// Value used when an optional variable is not supplied.
    /// Ignored for required variables.
    pub default: Option<Value>,

    /// Human-readable description
    pub description: String,
}

impl VariableSpec {
    /// A required variable with no description
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
            description: String::new(),
        }
    }

    /// An optional variable, with an optional default
    pub fn optional(name: impl Into<String>, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: default.filter(|v| !v.is_null()),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build a spec from the raw value stored under `variables.<name>`.
    ///
    /// Anything other than a mapping (including no value at all) declares a
    /// required variable without a description. Sub-fields with the wrong
    /// type fall back to their defaults.
    pub fn from_raw(name: impl Into<String>, raw: Option<&Value>) -> Self {
        let mut spec = Self::required(name);

        let Some(fields) = raw.and_then(Value::as_mapping) else {
            return spec;
        };

        if let Some(required) = fields.get("required").and_then(Value::as_bool) {
            spec.required = required;
        }
        if let Some(description) = fields.get("description").and_then(Value::as_str) {
            spec.description = description.to_string();
        }
        spec.default = fields.get("default").filter(|v| !v.is_null()).cloned();

        spec
    }

    /// The default that applies at render time, if any
    pub fn effective_default(&self) -> Option<&Value> {
        if self.required {
            None
        } else {
            self.default.as_ref()
        }
    }

    /// Raw form written back to storage.
    ///
    /// `required` and `description` are always present; `default` only when
    /// it can take effect.
    pub fn to_raw(&self) -> Value {
        let mut fields = Mapping::new();
        fields.insert(Value::from("required"), Value::from(self.required));
        fields.insert(
            Value::from("description"),
            Value::from(self.description.as_str()),
        );
        if let Some(default) = self.effective_default() {
            fields.insert(Value::from("default"), default.clone());
        }
        Value::Mapping(fields)
    }
}
