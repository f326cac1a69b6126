//! Prompt templates: variable contract, validation and rendering
//!
//! A [`PromptTemplate`] is plain data. The minijinja environment used to
//! check and render the body is built on demand, so constructing, cloning
//! and comparing templates never touches the templating engine.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Deserialize;
use serde_yml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::error::{DocumentError, TemplateError};
use crate::core::variable::VariableSpec;

/// Name given to documents that do not carry one.
///
/// The registry replaces it with the file stem on load.
pub const UNNAMED: &str = "unnamed";

/// Values supplied by the caller at render time, keyed by variable name
pub type Inputs = BTreeMap<String, minijinja::Value>;

/// A versioned prompt template and the variables it accepts
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pub name: String,

    /// Expected to be an integer >= 1; other values load but fail [`validate`](Self::validate)
    pub version: Version,

    pub description: String,

    /// Raw template source
    pub template: String,

    /// Declared variables in declaration order, names unique
    pub variables: Vec<VariableSpec>,
}

/// Version number of a template as written in its document.
///
/// Anything that is not an integer is kept as written so it can be reported
/// by validation instead of failing the load.
#[derive(Debug, Clone, PartialEq)]
pub enum Version {
    Number(i64),
    Invalid(Value),
}

impl Version {
    /// The integer version, if the document carried one
    pub fn number(&self) -> Option<i64> {
        match self {
            Version::Number(n) => Some(*n),
            Version::Invalid(_) => None,
        }
    }

    /// An integer of at least 1
    pub fn is_valid(&self) -> bool {
        matches!(self, Version::Number(n) if *n >= 1)
    }

    fn from_value(value: Value) -> Self {
        match value.as_i64() {
            Some(n) => Version::Number(n),
            None => Version::Invalid(value),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Version::Number(n) => Value::from(*n),
            Version::Invalid(raw) => raw.clone(),
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::Number(1)
    }
}

impl From<i64> for Version {
    fn from(n: i64) -> Self {
        Version::Number(n)
    }
}

impl PartialEq<i64> for Version {
    fn eq(&self, other: &i64) -> bool {
        self.number() == Some(*other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Number(n) => write!(f, "{}", n),
            Version::Invalid(Value::String(s)) => f.write_str(s),
            Version::Invalid(raw) => match serde_yml::to_string(raw) {
                Ok(text) => f.write_str(text.trim_end()),
                Err(_) => write!(f, "{:?}", raw),
            },
        }
    }
}

/// Document shape as stored on disk; every key is optional
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    version: Option<Value>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    template: Option<String>,

    #[serde(default)]
    variables: Option<Mapping>,
}

impl PromptTemplate {
    /// Version 1 template with no description or variables
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Version::default(),
            description: String::new(),
            template: template.into(),
            variables: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Version::Number(version);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a variable, replacing any earlier declaration with the same name
    pub fn with_variable(mut self, spec: VariableSpec) -> Self {
        match self.variables.iter_mut().find(|v| v.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.variables.push(spec),
        }
        self
    }

    /// Build a template from a parsed YAML document.
    ///
    /// Missing keys take their defaults; a missing name becomes [`UNNAMED`].
    pub fn parse(document: Value) -> Result<Self, DocumentError> {
        if !document.is_mapping() {
            return Err(DocumentError::NotAMapping {
                found: value_kind(&document),
            });
        }

        let raw: RawDocument = serde_yml::from_value(document).map_err(DocumentError::Field)?;

        let mut variables = Vec::new();
        for (key, spec) in raw.variables.iter().flatten() {
            let name = match key.as_str() {
                Some(name) if !name.trim().is_empty() => name,
                _ => return Err(DocumentError::VariableName(format!("{:?}", key))),
            };
            variables.push(VariableSpec::from_raw(name, Some(spec)));
        }

        Ok(Self {
            name: raw.name.unwrap_or_else(|| UNNAMED.to_string()),
            version: raw.version.map(Version::from_value).unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            template: raw.template.unwrap_or_default(),
            variables,
        })
    }

    /// Document form suitable for writing back to storage
    pub fn serialize(&self) -> Value {
        let mut variables = Mapping::new();
        for spec in &self.variables {
            variables.insert(Value::from(spec.name.as_str()), spec.to_raw());
        }

        let mut document = Mapping::new();
        document.insert(Value::from("name"), Value::from(self.name.as_str()));
        document.insert(Value::from("version"), self.version.to_value());
        document.insert(
            Value::from("description"),
            Value::from(self.description.as_str()),
        );
        document.insert(Value::from("variables"), Value::Mapping(variables));
        document.insert(Value::from("template"), Value::from(self.template.as_str()));
        Value::Mapping(document)
    }

    /// YAML text of [`serialize`](Self::serialize)
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(&self.serialize())
    }

    /// Look up a declared variable
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Check the template itself. Returns every problem found; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let env = environment();

        match env.template_from_str(&self.template) {
            Ok(compiled) => {
                let mut referenced: Vec<String> =
                    compiled.undeclared_variables(false).into_iter().collect();
                referenced.sort();
                for name in referenced {
                    if self.variable(&name).is_none() {
                        errors.push(format!(
                            "Variable '{}' used in template but not defined in variables",
                            name
                        ));
                    }
                }
            }
            Err(e) => errors.push(format!("Template syntax error: {}", e)),
        }

        if !self.version.is_valid() {
            errors.push(format!(
                "Version must be a positive integer, got: {}",
                self.version
            ));
        }

        errors
    }

    /// Check caller inputs against the declared variables
    pub fn validate_inputs(&self, inputs: &Inputs) -> Vec<String> {
        let mut errors = Vec::new();

        for spec in &self.variables {
            if spec.required && !inputs.contains_key(&spec.name) {
                errors.push(format!("Required variable '{}' is missing", spec.name));
            }
        }

        for name in inputs.keys() {
            if self.variable(name).is_none() {
                errors.push(format!("Unknown variable '{}' provided", name));
            }
        }

        errors
    }

    /// Render the template with `inputs`, applying defaults of optional variables.
    ///
    /// Fails with [`TemplateError::InvalidInputs`] listing every contract
    /// violation, or [`TemplateError::Render`] when the engine fails,
    /// including when a referenced name is still undefined.
    pub fn render(&self, inputs: &Inputs) -> Result<String, TemplateError> {
        let violations = self.validate_inputs(inputs);
        if !violations.is_empty() {
            return Err(TemplateError::InvalidInputs(violations));
        }

        let context = self.context(inputs);

        let env = environment();
        let compiled = env.template_from_str(&self.template)?;
        Ok(compiled.render(&context)?)
    }

    /// Substitution context: supplied values, then defaults, then pass-through inputs
    fn context(&self, inputs: &Inputs) -> BTreeMap<String, minijinja::Value> {
        let mut context = BTreeMap::new();

        for spec in &self.variables {
            if let Some(value) = inputs.get(&spec.name) {
                context.insert(spec.name.clone(), value.clone());
            } else if let Some(default) = spec.effective_default() {
                context.insert(
                    spec.name.clone(),
                    minijinja::Value::from_serialize(default),
                );
            }
        }

        for (name, value) in inputs {
            context
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }

        context
    }

    /// Names of required variables in declaration order
    pub fn required_variables(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.required)
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Names of optional variables in declaration order
    pub fn optional_variables(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| !v.required)
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Names referenced by the body that are not bound inside it.
    ///
    /// Returns `None` when the body does not compile.
    pub fn referenced_variables(&self) -> Option<BTreeSet<String>> {
        let env = environment();
        let compiled = env.template_from_str(&self.template).ok()?;
        Some(compiled.undeclared_variables(false).into_iter().collect())
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// Engine settings shared by validation and rendering.
///
/// Output is plain text, so auto-escaping is off; a trailing newline in the
/// source survives rendering; undefined names are errors.
fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
