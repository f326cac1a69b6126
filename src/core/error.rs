//! Error types for documents, templates and the registry

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::yaml::diagnostics::YamlSyntaxError;

/// A parsed YAML document that does not have the prompt document shape
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    #[error("expected a mapping at the top level of the document, found {found}")]
    #[diagnostic(
        code(prompt_registry::document::not_a_mapping),
        help("A prompt document is a mapping with keys like `name`, `version` and `template`")
    )]
    NotAMapping { found: &'static str },

    #[error("invalid document field: {0}")]
    #[diagnostic(code(prompt_registry::document::field))]
    Field(#[source] serde_yml::Error),

    #[error("variable names must be non-empty strings, found {0}")]
    #[diagnostic(code(prompt_registry::document::variable_name))]
    VariableName(String),
}

/// Errors raised while rendering a template
#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("Input validation failed: {}", .0.join("; "))]
    #[diagnostic(
        code(prompt_registry::template::inputs),
        help("Supply every required variable and only variables the template declares")
    )]
    InvalidInputs(Vec<String>),

    #[error("Template rendering failed: {0}")]
    #[diagnostic(code(prompt_registry::template::render))]
    Render(#[from] minijinja::Error),
}

impl TemplateError {
    /// Individual contract violations, empty for engine failures
    pub fn violations(&self) -> &[String] {
        match self {
            TemplateError::InvalidInputs(errors) => errors,
            TemplateError::Render(_) => &[],
        }
    }
}

/// Errors raised by registry storage operations
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("IO error on {}: {source}", .path.display())]
    #[diagnostic(code(prompt_registry::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML in {}: {source}", .path.display())]
    #[diagnostic(code(prompt_registry::registry::parse))]
    Parse {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: YamlSyntaxError,
    },

    #[error("Error loading template from {}: {source}", .path.display())]
    #[diagnostic(code(prompt_registry::registry::document))]
    InvalidDocument {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: DocumentError,
    },

    #[error("Template file already exists: {}", .0.display())]
    #[diagnostic(
        code(prompt_registry::registry::already_exists),
        help("Pick a new version number or edit the existing file")
    )]
    AlreadyExists(PathBuf),

    #[error("invalid template name '{0}'")]
    #[diagnostic(
        code(prompt_registry::registry::invalid_name),
        help("Template names must be non-empty and must not contain path separators or '..'")
    )]
    InvalidName(String),

    #[error("invalid version '{version}' for template '{name}'")]
    #[diagnostic(
        code(prompt_registry::registry::invalid_version),
        help("Template versions must be positive integers")
    )]
    InvalidVersion { name: String, version: String },

    #[error(
        "Template written to {} but the registry could not be reloaded: {source}",
        .path.display()
    )]
    #[diagnostic(
        code(prompt_registry::registry::reload),
        help("The new file is in place; fix the reported document and reload")
    )]
    Reload {
        path: PathBuf,
        #[source]
        source: Box<RegistryError>,
    },

    #[error("failed to serialize template '{name}': {source}")]
    #[diagnostic(code(prompt_registry::registry::serialize))]
    Serialize {
        name: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Template '{name}' not found")]
    #[diagnostic(code(prompt_registry::registry::not_found))]
    NotFound { name: String, version: Option<i64> },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.into(),
            source,
        }
    }
}
