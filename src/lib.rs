//! Prompt Registry
//!
//! Version-controlled prompt templates with variables, stored as plain-text
//! YAML files and rendered with a Jinja-style template engine.

pub mod cli;
pub mod core;
pub mod yaml;

pub use crate::core::{
    Inputs, PromptRegistry, PromptTemplate, RegistryError, TemplateError, VariableSpec, Version,
};
