//! Core module - prompt templates, their variables and the registry

pub mod config;
pub mod error;
pub mod registry;
pub mod template;
pub mod variable;

pub use config::Config;
pub use error::{DocumentError, RegistryError, TemplateError};
pub use registry::PromptRegistry;
pub use template::{Inputs, PromptTemplate, Version, UNNAMED};
pub use variable::VariableSpec;
