//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{Config, Inputs, PromptRegistry, VariableSpec};

/// Registry for the directory selected by flags, environment and config files (not loaded)
pub fn registry(global: &GlobalOpts) -> PromptRegistry {
    let config = Config::load();
    PromptRegistry::new(config.prompts_dir(global.prompts_dir.as_deref()))
}

/// Registry for the selected directory, loaded
pub fn load_registry(global: &GlobalOpts) -> Result<PromptRegistry> {
    let mut registry = registry(global);
    registry.load()?;
    Ok(registry)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format versions as "v1, v2, v5"
pub fn format_versions(versions: &[i64]) -> String {
    versions
        .iter()
        .map(|v| format!("v{}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse `--var key=value` pairs into render inputs
pub fn parse_inputs(vars: &[String]) -> Result<Inputs> {
    let mut inputs = Inputs::new();
    for var in vars {
        let Some((key, value)) = var.split_once('=') else {
            return Err(miette::miette!(
                "Invalid variable format '{}'. Use key=value.",
                var
            ));
        };
        inputs.insert(key.to_string(), minijinja::Value::from(value));
    }
    Ok(inputs)
}

/// Parse a variable declaration for `new`: `name[!|?][:description]`.
///
/// A trailing `?` makes the variable optional; `!` or no marker makes it required.
pub fn parse_variable_decl(decl: &str) -> Result<VariableSpec> {
    let (name, description) = decl.split_once(':').unwrap_or((decl, ""));

    let spec = if let Some(name) = name.strip_suffix('?') {
        VariableSpec::optional(name, None)
    } else {
        VariableSpec::required(name.strip_suffix('!').unwrap_or(name))
    };

    if spec.name.trim().is_empty() {
        return Err(miette::miette!("Invalid variable declaration '{}'", decl));
    }

    Ok(spec.with_description(description))
}
