//! YAML error diagnostics pointing into the offending prompt file

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("YAML syntax error: {message}")]
#[diagnostic(code(prompt_registry::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying parser message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    /// The parser's message without location decoration
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset the error label points at
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Convert a 1-based line/column pair to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line {
        match source[line_start..].find('\n') {
            Some(pos) => line_start += pos + 1,
            None => return source.len().saturating_sub(1),
        }
    }

    let line_text = source[line_start..].split('\n').next().unwrap_or("");
    let within = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());

    line_start + within
}

/// Suggest a fix for the mistakes people make most often in prompt files
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate") {
        return Some(
            "Each key can only appear once. Remove or rename the duplicate key.".to_string(),
        );
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some(
            "Quote template bodies containing ': ' or use a block scalar (`template: |`)."
                .to_string(),
        );
    }

    if msg_lower.contains("did not find expected key") || msg_lower.contains("block end") {
        return Some("Check your indentation - it may be inconsistent.".to_string());
    }

    if msg_lower.contains("found character that cannot start any token") {
        return Some(
            "Values starting with '{{' or '{%' must be quoted or placed in a block scalar."
                .to_string(),
        );
    }

    None
}
