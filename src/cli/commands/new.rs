//! `prompt-registry new` command - Create a new template file

use console::style;
use miette::Result;

use crate::cli::helpers::{parse_variable_decl, registry};
use crate::cli::GlobalOpts;
use crate::core::PromptTemplate;

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Template name
    pub name: String,

    /// Template description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Variable as name[:description]; suffix the name with '?' for optional, '!' for required
    #[arg(long = "var", short = 'V', value_name = "NAME[:DESCRIPTION]")]
    pub vars: Vec<String>,
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut registry = registry(global);

    if registry.has(&args.name)? {
        return Err(miette::miette!("Template '{}' already exists.", args.name));
    }

    let mut template = PromptTemplate::new(&args.name, "").with_description(&args.description);
    for decl in &args.vars {
        template = template.with_variable(parse_variable_decl(decl)?);
    }
    template.template = placeholder_body(&template);

    let path = registry.create(&template)?;

    println!(
        "{} Created new prompt template {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    if !global.quiet {
        println!("{}", style("Edit the file to customize your template.").dim());
    }
    Ok(())
}

/// Starter body referencing every declared variable
fn placeholder_body(template: &PromptTemplate) -> String {
    if template.variables.is_empty() {
        return "Your prompt template here.\n".to_string();
    }

    let references: Vec<String> = template
        .variables
        .iter()
        .map(|v| format!("{{{{ {} }}}}", v.name))
        .collect();
    format!("Your prompt here.\n\n{}\n", references.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VariableSpec;

    #[test]
    fn test_placeholder_body_references_variables() {
        let template = PromptTemplate::new("p", "")
            .with_variable(VariableSpec::required("topic"))
            .with_variable(VariableSpec::optional("tone", None));
        assert_eq!(
            placeholder_body(&template),
            "Your prompt here.\n\n{{ topic }}\n{{ tone }}\n"
        );
    }

    #[test]
    fn test_placeholder_body_without_variables() {
        let template = PromptTemplate::new("p", "");
        assert_eq!(placeholder_body(&template), "Your prompt template here.\n");
        assert!(PromptTemplate::new("p", placeholder_body(&template))
            .validate()
            .is_empty());
    }
}
