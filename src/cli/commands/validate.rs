//! `prompt-registry validate` command - Validate every loaded template

use console::style;
use miette::Result;

use crate::cli::helpers::load_registry;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let registry = load_registry(global)?;

    let errors = registry.validate_all();

    if registry.is_empty() && errors.is_empty() {
        println!("{}", style("No prompts found to validate.").yellow());
        return Ok(());
    }

    if errors.is_empty() {
        println!(
            "{} All {} prompt(s) validated successfully.",
            style("✓").green().bold(),
            registry.len()
        );
        return Ok(());
    }

    if !args.summary {
        println!("{}", style("Validation errors found:").red());
        for (key, template_errors) in &errors {
            println!();
            println!("{}", style(format!("{}:", key)).yellow());
            for error in template_errors {
                println!("  {} {}", style("-").red(), error);
            }
        }
        println!();
    }

    if errors.len() == 1 {
        Err(miette::miette!("Validation failed: 1 template has errors"))
    } else {
        Err(miette::miette!(
            "Validation failed: {} templates have errors",
            errors.len()
        ))
    }
}
