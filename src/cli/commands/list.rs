//! `prompt-registry list` command - List prompt templates and their versions

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_versions, load_registry, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "auto")]
    pub format: OutputFormat,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let registry = load_registry(global)?;
    let names = registry.list_names();

    match args.format {
        OutputFormat::Json => {
            let entries: Vec<_> = names
                .iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "versions": registry.list_versions(name),
                        "description": registry
                            .get(name, None)
                            .map(|t| t.description.as_str())
                            .unwrap_or_default(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            let all: Vec<_> = registry
                .all_templates()
                .into_values()
                .flatten()
                .map(|t| t.serialize())
                .collect();
            print!("{}", serde_yml::to_string(&all).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Auto => {}
    }

    if names.is_empty() {
        println!("{}", style("No prompts found.").yellow());
        if !global.quiet {
            println!(
                "{}",
                style(format!("Looking in: {}", registry.prompts_dir().display())).dim()
            );
            println!(
                "{}",
                style("Run 'prompt-registry init' to create an example.").dim()
            );
        }
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Name", "Versions", "Description"]);
    for name in &names {
        let description = registry
            .get(name, None)
            .map(|t| truncate_str(&t.description, 53))
            .unwrap_or_default();
        builder.push_record([
            name.clone(),
            format_versions(&registry.list_versions(name)),
            description,
        ]);
    }

    println!("{}", builder.build().with(Style::rounded()));
    if !global.quiet {
        println!();
        println!("{} prompt(s) found", style(names.len()).cyan());
    }
    Ok(())
}
