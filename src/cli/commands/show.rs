//! `prompt-registry show` command - Show one prompt template

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::registry;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::PromptTemplate;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Template name
    pub name: String,

    /// Specific version to show (default: latest)
    #[arg(long, short = 'v')]
    pub version: Option<i64>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "auto")]
    pub format: OutputFormat,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let mut registry = registry(global);

    let Some(template) = registry.find(&args.name, args.version)? else {
        return Err(miette::miette!("Template '{}' not found.", args.name));
    };

    match args.format {
        OutputFormat::Yaml => {
            print!("{}", template.to_yaml().into_diagnostic()?);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&template.serialize()).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Auto => print_details(template),
    }
    Ok(())
}

fn print_details(template: &PromptTemplate) {
    println!(
        "{} {}",
        style(&template.name).cyan().bold(),
        style(format!("v{}", template.version)).magenta()
    );
    if template.description.is_empty() {
        println!("{}", style("No description").dim());
    } else {
        println!("{}", style(&template.description).dim());
    }
    println!();

    if template.variables.is_empty() {
        println!("{}", style("No variables defined").dim());
    } else {
        let mut builder = Builder::default();
        builder.push_record(["Name", "Required", "Default", "Description"]);
        for spec in &template.variables {
            let default = spec
                .default
                .as_ref()
                .and_then(|v| serde_yml::to_string(v).ok())
                .map(|s| s.trim_end().to_string())
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                spec.name.clone(),
                (if spec.required { "Yes" } else { "No" }).to_string(),
                default,
                spec.description.clone(),
            ]);
        }
        println!("{}", style("Variables").bold());
        println!("{}", builder.build().with(Style::sharp()));
    }

    println!();
    println!("{}", style("Template:").bold());
    let width = template.template.lines().count().to_string().len();
    for (i, line) in template.template.lines().enumerate() {
        println!("{} {}", style(format!("{:>width$}", i + 1, width = width)).dim(), line);
    }
}
