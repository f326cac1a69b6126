//! `prompt-registry render` command - Render a template with variables

use console::style;
use miette::Result;

use crate::cli::helpers::{parse_inputs, registry};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Template name
    pub name: String,

    /// Specific version to use (default: latest)
    #[arg(long, short = 'v')]
    pub version: Option<i64>,

    /// Variable in key=value format (repeatable)
    #[arg(long = "var", short = 'V', value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

pub fn run(args: RenderArgs, global: &GlobalOpts) -> Result<()> {
    let mut registry = registry(global);

    let Some(template) = registry.find(&args.name, args.version)? else {
        return Err(miette::miette!("Template '{}' not found.", args.name));
    };

    let inputs = parse_inputs(&args.vars)?;

    let missing: Vec<&str> = template
        .required_variables()
        .into_iter()
        .filter(|name| !inputs.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        if !global.quiet {
            eprintln!(
                "{}",
                style("Use --var key=value to provide variables").dim()
            );
        }
        return Err(miette::miette!(
            "Missing required variables: {}",
            missing.join(", ")
        ));
    }

    let rendered = template.render(&inputs)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
