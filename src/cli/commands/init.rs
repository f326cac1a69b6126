//! `prompt-registry init` command - Create the prompts directory and example template

use console::style;
use miette::Result;

use crate::cli::helpers::registry;
use crate::cli::GlobalOpts;
use crate::core::registry::EXAMPLE_FILE;

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let registry = registry(global);
    let path = registry.init_storage()?;

    println!(
        "{} Initialized prompts directory at {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    if !global.quiet {
        println!("{}", style(format!("Example template: {}", EXAMPLE_FILE)).dim());
        println!();
        println!("Next steps:");
        println!(
            "  {} Show the example template",
            style("prompt-registry show example").yellow()
        );
        println!(
            "  {} Render it",
            style("prompt-registry render example --var topic=gravity").yellow()
        );
    }
    Ok(())
}
