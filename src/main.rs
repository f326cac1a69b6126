use clap::Parser;
use miette::Result;
use prompt_registry::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping to
    // `head` and friends does not panic on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    setup_logging(global.verbose);

    match cli.command {
        Commands::Init(args) => prompt_registry::cli::commands::init::run(args, &global),
        Commands::List(args) => prompt_registry::cli::commands::list::run(args, &global),
        Commands::Show(args) => prompt_registry::cli::commands::show::run(args, &global),
        Commands::Render(args) => prompt_registry::cli::commands::render::run(args, &global),
        Commands::Validate(args) => prompt_registry::cli::commands::validate::run(args, &global),
        Commands::New(args) => prompt_registry::cli::commands::new::run(args, &global),
        Commands::Completions(args) => prompt_registry::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` directives apply on top of the chosen level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}
