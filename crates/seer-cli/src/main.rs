use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod replay;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("seer error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = bootstrap::load_config(&flags)?;

    match &cli.command {
        cli::Commands::Reconcile(args) => commands::reconcile::handle(args, &config, &flags),
        cli::Commands::Transform(args) => commands::transform::handle(args, &config, &flags),
        cli::Commands::Apply(args) => commands::apply::handle(args, &config, &flags).await,
        cli::Commands::Schema(_) => unreachable!("schema is handled before config loading"),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SEER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
