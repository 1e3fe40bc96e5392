//! Fourth Wall CLI - extract voiced characters from books.

use clap::Parser;
use fourthwall_cli::commands;
use fourthwall_cli::{build_model, open_store, AppExtractor, Cli, Command, Config, Formatter};
use fourthwall_extractor::CacheGateway;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> fourthwall_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        config.store.backend = store;
    }
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let roster = config.roster()?;

    match cli.command {
        Command::Voices => commands::execute_voices(&roster, &formatter)?,
        Command::Show(args) => {
            let gateway = CacheGateway::new(open_store(&config)?);
            commands::execute_show(args, &gateway, &roster, &formatter)?;
        }
        Command::List => {
            let gateway = CacheGateway::new(open_store(&config)?);
            commands::execute_list(&gateway, &formatter)?;
        }
        Command::Extract(args) => {
            let llm = build_model(&config, cli.api_key, &roster)?;
            let extractor = AppExtractor::new(
                llm,
                open_store(&config)?,
                roster,
                config.extractor.clone(),
            );
            commands::execute_extract(args, &extractor, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
