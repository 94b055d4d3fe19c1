use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nb_cli::cli::animate::AnimateArgs;
use nb_cli::cli::{Cli, Command, ConfigCommand};
use nb_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = nb_cli::cli::load_config()?;
    init_cli_tracing(&config.observability);

    match cli.command {
        // Default to chat when no subcommand is given.
        None | Some(Command::Chat) => nb_cli::cli::chat::chat(Arc::new(config)).await,
        Some(Command::Ask { message, json }) => {
            nb_cli::cli::ask::ask(Arc::new(config), message, json).await
        }
        Some(Command::Transcribe { path }) => {
            nb_cli::cli::transcribe::transcribe(Arc::new(config), path).await
        }
        Some(Command::Animate {
            image,
            description,
            output_dir,
            ticket,
            priority,
            category,
        }) => {
            let args = AnimateArgs {
                image,
                description,
                output_dir,
                ticket,
                priority: priority.into(),
                category: category.into(),
            };
            nb_cli::cli::animate::animate(Arc::new(config), args).await
        }
        Some(Command::Login { email, demo }) => nb_cli::cli::login::login(&config, email, demo),
        Some(Command::Register(args)) => nb_cli::cli::login::register(&config, args),
        Some(Command::Logout) => nb_cli::cli::login::logout(&config),
        Some(Command::Whoami) => {
            if !nb_cli::cli::login::whoami(&config)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            if !nb_cli::cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => nb_cli::cli::config::show(&config),
        Some(Command::Config(ConfigCommand::SetSecret)) => {
            nb_cli::cli::config::set_secret(&config)
        }
        Some(Command::Version) => {
            println!("neurobot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize stderr-only tracing so diagnostics never mix with stdout.
///
/// `RUST_LOG` wins over `observability.log_filter`.
fn init_cli_tracing(obs: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&obs.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if obs.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
