mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dnscontroller_api::DnsClient;
use dnscontroller_config::LoggingConfig;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A broken config is reported by the command that needs it; logging
    // falls back to its defaults here.
    let logging = config::load(&cli.global)
        .map(|cfg| cfg.logging)
        .unwrap_or_default();
    let is_serve = matches!(cli.command, Command::Serve(_));
    init_tracing(cli.global.verbose, is_serve, &logging);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, is_serve: bool, logging: &LoggingConfig) {
    let level = verbosity.saturating_add(u8::from(is_serve));
    let filter = match (level, logging.debug) {
        (_, true) | (2, _) => "debug",
        (0, _) => "warn",
        (1, _) => "info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "dnscontroller", &mut std::io::stdout());
            Ok(())
        }

        Command::Serve(args) => {
            let cfg = config::load_for_serve(&cli.global, &args)?;
            commands::serve::handle(&cfg).await
        }

        // Everything else talks to a running server
        Command::Records(args) => {
            let client = build_client(&cli.global)?;
            commands::records::handle(&client, args, &cli.global).await
        }

        Command::Answers(args) => {
            let client = build_client(&cli.global)?;
            commands::answers::handle(&client, args, &cli.global).await
        }
    }
}

fn build_client(global: &cli::GlobalOpts) -> Result<DnsClient, CliError> {
    let cfg = config::load(global)?;
    tracing::debug!(server = %cfg.client.url, "using server");

    DnsClient::new(&cfg.client.url, cfg.client_timeout()).map_err(|e| CliError::Validation {
        field: "client.url".into(),
        reason: e.to_string(),
    })
}
