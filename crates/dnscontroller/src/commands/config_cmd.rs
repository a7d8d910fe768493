//! Config subcommand handlers.

use dnscontroller_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config::config_path);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)
                    .map_err(|e| CliError::Render(e.to_string()))?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| {
                    String::new()
                })?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let written = config::save_config(&Config::default(), Some(&path))?;
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }
    }
}
