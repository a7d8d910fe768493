//! Effective configuration: the shared config layers plus command-line
//! overrides.

use figment::Figment;

use dnscontroller_config::Config;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

pub use dnscontroller_config::{config_path, save_config};

/// Layer the global flags over file and environment values.
fn with_globals(mut figment: Figment, global: &GlobalOpts) -> Figment {
    if let Some(ref server) = global.server {
        figment = figment.merge(("client.url", server));
    }
    if let Some(timeout) = global.timeout {
        figment = figment.merge(("client.timeout", timeout));
    }
    figment
}

/// Load the config the client commands run with.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let figment = with_globals(
        dnscontroller_config::figment(global.config.as_deref()),
        global,
    );

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load the config `serve` runs with. Serve flags win over everything.
pub fn load_for_serve(global: &GlobalOpts, args: &ServeArgs) -> Result<Config, CliError> {
    let mut figment = with_globals(
        dnscontroller_config::figment(global.config.as_deref()),
        global,
    );

    if let Some(ref listen) = args.listen {
        figment = figment.merge(("listen", listen));
    }
    if let Some(ref uri) = args.db_uri {
        figment = figment.merge(("db.uri", uri));
    }
    if args.debug_sql {
        figment = figment.merge(("debug.sql", true));
    }
    if args.debug_http {
        figment = figment.merge(("debug.http", true));
    }

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}
