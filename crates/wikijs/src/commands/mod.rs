//! Command handlers and the settings/client plumbing they share.

pub mod config_cmd;
pub mod status;
pub mod strategies;

use tracing::{debug, warn};

use wikijs_api::WikijsClient;
use wikijs_config::Settings;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

use strategies::Query;

/// Load settings from the file and environment, then apply CLI flags.
pub fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = match &global.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    if let Some(host) = &global.host {
        settings.host = Some(host.clone());
    }
    if let Some(username) = &global.username {
        settings.username = Some(username.clone());
    }
    if let Some(password) = &global.password {
        settings.password = Some(password.clone());
    }
    if global.initial_setup {
        settings.initial_setup = true;
    }
    if let Some(timeout) = global.timeout {
        settings.client_timeout = timeout;
    }
    if let Some(path) = &global.ca_cert_file {
        settings.ca_cert = None;
        settings.ca_cert_file = Some(path.clone());
    }
    Ok(settings)
}

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    let query = match cli.command {
        // No login needed
        Command::Status => return status::handle(global).await,
        Command::Config => return config_cmd::handle(global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "wikijs", &mut std::io::stdout());
            return Ok(());
        }

        Command::Strategies => Query::All,
        Command::ActiveStrategies => Query::Active,
        Command::Strategy { key } => Query::One(key),
    };

    run_authenticated(&query, global).await
}

/// Bootstrap a client, run `query`, and revoke the API key issued for the
/// run whether or not the query succeeded.
async fn run_authenticated(query: &Query, global: &GlobalOpts) -> Result<(), CliError> {
    let config = load_settings(global)?.resolve()?;
    let mut client = WikijsClient::new(config).await?;

    debug!(?query, "dispatching query");
    let result = strategies::handle(&client, query, global).await;

    match client.cleanup().await {
        Ok(()) => result,
        Err(e) => {
            warn!(error = %e, key = ?client.api_key_name(), "failed to revoke API key");
            result.and(Err(e.into()))
        }
    }
}
