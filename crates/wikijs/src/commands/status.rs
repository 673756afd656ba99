//! `wikijs status`: connectivity and setup probe, no login.

use serde::Serialize;
use wikijs_api::WikijsClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::load_settings;

#[derive(Debug, Serialize)]
struct StatusReport {
    host: String,
    reachable: bool,
    setup_complete: bool,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let settings = load_settings(global)?;
    let host = settings.host()?;
    let transport = settings.transport()?;

    let client = WikijsClient::connect(host, &transport).await?;
    let report = StatusReport {
        host: client.host().to_owned(),
        reachable: true,
        setup_complete: client.setup_done().await?,
    };

    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            output::detail_lines(&[
                ("Host", r.host.clone()),
                ("Reachable", "yes".into()),
                ("Setup", setup_label(r.setup_complete, "complete", "pending")),
            ])
        },
        |r| setup_label(r.setup_complete, "ready", "setup-pending"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn setup_label(complete: bool, done: &str, pending: &str) -> String {
    String::from(if complete { done } else { pending })
}
