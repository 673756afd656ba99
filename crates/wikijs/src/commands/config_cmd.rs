//! `wikijs config`: print the effective settings.

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::load_settings;

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let settings = load_settings(global)?;
    let out = settings.to_redacted_toml()?;
    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}
