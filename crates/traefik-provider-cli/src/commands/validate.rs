//! Validate command - check a resource configuration offline

use std::path::Path;

use traefik_provider::Provider;

use crate::display;
use crate::error::{CliError, Result};
use crate::util::read_config;

/// Run the validate command
pub fn run(type_name: &str, file: &Path) -> Result<()> {
    let config = read_config(type_name, file)?;
    let diagnostics = Provider::offline().validate(type_name, config);

    display::print_diagnostics(&diagnostics);
    if diagnostics.has_errors() {
        return Err(CliError::reported(&diagnostics));
    }

    display::success(format!("{} is valid", file.display()));
    Ok(())
}
