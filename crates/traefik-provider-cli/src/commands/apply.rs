//! Apply command - create or update an object from a configuration file

use std::path::Path;

use console::style;
use serde_json::Value;
use traefik_provider::Provider;

use crate::commands::Globals;
use crate::display;
use crate::error::{CliError, Result};
use crate::state::StateFile;
use crate::util::read_config;

fn object_id(state: &Value) -> &str {
    state.get("id").and_then(Value::as_str).unwrap_or("object")
}

/// Run the apply command
///
/// Creates the object when there is no state yet, updates it otherwise.
/// A change of name or namespace deletes the old object first.
pub async fn run(globals: &Globals, type_name: &str, file: &Path, state_path: &Path) -> Result<()> {
    let config = read_config(type_name, file)?;
    let prior = StateFile::load(state_path)?;
    if let Some(prior) = &prior {
        prior.expect_type(type_name)?;
    }

    // Reject invalid configuration before any cluster access
    let diagnostics = Provider::offline().validate(type_name, config.clone());
    display::print_diagnostics(&diagnostics);
    if diagnostics.has_errors() {
        return Err(CliError::reported(&diagnostics));
    }
    let provider = globals.provider().await?;

    let (state, action) = match prior {
        None => (
            display::report(provider.create(type_name, config).await)?,
            "created",
        ),
        Some(prior) => {
            let replace = display::report(provider.requires_replace(
                type_name,
                prior.state.clone(),
                config.clone(),
            ))?;

            if replace {
                display::info(format!(
                    "{} changes identity, replacing it",
                    style(object_id(&prior.state)).cyan()
                ));
                display::report(provider.delete(type_name, prior.state).await)?;
                StateFile::remove(state_path)?;
                (
                    display::report(provider.create(type_name, config).await)?,
                    "replaced",
                )
            } else {
                (
                    display::report(provider.update(type_name, prior.state, config).await)?,
                    "updated",
                )
            }
        }
    };

    StateFile::new(type_name, state.clone()).save(state_path)?;
    display::success(format!("{} {}", style(object_id(&state)).cyan(), action));
    Ok(())
}
