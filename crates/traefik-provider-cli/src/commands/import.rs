//! Import command - adopt an existing object

use std::path::Path;

use console::style;

use crate::commands::Globals;
use crate::display;
use crate::error::{CliError, Result};
use crate::state::StateFile;
use crate::util::parse_id;

/// Run the import command
pub async fn run(globals: &Globals, type_name: &str, id: &str, state_path: &Path) -> Result<()> {
    let id = parse_id(id)?;
    if StateFile::load(state_path)?.is_some() {
        return Err(CliError::state_with_help(
            format!("{} already exists", state_path.display()),
            "remove it or choose another state file",
        ));
    }

    let provider = globals.provider().await?;
    let state = display::report(provider.import(type_name, &id.to_string()).await)?;
    StateFile::new(type_name, state).save(state_path)?;

    display::success(format!("{} imported", style(&id).cyan()));
    Ok(())
}
