//! Destroy command - delete an object and forget its state

use std::path::Path;

use console::style;

use crate::commands::Globals;
use crate::display;
use crate::error::Result;
use crate::state::StateFile;

/// Run the destroy command
pub async fn run(globals: &Globals, type_name: &str, state_path: &Path) -> Result<()> {
    let current = StateFile::load_existing(state_path, type_name)?;
    let id = current
        .state
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("object")
        .to_string();

    let provider = globals.provider().await?;
    display::report(provider.delete(type_name, current.state).await)?;
    StateFile::remove(state_path)?;

    display::success(format!("{} destroyed", style(id).cyan()));
    Ok(())
}
