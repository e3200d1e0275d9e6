//! Refresh command - re-read an object and update its state

use std::path::Path;

use console::style;

use crate::commands::Globals;
use crate::display;
use crate::error::Result;
use crate::state::StateFile;

/// Run the refresh command
///
/// When the object is gone from the cluster the state file is removed.
pub async fn run(globals: &Globals, type_name: &str, state_path: &Path) -> Result<()> {
    let current = StateFile::load_existing(state_path, type_name)?;
    let provider = globals.provider().await?;

    match display::report(provider.read(type_name, current.state).await)? {
        Some(state) => {
            StateFile::new(type_name, state).save(state_path)?;
            display::success(format!("{} refreshed", style(state_path.display()).cyan()));
        }
        None => {
            StateFile::remove(state_path)?;
            display::info("object no longer exists, state removed");
        }
    }

    Ok(())
}
