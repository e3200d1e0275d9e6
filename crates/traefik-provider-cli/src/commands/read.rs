//! Read command - fetch an object through its data source

use serde_json::json;

use crate::commands::Globals;
use crate::display;
use crate::error::{CliError, Result};
use crate::util::parse_id;

/// Run the read command, printing the data source state as JSON
pub async fn run(globals: &Globals, type_name: &str, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let config = json!({
        "metadata": {"name": id.name, "namespace": id.namespace}
    });

    let provider = globals.provider().await?;
    let data = display::report(provider.read_data_source(type_name, config).await)?;

    let output = serde_json::to_string_pretty(&data).map_err(|e| CliError::internal(e.to_string()))?;
    println!("{}", output);
    Ok(())
}
