//! Schema command - print the OpenAPI schema of a type

use traefik_provider::Provider;

use crate::display;
use crate::error::{CliError, Result};

/// Run the schema command
pub fn run(type_name: &str, json: bool) -> Result<()> {
    let schema = display::report(Provider::offline().schema(type_name))?;

    let output = if json {
        serde_json::to_string_pretty(&schema).map_err(|e| CliError::internal(e.to_string()))?
    } else {
        serde_yaml::to_string(&schema).map_err(|e| CliError::internal(e.to_string()))?
    };
    print!("{}", output);
    if json {
        println!();
    }

    Ok(())
}
