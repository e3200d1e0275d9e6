//! Manifest command - render a configuration as YAML

use std::path::Path;

use traefik_provider::Provider;

use crate::display;
use crate::error::Result;
use crate::util::{parse_type, read_config};

/// Run the manifest command
///
/// Never contacts the cluster, whatever the provider configuration says.
pub async fn run(type_name: &str, file: &Path) -> Result<()> {
    let mut parsed = parse_type(type_name)?;
    parsed.manifest = true;

    let config = read_config(&parsed.to_string(), file)?;
    let rendered = display::report(
        Provider::offline()
            .read_data_source(&parsed.to_string(), config)
            .await,
    )?;

    if let Some(yaml) = rendered.get("yaml").and_then(|v| v.as_str()) {
        print!("{}", yaml);
    }
    Ok(())
}
