//! Types command - list served resource and data source types

use console::style;
use traefik_provider::TypeName;

use crate::error::Result;

/// Run the types command
pub fn run() -> Result<()> {
    println!("{}", style("Resources:").bold());
    for type_name in TypeName::resource_types() {
        println!("  {}", type_name);
    }

    println!();
    println!("{}", style("Data sources:").bold());
    for type_name in TypeName::data_source_types() {
        println!("  {}", type_name);
    }

    Ok(())
}
