use anyhow::Result;
use ordo_core::RunDocument;

/// Print the JSON Schema describing the task document format.
pub fn execute() -> Result<()> {
    let schema = schemars::schema_for!(RunDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
