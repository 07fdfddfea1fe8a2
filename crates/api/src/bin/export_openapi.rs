// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/openapi.json
//
// Generates the spec without starting the server or touching a database.

use anyhow::Context;
use roster_api::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::to_json().context("Failed to serialize OpenAPI spec")?;
    println!("{}", json);
    Ok(())
}
