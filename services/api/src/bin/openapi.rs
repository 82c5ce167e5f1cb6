//! services/api/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 specification for the REST API
//! and saves it to `openapi.json` (or the path given as the first argument).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Writes the specification to `path` and returns how many paths it documents.
fn write_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let documented_paths = api_doc.paths.paths.len();
    std::fs::write(path, api_doc.to_pretty_json()?)?;
    Ok(documented_paths)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An optional first argument overrides the output path.
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    let documented_paths = write_spec(ApiDoc::openapi(), &path)?;
    println!("✅ ScriptForge OpenAPI spec ({} paths) written to {}", documented_paths, path);
    Ok(())
}
