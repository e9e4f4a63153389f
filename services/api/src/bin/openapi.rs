//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3 document for the gateway to disk. The output path is
//! the first argument, `openapi.json` by default.

use api_lib::web::ApiDoc;
use std::path::Path;
use utoipa::OpenApi;

fn write_spec(api_doc: &utoipa::openapi::OpenApi, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, api_doc.to_pretty_json()?)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let api_doc = ApiDoc::openapi();
    write_spec(&api_doc, Path::new(&output))?;
    println!(
        "OpenAPI specification with {} paths written to {}",
        api_doc.paths.paths.len(),
        output
    );
    Ok(())
}
