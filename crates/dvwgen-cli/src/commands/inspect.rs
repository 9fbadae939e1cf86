use std::path::Path;

use dvwgen_core::parse_schema;

use crate::unpack::read_customizations;

pub fn run_inspect(input: &Path, output: Option<&Path>) -> Result<String, String> {
    let content = read_customizations(input)?;
    let doc = parse_schema(&content).map_err(|d| format!("[{}] {}", d.code, d.message))?;

    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(out_path) = output {
        std::fs::write(out_path, &json)
            .map_err(|e| format!("Failed to write {}: {e}", out_path.display()))?;
        return Ok(format!("Written to {}", out_path.display()));
    }

    Ok(json)
}
