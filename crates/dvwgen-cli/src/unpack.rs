use std::fs;
use std::io::Read;
use std::path::Path;

/// Read the customizations document from the input path.
///
/// A `.zip` solution archive is searched for the entry whose full name ends
/// with `customizations.xml` (case-insensitive, any depth). Any other path
/// is read as the XML document directly.
pub fn read_customizations(input: &Path) -> Result<String, String> {
    if !input.exists() {
        return Err(format!("Path does not exist: {}", input.display()));
    }

    let is_zip = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        read_from_zip(input)
    } else {
        fs::read_to_string(input).map_err(|e| format!("Failed to read {}: {}", input.display(), e))
    }
}

fn read_from_zip(path: &Path) -> Result<String, String> {
    let file =
        fs::File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| format!("Failed to read ZIP archive: {e}"))?;

    let entry_name = archive
        .file_names()
        .find(|name| name.to_lowercase().ends_with("customizations.xml"))
        .map(String::from)
        .ok_or_else(|| format!("customizations.xml not found in {}", path.display()))?;

    let mut entry = archive
        .by_name(&entry_name)
        .map_err(|e| format!("Failed to read zip entry {}: {}", entry_name, e))?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| format!("Failed to read {}: {}", entry_name, e))?;
    Ok(content)
}
