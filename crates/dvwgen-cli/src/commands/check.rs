use std::path::Path;

use dvwgen_core::{generate, parse_schema, Diagnostic, DiagnosticSeverity, GenerateOptions};

use crate::unpack::read_customizations;

/// Run the pipeline without writing anything and report every diagnostic.
/// Returns the rendered report and the error count for the exit code.
pub fn run_check(input: &Path, format: &str) -> Result<(String, usize), String> {
    let content = read_customizations(input)?;

    let (errors, warnings): (Vec<Diagnostic>, Vec<Diagnostic>) = match parse_schema(&content) {
        Err(d) => (vec![d], Vec::new()),
        Ok(doc) => match generate(&doc, &GenerateOptions::default()) {
            Err(d) => (vec![d], Vec::new()),
            Ok(result) => (Vec::new(), result.warnings),
        },
    };

    let error_count = errors.len();
    let warning_count = warnings.len();

    if format == "json" {
        let diagnostics: Vec<&Diagnostic> = errors.iter().chain(warnings.iter()).collect();
        let output = serde_json::json!({
            "diagnostics": diagnostics,
            "summary": {
                "errors": error_count,
                "warnings": warning_count,
            }
        });
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        return Ok((json, error_count));
    }

    // Human-readable format
    let mut lines: Vec<String> = Vec::new();
    for d in errors.iter().chain(warnings.iter()) {
        let severity = match d.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        let subject = d
            .subject
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        lines.push(format!("{severity}[{}]{subject}: {}", d.code, d.message));
    }

    let error_word = if error_count == 1 { "error" } else { "errors" };
    let warning_word = if warning_count == 1 {
        "warning"
    } else {
        "warnings"
    };
    lines.push(format!(
        "{error_count} {error_word}, {warning_count} {warning_word}."
    ));

    Ok((lines.join("\n"), error_count))
}
