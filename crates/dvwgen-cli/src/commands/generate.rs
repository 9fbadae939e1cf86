use std::path::{Path, PathBuf};
use std::time::Instant;

use console::style;

use dvwgen_core::{generate, parse_schema, GenerateOptions};

use crate::unpack::read_customizations;
use crate::writer::write_artifact;

pub fn run_generate(
    input: &Path,
    out: Option<&Path>,
    filter: Option<&str>,
    yes: bool,
    verbose: bool,
) -> Result<(), String> {
    let started = Instant::now();
    let out_root = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("GeneratedClasses"));

    println!(
        "{} reading customizations from: {}",
        style("[info]").cyan(),
        input.display()
    );
    let content = read_customizations(input)?;

    let doc = parse_schema(&content).map_err(|d| format!("[{}] {}", d.code, d.message))?;
    let options = GenerateOptions {
        filter_contains: filter.map(String::from),
    };
    let result = generate(&doc, &options).map_err(|d| format!("[{}] {}", d.code, d.message))?;

    let mut written = 0usize;
    for artifact in &result.artifacts {
        match write_artifact(&out_root, artifact, yes)? {
            Some(path) => {
                println!("{} wrote: {}", style("[info]").cyan(), path.display());
                written += 1;
            }
            None => {
                println!(
                    "{} skipped overwrite: {}",
                    style("[warn]").yellow(),
                    artifact.file_name
                );
            }
        }
    }

    if verbose {
        for warning in &result.warnings {
            let subject = warning
                .subject
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            println!(
                "{} {}{}: {}",
                style("[warn]").yellow(),
                warning.code,
                subject,
                warning.message
            );
        }
    }

    println!();
    println!("{}", style("-".repeat(46)).dim());
    println!("{} done", style("[ok]").green());
    println!("Time: {:.2?}", started.elapsed());
    println!("Entities generated:    {}", result.counters.entities_generated);
    println!("Option sets processed: {}", result.counters.option_sets_processed);
    println!("Enums generated:       {}", result.counters.enums_generated);
    println!("Files written:         {written}");
    println!("Output directory:      {}", out_root.display());
    println!("{}", style("-".repeat(46)).dim());

    Ok(())
}
