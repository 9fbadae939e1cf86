mod commands;
mod unpack;
mod writer;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dvwgen",
    version,
    about = "Dataverse wrapper generator — emit C# enums and entity wrappers from a solution zip"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the enumeration container and one wrapper class per entity
    Generate {
        /// Solution zip containing customizations.xml, or a bare .xml file
        input: PathBuf,

        /// Output directory (default: ./GeneratedClasses)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only generate entities whose display name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Overwrite existing files without prompting
        #[arg(short = 'y', long)]
        yes: bool,

        /// Also print warning diagnostics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the full pipeline and report diagnostics without writing files
    Check {
        /// Solution zip containing customizations.xml, or a bare .xml file
        input: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Print the parsed schema document as JSON
    Inspect {
        /// Solution zip containing customizations.xml, or a bare .xml file
        input: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            out,
            filter,
            yes,
            verbose,
        } => {
            match commands::generate::run_generate(
                &input,
                out.as_deref(),
                filter.as_deref(),
                yes,
                verbose,
            ) {
                Ok(()) => {}
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }
        Commands::Check { input, format } => match commands::check::run_check(&input, &format) {
            Ok((output, error_count)) => {
                println!("{output}");
                if error_count > 0 {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Commands::Inspect { input, output } => {
            match commands::inspect::run_inspect(&input, output.as_deref()) {
                Ok(json) => {
                    if output.is_none() {
                        println!("{json}");
                    }
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }
    }
}
