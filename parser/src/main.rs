//! @ai:module:intent CLI entry point for inspecting range expressions
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on parser, output

use clap::{Parser, Subcommand, ValueEnum};
use ridespec::{output, parser, Expansion, OutputFormat};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ridespec")]
#[command(author, version, about = "Expand and inspect benchmark range expressions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand an expression such as "1,3,5-8" into its values
    Expand {
        /// Range expression
        expression: String,

        /// Reject stray text, inverted ranges and empty results
        #[arg(long, default_value = "false")]
        strict: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the tokens and ignored fragments of an expression
    Tokens {
        /// Range expression
        expression: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Expand {
            expression,
            strict,
            format,
        } => {
            let values = if strict {
                match parser::parse_strict(&expression) {
                    Ok(values) => values,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::from(2);
                    }
                }
            } else {
                parser::parse(&expression)
            };

            let expansion = Expansion {
                expression: &expression,
                values: &values,
            };
            println!(
                "{}",
                output::format_expansion(&expansion, format.into()).trim_end()
            );

            if values.is_empty() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }

        Commands::Tokens { expression, format } => {
            let scan = parser::tokenize(&expression);
            println!("{}", output::format_scan(&expression, &scan, format.into()));
            ExitCode::SUCCESS
        }
    }
}
