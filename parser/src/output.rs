//! @ai:module:intent Format expansions and scans for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, Expansion, format_expansion, format_scan
//! @ai:module:depends_on token, set
//! @ai:module:stateless true

use crate::set::ParameterSet;
use crate::token::{Scan, SkipReason};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent An expression together with the values it expanded to
#[derive(Debug, Clone, Serialize)]
pub struct Expansion<'a> {
    pub expression: &'a str,
    pub values: &'a ParameterSet,
}

/// @ai:intent Format an expansion as a string
/// @ai:effects pure
pub fn format_expansion(expansion: &Expansion<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(expansion, false),
        OutputFormat::JsonPretty => to_json(expansion, true),
        OutputFormat::Text => format_expansion_text(expansion),
    }
}

fn format_expansion_text(expansion: &Expansion<'_>) -> String {
    if expansion.values.is_empty() {
        return format!("{} no values\n", "EMPTY".yellow().bold());
    }

    format!(
        "{} ({} values)\n",
        expansion.values.to_string().bold(),
        expansion.values.len()
    )
}

/// @ai:intent Format a scan result as a string
/// @ai:effects pure
pub fn format_scan(source: &str, scan: &Scan, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(scan, false),
        OutputFormat::JsonPretty => to_json(scan, true),
        OutputFormat::Text => format_scan_text(source, scan),
    }
}

/// @ai:intent Format a scan result as human-readable text
/// @ai:effects pure
fn format_scan_text(source: &str, scan: &Scan) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", source.bold()));

    for spanned in &scan.tokens {
        // Only inverted ranges expand to nothing.
        let kind = if spanned.token.is_empty() {
            "INVERTED".yellow().bold()
        } else {
            "TOKEN".green().bold()
        };

        output.push_str(&format!(
            "  {} {} {}\n",
            kind,
            spanned.token,
            format!("[{}]", spanned.span).dimmed()
        ));
    }

    for skipped in &scan.skipped {
        let reason = match skipped.reason {
            SkipReason::Unrecognized => "unrecognized",
            SkipReason::Overflow => "overflow",
            SkipReason::TooLarge => "too large",
        };

        output.push_str(&format!(
            "  {} {:?} {} ({})\n",
            "SKIP".red().bold(),
            skipped.text,
            format!("[{}]", skipped.span).dimmed(),
            reason.dimmed()
        ));
    }

    if scan.tokens.is_empty() && scan.skipped.is_empty() {
        output.push_str(&format!("  {}\n", "nothing to scan".dimmed()));
    }

    output
}

/// @ai:intent Serialize any value to JSON string
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
