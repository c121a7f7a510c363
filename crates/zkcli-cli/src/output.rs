//! Command output formatting
//!
//! `txt` writes node data as raw bytes and names one per line; `json` writes
//! a JSON string, array, or boolean. Every rendering ends with a newline.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Deserialize;

/// Output format selected by `--format` or the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

fn json_line<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(io::Error::from)?;
    writeln!(out)
}

/// Write node data
///
/// JSON output decodes the data as UTF-8, replacing invalid sequences.
pub fn write_data<W: Write>(out: &mut W, data: &[u8], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Txt => {
            out.write_all(data)?;
            writeln!(out)
        }
        OutputFormat::Json => json_line(out, &String::from_utf8_lossy(data)),
    }
}

/// Write a list of child names or relative paths
pub fn write_names<W: Write>(out: &mut W, names: &[String], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Txt => {
            for name in names {
                writeln!(out, "{}", name)?;
            }
            Ok(())
        }
        OutputFormat::Json => json_line(out, names),
    }
}

/// Write a yes/no answer as `true` or `false`
pub fn write_flag<W: Write>(out: &mut W, value: bool, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Txt => writeln!(out, "{}", value),
        OutputFormat::Json => json_line(out, &value),
    }
}
