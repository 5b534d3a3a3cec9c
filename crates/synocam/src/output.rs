//! Rendering for the `--output` formats.
//!
//! The machine-readable formats (json, json-compact, yaml) serialize the
//! source DTOs directly so nothing is lost to table formatting; `table`
//! goes through a `Tabled` row per item, and `plain` emits bare
//! identifiers for scripting.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Serialize for the machine-readable formats; `None` means the caller
/// renders for humans (table or plain).
fn structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    match format {
        OutputFormat::Json => {
            Some(serde_json::to_string_pretty(data).expect("serialization should not fail"))
        }
        OutputFormat::JsonCompact => {
            Some(serde_json::to_string(data).expect("serialization should not fail"))
        }
        OutputFormat::Yaml => {
            Some(serde_yaml::to_string(data).expect("serialization should not fail"))
        }
        OutputFormat::Table | OutputFormat::Plain => None,
    }
}

/// Render a list of items: `to_row` feeds the table view, `id_fn` the
/// plain view, and the structured formats serialize `data` itself.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    if let Some(out) = structured(format, data) {
        return out;
    }
    if matches!(format, OutputFormat::Plain) {
        return data.iter().map(&id_fn).collect::<Vec<_>>().join("\n");
    }
    let rows: Vec<R> = data.iter().map(to_row).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render one item. Detail views are pre-formatted strings rather than
/// `Tabled` rows, so the table arm takes a `detail_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    if let Some(out) = structured(format, data) {
        return out;
    }
    if matches!(format, OutputFormat::Plain) {
        return id_fn(data);
    }
    detail_fn(data)
}

/// Print to stdout unless quiet. Output may be piped, so a closed pipe
/// is swallowed rather than reported.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
