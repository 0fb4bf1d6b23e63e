//! JSON report output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Write a pretty-printed JSON report to `path`, or to stdout when no path
/// is given.
pub fn write_report<T: Serialize>(value: &T, path: Option<&Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{json}")?;
            writer.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{json}")
        }
    }
}
