//! Export a ranked contact list to CSV.
//!
//! Output is UTF-8 with BOM for Excel compatibility.

use std::io::Write;
use std::path::Path;

use crate::model::contact::ContactRecord;

/// Column names, in output order.
const HEADER: [&str; 6] = ["Address", "Name", "To", "CC", "BCC", "Total"];

/// Write `contacts` to `output_path`, one row per contact, in the given order.
///
/// Columns: Address, Name, To, CC, BCC, Total.
pub fn export_csv(
    contacts: &[&ContactRecord],
    output_path: &Path,
    separator: char,
) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(output_path)?;

    // UTF-8 BOM for Excel
    file.write_all(&[0xEF, 0xBB, 0xBF])?;
    write_rows(&mut file, contacts, separator)?;
    Ok(())
}

/// Write the header row and one row per contact.
pub fn write_rows(
    out: &mut dyn Write,
    contacts: &[&ContactRecord],
    separator: char,
) -> std::io::Result<()> {
    let sep = separator.to_string();
    writeln!(out, "{}", HEADER.join(sep.as_str()))?;

    for contact in contacts {
        let row = [
            csv_escape(contact.address(), separator),
            csv_escape(contact.display_name(), separator),
            contact.primary_count().to_string(),
            contact.copy_count().to_string(),
            contact.blind_copy_count().to_string(),
            contact.total_count().to_string(),
        ];
        writeln!(out, "{}", row.join(sep.as_str()))?;
    }
    Ok(())
}

/// Escape a value for CSV (RFC 4180).
///
/// Wraps in double quotes if the value contains the separator, quotes, or newlines.
fn csv_escape(value: &str, separator: char) -> String {
    if value.contains(separator)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
