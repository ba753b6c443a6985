//! Greedy packing of records into length-bounded cells.
//!
//! Records are serialized to compact JSON and appended, in arrival order, to
//! the current cell until the next one would push the cell past the length
//! limit. A record that is longer than the limit on its own still gets a cell
//! to itself, so the limit holds at record boundaries only.
//!
//! Lengths are counted in characters and include the `,` separators between
//! records, so the raw content of a cell never exceeds the limit unless the
//! cell holds a single oversized record.
//!
//! Cells are emitted for a quoted delimited format: spaces are removed and
//! double quotes doubled. Space removal cannot be undone; [`unescape_cell`]
//! only reverses the quote doubling.

use log::debug;

use crate::fetch::Record;

/// Separator between records inside a cell.
const RECORD_SEPARATOR: char = ',';

/// Packs `records` into cells whose raw content is at most `length_limit`
/// characters, then escapes every cell.
///
/// Empty input yields a single empty cell.
pub fn pack(records: &[Record], length_limit: usize) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut current_length = 0usize;

    for record in records {
        let serialized = serialize_record(record);
        let length = serialized.chars().count();

        if current.is_empty() {
            current = serialized;
            current_length = length;
        } else if current_length + 1 + length > length_limit {
            cells.push(escape_cell(&current));
            current = serialized;
            current_length = length;
        } else {
            current.push(RECORD_SEPARATOR);
            current.push_str(&serialized);
            current_length += 1 + length;
        }
    }

    if !current.is_empty() || cells.is_empty() {
        cells.push(escape_cell(&current));
    }

    debug!(
        "Packed {} records into {} cells (limit {} chars)",
        records.len(),
        cells.len(),
        length_limit
    );
    cells
}

/// Compact JSON, keys in their original order.
pub fn serialize_record(record: &Record) -> String {
    // A map of JSON values always serializes
    serde_json::to_string(record).unwrap_or_default()
}

/// Removes spaces and doubles double quotes.
pub fn escape_cell(raw: &str) -> String {
    raw.replace(' ', "").replace('"', "\"\"")
}

/// Halves doubled double quotes. Removed spaces are not restored.
pub fn unescape_cell(escaped: &str) -> String {
    escaped.replace("\"\"", "\"")
}

/// Joins cells into one quoted, comma-separated line: `"c1","c2",...`.
pub fn render_document(cells: &[String]) -> String {
    format!("\"{}\"", cells.join("\",\""))
}

/// [`pack`] followed by [`render_document`].
pub fn pack_document(records: &[Record], length_limit: usize) -> (String, usize) {
    let cells = pack(records, length_limit);
    (render_document(&cells), cells.len())
}
