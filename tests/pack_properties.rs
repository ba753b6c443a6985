//! Properties of the cell packer over realistic record sets.

use omnivore_export::pack::{escape_cell, serialize_record, unescape_cell};
use omnivore_export::{pack, pack_document, render_document, Record};
use serde_json::json;

#[path = "helpers.rs"]
mod helpers;

use helpers::record;

fn records(count: usize) -> Vec<Record> {
    (0..count).map(record).collect()
}

/// Raw cell contents, quote doubling undone. Records carry no spaces.
fn raw_cells(records: &[Record], limit: usize) -> Vec<String> {
    pack(records, limit)
        .iter()
        .map(|cell| unescape_cell(cell))
        .collect()
}

#[test]
fn test_packing_is_deterministic() {
    let input = records(120);
    assert_eq!(pack(&input, 1_000), pack(&input, 1_000));
}

#[test]
fn test_cells_respect_limit_when_records_fit() {
    let input = records(500);
    let limit = 2_000;
    for cell in raw_cells(&input, limit) {
        assert!(cell.chars().count() <= limit);
    }
}

#[test]
fn test_order_and_content_preserved() {
    let input = records(300);
    let joined = raw_cells(&input, 1_500).join(",");
    let expected: Vec<String> = input.iter().map(serialize_record).collect();
    assert_eq!(joined, expected.join(","));
}

#[test]
fn test_cells_are_greedy() {
    // No cell could have absorbed the first record of the next one
    let input = records(200);
    let limit = 700;
    let cells = raw_cells(&input, limit);
    for pair in cells.windows(2) {
        let used = pair[0].chars().count();
        let next_first = pair[1].split("},{").next().unwrap_or_default();
        let next_len = next_first.chars().count() + usize::from(pair[1].contains("},{"));
        // Appending would have cost a separator plus the whole record
        assert!(used + 1 + next_len > limit);
    }
}

#[test]
fn test_joined_pair_at_limit_stays_within_limit() {
    let input = records(2);
    let joined: usize = input
        .iter()
        .map(|r| serialize_record(r).chars().count())
        .sum::<usize>()
        + 1;

    let cells = raw_cells(&input, joined);
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].chars().count(), joined);

    let cells = raw_cells(&input, joined - 1);
    assert_eq!(cells.len(), 2);
    assert!(cells.iter().all(|cell| cell.chars().count() < joined));
}

#[test]
fn test_limit_of_one_gives_one_cell_per_record() {
    let input = records(7);
    assert_eq!(pack(&input, 1).len(), 7);
}

#[test]
fn test_huge_limit_gives_single_cell() {
    let input = records(1_000);
    let (document, cells) = pack_document(&input, usize::MAX);
    assert_eq!(cells, 1);
    assert!(document.starts_with("\"{"));
    assert!(document.ends_with("}\""));
}

#[test]
fn test_empty_collection_document() {
    let (document, cells) = pack_document(&[], 30_000);
    assert_eq!(cells, 1);
    assert_eq!(document, "\"\"");
}

#[test]
fn test_titles_lose_spaces_and_double_quotes() {
    let titled = json!({"id": "t1", "title": "A \"quoted\" title"})
        .as_object()
        .cloned()
        .expect("object");
    let cells = pack(&[titled], 30_000);
    assert_eq!(
        cells,
        vec![r#"{""id"":""t1"",""title"":""A\""quoted\""title""}"#.to_string()]
    );
}

#[test]
fn test_escaping_reverses_except_spaces() {
    let raw = r#"{"title":"A \"quoted\" title"}"#;
    assert_eq!(unescape_cell(&escape_cell(raw)), raw.replace(' ', ""));
}

#[test]
fn test_document_is_rendered_cells() {
    let input = records(400);
    let (document, count) = pack_document(&input, 3_000);
    let cells = pack(&input, 3_000);
    assert_eq!(count, cells.len());
    assert_eq!(document, render_document(&cells));
    assert!(!document.contains('\n'));
}
