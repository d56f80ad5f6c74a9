use super::{InputInfo, InputTable};
use crate::error::{Result, StoreError};
use blocksieve_core::{clean_header, Cell, Row, Table};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Decoding attempts, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8Bom,
    Utf16Bom,
    Utf8,
    Windows1252,
}

impl TextEncoding {
    pub const FALLBACK_ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8Bom,
        TextEncoding::Utf16Bom,
        TextEncoding::Utf8,
        TextEncoding::Windows1252,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Utf16Bom => "utf-16",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }
}

/// Decodes `bytes` with one encoding; `None` when the bytes do not fit it.
pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Option<Cow<'_, str>> {
    match encoding {
        TextEncoding::Utf8Bom => bytes
            .strip_prefix(UTF8_BOM)
            .and_then(|rest| strict_decode(UTF_8, rest)),
        TextEncoding::Utf16Bom => match Encoding::for_bom(bytes) {
            Some((found, bom_len)) if found == UTF_16LE || found == UTF_16BE => {
                strict_decode(found, &bytes[bom_len..])
            }
            _ => None,
        },
        TextEncoding::Utf8 => strict_decode(UTF_8, bytes),
        // Covers Latin-1 as well; every byte maps to a character.
        TextEncoding::Windows1252 => strict_decode(WINDOWS_1252, bytes),
    }
}

fn strict_decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    (!had_errors).then_some(text)
}

pub(super) fn read_delimited(path: &Path) -> Result<InputTable> {
    let bytes = fs::read(path)?;
    let mut last_error = String::from("no encoding matched");

    for encoding in TextEncoding::FALLBACK_ORDER {
        let Some(text) = decode_text(&bytes, encoding) else {
            continue;
        };
        match parse_delimited(&text) {
            Ok((table, delimiter, skipped_rows)) => {
                debug!(
                    encoding = encoding.label(),
                    delimiter = %(delimiter as char).escape_default(),
                    rows = table.len(),
                    "parsed delimited input"
                );
                return Ok(InputTable {
                    table,
                    info: InputInfo {
                        format: "csv",
                        encoding: Some(encoding.label()),
                        delimiter: Some(delimiter as char),
                        skipped_rows,
                    },
                });
            }
            Err(reason) => {
                debug!(encoding = encoding.label(), %reason, "parse attempt failed");
                last_error = reason;
            }
        }
    }

    Err(StoreError::Unreadable {
        path: path.to_path_buf(),
        reason: last_error,
    })
}

fn parse_delimited(text: &str) -> std::result::Result<(Table, u8, usize), String> {
    let delimiter = sniff_delimiter(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| format!("failed to read header row: {err}"))?
        .iter()
        .map(clean_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err("missing header row".to_string());
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut skipped = 0;
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| format!("row {}: {err}", index + 2))?;
        let mut cells: Vec<Cell> = record.iter().map(Cell::from).collect();
        if cells.len() > width {
            if cells[width..].iter().all(Cell::is_empty) {
                cells.truncate(width);
            } else {
                skipped += 1;
                continue;
            }
        }
        cells.resize(width, Cell::Empty);
        rows.push(Row::new(cells));
    }

    if skipped > 0 {
        warn!(skipped, "skipped rows with more fields than the header");
    }
    Ok((Table::new(headers, rows), delimiter, skipped))
}

// Picks the candidate that occurs most often on the header line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut best = (b',', 0usize);
    for candidate in DELIMITERS {
        let count = header.bytes().filter(|byte| *byte == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}
