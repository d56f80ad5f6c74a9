use super::{OutCell, OutputView};
use crate::error::{Result, StoreError};
use blocksieve_core::Cell;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fmt::Display;
use std::io::{BufWriter, Seek, Write};
use std::ops::Range;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Row limit of a single worksheet, header included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
// Index into cellXfs of the text ("@") format.
const TEXT_STYLE: &str = "1";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Filtered" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="49" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

const STATIC_PARTS: [(&str, &str); 5] = [
    ("[Content_Types].xml", CONTENT_TYPES),
    ("_rels/.rels", ROOT_RELS),
    ("xl/workbook.xml", WORKBOOK),
    ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
    ("xl/styles.xml", STYLES),
];

/// Writes a single-sheet workbook. Phone values are inline strings with the
/// text number format so spreadsheet apps never reinterpret them as numbers.
pub(crate) fn write_xlsx<W: Write + Seek>(
    out: W,
    view: &OutputView<'_>,
    range: Range<usize>,
) -> Result<()> {
    if range.len() >= MAX_SHEET_ROWS {
        return Err(StoreError::TooManyRows(range.len()));
    }

    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, body) in STATIC_PARTS {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    zip.start_file(SHEET_PATH, options)?;
    let mut writer = Writer::new(BufWriter::new(&mut zip));
    write_sheet(&mut writer, view, range)?;
    writer.into_inner().flush()?;

    zip.finish()?;
    Ok(())
}

fn write_sheet<W: Write>(
    writer: &mut Writer<W>,
    view: &OutputView<'_>,
    range: Range<usize>,
) -> Result<()> {
    let columns: Vec<String> = (0..view.headers().len()).map(column_letters).collect();

    emit(
        writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    emit(
        writer,
        Event::Start(BytesStart::new("worksheet").with_attributes([("xmlns", NS_MAIN)])),
    )?;
    emit(writer, Event::Start(BytesStart::new("sheetData")))?;

    start_row(writer, 1)?;
    for (column, header) in view.headers().iter().enumerate() {
        text_cell(writer, &format!("{}1", columns[column]), header, None)?;
    }
    emit(writer, Event::End(BytesEnd::new("row")))?;

    for (offset, position) in range.enumerate() {
        let row_number = offset + 2;
        start_row(writer, row_number)?;
        for (column, cell) in view.cells(position).enumerate() {
            let reference = format!("{}{}", columns[column], row_number);
            match cell {
                OutCell::Phone(value) if value.is_empty() => {}
                OutCell::Phone(value) => text_cell(writer, &reference, value, Some(TEXT_STYLE))?,
                OutCell::Value(Cell::Empty) => {}
                OutCell::Value(Cell::Text(value)) => text_cell(writer, &reference, value, None)?,
                OutCell::Value(Cell::Number(value)) if value.is_finite() => {
                    number_cell(writer, &reference, &cell.text())?
                }
                OutCell::Value(Cell::Number(value)) => {
                    text_cell(writer, &reference, &value.to_string(), None)?
                }
            }
        }
        emit(writer, Event::End(BytesEnd::new("row")))?;
    }

    emit(writer, Event::End(BytesEnd::new("sheetData")))?;
    emit(writer, Event::End(BytesEnd::new("worksheet")))?;
    Ok(())
}

fn start_row<W: Write>(writer: &mut Writer<W>, number: usize) -> Result<()> {
    let number = number.to_string();
    emit(
        writer,
        Event::Start(BytesStart::new("row").with_attributes([("r", number.as_str())])),
    )
}

fn text_cell<W: Write>(
    writer: &mut Writer<W>,
    reference: &str,
    value: &str,
    style: Option<&str>,
) -> Result<()> {
    let mut start = BytesStart::new("c");
    start.push_attribute(("r", reference));
    start.push_attribute(("t", "inlineStr"));
    if let Some(style) = style {
        start.push_attribute(("s", style));
    }
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Start(BytesStart::new("is")))?;
    emit(
        writer,
        Event::Start(BytesStart::new("t").with_attributes([("xml:space", "preserve")])),
    )?;
    emit(writer, Event::Text(BytesText::new(&xml_safe(value))))?;
    emit(writer, Event::End(BytesEnd::new("t")))?;
    emit(writer, Event::End(BytesEnd::new("is")))?;
    emit(writer, Event::End(BytesEnd::new("c")))
}

fn number_cell<W: Write>(writer: &mut Writer<W>, reference: &str, value: &str) -> Result<()> {
    emit(
        writer,
        Event::Start(BytesStart::new("c").with_attributes([("r", reference)])),
    )?;
    emit(writer, Event::Start(BytesStart::new("v")))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new("v")))?;
    emit(writer, Event::End(BytesEnd::new("c")))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

fn xml_error(err: impl Display) -> StoreError {
    StoreError::Xml(err.to_string())
}

// XML 1.0 forbids most control characters even when escaped.
fn xml_safe(value: &str) -> Cow<'_, str> {
    let forbidden = |ch: char| ch < '\u{20}' && !matches!(ch, '\t' | '\n' | '\r');
    if value.chars().any(forbidden) {
        Cow::Owned(value.chars().filter(|ch| !forbidden(*ch)).collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// 0 -> "A", 25 -> "Z", 26 -> "AA".
fn column_letters(index: usize) -> String {
    let mut index = index + 1;
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{column_letters, xml_safe};

    #[test]
    fn column_letters_match_spreadsheet_naming() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(xml_safe("a\u{1}b\tc"), "ab\tc");
        assert_eq!(xml_safe("plain"), "plain");
    }
}
