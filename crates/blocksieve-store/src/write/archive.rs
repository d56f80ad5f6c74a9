use super::{delimited, xlsx, OutputView};
use crate::error::Result;
use crate::paths;
use blocksieve_core::{JobId, OutputFormat};
use std::io::{Cursor, Seek, Write};
use std::ops::Range;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundles one part file per range into a zip archive.
pub(crate) fn write_archive<W: Write + Seek>(
    out: W,
    id: &JobId,
    view: &OutputView<'_>,
    format: OutputFormat,
    ranges: &[Range<usize>],
) -> Result<()> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, range) in ranges.iter().enumerate() {
        zip.start_file(paths::part_file_name(id, format, index + 1), options)?;
        match format {
            OutputFormat::Csv => delimited::write_csv(&mut zip, view, range.clone())?,
            OutputFormat::Xlsx => {
                // A workbook is itself a zip and needs a seekable target.
                let mut buffer = Cursor::new(Vec::new());
                xlsx::write_xlsx(&mut buffer, view, range.clone())?;
                zip.write_all(buffer.get_ref())?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}
