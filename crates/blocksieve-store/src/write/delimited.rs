use super::OutputView;
use crate::error::Result;
use std::io::Write;
use std::ops::Range;

pub(crate) fn write_csv<W: Write>(out: W, view: &OutputView<'_>, range: Range<usize>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(view.headers())?;
    for position in range {
        for cell in view.cells(position) {
            writer.write_field(cell.text().as_bytes())?;
        }
        writer.write_record(None::<&[u8]>)?;
    }
    writer.flush()?;
    Ok(())
}
