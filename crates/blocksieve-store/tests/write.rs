use blocksieve_core::{normalize_phone, Cell, JobId, OutputFormat, PhoneValue, Row, Table};
use blocksieve_store::{read_table, OutputView, OutputWriter};
use std::fs::{self, File};
use std::io::Read;
use tempfile::TempDir;

fn sample_table(rows: usize) -> (Table, Vec<PhoneValue>) {
    let headers = vec!["name".to_string(), "phone".to_string(), "score".to_string()];
    let mut table_rows = Vec::with_capacity(rows);
    let mut phones = Vec::with_capacity(rows);
    for i in 0..rows {
        let raw = format!("07{:08}", i);
        phones.push(normalize_phone(&raw));
        table_rows.push(Row::new(vec![
            Cell::Text(format!("person {i}")),
            Cell::Text(raw),
            Cell::Number(i as f64 + 0.5),
        ]));
    }
    (Table::new(headers, table_rows), phones)
}

fn view<'a>(
    table: &'a Table,
    phones: &'a [PhoneValue],
    rows: &'a [usize],
    strip_plus: bool,
) -> OutputView<'a> {
    OutputView {
        table,
        phone_column: 1,
        phones,
        rows,
        strip_plus,
    }
}

#[test]
fn csv_output_replaces_phone_column_and_keeps_order() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(5);
    let rows = vec![4, 0, 2];
    let writer = OutputWriter::new(temp.path(), 50_000);
    let id = JobId::new();

    let artifact = writer
        .write(&id, &view(&table, &phones, &rows, false), OutputFormat::Csv, false)
        .expect("write");

    assert_eq!(artifact.file_name, format!("{id}_processed.csv"));
    assert!(!artifact.archived);
    assert_eq!(artifact.rows, 3);
    let text = fs::read_to_string(&artifact.path).expect("read");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "name,phone,score",
            "person 4,+40700000004,4.5",
            "person 0,+40700000000,0.5",
            "person 2,+40700000002,2.5",
        ]
    );
}

#[test]
fn strip_plus_and_invalid_raw_values_are_written() {
    let temp = TempDir::new().expect("temp dir");
    let table = Table::new(
        vec!["phone".to_string()],
        vec![
            Row::new(vec![Cell::from("0723456789")]),
            Row::new(vec![Cell::from("n/a")]),
        ],
    );
    let phones: Vec<PhoneValue> = ["0723456789", "n/a"].into_iter().map(normalize_phone).collect();
    let rows = vec![0, 1];
    let writer = OutputWriter::new(temp.path(), 50_000);
    let output = OutputView {
        table: &table,
        phone_column: 0,
        phones: &phones,
        rows: &rows,
        strip_plus: true,
    };

    let artifact = writer
        .write(&JobId::new(), &output, OutputFormat::Csv, false)
        .expect("write");
    let text = fs::read_to_string(&artifact.path).expect("read");
    assert_eq!(text, "phone\n40723456789\nn/a\n");
}

#[test]
fn xlsx_output_reads_back_with_phone_as_text() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(3);
    let rows = vec![0, 1, 2];
    let writer = OutputWriter::new(temp.path(), 50_000);

    let artifact = writer
        .write(
            &JobId::new(),
            &view(&table, &phones, &rows, true),
            OutputFormat::Xlsx,
            false,
        )
        .expect("write");
    assert!(artifact.file_name.ends_with("_processed.xlsx"));

    let input = read_table(&artifact.path).expect("read back");
    assert_eq!(input.table.headers, vec!["name", "phone", "score"]);
    assert_eq!(input.table.len(), 3);
    assert_eq!(
        input.table.rows[1].get(1),
        &Cell::Text("40700000001".to_string())
    );
    assert_eq!(input.table.rows[1].get(2), &Cell::Number(1.5));
}

#[test]
fn split_output_bundles_bounded_parts() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(25);
    let rows: Vec<usize> = (0..25).collect();
    let writer = OutputWriter::new(temp.path(), 10);
    let id = JobId::new();

    let artifact = writer
        .write(&id, &view(&table, &phones, &rows, false), OutputFormat::Csv, true)
        .expect("write");

    assert!(artifact.archived);
    assert_eq!(artifact.parts, 3);
    assert_eq!(artifact.file_name, format!("{id}_csv.zip"));

    let mut archive = zip::ZipArchive::new(File::open(&artifact.path).expect("open")).expect("zip");
    assert_eq!(archive.len(), 3);
    let mut sizes = Vec::new();
    for part in 1..=3 {
        let mut entry = archive
            .by_name(&format!("{id}_processed_part{part}.csv"))
            .expect("part");
        let mut text = String::new();
        entry.read_to_string(&mut text).expect("read part");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,phone,score"));
        sizes.push(lines.count());
    }
    assert_eq!(sizes, vec![10, 10, 5]);
}

#[test]
fn split_is_skipped_when_rows_fit_in_one_part() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(10);
    let rows: Vec<usize> = (0..10).collect();
    let writer = OutputWriter::new(temp.path(), 10);

    let artifact = writer
        .write(
            &JobId::new(),
            &view(&table, &phones, &rows, false),
            OutputFormat::Xlsx,
            true,
        )
        .expect("write");
    assert!(!artifact.archived);
    assert_eq!(artifact.parts, 1);
}

#[test]
fn xlsx_parts_are_workbooks() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(7);
    let rows: Vec<usize> = (0..7).collect();
    let writer = OutputWriter::new(temp.path(), 5);
    let id = JobId::new();

    let artifact = writer
        .write(&id, &view(&table, &phones, &rows, false), OutputFormat::Xlsx, true)
        .expect("write");
    assert_eq!(artifact.file_name, format!("{id}_xlsx.zip"));

    let extract = temp.path().join("extract");
    fs::create_dir_all(&extract).expect("mkdir");
    let mut archive = zip::ZipArchive::new(File::open(&artifact.path).expect("open")).expect("zip");
    let mut counts = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry");
        let target = extract.join(format!("part{}.xlsx", index + 1));
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).expect("read entry");
        fs::write(&target, bytes).expect("write part");
        counts.push(read_table(&target).expect("read part").table.len());
    }
    assert_eq!(counts, vec![5, 2]);
}

#[test]
fn only_the_final_artifact_remains_in_the_directory() {
    let temp = TempDir::new().expect("temp dir");
    let (table, phones) = sample_table(3);
    let rows = vec![0, 1, 2];
    let writer = OutputWriter::new(temp.path(), 2);

    writer
        .write(&JobId::new(), &view(&table, &phones, &rows, false), OutputFormat::Csv, true)
        .expect("write");

    let names: Vec<String> = fs::read_dir(temp.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with("_csv.zip"));
}
